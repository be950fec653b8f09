//! Candidate roster import from ATS exports or manually transcribed CVs.

mod normalizer;
mod parser;

use crate::workflows::campaign::{Campaign, Candidate, CandidateId, CandidateStatus};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

use normalizer::canonical_role;

#[derive(Debug)]
pub enum RosterImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidRow { line: usize, reason: String },
}

impl std::fmt::Display for RosterImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterImportError::Io(err) => write!(f, "failed to read roster: {}", err),
            RosterImportError::Csv(err) => write!(f, "invalid roster CSV data: {}", err),
            RosterImportError::InvalidRow { line, reason } => {
                write!(f, "roster line {}: {}", line, reason)
            }
        }
    }
}

impl std::error::Error for RosterImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterImportError::Io(err) => Some(err),
            RosterImportError::Csv(err) => Some(err),
            RosterImportError::InvalidRow { .. } => None,
        }
    }
}

impl From<std::io::Error> for RosterImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RosterImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Where a roster came from; recorded in each imported candidate's audit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "provider", rename_all = "snake_case")]
pub enum RosterSource {
    Ats(String),
    ManualCv,
}

impl RosterSource {
    /// Parses query-style values such as `ats:workday` or `manual`.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match raw.split_once(':') {
            Some((kind, provider)) if kind.eq_ignore_ascii_case("ats") => {
                Self::Ats(provider.trim().to_string())
            }
            _ if raw.eq_ignore_ascii_case("manual") || raw.is_empty() => Self::ManualCv,
            _ => Self::Ats(raw.to_string()),
        }
    }

    pub fn audit_message(&self) -> String {
        match self {
            Self::Ats(provider) => format!("Imported from ATS ({provider})"),
            Self::ManualCv => "Extracted from manual CV upload".to_string(),
        }
    }
}

/// One validated roster row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub line: usize,
    pub name: String,
    pub phone: Option<String>,
    pub mother_tongue: String,
    pub role: String,
    pub needs_residence_permit: bool,
}

impl RosterEntry {
    /// New TO_REVIEW candidate with no documents and the agent inactive. The
    /// role is matched against the campaign's role titles.
    pub fn into_candidate(
        self,
        id: CandidateId,
        campaign: &Campaign,
        source: &RosterSource,
        at: NaiveDateTime,
    ) -> Candidate {
        let role = canonical_role(&self.role, campaign.roles.iter().map(|r| r.title.as_str()));
        let mut candidate = Candidate::new(
            id,
            self.name,
            role,
            campaign.id.clone(),
            CandidateStatus::ToReview,
        );
        candidate.phone = self.phone;
        candidate.mother_tongue = self.mother_tongue;
        candidate.needs_residence_permit = self.needs_residence_permit;
        candidate.record_audit(at, source.audit_message());
        candidate
    }
}

pub struct RosterImporter;

impl RosterImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<RosterEntry>, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<RosterEntry>, RosterImportError> {
        parser::parse_entries(reader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::campaign::CampaignBlueprint;
    use chrono::NaiveDate;
    use std::io::Cursor;

    const ROSTER: &str = "Name,Phone,Mother Tongue,Role,Needs Residence Permit\n\
Giuseppe Verdi,+39 340 1111111,Italian,field worker,no\n\
  Sofia   Neri ,,Italian,Line worker,\n\
Ion Popa,+40 721 000000,Romanian,Forklift operator,yes\n";

    #[test]
    fn parses_rows_and_normalizes_fields() {
        let entries = RosterImporter::from_reader(Cursor::new(ROSTER)).expect("roster parses");
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1].name, "Sofia Neri");
        assert_eq!(entries[1].phone, None);
        assert_eq!(entries[1].line, 3);
        assert!(entries[2].needs_residence_permit);
    }

    #[test]
    fn rejects_rows_without_a_name() {
        let csv = "Name,Phone,Mother Tongue,Role,Needs Residence Permit\n,+39 1,Italian,Field worker,no\n";
        match RosterImporter::from_reader(Cursor::new(csv)) {
            Err(RosterImportError::InvalidRow { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected invalid row, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unreadable_permit_flags() {
        let csv = "Name,Phone,Mother Tongue,Role,Needs Residence Permit\nAna,+1,Spanish,Field worker,perhaps\n";
        assert!(matches!(
            RosterImporter::from_reader(Cursor::new(csv)),
            Err(RosterImportError::InvalidRow { .. })
        ));
    }

    #[test]
    fn imported_candidates_start_in_review_with_source_audit() {
        let today = NaiveDate::from_ymd_opt(2024, 9, 16).expect("valid date");
        let campaign = CampaignBlueprint::demo(today).campaign;
        let entries = RosterImporter::from_reader(Cursor::new(ROSTER)).expect("roster parses");
        let at = today.and_hms_opt(10, 0, 0).expect("valid time");
        let source = RosterSource::parse("ats:workday");

        let candidate = entries
            .into_iter()
            .next()
            .expect("first entry")
            .into_candidate(CandidateId("cand-1".into()), &campaign, &source, at);

        assert_eq!(candidate.status, CandidateStatus::ToReview);
        assert_eq!(candidate.role, "Field worker");
        assert!(!candidate.whatsapp_active);
        assert!(candidate.documents.is_empty());
        assert_eq!(candidate.audit_log[0].message, "Imported from ATS (workday)");
        assert_eq!(candidate.campaign_id, campaign.id);
    }

    #[test]
    fn source_parsing_defaults_to_manual() {
        assert_eq!(RosterSource::parse(""), RosterSource::ManualCv);
        assert_eq!(RosterSource::parse("Greenhouse"), RosterSource::Ats("Greenhouse".into()));
    }
}
