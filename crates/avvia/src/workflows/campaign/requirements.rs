use std::collections::HashSet;

use serde::Serialize;
use tracing::warn;

use super::domain::{Campaign, Candidate, Document};

pub const IDENTITY_DOCUMENT: &str = "Identity document";
pub const MEDICAL_CERTIFICATE: &str = "Medical certificate";
pub const RESIDENCE_PERMIT: &str = "Residence permit (if required)";
pub const FORKLIFT_LICENCE: &str = "Forklift licence";
pub const TECHNICAL_DIPLOMA: &str = "Technical diploma / degree";

/// Documents every candidate must provide regardless of role. The residence
/// permit only counts for candidates who need one.
pub const ALWAYS_REQUIRED_DOCS: [&str; 3] =
    [IDENTITY_DOCUMENT, MEDICAL_CERTIFICATE, RESIDENCE_PERMIT];

pub const STANDARD_ROLES: [&str; 5] = [
    "Field worker",
    "Line worker",
    "Forklift operator",
    "Lab technician",
    "Warehouse operative",
];

/// Optional extras an operator can attach to a role at campaign setup.
pub const EXTRA_DOCUMENTS: [&str; 6] = [
    "Forklift permit",
    "Safety certifications",
    "HACCP certificate",
    "Residence permit",
    "Experience self-declaration",
    "Other company documents",
];

/// Per-role default document lists used when a campaign does not configure
/// the candidate's role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleDocumentCatalog {
    entries: Vec<(String, Vec<String>)>,
}

impl RoleDocumentCatalog {
    pub fn standard() -> Self {
        let base = [IDENTITY_DOCUMENT, MEDICAL_CERTIFICATE, RESIDENCE_PERMIT];
        let with_extra = |extra: &str| {
            vec![
                IDENTITY_DOCUMENT.to_string(),
                MEDICAL_CERTIFICATE.to_string(),
                extra.to_string(),
                RESIDENCE_PERMIT.to_string(),
            ]
        };
        let base: Vec<String> = base.iter().map(|doc| doc.to_string()).collect();

        Self {
            entries: vec![
                ("Field worker".to_string(), base.clone()),
                ("Line worker".to_string(), base.clone()),
                ("Forklift operator".to_string(), with_extra(FORKLIFT_LICENCE)),
                ("Lab technician".to_string(), with_extra(TECHNICAL_DIPLOMA)),
                ("Warehouse operative".to_string(), base),
            ],
        }
    }

    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn with_role(mut self, title: impl Into<String>, docs: &[&str]) -> Self {
        let title = title.into();
        let docs = docs.iter().map(|doc| doc.to_string()).collect();
        self.entries.retain(|(existing, _)| *existing != title);
        self.entries.push((title, docs));
        self
    }

    pub fn defaults_for(&self, role_title: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(title, _)| title == role_title)
            .map(|(_, docs)| docs.as_slice())
    }

    pub fn role_titles(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(title, _)| title.as_str())
    }
}

impl Default for RoleDocumentCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

/// Where the required-document list for a candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementSource {
    CampaignRole,
    RoleDefaults,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayDocument {
    #[serde(flatten)]
    pub document: Document,
    pub required: bool,
    pub mandatory: bool,
    pub placeholder: bool,
    /// A later upload of a type the candidate already holds.
    pub duplicate: bool,
    pub status_label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentResolution {
    pub source: RequirementSource,
    pub required_types: Vec<String>,
    pub documents: Vec<DisplayDocument>,
}

impl DocumentResolution {
    pub fn missing_count(&self) -> usize {
        self.documents
            .iter()
            .filter(|entry| entry.required && entry.document.status.needs_attention())
            .count()
    }
}

/// Whether a document type is badged as mandatory for this candidate.
pub fn is_mandatory(doc_type: &str, candidate: &Candidate, campaign: &Campaign) -> bool {
    let always = match doc_type {
        IDENTITY_DOCUMENT | MEDICAL_CERTIFICATE => true,
        RESIDENCE_PERMIT => candidate.needs_residence_permit,
        _ => false,
    };

    always
        || campaign
            .role(&candidate.role)
            .is_some_and(|role| role.mandatory_docs.iter().any(|doc| doc == doc_type))
}

pub fn required_types(
    candidate: &Candidate,
    campaign: &Campaign,
    catalog: &RoleDocumentCatalog,
) -> (RequirementSource, Vec<String>) {
    if let Some(role) = campaign.role(&candidate.role) {
        return (RequirementSource::CampaignRole, role.required_docs.clone());
    }

    match catalog.defaults_for(&candidate.role) {
        Some(defaults) => (RequirementSource::RoleDefaults, defaults.to_vec()),
        None => (RequirementSource::Unknown, Vec::new()),
    }
}

/// Required slots in role order (placeholders where nothing was uploaded),
/// then the candidate's other documents in upload order, then later copies
/// of types already shown.
pub fn resolve_display_documents(
    candidate: &Candidate,
    campaign: &Campaign,
    catalog: &RoleDocumentCatalog,
) -> DocumentResolution {
    let (source, required) = required_types(candidate, campaign, catalog);
    let required_set: HashSet<&str> = required.iter().map(String::as_str).collect();

    let entry = |document: Document, required: bool, placeholder: bool, duplicate: bool| {
        DisplayDocument {
            mandatory: is_mandatory(&document.doc_type, candidate, campaign),
            status_label: document.status.display_label(candidate.status),
            document,
            required,
            placeholder,
            duplicate,
        }
    };

    let mut documents = Vec::with_capacity(required.len() + candidate.documents.len());
    let mut slotted = HashSet::new();
    for doc_type in &required {
        if !slotted.insert(doc_type.as_str()) {
            continue;
        }
        match candidate.document(doc_type) {
            Some(found) => documents.push(entry(found.clone(), true, false, false)),
            None => documents.push(entry(Document::placeholder(doc_type), true, true, false)),
        }
    }

    let mut seen: HashSet<&str> = HashSet::new();
    let mut duplicates = Vec::new();
    for document in &candidate.documents {
        let first = seen.insert(document.doc_type.as_str());
        if !first {
            duplicates.push(document);
        } else if !required_set.contains(document.doc_type.as_str()) {
            documents.push(entry(document.clone(), false, false, false));
        }
    }

    for document in duplicates {
        warn!(
            candidate = %candidate.id,
            doc_type = %document.doc_type,
            document_id = %document.id,
            "candidate holds more than one document of the same type"
        );
        let required = required_set.contains(document.doc_type.as_str());
        documents.push(entry(document.clone(), required, false, true));
    }

    DocumentResolution {
        source,
        required_types: required,
        documents,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::campaign::domain::{
        CampaignId, CampaignPeriod, CampaignRole, CandidateId, DocStatus,
    };
    use crate::workflows::campaign::status::CandidateStatus;
    use chrono::NaiveDate;

    fn campaign() -> Campaign {
        let start = NaiveDate::from_ymd_opt(2024, 10, 1).expect("valid date");
        let mut forklift = CampaignRole::new(
            "Forklift operator",
            2,
            &[IDENTITY_DOCUMENT, MEDICAL_CERTIFICATE, FORKLIFT_LICENCE],
        );
        forklift.mandatory_docs.push(FORKLIFT_LICENCE.to_string());

        Campaign {
            id: CampaignId("demo-1".into()),
            name: "Olive campaign".into(),
            product_type: "Olives (oil)".into(),
            location: "Bitonto (BA)".into(),
            period: CampaignPeriod {
                start,
                end: NaiveDate::from_ymd_opt(2024, 12, 31).expect("valid date"),
            },
            created_at: start.and_hms_opt(8, 0, 0).expect("valid time"),
            agent_active: true,
            roles: vec![forklift],
        }
    }

    fn candidate(role: &str) -> Candidate {
        Candidate::new(
            CandidateId("c1".into()),
            "Ahmed Hassan",
            role,
            CampaignId("demo-1".into()),
            CandidateStatus::Verifying,
        )
    }

    #[test]
    fn fills_required_slots_and_keeps_extras() {
        let mut candidate = candidate("Forklift operator");
        candidate
            .documents
            .push(Document::received("d1", "HACCP certificate", "haccp.pdf"));
        candidate
            .documents
            .push(Document::received("d2", IDENTITY_DOCUMENT, "id.pdf"));

        let resolution =
            resolve_display_documents(&candidate, &campaign(), &RoleDocumentCatalog::standard());

        assert_eq!(resolution.source, RequirementSource::CampaignRole);
        let types: Vec<&str> = resolution
            .documents
            .iter()
            .map(|entry| entry.document.doc_type.as_str())
            .collect();
        assert_eq!(
            types,
            vec![
                IDENTITY_DOCUMENT,
                MEDICAL_CERTIFICATE,
                FORKLIFT_LICENCE,
                "HACCP certificate"
            ]
        );
        assert_eq!(resolution.documents[0].status_label, "AI analysis…");
        assert!(resolution.documents[1].placeholder);
        assert_eq!(resolution.documents[1].document.status, DocStatus::Missing);
        assert!(resolution.documents[2].mandatory);
        assert!(!resolution.documents[3].required);
        assert_eq!(resolution.missing_count(), 2);
    }

    #[test]
    fn falls_back_to_catalog_then_to_nothing() {
        let catalog = RoleDocumentCatalog::standard();

        let defaults = resolve_display_documents(&candidate("Lab technician"), &campaign(), &catalog);
        assert_eq!(defaults.source, RequirementSource::RoleDefaults);
        assert!(defaults
            .required_types
            .iter()
            .any(|doc| doc == TECHNICAL_DIPLOMA));

        let unknown = resolve_display_documents(&candidate("Astronaut"), &campaign(), &catalog);
        assert_eq!(unknown.source, RequirementSource::Unknown);
        assert!(unknown.documents.is_empty());
    }

    #[test]
    fn duplicate_types_are_kept_after_extras() {
        let mut candidate = candidate("Forklift operator");
        candidate
            .documents
            .push(Document::received("old", IDENTITY_DOCUMENT, "old.pdf"));
        candidate
            .documents
            .push(Document::received("new", IDENTITY_DOCUMENT, "new.pdf"));

        let resolution =
            resolve_display_documents(&candidate, &campaign(), &RoleDocumentCatalog::standard());

        assert_eq!(resolution.documents[0].document.id, "old");
        let last = resolution.documents.last().expect("duplicate retained");
        assert_eq!(last.document.id, "new");
        assert!(last.duplicate);
        assert!(last.required);
    }

    #[test]
    fn residence_permit_is_mandatory_only_when_needed() {
        let campaign = campaign();
        let mut candidate = candidate("Forklift operator");
        assert!(!is_mandatory(RESIDENCE_PERMIT, &candidate, &campaign));
        candidate.needs_residence_permit = true;
        assert!(is_mandatory(RESIDENCE_PERMIT, &candidate, &campaign));
        assert!(is_mandatory(MEDICAL_CERTIFICATE, &candidate, &campaign));
        assert!(!is_mandatory("HACCP certificate", &candidate, &campaign));
    }
}
