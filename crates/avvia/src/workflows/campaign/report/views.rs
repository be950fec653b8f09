use chrono::NaiveDate;
use serde::Serialize;

use super::super::domain::{AuditEntry, CampaignId, CandidateId};
use super::super::requirements::DisplayDocument;
use super::super::status::{CandidateStatus, StatusBucket};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleSummary {
    pub title: String,
    pub required: u32,
    pub ok: usize,
    pub in_review: usize,
    pub waiting: usize,
    pub blocked: usize,
    pub percentage: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CampaignRisk {
    pub level: RiskLevel,
    pub reasons: Vec<String>,
    pub confidence: u8,
    pub days_to_start: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CampaignTotals {
    pub required: usize,
    pub candidates: usize,
    pub ready: usize,
    pub in_review: usize,
    /// Waiting and blocked combined.
    pub critical: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartBar {
    pub name: &'static str,
    pub value: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CampaignOverview {
    pub campaign_id: CampaignId,
    pub name: String,
    pub period: String,
    pub reference_date: NaiveDate,
    pub totals: CampaignTotals,
    pub roles: Vec<RoleSummary>,
    pub risk: CampaignRisk,
    pub chart: Vec<ChartBar>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateRow {
    pub id: CandidateId,
    pub name: String,
    pub role: String,
    pub status: CandidateStatus,
    pub status_label: &'static str,
    pub bucket: StatusBucket,
    pub needs_priority_review: bool,
    pub suspicious_document: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineListing {
    pub priority_review: Vec<CandidateRow>,
    pub pipeline: Vec<CandidateRow>,
    pub ready_for_offer: Vec<CandidateId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplianceVerdict {
    Compliant,
    NonCompliant,
    UnderVerification,
}

impl ComplianceVerdict {
    pub const fn for_status(status: CandidateStatus) -> Self {
        match status {
            CandidateStatus::ReadyToStart
            | CandidateStatus::ContractSigned
            | CandidateStatus::MedicalScheduled => Self::Compliant,
            CandidateStatus::Blocked | CandidateStatus::Rejected => Self::NonCompliant,
            _ => Self::UnderVerification,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Compliant => "compliant",
            Self::NonCompliant => "non-compliant",
            Self::UnderVerification => "under verification",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateReport {
    pub candidate_id: CandidateId,
    pub name: String,
    pub role: String,
    pub campaign: String,
    pub location: String,
    pub status: CandidateStatus,
    pub status_label: &'static str,
    pub verdict: ComplianceVerdict,
    pub verdict_label: &'static str,
    pub documents: Vec<DisplayDocument>,
    pub recent_activity: Vec<AuditEntry>,
}
