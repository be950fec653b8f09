use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::status::{CandidateStatus, StatusBucket};

/// Identifier wrapper for campaigns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CampaignId(pub String);

impl fmt::Display for CampaignId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for candidates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(pub String);

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocStatus {
    Received,
    Missing,
    Invalid,
    Expired,
}

impl DocStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Missing => "missing",
            Self::Invalid => "invalid",
            Self::Expired => "expired",
        }
    }

    /// Badge text shown next to a document, which depends on where its owner
    /// currently sits in the pipeline.
    pub const fn display_label(self, candidate_status: CandidateStatus) -> &'static str {
        match self {
            Self::Missing => "awaiting",
            Self::Invalid => "non-compliant",
            Self::Expired => "expired",
            Self::Received => match candidate_status {
                CandidateStatus::Verifying => "AI analysis…",
                _ => "validated",
            },
        }
    }

    pub const fn needs_attention(self) -> bool {
        !matches!(self, Self::Received)
    }
}

/// A document held by a candidate, uploaded or still expected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    #[serde(rename = "type")]
    pub doc_type: String,
    #[serde(default)]
    pub file_name: String,
    pub status: DocStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Fraud-detection signal, independent of `status`.
    #[serde(default)]
    pub suspicious: bool,
}

impl Document {
    pub fn placeholder(doc_type: &str) -> Self {
        Self {
            id: format!("placeholder-{doc_type}"),
            doc_type: doc_type.to_string(),
            file_name: String::new(),
            status: DocStatus::Missing,
            reason: None,
            suspicious: false,
        }
    }

    pub fn received(id: impl Into<String>, doc_type: &str, file_name: &str) -> Self {
        Self {
            id: id.into(),
            doc_type: doc_type.to_string(),
            file_name: file_name.to_string(),
            status: DocStatus::Received,
            reason: None,
            suspicious: false,
        }
    }

    pub fn is_uploaded(&self) -> bool {
        !self.file_name.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: NaiveDateTime,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    Agent,
    Candidate,
    System,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
    pub timestamp: NaiveDateTime,
}

/// A person moving through a campaign's hiring pipeline.
///
/// The milestone flags are informational checkpoints set only by explicit
/// actions; they are never derived from `status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub mother_tongue: String,
    #[serde(default)]
    pub needs_residence_permit: bool,
    pub role: String,
    pub campaign_id: CampaignId,
    pub status: CandidateStatus,
    /// Upload order, not the role's required-document order.
    #[serde(default)]
    pub documents: Vec<Document>,
    #[serde(default)]
    pub whatsapp_active: bool,
    #[serde(default)]
    pub offer_sent: bool,
    #[serde(default)]
    pub medical_visit_scheduled: bool,
    #[serde(default)]
    pub contract_signed: bool,
    #[serde(default)]
    pub ppe_delivered: bool,
    #[serde(default)]
    pub safety_courses_completed: bool,
    #[serde(default)]
    pub needs_priority_review: bool,
    /// Newest first.
    #[serde(default)]
    pub audit_log: Vec<AuditEntry>,
    /// Oldest first.
    #[serde(default)]
    pub whatsapp_history: Vec<ChatMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cv_url: Option<String>,
}

impl Candidate {
    pub fn new(
        id: CandidateId,
        name: impl Into<String>,
        role: impl Into<String>,
        campaign_id: CampaignId,
        status: CandidateStatus,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            phone: None,
            mother_tongue: String::new(),
            needs_residence_permit: false,
            role: role.into(),
            campaign_id,
            status,
            documents: Vec::new(),
            whatsapp_active: false,
            offer_sent: false,
            medical_visit_scheduled: false,
            contract_signed: false,
            ppe_delivered: false,
            safety_courses_completed: false,
            needs_priority_review: false,
            audit_log: Vec::new(),
            whatsapp_history: Vec::new(),
            cv_url: None,
        }
    }

    pub fn bucket(&self) -> StatusBucket {
        self.status.bucket()
    }

    pub fn record_audit(&mut self, timestamp: NaiveDateTime, message: impl Into<String>) {
        self.audit_log.insert(
            0,
            AuditEntry {
                timestamp,
                message: message.into(),
            },
        );
    }

    pub fn push_message(&mut self, sender: Sender, text: impl Into<String>, timestamp: NaiveDateTime) {
        self.whatsapp_history.push(ChatMessage {
            sender,
            text: text.into(),
            timestamp,
        });
    }

    /// First document of the given type in upload order.
    pub fn document(&self, doc_type: &str) -> Option<&Document> {
        self.documents.iter().find(|doc| doc.doc_type == doc_type)
    }

    pub fn suspicious_document(&self) -> Option<&Document> {
        self.documents.iter().find(|doc| doc.suspicious)
    }
}

/// Inclusive date range in which the campaign needs its workforce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl CampaignPeriod {
    pub fn label(&self) -> String {
        format!("From {} to {}", self.start, self.end)
    }

    /// Whole days until the period starts, floored at zero.
    pub fn days_to_start(&self, today: NaiveDate) -> i64 {
        (self.start - today).num_days().max(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignRole {
    pub title: String,
    /// Required headcount.
    pub count: u32,
    pub required_docs: Vec<String>,
    /// Campaign-specific documents marked mandatory at setup.
    #[serde(default)]
    pub mandatory_docs: Vec<String>,
}

impl CampaignRole {
    pub fn new(title: impl Into<String>, count: u32, required_docs: &[&str]) -> Self {
        Self {
            title: title.into(),
            count,
            required_docs: required_docs.iter().map(|doc| doc.to_string()).collect(),
            mandatory_docs: Vec::new(),
        }
    }

    pub fn requires(&self, doc_type: &str) -> bool {
        self.required_docs.iter().any(|doc| doc == doc_type)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: CampaignId,
    pub name: String,
    pub product_type: String,
    pub location: String,
    pub period: CampaignPeriod,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub agent_active: bool,
    pub roles: Vec<CampaignRole>,
}

impl Campaign {
    pub fn role(&self, title: &str) -> Option<&CampaignRole> {
        self.roles.iter().find(|role| role.title == title)
    }

    pub fn total_required(&self) -> usize {
        self.roles.iter().map(|role| role.count as usize).sum()
    }
}

/// Cross-reference and validation failures raised by the pipeline model.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    #[error("campaign {0} not found")]
    CampaignNotFound(CampaignId),
    #[error("candidate {0} not found")]
    CandidateNotFound(CandidateId),
    #[error("candidate {candidate} belongs to campaign {actual}, not {expected}")]
    CampaignMismatch {
        candidate: CandidateId,
        expected: CampaignId,
        actual: CampaignId,
    },
    #[error("invalid campaign: {0}")]
    InvalidCampaign(String),
}
