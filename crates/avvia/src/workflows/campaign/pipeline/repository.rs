use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::super::domain::{Campaign, CampaignId, Candidate, CandidateId};

/// Storage abstraction for campaigns and their candidates.
pub trait PipelineRepository: Send + Sync {
    fn insert_campaign(&self, campaign: Campaign) -> Result<Campaign, RepositoryError>;
    fn update_campaign(&self, campaign: Campaign) -> Result<(), RepositoryError>;
    fn fetch_campaign(&self, id: &CampaignId) -> Result<Option<Campaign>, RepositoryError>;
    fn campaigns(&self) -> Result<Vec<Campaign>, RepositoryError>;

    fn insert_candidate(&self, candidate: Candidate) -> Result<Candidate, RepositoryError>;
    fn update_candidate(&self, candidate: Candidate) -> Result<(), RepositoryError>;
    fn fetch_candidate(&self, id: &CandidateId) -> Result<Option<Candidate>, RepositoryError>;
    /// Candidates of one campaign in insertion order.
    fn candidates_for(&self, campaign: &CampaignId) -> Result<Vec<Candidate>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound channel for agent messages (WhatsApp provider, SMS gateway, ...).
pub trait OutboundMessenger: Send + Sync {
    fn deliver(&self, message: OutboundMessage) -> Result<(), MessagingError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub candidate_id: CandidateId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub text: String,
    pub sent_at: NaiveDateTime,
}

#[derive(Debug, thiserror::Error)]
pub enum MessagingError {
    #[error("messaging transport unavailable: {0}")]
    Transport(String),
}
