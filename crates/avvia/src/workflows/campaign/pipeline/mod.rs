//! Operator actions on candidates and the service that persists them.

pub mod actions;
pub mod repository;
pub mod router;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use actions::{apply_action, CandidateAction, DocumentRequestReason, TransitionError};
pub use repository::{
    MessagingError, OutboundMessage, OutboundMessenger, PipelineRepository, RepositoryError,
};
pub use router::campaign_router;
pub use service::{
    AgentActivation, CampaignPipelineService, PipelineServiceError, RosterImportSummary,
};
pub use store::{InMemoryOutbox, InMemoryPipelineStore};
