//! Seasonal hiring campaigns: the candidate status model, document
//! requirements, coverage and risk reporting, and the action pipeline.

pub mod blueprint;
pub mod domain;
pub mod pipeline;
pub mod report;
pub mod requirements;
pub mod setup;
pub mod status;

pub use blueprint::{CampaignBlueprint, DEMO_CAMPAIGN_ID};
pub use domain::{
    AuditEntry, Campaign, CampaignId, CampaignPeriod, CampaignRole, Candidate, CandidateId,
    ChatMessage, DocStatus, Document, PipelineError, Sender,
};
pub use requirements::{
    is_mandatory, resolve_display_documents, DisplayDocument, DocumentResolution,
    RequirementSource, RoleDocumentCatalog,
};
pub use setup::{CampaignDraft, DraftRole, SetupError};
pub use status::{allowed_actions, transition, ActionKind, CandidateStatus, StatusBucket};
