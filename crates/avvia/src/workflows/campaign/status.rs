use serde::{Deserialize, Serialize};

/// Internal lifecycle tag of a candidate. Branching logic keys on this, never
/// on the display label: several tags intentionally render identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CandidateStatus {
    ToReview,
    PendingDocs,
    IncompleteDocs,
    Verifying,
    ReadyForOffer,
    OfferSent,
    AwaitingResponse,
    MedicalScheduled,
    ContractSigned,
    ReadyToStart,
    Blocked,
    Rejected,
}

impl CandidateStatus {
    pub const fn all() -> [Self; 12] {
        [
            Self::ToReview,
            Self::PendingDocs,
            Self::IncompleteDocs,
            Self::Verifying,
            Self::ReadyForOffer,
            Self::OfferSent,
            Self::AwaitingResponse,
            Self::MedicalScheduled,
            Self::ContractSigned,
            Self::ReadyToStart,
            Self::Blocked,
            Self::Rejected,
        ]
    }

    pub const fn tag(self) -> &'static str {
        match self {
            Self::ToReview => "TO_REVIEW",
            Self::PendingDocs => "PENDING_DOCS",
            Self::IncompleteDocs => "INCOMPLETE_DOCS",
            Self::Verifying => "VERIFYING",
            Self::ReadyForOffer => "READY_FOR_OFFER",
            Self::OfferSent => "OFFER_SENT",
            Self::AwaitingResponse => "AWAITING_RESPONSE",
            Self::MedicalScheduled => "MEDICAL_SCHEDULED",
            Self::ContractSigned => "CONTRACT_SIGNED",
            Self::ReadyToStart => "READY_TO_START",
            Self::Blocked => "BLOCKED",
            Self::Rejected => "REJECTED",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::ToReview | Self::Verifying => "under review",
            Self::PendingDocs | Self::IncompleteDocs | Self::AwaitingResponse => {
                "awaiting document"
            }
            Self::ReadyForOffer => "ready for offer",
            Self::OfferSent => "offer sent",
            Self::MedicalScheduled => "medical visit scheduled",
            Self::ContractSigned => "contract signed",
            Self::ReadyToStart => "ready to start",
            Self::Blocked | Self::Rejected => "blocked",
        }
    }

    pub const fn bucket(self) -> StatusBucket {
        match self {
            Self::ReadyForOffer
            | Self::OfferSent
            | Self::MedicalScheduled
            | Self::ContractSigned
            | Self::ReadyToStart => StatusBucket::Ready,
            Self::ToReview | Self::Verifying => StatusBucket::InReview,
            Self::PendingDocs | Self::IncompleteDocs | Self::AwaitingResponse => {
                StatusBucket::Waiting
            }
            Self::Blocked | Self::Rejected => StatusBucket::Blocked,
        }
    }

    /// Sort key for the full pipeline listing; unlisted tags sort last.
    pub const fn pipeline_priority(self) -> u8 {
        match self {
            Self::Blocked => 0,
            Self::PendingDocs => 1,
            Self::Verifying => 4,
            Self::ReadyForOffer => 5,
            Self::OfferSent => 6,
            Self::MedicalScheduled => 7,
            Self::ContractSigned => 8,
            Self::ReadyToStart => 9,
            _ => 99,
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Rejected)
    }
}

/// Coarse grouping used by every aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusBucket {
    Ready,
    InReview,
    Waiting,
    Blocked,
}

impl StatusBucket {
    pub const fn ordered() -> [Self; 4] {
        [Self::Ready, Self::InReview, Self::Waiting, Self::Blocked]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Ready => "Ready",
            Self::InReview => "In review",
            Self::Waiting => "Waiting",
            Self::Blocked => "Blocked",
        }
    }

    pub fn members(self) -> Vec<CandidateStatus> {
        CandidateStatus::all()
            .into_iter()
            .filter(|status| status.bucket() == self)
            .collect()
    }
}

/// Named operator actions; the edges of the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Approve,
    Reject,
    RequestDocuments,
    SendOffer,
    ScheduleMedicalVisit,
    SendReminder,
    ActivateAgent,
    RecordUpload,
}

impl ActionKind {
    pub const fn all() -> [Self; 8] {
        [
            Self::Approve,
            Self::Reject,
            Self::RequestDocuments,
            Self::SendOffer,
            Self::ScheduleMedicalVisit,
            Self::SendReminder,
            Self::ActivateAgent,
            Self::RecordUpload,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::RequestDocuments => "request documents",
            Self::SendOffer => "send offer",
            Self::ScheduleMedicalVisit => "schedule medical visit",
            Self::SendReminder => "send reminder",
            Self::ActivateAgent => "activate agent",
            Self::RecordUpload => "record upload",
        }
    }
}

/// Resulting tag when `action` is applied in state `from`, or `None` when the
/// edge does not exist. Actions that leave the tag untouched map to `from`.
///
/// Approval of a candidate flagged for priority review is additionally allowed
/// from any non-terminal tag; that flag lives on the candidate, not here.
pub const fn transition(from: CandidateStatus, action: ActionKind) -> Option<CandidateStatus> {
    use CandidateStatus::*;

    if from.is_terminal() {
        return None;
    }

    match action {
        ActionKind::Approve | ActionKind::ActivateAgent => match from {
            ToReview => Some(Verifying),
            _ => None,
        },
        ActionKind::Reject => Some(Rejected),
        ActionKind::RequestDocuments => Some(PendingDocs),
        ActionKind::SendOffer => match from {
            ReadyForOffer => Some(OfferSent),
            _ => None,
        },
        ActionKind::ScheduleMedicalVisit => match from {
            ContractSigned | MedicalScheduled => Some(MedicalScheduled),
            _ => None,
        },
        ActionKind::SendReminder => match from.bucket() {
            StatusBucket::Waiting => Some(from),
            _ => None,
        },
        ActionKind::RecordUpload => Some(from),
    }
}

pub fn allowed_actions(from: CandidateStatus) -> Vec<ActionKind> {
    ActionKind::all()
        .into_iter()
        .filter(|action| transition(from, *action).is_some())
        .collect()
}
