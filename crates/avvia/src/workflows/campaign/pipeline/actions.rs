use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::super::domain::{Campaign, Candidate, CandidateId, DocStatus, Document, Sender};
use super::super::status::{transition, ActionKind, CandidateStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentRequestReason {
    #[default]
    InvalidOrExpired,
    Suspicious,
}

/// Operator action applied to a single candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum CandidateAction {
    Approve,
    Reject,
    RequestDocuments {
        #[serde(default)]
        reason: DocumentRequestReason,
    },
    SendOffer,
    ScheduleMedicalVisit {
        date: NaiveDate,
        time: NaiveTime,
        location: String,
    },
    SendReminder,
    /// Campaign-wide only, through `activate_agent`; never accepted as a
    /// per-candidate payload.
    #[serde(skip_deserializing)]
    ActivateAgent,
    RecordUpload {
        doc_type: String,
        file_name: String,
    },
}

impl CandidateAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::Approve => ActionKind::Approve,
            Self::Reject => ActionKind::Reject,
            Self::RequestDocuments { .. } => ActionKind::RequestDocuments,
            Self::SendOffer => ActionKind::SendOffer,
            Self::ScheduleMedicalVisit { .. } => ActionKind::ScheduleMedicalVisit,
            Self::SendReminder => ActionKind::SendReminder,
            Self::ActivateAgent => ActionKind::ActivateAgent,
            Self::RecordUpload { .. } => ActionKind::RecordUpload,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("cannot {} a candidate in status {}", .action.label(), .status.tag())]
    InvalidTransition {
        action: ActionKind,
        status: CandidateStatus,
    },
    #[error("candidate {candidate} has no phone number for WhatsApp outreach")]
    MissingPhone { candidate: CandidateId },
}

fn target_status(candidate: &Candidate, kind: ActionKind) -> Result<CandidateStatus, TransitionError> {
    let flagged_approval = kind == ActionKind::Approve
        && candidate.needs_priority_review
        && !candidate.status.is_terminal();
    if flagged_approval {
        return Ok(CandidateStatus::Verifying);
    }

    transition(candidate.status, kind).ok_or(TransitionError::InvalidTransition {
        action: kind,
        status: candidate.status,
    })
}

/// Applies `action` to a copy of `candidate`. Status, milestone flags, audit
/// entry and outbound messages change together or not at all; `at` stamps
/// every entry written.
pub fn apply_action(
    candidate: &Candidate,
    campaign: &Campaign,
    action: &CandidateAction,
    at: NaiveDateTime,
) -> Result<Candidate, TransitionError> {
    let status = target_status(candidate, action.kind())?;
    let mut next = candidate.clone();
    next.status = status;

    match action {
        CandidateAction::Approve => {
            next.needs_priority_review = false;
            next.record_audit(at, "Approved for WhatsApp contact");
            next.push_message(
                Sender::Agent,
                format!(
                    "Hi {}, I'm the AvvIA agent. Welcome to the {} campaign. To get started, please upload the required documents.",
                    next.name, campaign.name
                ),
                at,
            );
        }
        CandidateAction::Reject => {
            next.needs_priority_review = false;
            next.record_audit(at, "Candidate discarded");
            next.push_message(Sender::System, "Workflow halted: candidate discarded", at);
            next.push_message(
                Sender::Agent,
                "Unfortunately we cannot proceed with your application because the required documents are not eligible.",
                at,
            );
        }
        CandidateAction::RequestDocuments {
            reason: DocumentRequestReason::InvalidOrExpired,
        } => {
            next.record_audit(at, "Updated document requested via WhatsApp.");
            next.push_message(
                Sender::Agent,
                "Your document is expired or not valid. Please upload a valid version to proceed.",
                at,
            );
        }
        CandidateAction::RequestDocuments {
            reason: DocumentRequestReason::Suspicious,
        } => {
            let doc_type = candidate
                .suspicious_document()
                .map(|doc| doc.doc_type.to_lowercase())
                .unwrap_or_else(|| "document".to_string());
            next.record_audit(at, "Suspicious document flagged. Clear re-upload requested.");
            next.push_message(
                Sender::Agent,
                format!(
                    "The uploaded document shows anomalies. Please upload a sharp, complete photo of your {doc_type} again."
                ),
                at,
            );
        }
        CandidateAction::SendOffer => {
            next.offer_sent = true;
            next.record_audit(at, "Contract offer sent via WhatsApp.");
            next.push_message(
                Sender::Agent,
                format!(
                    "Great news {}! Your documents have been approved. We have sent you the contract for digital signature.",
                    next.name
                ),
                at,
            );
        }
        CandidateAction::ScheduleMedicalVisit {
            date,
            time,
            location,
        } => {
            let date = date.format("%d/%m/%Y");
            let time = time.format("%H:%M");
            next.medical_visit_scheduled = true;
            next.record_audit(
                at,
                format!("Medical visit scheduled: {date} at {time} at {location}"),
            );
            next.push_message(
                Sender::Agent,
                format!(
                    "Hi {}, your medical visit is scheduled for {date} at {time} at {location}.",
                    next.name
                ),
                at,
            );
        }
        CandidateAction::SendReminder => {
            next.record_audit(at, "WhatsApp reminder sent.");
            next.push_message(
                Sender::Agent,
                "Hi! We are still waiting for your reply to move forward with your hiring. Any news?",
                at,
            );
        }
        CandidateAction::ActivateAgent => {
            if next.phone.as_deref().map_or(true, |phone| phone.trim().is_empty()) {
                return Err(TransitionError::MissingPhone {
                    candidate: next.id.clone(),
                });
            }
            next.whatsapp_active = true;
            next.record_audit(at, "Agent activated: welcome message sent automatically.");
            next.push_message(
                Sender::Agent,
                format!(
                    "Hi {}, I'm the AvvIA agent. Welcome to the {} campaign. I'll guide you through the hiring process.",
                    next.name, campaign.name
                ),
                at,
            );
        }
        CandidateAction::RecordUpload {
            doc_type,
            file_name,
        } => {
            let position = next.documents.iter().position(|doc| doc.doc_type == *doc_type);
            match position {
                Some(index) => {
                    let existing = &mut next.documents[index];
                    existing.file_name = file_name.clone();
                    existing.status = DocStatus::Received;
                    existing.reason = None;
                    existing.suspicious = false;
                }
                None => {
                    let id = format!("{}-doc{}", next.id, next.documents.len() + 1);
                    next.documents.push(Document::received(id, doc_type, file_name));
                }
            }
            next.record_audit(at, format!("Document received: {doc_type} ({file_name})"));
        }
    }

    Ok(next)
}
