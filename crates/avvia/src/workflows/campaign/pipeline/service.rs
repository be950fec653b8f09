use std::collections::HashMap;
use std::io::Read;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use axum::http::StatusCode;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::{info, warn};

use super::super::blueprint::CampaignBlueprint;
use super::super::domain::{Campaign, CampaignId, Candidate, CandidateId, PipelineError, Sender};
use super::super::report::{
    campaign_overview, candidate_report, pipeline_listing, CampaignOverview, CandidateReport,
    PipelineListing,
};
use super::super::requirements::{
    resolve_display_documents, DocumentResolution, RequirementSource, RoleDocumentCatalog,
};
use super::super::setup::{CampaignDraft, SetupError};
use super::super::status::CandidateStatus;
use super::actions::{apply_action, CandidateAction, TransitionError};
use super::repository::{
    MessagingError, OutboundMessage, OutboundMessenger, PipelineRepository, RepositoryError,
};
use crate::config::PipelineSettings;
use crate::workflows::roster::{RosterImportError, RosterImporter, RosterSource};

/// Service composing the store, the outbound messenger and the pure pipeline
/// rules. Every mutation of a candidate is a read-modify-write under that
/// candidate's lock.
pub struct CampaignPipelineService<R, M> {
    repository: Arc<R>,
    messenger: Arc<M>,
    catalog: Arc<RoleDocumentCatalog>,
    settings: PipelineSettings,
    candidate_locks: LockTable,
}

type LockTable = Mutex<HashMap<CandidateId, Arc<Mutex<()>>>>;

static CAMPAIGN_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static CANDIDATE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_campaign_id() -> CampaignId {
    let id = CAMPAIGN_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    CampaignId(format!("camp-{id:06}"))
}

fn next_candidate_id() -> CandidateId {
    let id = CANDIDATE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    CandidateId(format!("cand-{id:06}"))
}

fn now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

fn lock_ignoring_poison<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Exclusive right to mutate one candidate. The table entry is removed once
/// no other caller holds or waits for it.
struct CandidateLease<'a> {
    table: &'a LockTable,
    id: CandidateId,
    lock: Arc<Mutex<()>>,
}

impl CandidateLease<'_> {
    fn hold(&self) -> MutexGuard<'_, ()> {
        lock_ignoring_poison(&self.lock)
    }
}

impl Drop for CandidateLease<'_> {
    fn drop(&mut self) {
        let mut table = lock_ignoring_poison(self.table);
        // One handle in the table, one here.
        if Arc::strong_count(&self.lock) == 2 {
            table.remove(&self.id);
        }
    }
}

fn awaiting_first_contact(candidate: &Candidate) -> bool {
    candidate.status == CandidateStatus::ToReview
        && !candidate.whatsapp_active
        && !candidate.needs_priority_review
}

fn lacks_phone(candidate: &Candidate) -> bool {
    candidate
        .phone
        .as_deref()
        .map_or(true, |phone| phone.trim().is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterImportSummary {
    pub campaign_id: CampaignId,
    pub imported: Vec<CandidateId>,
    /// Roles on the roster that match no campaign role.
    pub unmatched_roles: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentActivation {
    pub campaign_id: CampaignId,
    pub activated: Vec<Candidate>,
    pub undelivered: Vec<CandidateId>,
}

impl<R, M> CampaignPipelineService<R, M>
where
    R: PipelineRepository + 'static,
    M: OutboundMessenger + 'static,
{
    pub fn new(repository: Arc<R>, messenger: Arc<M>, settings: PipelineSettings) -> Self {
        Self::with_catalog(repository, messenger, RoleDocumentCatalog::standard(), settings)
    }

    pub fn with_catalog(
        repository: Arc<R>,
        messenger: Arc<M>,
        catalog: RoleDocumentCatalog,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            repository,
            messenger,
            catalog: Arc::new(catalog),
            settings,
            candidate_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    fn lease(&self, id: &CandidateId) -> CandidateLease<'_> {
        let lock = lock_ignoring_poison(&self.candidate_locks)
            .entry(id.clone())
            .or_default()
            .clone();
        CandidateLease {
            table: &self.candidate_locks,
            id: id.clone(),
            lock,
        }
    }

    #[cfg(test)]
    pub(super) fn tracked_candidate_locks(&self) -> usize {
        lock_ignoring_poison(&self.candidate_locks).len()
    }

    /// Hands the agent messages `updated` gained over `before` to the
    /// messenger.
    fn deliver_new_messages(
        &self,
        before: &Candidate,
        updated: &Candidate,
    ) -> Result<(), MessagingError> {
        for message in updated
            .whatsapp_history
            .iter()
            .skip(before.whatsapp_history.len())
            .filter(|message| message.sender == Sender::Agent)
        {
            self.messenger.deliver(OutboundMessage {
                candidate_id: updated.id.clone(),
                phone: updated.phone.clone(),
                text: message.text.clone(),
                sent_at: message.timestamp,
            })?;
        }
        Ok(())
    }

    /// Writes `originals` back after a failed batch write.
    fn restore_candidates(&self, originals: &[Candidate]) {
        for original in originals {
            if let Err(err) = self.repository.update_candidate(original.clone()) {
                warn!(candidate = %original.id, error = %err, "could not restore candidate after failed batch");
            }
        }
    }

    /// Load a blueprint's campaign and candidates into the store.
    pub fn seed(&self, blueprint: CampaignBlueprint) -> Result<CampaignId, PipelineServiceError> {
        let campaign = self.repository.insert_campaign(blueprint.campaign)?;
        let count = blueprint.candidates.len();
        for candidate in blueprint.candidates {
            self.repository.insert_candidate(candidate)?;
        }
        info!(campaign = %campaign.id, candidates = count, "seeded campaign");
        Ok(campaign.id)
    }

    pub fn create_campaign(&self, draft: &CampaignDraft) -> Result<Campaign, PipelineServiceError> {
        let campaign = draft.build(next_campaign_id(), now())?;
        let stored = self.repository.insert_campaign(campaign)?;
        info!(
            campaign = %stored.id,
            roles = stored.roles.len(),
            required = stored.total_required(),
            "campaign created"
        );
        Ok(stored)
    }

    pub fn campaigns(&self) -> Result<Vec<Campaign>, PipelineServiceError> {
        Ok(self.repository.campaigns()?)
    }

    pub fn campaign(&self, id: &CampaignId) -> Result<Campaign, PipelineServiceError> {
        self.repository
            .fetch_campaign(id)?
            .ok_or_else(|| PipelineError::CampaignNotFound(id.clone()).into())
    }

    pub fn candidate(&self, id: &CandidateId) -> Result<Candidate, PipelineServiceError> {
        self.repository
            .fetch_candidate(id)?
            .ok_or_else(|| PipelineError::CandidateNotFound(id.clone()).into())
    }

    fn candidate_with_campaign(
        &self,
        id: &CandidateId,
    ) -> Result<(Candidate, Campaign), PipelineServiceError> {
        let candidate = self.candidate(id)?;
        let campaign = self.campaign(&candidate.campaign_id)?;
        Ok((candidate, campaign))
    }

    /// Candidates of a campaign, checked against the campaign they were
    /// requested for.
    fn campaign_candidates(
        &self,
        campaign: &Campaign,
    ) -> Result<Vec<Candidate>, PipelineServiceError> {
        let candidates = self.repository.candidates_for(&campaign.id)?;
        if let Some(stray) = candidates.iter().find(|c| c.campaign_id != campaign.id) {
            return Err(PipelineError::CampaignMismatch {
                candidate: stray.id.clone(),
                expected: campaign.id.clone(),
                actual: stray.campaign_id.clone(),
            }
            .into());
        }
        Ok(candidates)
    }

    pub fn import_roster<T: Read>(
        &self,
        campaign_id: &CampaignId,
        reader: T,
        source: &RosterSource,
    ) -> Result<RosterImportSummary, PipelineServiceError> {
        let campaign = self.campaign(campaign_id)?;
        let entries = RosterImporter::from_reader(reader)?;
        let at = now();

        let mut imported = Vec::with_capacity(entries.len());
        let mut unmatched_roles: Vec<String> = Vec::new();
        for entry in entries {
            let candidate = entry.into_candidate(next_candidate_id(), &campaign, source, at);
            if campaign.role(&candidate.role).is_none() && !unmatched_roles.contains(&candidate.role)
            {
                warn!(
                    campaign = %campaign.id,
                    role = %candidate.role,
                    "imported candidate role is not configured on the campaign"
                );
                unmatched_roles.push(candidate.role.clone());
            }
            let stored = self.repository.insert_candidate(candidate)?;
            imported.push(stored.id);
        }

        info!(
            campaign = %campaign.id,
            imported = imported.len(),
            source = %source.audit_message(),
            "roster imported"
        );

        Ok(RosterImportSummary {
            campaign_id: campaign.id,
            imported,
            unmatched_roles,
        })
    }

    /// Switches the campaign's agent on and greets every imported candidate
    /// still awaiting first contact. Candidates queued for priority review
    /// are left for manual approval.
    ///
    /// Candidate and campaign state is written for the whole batch or not at
    /// all; any failure before the commit leaves the store as it was.
    /// Messages go out after the commit, and a refused delivery is reported
    /// in `undelivered`.
    pub fn activate_agent(
        &self,
        campaign_id: &CampaignId,
    ) -> Result<AgentActivation, PipelineServiceError> {
        let mut campaign = self.campaign(campaign_id)?;
        let ids: Vec<CandidateId> = self
            .campaign_candidates(&campaign)?
            .into_iter()
            .filter(awaiting_first_contact)
            .map(|candidate| candidate.id)
            .collect();

        // Locks are always taken in id order.
        let mut lock_order = ids.clone();
        lock_order.sort();
        let leases: Vec<CandidateLease<'_>> = lock_order.iter().map(|id| self.lease(id)).collect();
        let _guards: Vec<MutexGuard<'_, ()>> = leases.iter().map(|lease| lease.hold()).collect();

        let mut pending = Vec::with_capacity(ids.len());
        for id in &ids {
            let candidate = self.candidate(id)?;
            // An operator may have acted on it since the listing.
            if awaiting_first_contact(&candidate) {
                pending.push(candidate);
            }
        }

        let missing = pending.iter().filter(|c| lacks_phone(c)).count();
        if missing > 0 {
            warn!(campaign = %campaign.id, missing, "agent activation blocked by missing phone numbers");
            return Err(PipelineServiceError::MissingPhones { missing });
        }

        let at = now();
        let activated = pending
            .iter()
            .map(|candidate| apply_action(candidate, &campaign, &CandidateAction::ActivateAgent, at))
            .collect::<Result<Vec<_>, _>>()?;

        for (written, updated) in activated.iter().enumerate() {
            if let Err(err) = self.repository.update_candidate(updated.clone()) {
                self.restore_candidates(&pending[..written]);
                return Err(err.into());
            }
        }
        campaign.agent_active = true;
        if let Err(err) = self.repository.update_campaign(campaign) {
            self.restore_candidates(&pending);
            return Err(err.into());
        }

        let mut undelivered = Vec::new();
        for (before, updated) in pending.iter().zip(&activated) {
            if let Err(err) = self.deliver_new_messages(before, updated) {
                warn!(candidate = %updated.id, error = %err, "welcome message not delivered");
                undelivered.push(updated.id.clone());
            }
        }

        info!(
            campaign = %campaign_id,
            activated = activated.len(),
            undelivered = undelivered.len(),
            "agent activated"
        );
        Ok(AgentActivation {
            campaign_id: campaign_id.clone(),
            activated,
            undelivered,
        })
    }

    pub fn overview(
        &self,
        campaign_id: &CampaignId,
        today: Option<NaiveDate>,
    ) -> Result<CampaignOverview, PipelineServiceError> {
        let campaign = self.campaign(campaign_id)?;
        let candidates = self.campaign_candidates(&campaign)?;
        let today = today.unwrap_or_else(|| self.settings.today());
        Ok(campaign_overview(&campaign, &candidates, today))
    }

    pub fn pipeline(&self, campaign_id: &CampaignId) -> Result<PipelineListing, PipelineServiceError> {
        let campaign = self.campaign(campaign_id)?;
        let candidates = self.campaign_candidates(&campaign)?;
        Ok(pipeline_listing(&campaign, &candidates))
    }

    pub fn display_documents(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<DocumentResolution, PipelineServiceError> {
        let (candidate, campaign) = self.candidate_with_campaign(candidate_id)?;
        let resolution = resolve_display_documents(&candidate, &campaign, &self.catalog);
        if resolution.source == RequirementSource::Unknown && self.settings.warn_unknown_roles {
            warn!(
                candidate = %candidate.id,
                role = %candidate.role,
                "no document requirements known for role"
            );
        }
        Ok(resolution)
    }

    pub fn candidate_report(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<CandidateReport, PipelineServiceError> {
        let (candidate, campaign) = self.candidate_with_campaign(candidate_id)?;
        Ok(candidate_report(&candidate, &campaign, &self.catalog))
    }

    /// Apply one operator action and hand any new agent messages to the
    /// messenger.
    pub fn apply(
        &self,
        candidate_id: &CandidateId,
        action: &CandidateAction,
    ) -> Result<Candidate, PipelineServiceError> {
        let lease = self.lease(candidate_id);
        let _guard = lease.hold();

        let (candidate, campaign) = self.candidate_with_campaign(candidate_id)?;
        let at = now();
        let updated = match apply_action(&candidate, &campaign, action, at) {
            Ok(updated) => updated,
            Err(err) => {
                warn!(candidate = %candidate_id, action = action.kind().label(), error = %err, "action rejected");
                return Err(err.into());
            }
        };

        self.repository.update_candidate(updated.clone())?;
        info!(
            candidate = %updated.id,
            action = action.kind().label(),
            from = candidate.status.tag(),
            to = updated.status.tag(),
            "candidate action applied"
        );

        self.deliver_new_messages(&candidate, &updated)?;
        Ok(updated)
    }

    /// Send the contract offer to every candidate of the campaign that is
    /// ready for it.
    pub fn send_contracts_to_ready(
        &self,
        campaign_id: &CampaignId,
    ) -> Result<Vec<CandidateId>, PipelineServiceError> {
        let listing = self.pipeline(campaign_id)?;
        let mut sent = Vec::with_capacity(listing.ready_for_offer.len());
        for candidate_id in listing.ready_for_offer {
            match self.apply(&candidate_id, &CandidateAction::SendOffer) {
                Ok(candidate) => sent.push(candidate.id),
                // Status moved on between listing and locking.
                Err(PipelineServiceError::Transition(TransitionError::InvalidTransition {
                    ..
                })) => continue,
                Err(other) => return Err(other),
            }
        }
        info!(campaign = %campaign_id, offers = sent.len(), "contracts sent to ready candidates");
        Ok(sent)
    }
}

/// Error raised by the pipeline service.
#[derive(Debug, thiserror::Error)]
pub enum PipelineServiceError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error(transparent)]
    Setup(#[from] SetupError),
    #[error(transparent)]
    Import(#[from] RosterImportError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Messaging(#[from] MessagingError),
    #[error("{missing} candidate(s) have no phone number for the agent to contact")]
    MissingPhones { missing: usize },
}

impl PipelineServiceError {
    /// HTTP status shared by the campaign router and `AppError`.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Pipeline(
                PipelineError::CampaignNotFound(_) | PipelineError::CandidateNotFound(_),
            )
            | Self::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            Self::Pipeline(PipelineError::InvalidCampaign(_))
            | Self::Setup(_)
            | Self::Transition(TransitionError::MissingPhone { .. })
            | Self::MissingPhones { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Transition(TransitionError::InvalidTransition { .. })
            | Self::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
            Self::Import(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
