use std::sync::{Mutex, MutexGuard};

use super::super::domain::{Campaign, CampaignId, Candidate, CandidateId};
use super::repository::{
    MessagingError, OutboundMessage, OutboundMessenger, PipelineRepository, RepositoryError,
};

#[derive(Debug, Default)]
struct StoreState {
    campaigns: Vec<Campaign>,
    candidates: Vec<Candidate>,
}

/// Process-wide in-memory store. Records keep their insertion order, which
/// the pipeline listing relies on for stable tie-breaking.
#[derive(Debug, Default)]
pub struct InMemoryPipelineStore {
    state: Mutex<StoreState>,
}

impl InMemoryPipelineStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(campaign: Campaign, candidates: Vec<Candidate>) -> Self {
        Self {
            state: Mutex::new(StoreState {
                campaigns: vec![campaign],
                candidates,
            }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreState>, RepositoryError> {
        self.state
            .lock()
            .map_err(|_| RepositoryError::Unavailable("store lock poisoned".to_string()))
    }
}

impl PipelineRepository for InMemoryPipelineStore {
    fn insert_campaign(&self, campaign: Campaign) -> Result<Campaign, RepositoryError> {
        let mut state = self.lock()?;
        if state.campaigns.iter().any(|existing| existing.id == campaign.id) {
            return Err(RepositoryError::Conflict);
        }
        state.campaigns.push(campaign.clone());
        Ok(campaign)
    }

    fn update_campaign(&self, campaign: Campaign) -> Result<(), RepositoryError> {
        let mut state = self.lock()?;
        let slot = state
            .campaigns
            .iter_mut()
            .find(|existing| existing.id == campaign.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = campaign;
        Ok(())
    }

    fn fetch_campaign(&self, id: &CampaignId) -> Result<Option<Campaign>, RepositoryError> {
        let state = self.lock()?;
        Ok(state.campaigns.iter().find(|c| &c.id == id).cloned())
    }

    fn campaigns(&self) -> Result<Vec<Campaign>, RepositoryError> {
        Ok(self.lock()?.campaigns.clone())
    }

    fn insert_candidate(&self, candidate: Candidate) -> Result<Candidate, RepositoryError> {
        let mut state = self.lock()?;
        if state.candidates.iter().any(|existing| existing.id == candidate.id) {
            return Err(RepositoryError::Conflict);
        }
        state.candidates.push(candidate.clone());
        Ok(candidate)
    }

    fn update_candidate(&self, candidate: Candidate) -> Result<(), RepositoryError> {
        let mut state = self.lock()?;
        let slot = state
            .candidates
            .iter_mut()
            .find(|existing| existing.id == candidate.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = candidate;
        Ok(())
    }

    fn fetch_candidate(&self, id: &CandidateId) -> Result<Option<Candidate>, RepositoryError> {
        let state = self.lock()?;
        Ok(state.candidates.iter().find(|c| &c.id == id).cloned())
    }

    fn candidates_for(&self, campaign: &CampaignId) -> Result<Vec<Candidate>, RepositoryError> {
        let state = self.lock()?;
        Ok(state
            .candidates
            .iter()
            .filter(|c| &c.campaign_id == campaign)
            .cloned()
            .collect())
    }
}

/// Messenger that records deliveries instead of sending them.
#[derive(Debug, Default)]
pub struct InMemoryOutbox {
    sent: Mutex<Vec<OutboundMessage>>,
}

impl InMemoryOutbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<OutboundMessage> {
        match self.sent.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl OutboundMessenger for InMemoryOutbox {
    fn deliver(&self, message: OutboundMessage) -> Result<(), MessagingError> {
        self.sent
            .lock()
            .map_err(|_| MessagingError::Transport("outbox lock poisoned".to_string()))?
            .push(message);
        Ok(())
    }
}
