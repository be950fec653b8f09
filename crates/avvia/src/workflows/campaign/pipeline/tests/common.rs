use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::Response;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::config::PipelineSettings;
use crate::workflows::campaign::pipeline::{
    campaign_router, CampaignPipelineService, InMemoryOutbox, InMemoryPipelineStore,
    MessagingError, OutboundMessage, OutboundMessenger, PipelineRepository, RepositoryError,
};
use crate::workflows::campaign::{
    Campaign, CampaignBlueprint, CampaignId, Candidate, CandidateId, DEMO_CAMPAIGN_ID,
};

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, 16).expect("valid date")
}

pub(super) fn at(hour: u32, minute: u32) -> NaiveDateTime {
    today().and_hms_opt(hour, minute, 0).expect("valid time")
}

pub(super) fn settings() -> PipelineSettings {
    PipelineSettings {
        reference_date: Some(today()),
        seed_demo: false,
        warn_unknown_roles: true,
    }
}

pub(super) fn demo() -> CampaignBlueprint {
    CampaignBlueprint::demo(today())
}

pub(super) fn demo_campaign_id() -> CampaignId {
    CampaignId(DEMO_CAMPAIGN_ID.to_string())
}

pub(super) fn demo_candidate(id: &str) -> (Candidate, Campaign) {
    let blueprint = demo();
    let candidate = blueprint
        .candidates
        .into_iter()
        .find(|c| c.id.0 == id)
        .expect("seeded candidate");
    (candidate, blueprint.campaign)
}

pub(super) type DemoService = CampaignPipelineService<InMemoryPipelineStore, InMemoryOutbox>;

pub(super) fn build_service() -> (DemoService, Arc<InMemoryPipelineStore>, Arc<InMemoryOutbox>) {
    let blueprint = demo();
    let store = Arc::new(InMemoryPipelineStore::seeded(
        blueprint.campaign,
        blueprint.candidates,
    ));
    let outbox = Arc::new(InMemoryOutbox::new());
    let service = CampaignPipelineService::new(store.clone(), outbox.clone(), settings());
    (service, store, outbox)
}

pub(super) fn stored_candidate(store: &InMemoryPipelineStore, id: &str) -> Candidate {
    store
        .fetch_candidate(&CandidateId(id.to_string()))
        .expect("fetch succeeds")
        .expect("candidate present")
}

pub(super) const ROSTER: &str = "Name,Phone,Mother Tongue,Role,Needs Residence Permit\n\
Giuseppe Verdi,+39 340 1111111,Italian,field worker,no\n\
Ion Popa,+40 721 000000,Romanian,Forklift operator,yes\n";

pub(super) const ROSTER_WITHOUT_PHONE: &str =
    "Name,Phone,Mother Tongue,Role,Needs Residence Permit\n\
Giuseppe Verdi,+39 340 1111111,Italian,Field worker,no\n\
Sofia Neri,,Italian,Line worker,no\n";

pub(super) struct UnavailableRepository;

impl PipelineRepository for UnavailableRepository {
    fn insert_campaign(&self, _campaign: Campaign) -> Result<Campaign, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_campaign(&self, _campaign: Campaign) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch_campaign(&self, _id: &CampaignId) -> Result<Option<Campaign>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn campaigns(&self) -> Result<Vec<Campaign>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert_candidate(&self, _candidate: Candidate) -> Result<Candidate, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_candidate(&self, _candidate: Candidate) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch_candidate(&self, _id: &CandidateId) -> Result<Option<Candidate>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn candidates_for(&self, _campaign: &CampaignId) -> Result<Vec<Candidate>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Returns every candidate it holds regardless of the campaign asked for.
pub(super) struct LeakyRepository {
    pub(super) inner: InMemoryPipelineStore,
    pub(super) stray: Candidate,
}

impl PipelineRepository for LeakyRepository {
    fn insert_campaign(&self, campaign: Campaign) -> Result<Campaign, RepositoryError> {
        self.inner.insert_campaign(campaign)
    }

    fn update_campaign(&self, campaign: Campaign) -> Result<(), RepositoryError> {
        self.inner.update_campaign(campaign)
    }

    fn fetch_campaign(&self, id: &CampaignId) -> Result<Option<Campaign>, RepositoryError> {
        self.inner.fetch_campaign(id)
    }

    fn campaigns(&self) -> Result<Vec<Campaign>, RepositoryError> {
        self.inner.campaigns()
    }

    fn insert_candidate(&self, candidate: Candidate) -> Result<Candidate, RepositoryError> {
        self.inner.insert_candidate(candidate)
    }

    fn update_candidate(&self, candidate: Candidate) -> Result<(), RepositoryError> {
        self.inner.update_candidate(candidate)
    }

    fn fetch_candidate(&self, id: &CandidateId) -> Result<Option<Candidate>, RepositoryError> {
        self.inner.fetch_candidate(id)
    }

    fn candidates_for(&self, campaign: &CampaignId) -> Result<Vec<Candidate>, RepositoryError> {
        let mut candidates = self.inner.candidates_for(campaign)?;
        candidates.push(self.stray.clone());
        Ok(candidates)
    }
}

/// Accepts candidate writes but refuses every campaign update.
pub(super) struct ReadOnlyCampaigns {
    pub(super) inner: InMemoryPipelineStore,
}

impl PipelineRepository for ReadOnlyCampaigns {
    fn insert_campaign(&self, campaign: Campaign) -> Result<Campaign, RepositoryError> {
        self.inner.insert_campaign(campaign)
    }

    fn update_campaign(&self, _campaign: Campaign) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("campaign table locked".to_string()))
    }

    fn fetch_campaign(&self, id: &CampaignId) -> Result<Option<Campaign>, RepositoryError> {
        self.inner.fetch_campaign(id)
    }

    fn campaigns(&self) -> Result<Vec<Campaign>, RepositoryError> {
        self.inner.campaigns()
    }

    fn insert_candidate(&self, candidate: Candidate) -> Result<Candidate, RepositoryError> {
        self.inner.insert_candidate(candidate)
    }

    fn update_candidate(&self, candidate: Candidate) -> Result<(), RepositoryError> {
        self.inner.update_candidate(candidate)
    }

    fn fetch_candidate(&self, id: &CandidateId) -> Result<Option<Candidate>, RepositoryError> {
        self.inner.fetch_candidate(id)
    }

    fn candidates_for(&self, campaign: &CampaignId) -> Result<Vec<Candidate>, RepositoryError> {
        self.inner.candidates_for(campaign)
    }
}

pub(super) struct OfflineMessenger;

impl OutboundMessenger for OfflineMessenger {
    fn deliver(&self, _message: OutboundMessage) -> Result<(), MessagingError> {
        Err(MessagingError::Transport("provider offline".to_string()))
    }
}

pub(super) fn assert_conflict_response(response: Response) {
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn router_with_service(service: DemoService) -> axum::Router {
    campaign_router(Arc::new(service))
}
