use std::io::Cursor;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use super::super::domain::{CampaignId, CandidateId};
use super::super::setup::CampaignDraft;
use super::actions::CandidateAction;
use super::repository::{OutboundMessenger, PipelineRepository};
use super::service::{CampaignPipelineService, PipelineServiceError};
use crate::workflows::roster::RosterSource;

type SharedService<R, M> = Arc<CampaignPipelineService<R, M>>;

/// Router builder exposing campaign and candidate endpoints.
pub fn campaign_router<R, M>(service: SharedService<R, M>) -> Router
where
    R: PipelineRepository + 'static,
    M: OutboundMessenger + 'static,
{
    Router::new()
        .route(
            "/api/v1/campaigns",
            get(list_campaigns_handler::<R, M>).post(create_campaign_handler::<R, M>),
        )
        .route(
            "/api/v1/campaigns/:campaign_id/overview",
            get(overview_handler::<R, M>),
        )
        .route(
            "/api/v1/campaigns/:campaign_id/pipeline",
            get(pipeline_handler::<R, M>),
        )
        .route(
            "/api/v1/campaigns/:campaign_id/roster",
            post(roster_handler::<R, M>),
        )
        .route(
            "/api/v1/campaigns/:campaign_id/activate",
            post(activate_handler::<R, M>),
        )
        .route(
            "/api/v1/campaigns/:campaign_id/contracts",
            post(contracts_handler::<R, M>),
        )
        .route(
            "/api/v1/candidates/:candidate_id",
            get(candidate_handler::<R, M>),
        )
        .route(
            "/api/v1/candidates/:candidate_id/documents",
            get(documents_handler::<R, M>),
        )
        .route(
            "/api/v1/candidates/:candidate_id/report",
            get(report_handler::<R, M>),
        )
        .route(
            "/api/v1/candidates/:candidate_id/actions",
            post(action_handler::<R, M>),
        )
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct OverviewQuery {
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RosterQuery {
    pub(crate) source: Option<String>,
}

fn error_response(error: PipelineServiceError) -> Response {
    let payload = json!({
        "error": error.to_string(),
    });
    (error.status_code(), axum::Json(payload)).into_response()
}

pub(crate) async fn list_campaigns_handler<R, M>(
    State(service): State<SharedService<R, M>>,
) -> Response
where
    R: PipelineRepository + 'static,
    M: OutboundMessenger + 'static,
{
    match service.campaigns() {
        Ok(campaigns) => (StatusCode::OK, axum::Json(campaigns)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn create_campaign_handler<R, M>(
    State(service): State<SharedService<R, M>>,
    axum::Json(draft): axum::Json<CampaignDraft>,
) -> Response
where
    R: PipelineRepository + 'static,
    M: OutboundMessenger + 'static,
{
    match service.create_campaign(&draft) {
        Ok(campaign) => (StatusCode::CREATED, axum::Json(campaign)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn overview_handler<R, M>(
    State(service): State<SharedService<R, M>>,
    Path(campaign_id): Path<String>,
    Query(query): Query<OverviewQuery>,
) -> Response
where
    R: PipelineRepository + 'static,
    M: OutboundMessenger + 'static,
{
    match service.overview(&CampaignId(campaign_id), query.today) {
        Ok(overview) => (StatusCode::OK, axum::Json(overview)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn pipeline_handler<R, M>(
    State(service): State<SharedService<R, M>>,
    Path(campaign_id): Path<String>,
) -> Response
where
    R: PipelineRepository + 'static,
    M: OutboundMessenger + 'static,
{
    match service.pipeline(&CampaignId(campaign_id)) {
        Ok(listing) => (StatusCode::OK, axum::Json(listing)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn roster_handler<R, M>(
    State(service): State<SharedService<R, M>>,
    Path(campaign_id): Path<String>,
    Query(query): Query<RosterQuery>,
    body: String,
) -> Response
where
    R: PipelineRepository + 'static,
    M: OutboundMessenger + 'static,
{
    let source = RosterSource::parse(query.source.as_deref().unwrap_or_default());
    match service.import_roster(&CampaignId(campaign_id), Cursor::new(body), &source) {
        Ok(summary) => (StatusCode::CREATED, axum::Json(summary)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn activate_handler<R, M>(
    State(service): State<SharedService<R, M>>,
    Path(campaign_id): Path<String>,
) -> Response
where
    R: PipelineRepository + 'static,
    M: OutboundMessenger + 'static,
{
    match service.activate_agent(&CampaignId(campaign_id.clone())) {
        Ok(activation) => {
            let payload = json!({
                "campaign_id": campaign_id,
                "activated": activation.activated.iter().map(|c| c.id.clone()).collect::<Vec<_>>(),
                "undelivered": activation.undelivered,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn contracts_handler<R, M>(
    State(service): State<SharedService<R, M>>,
    Path(campaign_id): Path<String>,
) -> Response
where
    R: PipelineRepository + 'static,
    M: OutboundMessenger + 'static,
{
    match service.send_contracts_to_ready(&CampaignId(campaign_id.clone())) {
        Ok(sent) => {
            let payload = json!({
                "campaign_id": campaign_id,
                "offers_sent": sent,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn candidate_handler<R, M>(
    State(service): State<SharedService<R, M>>,
    Path(candidate_id): Path<String>,
) -> Response
where
    R: PipelineRepository + 'static,
    M: OutboundMessenger + 'static,
{
    match service.candidate(&CandidateId(candidate_id)) {
        Ok(candidate) => (StatusCode::OK, axum::Json(candidate)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn documents_handler<R, M>(
    State(service): State<SharedService<R, M>>,
    Path(candidate_id): Path<String>,
) -> Response
where
    R: PipelineRepository + 'static,
    M: OutboundMessenger + 'static,
{
    match service.display_documents(&CandidateId(candidate_id)) {
        Ok(resolution) => (StatusCode::OK, axum::Json(resolution)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn report_handler<R, M>(
    State(service): State<SharedService<R, M>>,
    Path(candidate_id): Path<String>,
) -> Response
where
    R: PipelineRepository + 'static,
    M: OutboundMessenger + 'static,
{
    match service.candidate_report(&CandidateId(candidate_id)) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn action_handler<R, M>(
    State(service): State<SharedService<R, M>>,
    Path(candidate_id): Path<String>,
    axum::Json(action): axum::Json<CandidateAction>,
) -> Response
where
    R: PipelineRepository + 'static,
    M: OutboundMessenger + 'static,
{
    match service.apply(&CandidateId(candidate_id), &action) {
        Ok(candidate) => (StatusCode::OK, axum::Json(candidate)).into_response(),
        Err(error) => error_response(error),
    }
}
