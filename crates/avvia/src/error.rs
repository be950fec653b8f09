use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::campaign::pipeline::PipelineServiceError;
use crate::workflows::roster::RosterImportError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Import(RosterImportError),
    Pipeline(PipelineServiceError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Import(err) => write!(f, "roster import error: {}", err),
            AppError::Pipeline(err) => write!(f, "pipeline error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Import(err) => Some(err),
            AppError::Pipeline(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Import(_) => StatusCode::BAD_REQUEST,
            AppError::Pipeline(err) => err.status_code(),
            AppError::Config(_) | AppError::Telemetry(_) | AppError::Io(_) | AppError::Server(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<RosterImportError> for AppError {
    fn from(value: RosterImportError) -> Self {
        Self::Import(value)
    }
}

impl From<PipelineServiceError> for AppError {
    fn from(value: PipelineServiceError) -> Self {
        Self::Pipeline(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::campaign::pipeline::TransitionError;
    use crate::workflows::campaign::{ActionKind, CampaignId, CandidateStatus, PipelineError};

    #[test]
    fn missing_campaigns_map_to_not_found() {
        let error = AppError::from(PipelineServiceError::from(PipelineError::CampaignNotFound(
            CampaignId("demo-9".to_string()),
        )));
        assert_eq!(error.to_string(), "pipeline error: campaign demo-9 not found");
        assert_eq!(error.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn import_errors_are_client_errors() {
        let error = AppError::from(RosterImportError::InvalidRow {
            line: 4,
            reason: "missing name".to_string(),
        });
        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn pipeline_errors_keep_the_router_status() {
        let refused = AppError::from(PipelineServiceError::from(
            TransitionError::InvalidTransition {
                action: ActionKind::SendOffer,
                status: CandidateStatus::PendingDocs,
            },
        ));
        assert_eq!(refused.into_response().status(), StatusCode::CONFLICT);

        let blocked = AppError::from(PipelineServiceError::MissingPhones { missing: 2 });
        assert_eq!(
            blocked.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
