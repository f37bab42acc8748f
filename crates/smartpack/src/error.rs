use crate::advisor::AdvisorError;
use crate::auth::AuthError;
use crate::catalog::CatalogImportError;
use crate::config::ConfigError;
use crate::service::ServiceError;
use crate::store::StoreError;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;
use tracing::error;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Import(CatalogImportError),
    Advisor(AdvisorError),
    Service(ServiceError),
    Unauthorized(AuthError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Import(_) => StatusCode::BAD_REQUEST,
            AppError::Service(err) => service_status(err),
            AppError::Advisor(AdvisorError::NotConfigured) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Advisor(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    // Message safe to show API clients.
    fn public_message(&self) -> String {
        match self {
            AppError::Unauthorized(_) => "Unauthorized".to_string(),
            AppError::Service(ServiceError::Store(StoreError::Unavailable(_))) => {
                "Internal server error".to_string()
            }
            AppError::Service(ServiceError::Export(_)) => "Export failed".to_string(),
            AppError::Service(err) => match err.advisor_error() {
                Some(AdvisorError::NotConfigured) => AdvisorError::NotConfigured.to_string(),
                _ => err.to_string(),
            },
            other => other.to_string(),
        }
    }
}

fn service_status(err: &ServiceError) -> StatusCode {
    match err {
        ServiceError::Validation(_) | ServiceError::Import(_) => StatusCode::BAD_REQUEST,
        ServiceError::NotFound(_) | ServiceError::Store(StoreError::NotFound) => {
            StatusCode::NOT_FOUND
        }
        ServiceError::Recommendation(AdvisorError::NotConfigured)
        | ServiceError::ReportGeneration(AdvisorError::NotConfigured) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        ServiceError::Store(StoreError::Unavailable(_))
        | ServiceError::Recommendation(_)
        | ServiceError::ReportGeneration(_)
        | ServiceError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Import(err) => write!(f, "import error: {}", err),
            AppError::Advisor(err) => write!(f, "{}", err),
            AppError::Service(err) => write!(f, "{}", err),
            AppError::Unauthorized(err) => write!(f, "unauthorized: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Import(err) => Some(err),
            AppError::Advisor(err) => Some(err),
            AppError::Service(err) => Some(err),
            AppError::Unauthorized(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, source = ?std::error::Error::source(&self), "request failed");
        }

        let body = Json(json!({ "error": self.public_message() }));
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

impl From<CatalogImportError> for AppError {
    fn from(value: CatalogImportError) -> Self {
        Self::Import(value)
    }
}

impl From<AdvisorError> for AppError {
    fn from(value: AdvisorError) -> Self {
        Self::Advisor(value)
    }
}

impl From<ServiceError> for AppError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

impl From<AuthError> for AppError {
    fn from(value: AuthError) -> Self {
        Self::Unauthorized(value)
    }
}
