use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;
use std::path::PathBuf;

/// Failure to produce a catalog from its tabular source
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("cannot open workbook {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },
    #[error("workbook {path:?} has no worksheets")]
    NoSheet { path: PathBuf },
    #[error("cannot read first worksheet of {path:?}: {message}")]
    Sheet { path: PathBuf, message: String },
    #[error("catalog load task failed: {0}")]
    Join(String),
}

/// Reasons a quote cannot be finalized for printing
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QuoteError {
    #[error(
        "Hay IDs de cámara repetidos ({}). Corrige los duplicados antes de generar el PDF.",
        .0.join(", ")
    )]
    DuplicateIds(Vec<String>),
    #[error("No hay filas en la propuesta para imprimir.")]
    EmptyQuote,
}

/// Application error types
#[derive(Debug)]
pub enum AppError {
    /// Catalog could not be loaded; `message` is the fixed user-facing text
    CatalogUnavailable { message: &'static str },
    /// Quote refused at finalize time
    QuoteRejected(QuoteError),
    /// Request body is not a valid quote or simulation request
    BadRequest(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CatalogUnavailable { message } => write!(f, "Catalog unavailable: {}", message),
            Self::QuoteRejected(err) => write!(f, "Quote rejected: {}", err),
            Self::BadRequest(msg) => write!(f, "Bad request: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            Self::CatalogUnavailable { message } => {
                (StatusCode::INTERNAL_SERVER_ERROR, message.to_string())
            }
            Self::QuoteRejected(err) => (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        };

        let body = Json(json!({
            "error": {
                "message": error_message,
                "type": error_type_name(&self),
            }
        }));

        (status, body).into_response()
    }
}

fn error_type_name(error: &AppError) -> &'static str {
    match error {
        AppError::CatalogUnavailable { .. } => "catalog_unavailable",
        AppError::QuoteRejected(QuoteError::DuplicateIds(_)) => "duplicate_ids",
        AppError::QuoteRejected(QuoteError::EmptyQuote) => "empty_quote",
        AppError::BadRequest(_) => "bad_request",
    }
}

impl From<QuoteError> for AppError {
    fn from(err: QuoteError) -> Self {
        Self::QuoteRejected(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}
