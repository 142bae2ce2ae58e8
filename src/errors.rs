use crate::source::SourceError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use std::fmt;

/// Application-specific error types.
///
/// Row-level problems never show up here: they are `SkipReason`s and only
/// cost the row. Anything reaching `AppError` fails the whole request.
#[derive(Debug)]
pub enum AppError {
    /// The case source exists but could not be read.
    SourceError(SourceError),
    /// The blocking load/transform task panicked or was cancelled.
    TaskFailed(String),
    /// Error with context chain for better debugging.
    WithContext {
        /// The underlying source of the error.
        source: Box<AppError>,
        /// Additional context message.
        context: String,
    },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::SourceError(e) => write!(f, "Source error: {}", e),
            AppError::TaskFailed(msg) => write!(f, "Worker failed: {}", msg),
            AppError::WithContext { source, context } => {
                write!(f, "{}: {}", context, source)
            }
        }
    }
}

impl std::error::Error for AppError {}

impl From<SourceError> for AppError {
    fn from(err: SourceError) -> Self {
        AppError::SourceError(err)
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::TaskFailed(err.to_string())
    }
}

/// Which payload an endpoint's failure body carries, emptied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureShape {
    /// `{success: false, error, cases: []}`
    Cases,
    /// `{success: false, error, metrics: {}}`
    Metrics,
}

/// An `AppError` bound to the failure envelope of the endpoint that hit it.
#[derive(Debug)]
pub struct CaseFailure {
    pub shape: FailureShape,
    pub error: AppError,
}

impl CaseFailure {
    pub fn cases(error: AppError) -> Self {
        Self {
            shape: FailureShape::Cases,
            error,
        }
    }

    pub fn metrics(error: AppError) -> Self {
        Self {
            shape: FailureShape::Metrics,
            error,
        }
    }

    /// The JSON body sent to the client.
    pub fn body(&self) -> Value {
        let message = self.error.to_string();
        match self.shape {
            FailureShape::Cases => json!({
                "success": false,
                "error": message,
                "cases": [],
            }),
            FailureShape::Metrics => json!({
                "success": false,
                "error": message,
                "metrics": {},
            }),
        }
    }
}

impl IntoResponse for CaseFailure {
    /// Logs the failure and answers HTTP 500 with the endpoint's failure body.
    fn into_response(self) -> Response {
        tracing::error!("Request failed: {}", self.error);
        (StatusCode::INTERNAL_SERVER_ERROR, Json(self.body())).into_response()
    }
}

/// Extension trait for adding context to errors.
/// Similar to `anyhow::Context` but for our `AppError` type.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T, AppError>;

    /// Add context lazily (only evaluated on error).
    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<AppError>,
{
    fn context(self, context: impl Into<String>) -> Result<T, AppError> {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e.into()),
            context: context.into(),
        })
    }

    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e.into()),
            context: f(),
        })
    }
}
