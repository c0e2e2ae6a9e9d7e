//! Error taxonomy for the HTTP surface.
//!
//! Validation failures never reach this type: handlers re-render the offending
//! form with field errors and HTTP 200. Everything else funnels into
//! `PageError` - unknown records become 404, store and template failures
//! become a generic 500.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use sea_orm::DbErr;
use thiserror::Error;

use crate::lifecycle::LifecycleError;

#[derive(Debug, Error)]
pub enum PageError {
    #[error("not found")]
    NotFound,
    #[error("database error: {0}")]
    Db(#[from] DbErr),
    #[error("template error: {0}")]
    Template(#[from] askama::Error),
}

impl From<LifecycleError> for PageError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::NotFound => PageError::NotFound,
            LifecycleError::Db(e) => PageError::Db(e),
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            PageError::NotFound => (
                StatusCode::NOT_FOUND,
                Html("<h1>404 - Not Found</h1>".to_string()),
            )
                .into_response(),
            PageError::Db(e) => {
                tracing::error!(error = %e, "database failure while handling request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html("<h1>500 - Something went wrong</h1>".to_string()),
                )
                    .into_response()
            }
            PageError::Template(e) => {
                tracing::error!(error = %e, "template rendering failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html("<h1>500 - Something went wrong</h1>".to_string()),
                )
                    .into_response()
            }
        }
    }
}
