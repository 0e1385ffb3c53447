use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use log::error;
use thiserror::Error;

use crate::errors::Error as CrateError;
use crate::web::pages::ErrorPage;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ServerError {
    fn status(&self) -> StatusCode {
        match self {
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("{self}");
        }

        let page = ErrorPage {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Error"),
            message: self.to_string(),
        };

        match page.render() {
            Ok(body) => (status, Html(body)).into_response(),
            Err(e) => {
                error!("Failed to render error page: {e}");
                (status, self.to_string()).into_response()
            }
        }
    }
}

impl From<CrateError> for ServerError {
    fn from(err: CrateError) -> Self {
        if err.is_not_found() {
            return ServerError::NotFound(err.to_string());
        }
        match err {
            CrateError::ConfigParsing { .. } => ServerError::Config(err.to_string()),
            other => ServerError::Internal(other.to_string()),
        }
    }
}

impl From<askama::Error> for ServerError {
    fn from(err: askama::Error) -> Self {
        ServerError::Internal(format!("Template error: {err}"))
    }
}

impl From<tokio::task::JoinError> for ServerError {
    fn from(err: tokio::task::JoinError) -> Self {
        ServerError::Internal(format!("Request handler failed: {err}"))
    }
}
