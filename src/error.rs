// src/error.rs
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use crate::message::ChatReply;
use crate::services::generator::ProviderError;

pub const MESSAGE_REQUIRED: &str = "Message is required.";
pub const SOMETHING_WENT_WRONG: &str = "Something went wrong.";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("message is required")]
    Validation,
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, reply) = match &self {
            AppError::Validation => (StatusCode::BAD_REQUEST, MESSAGE_REQUIRED),
            // Logged by the handler; the caller only ever sees the generic reply.
            AppError::Provider(_) => (StatusCode::INTERNAL_SERVER_ERROR, SOMETHING_WENT_WRONG),
        };
        (status, Json(ChatReply::new(reply))).into_response()
    }
}
