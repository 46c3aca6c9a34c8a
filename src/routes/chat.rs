use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::{Instrument, debug, error, info, info_span};
use uuid::Uuid;

use crate::{
    error::AppError,
    message::{ChatReply, ChatRequest},
    state::SharedState,
};

pub async fn chat_handler(
    State(state): State<SharedState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, AppError> {
    let span = info_span!("chat", request_id = %Uuid::new_v4());

    async move {
        // An unreadable body counts as a missing message.
        let payload = match payload {
            Ok(Json(payload)) => payload,
            Err(rejection) => {
                debug!(%rejection, "rejected chat body");
                return Err(AppError::Validation);
            }
        };

        if payload.text().is_none() {
            debug!("rejected empty message");
            return Err(AppError::Validation);
        }
        // Trimmed only for the check; the provider gets the message as sent.
        let message = payload.message.unwrap_or_default();

        let reply = state.generator.generate(&message).await.map_err(|err| {
            error!(error = %err, "provider call failed");
            AppError::from(err)
        })?;

        info!(reply_len = reply.len(), "reply generated");
        Ok(Json(ChatReply::new(reply)))
    }
    .instrument(span)
    .await
}
