//! Contact form handlers

use axum::{extract::State, Json};
use shared::StatusMessage;

use super::FormOrJson;
use crate::error::AppError;
use crate::services::contact::ContactInput;
use crate::services::ContactService;
use crate::AppState;

/// Contact form endpoint handler
pub async fn send_contact(
    State(state): State<AppState>,
    FormOrJson(body): FormOrJson<ContactInput>,
) -> Result<Json<StatusMessage>, AppError> {
    let contact_service = ContactService::new(state.mail.clone(), &state.config.mail);
    Ok(Json(contact_service.send(body).await?))
}
