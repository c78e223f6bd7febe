//! HTTP request handlers

pub mod auth;
pub mod contact;
pub mod health;
pub mod pages;
pub mod predict;

pub use auth::{login, logout, me, signup};
pub use contact::send_contact;
pub use health::health_check;
pub use pages::{about, contact_page, home};
pub use predict::{predict, prefill};

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// Body extractor accepting either a urlencoded form or JSON
pub struct FormOrJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for FormOrJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

        if is_form {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|e| body_error(e.body_text()))?;
            Ok(Self(value))
        } else {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|e| body_error(e.body_text()))?;
            Ok(Self(value))
        }
    }
}

fn body_error(message: String) -> AppError {
    AppError::Validation {
        field: "body".to_string(),
        message,
    }
}
