//! Contact form delivery

use serde::Deserialize;
use shared::StatusMessage;
use validator::Validate;

use crate::config::MailConfig;
use crate::error::AppResult;
use crate::external::{MailClient, OutgoingMail};

pub const SENT_MESSAGE: &str = "Message sent successfully!";
pub const FAILED_MESSAGE: &str = "Failed to send email.";

/// Contact form submission
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ContactInput {
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "This field is required"))]
    pub name: String,
    #[serde(default)]
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "This field is required"))]
    pub subject: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required"))]
    pub message: String,
}

/// Contact service
#[derive(Clone)]
pub struct ContactService {
    mail: MailClient,
    contact_address: String,
}

impl ContactService {
    pub fn new(mail: MailClient, config: &MailConfig) -> Self {
        Self {
            mail,
            contact_address: config.contact_address.clone(),
        }
    }

    /// Message delivered to the site owners for one submission
    pub fn compose(&self, input: &ContactInput) -> OutgoingMail {
        self.mail.compose(
            &self.contact_address,
            &format!("Contact: {}", input.subject.trim()),
            &format!(
                "From: {} <{}>\n\n{}",
                input.name.trim(),
                input.email.trim(),
                input.message
            ),
        )
    }

    /// Validate and send a submission.
    ///
    /// Invalid input is an error; a relay failure is only a status message.
    pub async fn send(&self, input: ContactInput) -> AppResult<StatusMessage> {
        input.validate()?;

        match self.mail.send(&self.compose(&input)).await {
            Ok(()) => {
                tracing::info!("Contact message from {} relayed", input.email);
                Ok(StatusMessage::success(SENT_MESSAGE))
            }
            Err(e) => {
                tracing::error!("Contact message from {} not sent: {}", input.email, e);
                Ok(StatusMessage::error(FAILED_MESSAGE))
            }
        }
    }
}
