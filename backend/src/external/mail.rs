//! Outbound mail relay client
//!
//! Messages are handed to an HTTP relay as JSON with a bearer API key. There is
//! no retry; the caller reports failure to the user.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use thiserror::Error;

use crate::config::MailConfig;

/// Client for the HTTP mail relay
#[derive(Clone)]
pub struct MailClient {
    api_endpoint: String,
    api_key: String,
    from_address: String,
    http_client: Client,
}

/// Message accepted by the relay
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutgoingMail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub text: String,
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail relay is not configured")]
    NotConfigured,

    #[error("mail relay request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("mail relay returned {status}: {body}")]
    Rejected {
        status: reqwest::StatusCode,
        body: String,
    },
}

impl MailClient {
    /// Create a mail client from configuration
    pub fn new(config: &MailConfig) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            api_endpoint: config.api_endpoint.clone(),
            api_key: config.api_key.clone(),
            from_address: config.from_address.clone(),
            http_client,
        }
    }

    /// Build a plain-text message from the configured sender
    pub fn compose(&self, to: &str, subject: &str, text: &str) -> OutgoingMail {
        OutgoingMail {
            from: self.from_address.clone(),
            to: vec![to.to_string()],
            subject: subject.to_string(),
            text: text.to_string(),
        }
    }

    /// Hand one message to the relay
    pub async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        if self.api_endpoint.trim().is_empty() {
            return Err(MailError::NotConfigured);
        }

        let response = self
            .http_client
            .post(&self.api_endpoint)
            .bearer_auth(&self.api_key)
            .json(mail)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(MailError::Rejected { status, body });
        }

        tracing::debug!("Mail relay accepted message to {:?}", mail.to);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(endpoint: &str) -> MailConfig {
        MailConfig {
            api_endpoint: endpoint.to_string(),
            api_key: "key".to_string(),
            from_address: "noreply@crop.test".to_string(),
            contact_address: "team@crop.test".to_string(),
        }
    }

    #[test]
    fn test_compose_uses_configured_sender() {
        let client = MailClient::new(&config("http://relay.test/send"));
        let mail = client.compose("team@crop.test", "Contact: Hi", "body");
        assert_eq!(mail.from, "noreply@crop.test");
        assert_eq!(mail.to, vec!["team@crop.test".to_string()]);

        let json = serde_json::to_value(&mail).unwrap();
        assert_eq!(json["subject"], "Contact: Hi");
        assert_eq!(json["text"], "body");
    }

    #[tokio::test]
    async fn test_unconfigured_relay_fails_without_request() {
        let client = MailClient::new(&config(""));
        let mail = client.compose("team@crop.test", "s", "t");
        assert!(matches!(
            client.send(&mail).await,
            Err(MailError::NotConfigured)
        ));
    }
}
