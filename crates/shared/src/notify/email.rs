use serde::{Deserialize, Serialize};

use super::{ChannelError, ChannelSendFuture, EmailMessage, EmailTransport};
use crate::config::EmailChannelConfig;

/// HTTP email relay transport: one JSON POST per message to the configured
/// relay endpoint with bearer auth. Disabled when credentials are absent.
#[derive(Clone)]
pub struct RelayEmail {
    client: reqwest::Client,
    config: Option<EmailChannelConfig>,
}

#[derive(Debug, Serialize)]
struct RelayDeliveryRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text_body: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    html_body: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct RelayDeliveryResponse {
    id: Option<String>,
}

impl RelayEmail {
    pub fn new(config: Option<EmailChannelConfig>) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    async fn deliver(&self, message: &EmailMessage) -> Result<String, ChannelError> {
        let Some(config) = self.config.as_ref() else {
            return Err(ChannelError::NotConfigured);
        };

        let request = RelayDeliveryRequest {
            from: &config.from_address,
            to: &message.to,
            subject: &message.subject,
            text_body: &message.text_body,
            html_body: message.html_body.as_deref(),
        };

        let response = self
            .client
            .post(&config.relay_url)
            .bearer_auth(&config.relay_token)
            .json(&request)
            .send()
            .await
            .map_err(|err| ChannelError::Delivery(format!("email relay request failed: {err}")))?;

        let status = response.status();
        let response_body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(ChannelError::Delivery(format!(
                "email relay responded with status {}: {response_body}",
                status.as_u16()
            )));
        }

        let parsed = serde_json::from_str::<RelayDeliveryResponse>(&response_body).ok();
        Ok(parsed
            .and_then(|delivery| delivery.id)
            .unwrap_or_else(|| "accepted".to_string()))
    }
}

impl EmailTransport for RelayEmail {
    fn send_email<'a>(&'a self, message: &'a EmailMessage) -> ChannelSendFuture<'a> {
        Box::pin(async move { self.deliver(message).await })
    }
}
