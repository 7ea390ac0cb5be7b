use serde::Deserialize;

use super::{ChannelError, ChannelSendFuture, SmsTransport};
use crate::config::SmsChannelConfig;

/// Twilio Messages API transport. Built from optional credentials; when
/// they are absent every send yields [`ChannelError::NotConfigured`].
#[derive(Clone)]
pub struct TwilioSms {
    client: reqwest::Client,
    config: Option<SmsChannelConfig>,
}

#[derive(Debug, Deserialize)]
struct TwilioMessageResponse {
    sid: Option<String>,
}

impl TwilioSms {
    pub fn new(config: Option<SmsChannelConfig>) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    async fn deliver(&self, to: &str, body: &str) -> Result<String, ChannelError> {
        let Some(config) = self.config.as_ref() else {
            return Err(ChannelError::NotConfigured);
        };

        let url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            config.api_base_url, config.account_sid
        );
        let params = [
            ("To", to),
            ("From", config.from_number.as_str()),
            ("Body", body),
        ];

        let response = self
            .client
            .post(&url)
            .basic_auth(&config.account_sid, Some(&config.auth_token))
            .form(&params)
            .send()
            .await
            .map_err(|err| ChannelError::Delivery(format!("twilio request failed: {err}")))?;

        let status = response.status();
        let response_body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(ChannelError::Delivery(format!(
                "twilio responded with status {}: {response_body}",
                status.as_u16()
            )));
        }

        let parsed = serde_json::from_str::<TwilioMessageResponse>(&response_body).ok();
        Ok(parsed
            .and_then(|message| message.sid)
            .unwrap_or_else(|| "accepted".to_string()))
    }
}

impl SmsTransport for TwilioSms {
    fn send_sms<'a>(&'a self, to: &'a str, body: &'a str) -> ChannelSendFuture<'a> {
        Box::pin(async move { self.deliver(to, body).await })
    }
}
