pub mod dispatcher;
pub mod email;
pub mod sms;
pub mod templates;

use std::future::Future;
use std::pin::Pin;

use serde::Serialize;
use thiserror::Error;

pub use dispatcher::{ContactAddresses, DispatchReport, NotificationDispatcher};
pub use email::RelayEmail;
pub use sms::TwilioSms;
pub use templates::ReminderMessage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Channel {
    Sms,
    Email,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChannelStatus {
    Sent,
    Skipped,
    Failed,
}

/// Result of one delivery attempt on one channel. `detail` carries the
/// provider message id on success and the failure reason otherwise.
#[derive(Debug, Clone, Serialize)]
pub struct ChannelOutcome {
    pub channel: Channel,
    pub status: ChannelStatus,
    pub detail: String,
}

#[derive(Debug, Error)]
pub enum ChannelError {
    /// Credentials absent; the channel is disabled, which is not a failure.
    #[error("channel credentials not configured")]
    NotConfigured,
    #[error("delivery failed: {0}")]
    Delivery(String),
}

pub type ChannelSendFuture<'a> =
    Pin<Box<dyn Future<Output = Result<String, ChannelError>> + Send + 'a>>;

pub trait SmsTransport: Send + Sync {
    fn send_sms<'a>(&'a self, to: &'a str, body: &'a str) -> ChannelSendFuture<'a>;
}

#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: Option<String>,
}

pub trait EmailTransport: Send + Sync {
    fn send_email<'a>(&'a self, message: &'a EmailMessage) -> ChannelSendFuture<'a>;
}
