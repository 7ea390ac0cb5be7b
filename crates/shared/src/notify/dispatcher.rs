use serde::Serialize;
use tracing::{info, warn};

use super::templates::{self, ReminderMessage};
use super::{
    Channel, ChannelError, ChannelOutcome, ChannelStatus, EmailMessage, EmailTransport,
    SmsTransport,
};
use crate::config::NotifyConfig;

/// The addresses supplied for one logical notification. A channel with no
/// address is simply not attempted.
#[derive(Debug, Clone, Default)]
pub struct ContactAddresses {
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl ContactAddresses {
    /// The designated clinician contact for critical alerts.
    pub fn clinician(config: &NotifyConfig) -> Self {
        Self {
            phone: config.clinician_phone.clone(),
            email: config.clinician_email.clone(),
        }
    }
}

/// Aggregate result of one logical notification: one outcome per channel
/// attempted, `None` for channels that had no address.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DispatchReport {
    pub sms: Option<ChannelOutcome>,
    pub email: Option<ChannelOutcome>,
}

impl DispatchReport {
    pub fn any_failed(&self) -> bool {
        [self.sms.as_ref(), self.email.as_ref()]
            .into_iter()
            .flatten()
            .any(|outcome| outcome.status == ChannelStatus::Failed)
    }
}

/// Fans one message out across SMS and email, per channel, independently.
/// Delivery is fire-and-forget: one attempt per channel and every failure
/// is folded into the outcome, never propagated.
pub struct NotificationDispatcher<S, E> {
    sms: S,
    email: E,
}

impl<S, E> NotificationDispatcher<S, E>
where
    S: SmsTransport,
    E: EmailTransport,
{
    pub fn new(sms: S, email: E) -> Self {
        Self { sms, email }
    }

    pub async fn dispatch(
        &self,
        contact: &ContactAddresses,
        message: &ReminderMessage,
    ) -> DispatchReport {
        let mut report = DispatchReport::default();

        if let Some(phone) = contact.phone.as_deref() {
            report.sms = Some(self.send_sms(phone, &message.sms_text).await);
        }

        if let Some(address) = contact.email.as_deref() {
            let email_message = EmailMessage {
                to: address.to_string(),
                subject: message.email_subject.clone(),
                text_body: message.email_body.clone(),
                html_body: message.email_html.clone(),
            };
            report.email = Some(self.send_email(&email_message).await);
        }

        report
    }

    /// Raises the critical alert to the designated clinician contact. The
    /// alert is never addressed to the patient; routing comes from the
    /// clinician fields of [`NotifyConfig`].
    pub async fn send_critical_alert(
        &self,
        config: &NotifyConfig,
        patient_id: &str,
        patient_name: &str,
        emergency_level: &str,
        reasoning: &str,
    ) -> DispatchReport {
        let clinician = ContactAddresses::clinician(config);
        let message =
            templates::critical_alert(patient_id, patient_name, emergency_level, reasoning);
        self.dispatch(&clinician, &message).await
    }

    async fn send_sms(&self, to: &str, body: &str) -> ChannelOutcome {
        match self.sms.send_sms(to, body).await {
            Ok(message_id) => {
                info!(channel = "sms", message_id = %message_id, "notification sent");
                ChannelOutcome {
                    channel: Channel::Sms,
                    status: ChannelStatus::Sent,
                    detail: message_id,
                }
            }
            Err(ChannelError::NotConfigured) => ChannelOutcome {
                channel: Channel::Sms,
                status: ChannelStatus::Skipped,
                detail: "sms channel not configured".to_string(),
            },
            Err(ChannelError::Delivery(detail)) => {
                warn!(channel = "sms", detail = %detail, "notification delivery failed");
                ChannelOutcome {
                    channel: Channel::Sms,
                    status: ChannelStatus::Failed,
                    detail,
                }
            }
        }
    }

    async fn send_email(&self, message: &EmailMessage) -> ChannelOutcome {
        match self.email.send_email(message).await {
            Ok(message_id) => {
                info!(channel = "email", message_id = %message_id, "notification sent");
                ChannelOutcome {
                    channel: Channel::Email,
                    status: ChannelStatus::Sent,
                    detail: message_id,
                }
            }
            Err(ChannelError::NotConfigured) => ChannelOutcome {
                channel: Channel::Email,
                status: ChannelStatus::Skipped,
                detail: "email channel not configured".to_string(),
            },
            Err(ChannelError::Delivery(detail)) => {
                warn!(channel = "email", detail = %detail, "notification delivery failed");
                ChannelOutcome {
                    channel: Channel::Email,
                    status: ChannelStatus::Failed,
                    detail,
                }
            }
        }
    }
}
