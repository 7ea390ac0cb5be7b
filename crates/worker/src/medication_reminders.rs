use shared::contacts::RecipientDirectory;
use shared::notify::templates::medication_reminder;
use shared::notify::{ContactAddresses, EmailTransport, NotificationDispatcher, SmsTransport};
use tracing::{error, info, warn};

use crate::scheduler::{HandlerFuture, ReminderHandler};

const MEDICATION_PLACEHOLDER: &str = "Your prescribed medication";

#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct ReminderFanoutMetrics {
    pub(crate) recipients: usize,
    pub(crate) attempted: usize,
    pub(crate) delivered: usize,
    pub(crate) failed: usize,
    pub(crate) skipped_missing_contact: usize,
}

/// Sends the medication reminder to every recipient with a known contact
/// address. One recipient's failure never stops the loop; failures are
/// logged and counted, and the firing itself never raises.
pub(crate) struct MedicationReminderHandler<D, S, E> {
    directory: D,
    dispatcher: NotificationDispatcher<S, E>,
}

impl<D, S, E> MedicationReminderHandler<D, S, E>
where
    D: RecipientDirectory,
    S: SmsTransport,
    E: EmailTransport,
{
    pub(crate) fn new(directory: D, dispatcher: NotificationDispatcher<S, E>) -> Self {
        Self {
            directory,
            dispatcher,
        }
    }

    pub(crate) async fn fan_out(&self) -> ReminderFanoutMetrics {
        let mut metrics = ReminderFanoutMetrics::default();

        let recipients = match self.directory.list_recipients().await {
            Ok(recipients) => recipients,
            Err(err) => {
                error!("failed to load reminder recipients: {err}");
                return metrics;
            }
        };
        metrics.recipients = recipients.len();

        for recipient in recipients {
            if !recipient.has_contact_address() {
                metrics.skipped_missing_contact += 1;
                continue;
            }

            let contact = ContactAddresses {
                phone: recipient.phone.clone(),
                email: recipient.email.clone(),
            };
            let message = medication_reminder(&recipient.full_name, MEDICATION_PLACEHOLDER);

            metrics.attempted += 1;
            let report = self.dispatcher.dispatch(&contact, &message).await;
            if report.any_failed() {
                metrics.failed += 1;
                warn!(
                    patient_id = %recipient.patient_id,
                    "medication reminder delivery failed for recipient"
                );
            } else {
                metrics.delivered += 1;
            }
        }

        info!(
            recipients = metrics.recipients,
            attempted = metrics.attempted,
            delivered = metrics.delivered,
            failed = metrics.failed,
            skipped_missing_contact = metrics.skipped_missing_contact,
            "medication reminder fan-out metrics"
        );

        metrics
    }
}

impl<D, S, E> ReminderHandler for MedicationReminderHandler<D, S, E>
where
    D: RecipientDirectory,
    S: SmsTransport,
    E: EmailTransport,
{
    fn run<'a>(&'a self) -> HandlerFuture<'a> {
        Box::pin(async move {
            self.fan_out().await;
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Arc;

    use shared::contacts::{DirectoryError, Recipient, RecipientDirectory, RecipientListFuture};
    use shared::notify::{
        ChannelError, ChannelSendFuture, EmailMessage, EmailTransport, NotificationDispatcher,
        SmsTransport,
    };
    use tokio::sync::Mutex;
    use uuid::Uuid;

    use super::{MedicationReminderHandler, ReminderFanoutMetrics};

    struct StubDirectory {
        recipients: Result<Vec<Recipient>, ()>,
    }

    impl RecipientDirectory for StubDirectory {
        fn list_recipients<'a>(&'a self) -> RecipientListFuture<'a> {
            let result = self
                .recipients
                .clone()
                .map_err(|()| DirectoryError::Lookup("connection refused".to_string()));
            Box::pin(async move { result })
        }
    }

    #[derive(Clone)]
    struct ScriptedSms {
        responses: Arc<Mutex<VecDeque<Result<String, ChannelError>>>>,
        recipients_seen: Arc<Mutex<Vec<String>>>,
    }

    impl ScriptedSms {
        fn with_responses(responses: Vec<Result<String, ChannelError>>) -> Self {
            Self {
                responses: Arc::new(Mutex::new(VecDeque::from(responses))),
                recipients_seen: Arc::new(Mutex::new(Vec::new())),
            }
        }

        async fn recipients_seen(&self) -> Vec<String> {
            self.recipients_seen.lock().await.clone()
        }
    }

    impl SmsTransport for ScriptedSms {
        fn send_sms<'a>(&'a self, to: &'a str, _body: &'a str) -> ChannelSendFuture<'a> {
            Box::pin(async move {
                self.recipients_seen.lock().await.push(to.to_string());
                self.responses
                    .lock()
                    .await
                    .pop_front()
                    .unwrap_or(Ok("SM000".to_string()))
            })
        }
    }

    struct DisabledEmail;

    impl EmailTransport for DisabledEmail {
        fn send_email<'a>(&'a self, _message: &'a EmailMessage) -> ChannelSendFuture<'a> {
            Box::pin(async move { Err(ChannelError::NotConfigured) })
        }
    }

    fn recipient(name: &str, phone: Option<&str>) -> Recipient {
        Recipient {
            patient_id: Uuid::new_v4(),
            full_name: name.to_string(),
            phone: phone.map(ToString::to_string),
            email: None,
        }
    }

    #[tokio::test]
    async fn one_failing_recipient_does_not_stop_the_fan_out() {
        let directory = StubDirectory {
            recipients: Ok(vec![
                recipient("First Patient", Some("+15550101")),
                recipient("Second Patient", Some("+15550102")),
                recipient("Third Patient", Some("+15550103")),
            ]),
        };
        let sms = ScriptedSms::with_responses(vec![
            Ok("SM001".to_string()),
            Err(ChannelError::Delivery("number unreachable".to_string())),
            Ok("SM003".to_string()),
        ]);
        let handler = MedicationReminderHandler::new(
            directory,
            NotificationDispatcher::new(sms.clone(), DisabledEmail),
        );

        let metrics = handler.fan_out().await;

        assert_eq!(
            sms.recipients_seen().await,
            vec!["+15550101", "+15550102", "+15550103"]
        );
        assert_eq!(metrics.recipients, 3);
        assert_eq!(metrics.attempted, 3);
        assert_eq!(metrics.delivered, 2);
        assert_eq!(metrics.failed, 1);
    }

    #[tokio::test]
    async fn recipients_without_any_address_are_skipped() {
        let directory = StubDirectory {
            recipients: Ok(vec![
                recipient("Reachable Patient", Some("+15550101")),
                recipient("Unreachable Patient", None),
            ]),
        };
        let sms = ScriptedSms::with_responses(vec![Ok("SM001".to_string())]);
        let handler = MedicationReminderHandler::new(
            directory,
            NotificationDispatcher::new(sms.clone(), DisabledEmail),
        );

        let metrics = handler.fan_out().await;

        assert_eq!(metrics.recipients, 2);
        assert_eq!(metrics.attempted, 1);
        assert_eq!(metrics.skipped_missing_contact, 1);
        assert_eq!(sms.recipients_seen().await, vec!["+15550101"]);
    }

    #[tokio::test]
    async fn directory_failure_aborts_the_firing_without_raising() {
        let directory = StubDirectory {
            recipients: Err(()),
        };
        let sms = ScriptedSms::with_responses(Vec::new());
        let handler = MedicationReminderHandler::new(
            directory,
            NotificationDispatcher::new(sms.clone(), DisabledEmail),
        );

        let metrics = handler.fan_out().await;

        assert_eq!(metrics, ReminderFanoutMetrics::default());
        assert!(sms.recipients_seen().await.is_empty());
    }
}
