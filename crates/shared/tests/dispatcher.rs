use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use shared::config::NotifyConfig;
use shared::notify::templates::medication_reminder;
use shared::notify::{
    Channel, ChannelError, ChannelSendFuture, ChannelStatus, ContactAddresses, EmailMessage,
    EmailTransport, NotificationDispatcher, SmsTransport,
};

#[derive(Clone)]
struct StubSms {
    result: Arc<dyn Fn() -> Result<String, ChannelError> + Send + Sync>,
    calls: Arc<AtomicUsize>,
    recipients_seen: Arc<Mutex<Vec<String>>>,
}

impl StubSms {
    fn returning(result: fn() -> Result<String, ChannelError>) -> Self {
        Self {
            result: Arc::new(result),
            calls: Arc::new(AtomicUsize::new(0)),
            recipients_seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn recipients_seen(&self) -> Vec<String> {
        self.recipients_seen.lock().expect("lock poisoned").clone()
    }
}

impl SmsTransport for StubSms {
    fn send_sms<'a>(&'a self, to: &'a str, _body: &'a str) -> ChannelSendFuture<'a> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.recipients_seen
            .lock()
            .expect("lock poisoned")
            .push(to.to_string());
        let result = (self.result)();
        Box::pin(async move { result })
    }
}

#[derive(Clone)]
struct StubEmail {
    result: Arc<dyn Fn() -> Result<String, ChannelError> + Send + Sync>,
    calls: Arc<AtomicUsize>,
    recipients_seen: Arc<Mutex<Vec<String>>>,
}

impl StubEmail {
    fn returning(result: fn() -> Result<String, ChannelError>) -> Self {
        Self {
            result: Arc::new(result),
            calls: Arc::new(AtomicUsize::new(0)),
            recipients_seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn recipients_seen(&self) -> Vec<String> {
        self.recipients_seen.lock().expect("lock poisoned").clone()
    }
}

impl EmailTransport for StubEmail {
    fn send_email<'a>(&'a self, message: &'a EmailMessage) -> ChannelSendFuture<'a> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.recipients_seen
            .lock()
            .expect("lock poisoned")
            .push(message.to.clone());
        let result = (self.result)();
        Box::pin(async move { result })
    }
}

fn sms_ok() -> Result<String, ChannelError> {
    Ok("SM123".to_string())
}

fn email_ok() -> Result<String, ChannelError> {
    Ok("EM456".to_string())
}

fn not_configured() -> Result<String, ChannelError> {
    Err(ChannelError::NotConfigured)
}

fn delivery_rejected() -> Result<String, ChannelError> {
    Err(ChannelError::Delivery("provider rejected message".to_string()))
}

#[tokio::test]
async fn missing_address_means_channel_is_not_attempted() {
    let sms = StubSms::returning(sms_ok);
    let email = StubEmail::returning(email_ok);
    let dispatcher = NotificationDispatcher::new(sms.clone(), email.clone());

    let contact = ContactAddresses {
        phone: Some("+15550100".to_string()),
        email: None,
    };
    let report = dispatcher
        .dispatch(&contact, &medication_reminder("Jane Doe", "Aspirin"))
        .await;

    let sms_outcome = report.sms.expect("sms should be attempted");
    assert_eq!(sms_outcome.channel, Channel::Sms);
    assert_eq!(sms_outcome.status, ChannelStatus::Sent);
    assert_eq!(sms_outcome.detail, "SM123");

    // No address: not attempted at all, which is distinct from Skipped.
    assert!(report.email.is_none());
    assert_eq!(email.calls(), 0);
}

#[tokio::test]
async fn disabled_channel_with_address_yields_skipped_outcome() {
    let sms = StubSms::returning(sms_ok);
    let email = StubEmail::returning(not_configured);
    let dispatcher = NotificationDispatcher::new(sms, email.clone());

    let contact = ContactAddresses {
        phone: Some("+15550100".to_string()),
        email: Some("jane@example.com".to_string()),
    };
    let report = dispatcher
        .dispatch(&contact, &medication_reminder("Jane Doe", "Aspirin"))
        .await;

    let email_outcome = report.email.as_ref().expect("email should be attempted");
    assert_eq!(email_outcome.status, ChannelStatus::Skipped);
    assert_eq!(email.calls(), 1);
    assert!(!report.any_failed());
}

#[tokio::test]
async fn one_channel_failure_does_not_affect_the_other() {
    let sms = StubSms::returning(delivery_rejected);
    let email = StubEmail::returning(email_ok);
    let dispatcher = NotificationDispatcher::new(sms, email);

    let contact = ContactAddresses {
        phone: Some("+15550100".to_string()),
        email: Some("jane@example.com".to_string()),
    };
    let report = dispatcher
        .dispatch(&contact, &medication_reminder("Jane Doe", "Aspirin"))
        .await;

    let sms_outcome = report.sms.as_ref().expect("sms should be attempted");
    assert_eq!(sms_outcome.status, ChannelStatus::Failed);
    assert!(sms_outcome.detail.contains("provider rejected"));

    let email_outcome = report.email.as_ref().expect("email should be attempted");
    assert_eq!(email_outcome.status, ChannelStatus::Sent);
    assert!(report.any_failed());
}

#[tokio::test]
async fn critical_alert_goes_to_the_clinician_contact_only() {
    let sms = StubSms::returning(sms_ok);
    let email = StubEmail::returning(email_ok);
    let dispatcher = NotificationDispatcher::new(sms.clone(), email.clone());

    let config = NotifyConfig {
        sms: None,
        email: None,
        clinician_phone: Some("+15559999".to_string()),
        clinician_email: Some("oncall@clinic.example".to_string()),
    };
    let report = dispatcher
        .send_critical_alert(&config, "P405", "Jane Doe", "CRITICAL", "BP dropping fast")
        .await;

    assert!(report.sms.is_some());
    assert!(report.email.is_some());
    assert_eq!(sms.recipients_seen(), vec!["+15559999"]);
    assert_eq!(email.recipients_seen(), vec!["oncall@clinic.example"]);
}

#[tokio::test]
async fn critical_alert_without_clinician_contact_attempts_nothing() {
    let sms = StubSms::returning(sms_ok);
    let email = StubEmail::returning(email_ok);
    let dispatcher = NotificationDispatcher::new(sms.clone(), email.clone());

    let config = NotifyConfig {
        sms: None,
        email: None,
        clinician_phone: None,
        clinician_email: None,
    };
    let report = dispatcher
        .send_critical_alert(&config, "P405", "Jane Doe", "CRITICAL", "BP dropping fast")
        .await;

    assert!(report.sms.is_none());
    assert!(report.email.is_none());
    assert_eq!(sms.calls(), 0);
    assert_eq!(email.calls(), 0);
}

#[tokio::test]
async fn contact_without_any_address_produces_an_empty_report() {
    let sms = StubSms::returning(sms_ok);
    let email = StubEmail::returning(email_ok);
    let dispatcher = NotificationDispatcher::new(sms.clone(), email.clone());

    let report = dispatcher
        .dispatch(
            &ContactAddresses::default(),
            &medication_reminder("Jane Doe", "Aspirin"),
        )
        .await;

    assert!(report.sms.is_none());
    assert!(report.email.is_none());
    assert_eq!(sms.calls(), 0);
    assert_eq!(email.calls(), 0);
}
