use chrono_tz::Tz;
use thiserror::Error;

use crate::config_env::{optional_trimmed_env, parse_list_env, parse_u32_env, require_env};
use crate::schedule::{TriggerSpec, parse_trigger_time};

const DEFAULT_REMINDER_TIMES: &[&str] = &["08:00", "14:00", "20:00"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required env var {0}")]
    MissingVar(String),
    #[error("invalid integer in env var {0}")]
    ParseInt(String),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Twilio SMS credentials. The channel is enabled only when every field is
/// present; partial credentials leave it disabled.
#[derive(Debug, Clone)]
pub struct SmsChannelConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
    pub api_base_url: String,
}

/// HTTP email relay credentials, same enablement rule as SMS.
#[derive(Debug, Clone)]
pub struct EmailChannelConfig {
    pub relay_url: String,
    pub relay_token: String,
    pub from_address: String,
}

#[derive(Debug, Clone)]
pub struct NotifyConfig {
    pub sms: Option<SmsChannelConfig>,
    pub email: Option<EmailChannelConfig>,
    pub clinician_phone: Option<String>,
    pub clinician_email: Option<String>,
}

impl NotifyConfig {
    pub fn from_env() -> Self {
        let sms = match (
            optional_trimmed_env("TWILIO_ACCOUNT_SID"),
            optional_trimmed_env("TWILIO_AUTH_TOKEN"),
            optional_trimmed_env("TWILIO_FROM_NUMBER"),
        ) {
            (Some(account_sid), Some(auth_token), Some(from_number)) => Some(SmsChannelConfig {
                account_sid,
                auth_token,
                from_number,
                api_base_url: optional_trimmed_env("TWILIO_API_BASE_URL")
                    .unwrap_or_else(|| "https://api.twilio.com".to_string()),
            }),
            _ => None,
        };

        let email = match (
            optional_trimmed_env("EMAIL_RELAY_URL"),
            optional_trimmed_env("EMAIL_RELAY_TOKEN"),
            optional_trimmed_env("EMAIL_FROM_ADDRESS"),
        ) {
            (Some(relay_url), Some(relay_token), Some(from_address)) => Some(EmailChannelConfig {
                relay_url,
                relay_token,
                from_address,
            }),
            _ => None,
        };

        Self {
            sms,
            email,
            clinician_phone: optional_trimmed_env("CLINICIAN_ALERT_PHONE"),
            clinician_email: optional_trimmed_env("CLINICIAN_ALERT_EMAIL"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub reminder_times: Vec<TriggerSpec>,
    pub time_zone: Tz,
    pub database_url: String,
    pub database_max_connections: u32,
}

impl WorkerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw_times = parse_list_env("REMINDER_TIMES", DEFAULT_REMINDER_TIMES);
        let mut reminder_times = Vec::with_capacity(raw_times.len());
        for raw in &raw_times {
            let spec = parse_trigger_time(raw).ok_or_else(|| {
                ConfigError::InvalidConfiguration(format!(
                    "REMINDER_TIMES entry '{raw}' is not a valid HH:MM time"
                ))
            })?;
            reminder_times.push(spec);
        }

        let time_zone = parse_time_zone(
            &optional_trimmed_env("REMINDER_TIME_ZONE").unwrap_or_else(|| "UTC".to_string()),
        )?;

        Ok(Self {
            reminder_times,
            time_zone,
            database_url: require_env("DATABASE_URL")?,
            database_max_connections: parse_u32_env("DATABASE_MAX_CONNECTIONS", 5)?,
        })
    }
}

fn parse_time_zone(name: &str) -> Result<Tz, ConfigError> {
    name.parse::<Tz>().map_err(|_| {
        ConfigError::InvalidConfiguration(format!(
            "REMINDER_TIME_ZONE '{name}' is not a valid IANA timezone"
        ))
    })
}
