use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant, sleep};
use tracing::{debug, warn};

use super::gateway::{GenerationError, GenerationGateway};
use crate::config::ConfigError;
use crate::config_env::{parse_u32_env, parse_u64_env};

const DEFAULT_MIN_SPACING_SECONDS: u64 = 5;
const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_BACKOFF_SECONDS: u64 = 60;

#[derive(Debug, Clone)]
pub struct GovernorConfig {
    pub min_spacing_seconds: u64,
    pub max_attempts: u32,
    pub backoff_multiplier_seconds: u64,
}

impl Default for GovernorConfig {
    fn default() -> Self {
        Self {
            min_spacing_seconds: DEFAULT_MIN_SPACING_SECONDS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff_multiplier_seconds: DEFAULT_BACKOFF_SECONDS,
        }
    }
}

impl GovernorConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            min_spacing_seconds: parse_u64_env(
                "GENERATION_MIN_SPACING_SECONDS",
                DEFAULT_MIN_SPACING_SECONDS,
            )?,
            max_attempts: parse_u32_env("GENERATION_MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS)?,
            backoff_multiplier_seconds: parse_u64_env(
                "GENERATION_BACKOFF_SECONDS",
                DEFAULT_BACKOFF_SECONDS,
            )?,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::InvalidConfiguration(
                "GENERATION_MAX_ATTEMPTS must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum InvokeError {
    /// Non-rate-limit provider failure. Never retried.
    #[error("generation call failed: {0}")]
    Transient(String),
    /// Every allowed attempt was answered with a rate-limit signal.
    #[error("generation retry budget exhausted after {attempts} attempts")]
    ExhaustedRetries { attempts: u32 },
}

#[derive(Debug, Default)]
struct PacingState {
    last_issued_at: Option<Instant>,
    completed_calls: u64,
}

/// Serializes outbound generation calls behind one process-wide pacing
/// guarantee: consecutive call issuances are at least `min_spacing_seconds`
/// apart, and rate-limit signals are retried with linear backoff up to
/// `max_attempts` total attempts.
///
/// The pacing decision and the wait both happen while the state lock is
/// held, so two concurrent callers can never both observe "no wait needed".
pub struct RateGovernedInvoker<G> {
    gateway: G,
    config: GovernorConfig,
    state: Arc<Mutex<PacingState>>,
}

impl<G> RateGovernedInvoker<G>
where
    G: GenerationGateway,
{
    pub fn new(gateway: G, config: GovernorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            gateway,
            config,
            state: Arc::new(Mutex::new(PacingState::default())),
        })
    }

    pub async fn invoke(&self, prompt: &str) -> Result<String, InvokeError> {
        let mut failures = 0_u32;

        loop {
            self.pace().await;

            match self.gateway.generate(prompt.to_string()).await {
                Ok(text) => {
                    let mut state = self.state.lock().await;
                    state.completed_calls = state.completed_calls.saturating_add(1);
                    return Ok(text);
                }
                Err(GenerationError::RateLimited) => {
                    failures = failures.saturating_add(1);
                    if failures >= self.config.max_attempts {
                        return Err(InvokeError::ExhaustedRetries { attempts: failures });
                    }

                    let backoff_seconds = self
                        .config
                        .backoff_multiplier_seconds
                        .saturating_mul(u64::from(failures));
                    warn!(
                        attempt = failures,
                        max_attempts = self.config.max_attempts,
                        backoff_seconds,
                        "generation provider rate limited; backing off before retry"
                    );
                    sleep(Duration::from_secs(backoff_seconds)).await;
                }
                Err(err) => return Err(InvokeError::Transient(err.to_string())),
            }
        }
    }

    /// Successful completions since construction. Diagnostic only.
    pub async fn completed_calls(&self) -> u64 {
        self.state.lock().await.completed_calls
    }

    async fn pace(&self) {
        let mut state = self.state.lock().await;
        if let Some(last_issued_at) = state.last_issued_at {
            let elapsed = last_issued_at.elapsed();
            let min_spacing = Duration::from_secs(self.config.min_spacing_seconds);
            if elapsed < min_spacing {
                let wait = min_spacing - elapsed;
                debug!(wait_ms = wait.as_millis() as u64, "pacing outbound generation call");
                sleep(wait).await;
            }
        }
        state.last_issued_at = Some(Instant::now());
    }
}
