use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

pub type GenerationFuture<'a> =
    Pin<Box<dyn Future<Output = Result<String, GenerationError>> + Send + 'a>>;

#[derive(Debug, Error)]
pub enum GenerationError {
    /// The provider signaled throttling (HTTP 429). Retried by the governor.
    #[error("generation provider signaled rate limiting")]
    RateLimited,
    #[error("generation provider request timed out")]
    Timeout,
    #[error("generation provider request failed: {0}")]
    ProviderFailure(String),
}

/// One outbound text-generation call: prompt in, raw model text out. No
/// retry or pacing at this layer.
pub trait GenerationGateway: Send + Sync {
    fn generate<'a>(&'a self, prompt: String) -> GenerationFuture<'a>;
}
