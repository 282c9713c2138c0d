//! Gateway trait definitions for dependency injection

use async_trait::async_trait;

use crate::types::Completion;
use shared::UpstreamFailure;

/// Upstream text-generation API.
///
/// One implementation per provider; the batch runner and the HTTP
/// handlers only ever see this seam, which keeps upstream behavior
/// mockable in tests.
#[mockall::automock]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Issue one completion call. Returns the raw completion text before
    /// any code-fence normalization.
    async fn complete(
        &self,
        api_key: &str,
        system_instructions: &str,
        user_message: &str,
    ) -> Result<Completion, UpstreamFailure>;
}
