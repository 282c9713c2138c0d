//! Studio trait definitions for dependency injection

use async_trait::async_trait;

use crate::error::StudioResult;
use crate::types::{RequestOptions, SingleGeneration};
use shared::{BatchOutcome, GenerationRequest};

/// Buffered gateway operations.
///
/// The streaming mode lives on the concrete client because it threads a
/// session handle and a workspace through the body stream; these buffered
/// calls are the seam app-level tests mock.
#[mockall::automock]
#[async_trait]
pub trait GenerationGateway: Send + Sync {
    /// Liveness probe against `/api/health`.
    async fn check_health(&self) -> StudioResult<()>;

    /// One prompt, one completion.
    async fn generate_single(
        &self,
        request: GenerationRequest,
        options: RequestOptions,
    ) -> StudioResult<SingleGeneration>;

    /// Submit a whole batch and wait for the aggregate outcome.
    async fn run_batch(
        &self,
        requests: Vec<GenerationRequest>,
        options: RequestOptions,
    ) -> StudioResult<BatchOutcome>;
}
