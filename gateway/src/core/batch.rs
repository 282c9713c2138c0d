//! Sequential batch execution over the upstream generator
//!
//! Items are processed one at a time in submission order; there is no
//! parallel fan-out. A per-item upstream failure is recorded and the
//! iteration continues: one bad prompt never aborts the batch.

use std::sync::Arc;
use std::time::Duration;

use shared::{
    BatchOutcome, GeneratedItem, GenerationFailure, GenerationRequest, ProgressEvent,
    UpstreamFailure,
};

use crate::core::prompt::{build_user_message, strip_code_fences};
use crate::traits::TextGenerator;
use crate::types::Completion;

/// Run one generation request through the upstream API and normalize the
/// returned text into source code.
pub async fn generate_item<G>(
    generator: &G,
    api_key: &str,
    system_instructions: &str,
    request: &GenerationRequest,
) -> Result<Completion, UpstreamFailure>
where
    G: TextGenerator + ?Sized,
{
    let message = build_user_message(request);
    let completion = generator
        .complete(api_key, system_instructions, &message)
        .await?;
    Ok(Completion {
        text: strip_code_fences(&completion.text),
        ..completion
    })
}

/// Sequential batch executor with a fixed pacing delay between completed
/// items. The delay is a crude rate-limit mitigation, not an adaptive
/// policy, and is skipped after the last item.
pub struct BatchRunner<G> {
    generator: Arc<G>,
    pacing: Duration,
}

impl<G: TextGenerator> BatchRunner<G> {
    pub fn new(generator: Arc<G>, pacing: Duration) -> Self {
        Self { generator, pacing }
    }

    /// Buffered mode: attempt every request, return the full outcome.
    pub async fn run(
        &self,
        api_key: &str,
        system_instructions: &str,
        requests: &[GenerationRequest],
    ) -> BatchOutcome {
        self.run_with_events(api_key, system_instructions, requests, |_| true)
            .await
    }

    /// Streaming mode: emit `progress` immediately before each item and
    /// `success`/`error` immediately after it, then a final `complete`.
    ///
    /// `emit` returns false once the transport is gone; the remaining
    /// iteration is orphaned and the runner stops with the outcome built
    /// so far.
    pub async fn run_with_events<F>(
        &self,
        api_key: &str,
        system_instructions: &str,
        requests: &[GenerationRequest],
        mut emit: F,
    ) -> BatchOutcome
    where
        F: FnMut(ProgressEvent) -> bool,
    {
        let total = requests.len();
        let mut outcome = BatchOutcome::new(total);

        for (index, request) in requests.iter().enumerate() {
            let delivered = emit(ProgressEvent::Progress {
                current: index + 1,
                total,
                prompt: request.prompt.clone(),
            });
            if !delivered {
                tracing::warn!(index, "stream consumer gone, abandoning batch");
                return outcome;
            }

            let delivered = match generate_item(
                self.generator.as_ref(),
                api_key,
                system_instructions,
                request,
            )
            .await
            {
                Ok(completion) => {
                    let item = GeneratedItem::new(
                        index,
                        request.prompt.clone(),
                        completion.text,
                        completion.usage,
                    );
                    tracing::info!(index, tokens = item.usage.total(), "generated component");
                    outcome.record_success(item.clone());
                    emit(ProgressEvent::Success { result: item })
                }
                Err(failure) => {
                    tracing::warn!(index, error = %failure, "item failed, continuing batch");
                    let failure =
                        GenerationFailure::new(index, request.prompt.clone(), failure.to_string());
                    outcome.record_failure(failure.clone());
                    emit(ProgressEvent::Error { result: failure })
                }
            };
            if !delivered {
                tracing::warn!(index, "stream consumer gone, abandoning batch");
                return outcome;
            }

            if index + 1 < total && !self.pacing.is_zero() {
                tokio::time::sleep(self.pacing).await;
            }
        }

        emit(ProgressEvent::Complete {
            outcome: outcome.clone(),
        });
        outcome
    }
}
