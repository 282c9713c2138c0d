//! Progressive stream consumption
//!
//! Applies decoded progress frames to the session and the working set.
//! The defining behavior of streaming mode: every `success` frame
//! materializes an artifact immediately, never batched at the end.

use shared::{BatchOutcome, FrameDecoder, ProgressEvent};

use crate::core::session::SessionHandle;
use crate::core::workspace::Workspace;
use crate::types::Artifact;

/// Chunk-at-a-time consumer of one batch stream.
///
/// Cancellation is cooperative and checked once per received chunk, so it
/// takes effect on the next chunk boundary, never mid-frame. Cancelling
/// preserves every artifact already materialized.
pub struct StreamConsumer<'w, F: FnMut(&ProgressEvent)> {
    decoder: FrameDecoder,
    session: SessionHandle,
    workspace: &'w mut Workspace,
    on_event: F,
    partial: BatchOutcome,
    final_outcome: Option<BatchOutcome>,
}

impl<'w, F: FnMut(&ProgressEvent)> StreamConsumer<'w, F> {
    pub fn new(
        session: SessionHandle,
        workspace: &'w mut Workspace,
        total: usize,
        on_event: F,
    ) -> Self {
        Self {
            decoder: FrameDecoder::new(),
            session,
            workspace,
            on_event,
            partial: BatchOutcome::new(total),
            final_outcome: None,
        }
    }

    /// Feed one body chunk. Returns false once consumption should stop:
    /// either a cancel request was honored or the `complete` frame has
    /// been observed.
    pub fn process_chunk(&mut self, chunk: &[u8]) -> bool {
        if self.session.cancel_requested() {
            tracing::info!("cancel honored at chunk boundary");
            self.session.mark_cancelled();
            return false;
        }

        for event in self.decoder.feed(chunk) {
            self.apply(event);
        }
        self.final_outcome.is_none()
    }

    fn apply(&mut self, event: ProgressEvent) {
        match &event {
            ProgressEvent::Progress { current, total, prompt } => {
                tracing::debug!(current, total, prompt = %prompt, "item started");
                self.session.note_progress(*current);
            }
            ProgressEvent::Success { result } => {
                self.workspace.add_artifact(Artifact::from_result(result));
                self.partial.record_success(result.clone());
                self.session.note_item_settled();
            }
            ProgressEvent::Error { result } => {
                tracing::warn!(index = result.index, error = %result.error, "item failed");
                self.partial.record_failure(result.clone());
                self.session.note_item_settled();
            }
            ProgressEvent::Complete { outcome } => {
                self.session.mark_complete();
                self.final_outcome = Some(outcome.clone());
            }
        }
        (self.on_event)(&event);
    }

    /// The authoritative outcome when `complete` was observed, otherwise
    /// everything accumulated before the stream stopped.
    pub fn into_outcome(self) -> BatchOutcome {
        self.final_outcome.unwrap_or(self.partial)
    }
}
