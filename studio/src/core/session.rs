//! Batch session state machine
//!
//! One explicit session object per batch run replaces ambient boolean
//! flags, making illegal states (cancelling while idle, starting a second
//! run on a live session) unrepresentable as successful calls:
//!
//! `Idle -> Requesting -> Streaming{remaining} -> {Complete | Cancelled}`
//!
//! `Streaming` self-transitions on every received frame; both terminal
//! states are final. Item-level errors never produce a distinct terminal
//! state: they are folded into the outcome while the machine continues.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use uuid::Uuid;

use crate::error::{StudioError, StudioResult};

/// Where a batch run currently stands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BatchStatus {
    Idle,
    Requesting,
    Streaming { remaining: usize },
    Complete,
    Cancelled,
}

#[derive(Debug)]
struct SessionState {
    id: Uuid,
    status: BatchStatus,
    cancel_requested: bool,
    current: usize,
    total: usize,
}

/// Shared handle to one batch session.
///
/// Cloneable so a cancellation source (a signal handler, a UI action, an
/// event callback) can hold the same session the stream consumer drives.
#[derive(Clone, Debug)]
pub struct SessionHandle {
    inner: Arc<Mutex<SessionState>>,
}

impl SessionHandle {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(SessionState {
                id: Uuid::new_v4(),
                status: BatchStatus::Idle,
                cancel_requested: false,
                current: 0,
                total: 0,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn id(&self) -> Uuid {
        self.lock().id
    }

    pub fn status(&self) -> BatchStatus {
        self.lock().status.clone()
    }

    /// Progress counters as `(current, total)`.
    pub fn progress(&self) -> (usize, usize) {
        let state = self.lock();
        (state.current, state.total)
    }

    /// `Idle -> Requesting`. Rejects reuse: a session is single-flight
    /// and terminal states are final.
    pub fn begin(&self, total: usize) -> StudioResult<()> {
        let mut state = self.lock();
        if state.status != BatchStatus::Idle {
            return Err(StudioError::invalid_state(format!(
                "cannot start a batch from {:?}",
                state.status
            )));
        }
        state.status = BatchStatus::Requesting;
        state.total = total;
        state.current = 0;
        tracing::info!(session = %state.id, total, "batch session started");
        Ok(())
    }

    /// `Requesting -> Streaming` once the connection is established.
    pub fn start_streaming(&self) -> StudioResult<()> {
        let mut state = self.lock();
        if state.status != BatchStatus::Requesting {
            return Err(StudioError::invalid_state(format!(
                "cannot start streaming from {:?}",
                state.status
            )));
        }
        state.status = BatchStatus::Streaming {
            remaining: state.total,
        };
        Ok(())
    }

    /// `Requesting -> Idle` when the request failed before any frame was
    /// received, so the session can be retried.
    pub fn abort_request(&self) {
        let mut state = self.lock();
        if state.status == BatchStatus::Requesting {
            state.status = BatchStatus::Idle;
        }
    }

    /// Request cooperative cancellation. Advisory and eventual: it takes
    /// effect on the next chunk boundary, not instantly, and only a
    /// streaming session can be cancelled.
    pub fn request_cancel(&self) -> StudioResult<()> {
        let mut state = self.lock();
        match state.status {
            BatchStatus::Streaming { .. } => {
                state.cancel_requested = true;
                Ok(())
            }
            _ => Err(StudioError::invalid_state(format!(
                "cannot cancel from {:?}",
                state.status
            ))),
        }
    }

    pub fn cancel_requested(&self) -> bool {
        self.lock().cancel_requested
    }

    /// A `progress` frame arrived for item `current` (1-based).
    pub fn note_progress(&self, current: usize) {
        self.lock().current = current;
    }

    /// A `success` or `error` frame settled one item.
    pub fn note_item_settled(&self) {
        let mut state = self.lock();
        if let BatchStatus::Streaming { remaining } = &mut state.status {
            *remaining = remaining.saturating_sub(1);
        }
    }

    /// `Streaming -> Complete` on the final frame.
    pub fn mark_complete(&self) {
        let mut state = self.lock();
        if matches!(state.status, BatchStatus::Streaming { .. }) {
            state.status = BatchStatus::Complete;
            tracing::info!(session = %state.id, "batch session complete");
        }
    }

    /// `Streaming -> Cancelled`, honoring a cancel request or a dead
    /// transport. Everything already materialized stays.
    pub fn mark_cancelled(&self) {
        let mut state = self.lock();
        if matches!(state.status, BatchStatus::Streaming { .. }) {
            state.status = BatchStatus::Cancelled;
            tracing::info!(session = %state.id, "batch session cancelled");
        }
    }
}

impl Default for SessionHandle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        let session = SessionHandle::new();
        assert_eq!(session.status(), BatchStatus::Idle);

        session.begin(2).unwrap();
        assert_eq!(session.status(), BatchStatus::Requesting);

        session.start_streaming().unwrap();
        assert_eq!(session.status(), BatchStatus::Streaming { remaining: 2 });

        session.note_item_settled();
        assert_eq!(session.status(), BatchStatus::Streaming { remaining: 1 });

        session.note_item_settled();
        session.mark_complete();
        assert_eq!(session.status(), BatchStatus::Complete);
    }

    #[test]
    fn test_cancel_requires_streaming() {
        let session = SessionHandle::new();
        assert!(session.request_cancel().is_err());

        session.begin(1).unwrap();
        assert!(session.request_cancel().is_err());

        session.start_streaming().unwrap();
        session.request_cancel().unwrap();
        assert!(session.cancel_requested());

        session.mark_cancelled();
        assert_eq!(session.status(), BatchStatus::Cancelled);
    }

    #[test]
    fn test_session_is_single_flight() {
        let session = SessionHandle::new();
        session.begin(1).unwrap();
        assert!(session.begin(1).is_err());

        // Terminal sessions stay terminal.
        session.start_streaming().unwrap();
        session.mark_complete();
        assert!(session.begin(1).is_err());
        assert_eq!(session.status(), BatchStatus::Complete);
    }

    #[test]
    fn test_clones_share_one_session() {
        let session = SessionHandle::new();
        let clone = session.clone();
        assert_eq!(session.id(), clone.id());

        session.begin(1).unwrap();
        assert_eq!(clone.status(), BatchStatus::Requesting);
    }

    #[test]
    fn test_failed_request_returns_to_idle() {
        let session = SessionHandle::new();
        session.begin(3).unwrap();
        session.abort_request();
        assert_eq!(session.status(), BatchStatus::Idle);
        // Retry is allowed after an aborted request.
        session.begin(3).unwrap();
    }
}
