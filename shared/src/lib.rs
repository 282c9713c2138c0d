//! Shared types for the component-studio generation pipeline
//!
//! Contains only the types both the gateway and the studio consumer speak:
//! the wire-level generation types, the SSE frame codec, the upstream
//! failure taxonomy, and tracing setup.

pub mod errors;
pub mod logging;
pub mod sse;
pub mod types;

pub use errors::UpstreamFailure;
pub use sse::{encode_frame, FrameDecoder};
pub use types::{
    BatchOutcome, GeneratedItem, GenerationFailure, GenerationRequest, ProgressEvent, TokenUsage,
};
