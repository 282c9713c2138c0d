//! Studio consumer for the generation gateway
//!
//! Drives batch or streaming generation runs, renders progress, and
//! materializes each completed item as an immediately visible artifact in
//! the working set without waiting for the whole batch.

pub mod core;
pub mod error;
pub mod services;
pub mod traits;
pub mod types;

// Re-export main types
pub use crate::core::session::{BatchStatus, SessionHandle};
pub use crate::core::stream::StreamConsumer;
pub use crate::core::workspace::Workspace;
pub use error::{StudioError, StudioResult};
pub use types::{Artifact, RequestOptions, SingleGeneration};

// Re-export trait definitions
pub use traits::GenerationGateway;

// Re-export service implementations
pub use services::RealGatewayClient;
