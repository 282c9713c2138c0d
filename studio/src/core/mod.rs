//! Core business logic: session lifecycle, stream consumption, and the
//! artifact working set

pub mod session;
pub mod stream;
pub mod workspace;

pub use session::{BatchStatus, SessionHandle};
pub use stream::StreamConsumer;
pub use workspace::Workspace;
