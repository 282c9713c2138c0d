//! Generation gateway for the component studio
//!
//! Translates a caller-supplied batch of prompts into one upstream LLM
//! call per item, never more than one in flight at a time, and reports
//! outcomes either atomically (bulk JSON) or incrementally (SSE stream).

pub mod core;
pub mod error;
pub mod gateway_impl;
pub mod services;
pub mod state;
pub mod traits;
pub mod types;
pub mod web;

// Re-export main types
pub use error::{GatewayError, GatewayResult};
pub use gateway_impl::Gateway;
pub use state::GatewayState;
pub use types::Completion;

// Re-export trait definitions
pub use traits::TextGenerator;

// Re-export service implementations
pub use services::AnthropicClient;
