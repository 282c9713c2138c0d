//! Core business logic: prompt assembly and the sequential batch runner

pub mod batch;
pub mod prompt;

pub use batch::{generate_item, BatchRunner};
pub use prompt::{build_user_message, strip_code_fences, DEFAULT_SYSTEM_INSTRUCTIONS};
