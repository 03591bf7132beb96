//! Tonewrite LLM Library
//!
//! The text-generation capability behind a `GenerationBackend` trait, the Anthropic
//! Messages API implementation, and the dispatcher that invokes a backend in
//! blocking or non-blocking mode.

pub mod anthropic;
pub mod backend;
pub mod dispatcher;
pub mod error;
pub mod factory;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

// Re-export commonly used types
pub use anthropic::AnthropicBackend;
pub use backend::{GenerationBackend, GenerationRequest};
pub use dispatcher::{GenerationDispatcher, GenerationHandle};
pub use error::{GenerationError, GenerationResult};
pub use factory::create_backend;
