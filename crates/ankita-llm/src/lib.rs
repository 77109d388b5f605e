//! Generation and embedding backends behind a single provider abstraction.

pub mod any;
#[cfg(feature = "candle")]
pub mod candle_provider;
pub mod device;
pub mod error;
#[cfg(feature = "mock")]
pub mod mock;
pub mod ollama;
pub mod provider;

pub use error::LlmError;
pub use provider::LlmProvider;
