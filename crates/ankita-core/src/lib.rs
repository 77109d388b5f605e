//! Configuration, the retrieval QA chain and the startup initializer that builds it.

pub mod answer;
pub mod bootstrap;
pub mod chain;
pub mod config;
pub mod error;
pub mod prompt;
pub mod retriever;

pub use answer::{Answer, SourceRef};
pub use chain::{AnswerChain, QaOutput, RetrievalQa};
pub use config::Config;
pub use error::{InitError, QueryError, RetrievalError};
