mod acquirer;
pub mod article;
pub mod catalog;
mod error;
mod llm;
pub mod parser;
mod pipeline;
pub mod prompt;
pub mod server;
pub mod tracing;
pub mod types;
pub mod ui;
pub mod yt;

pub use acquirer::InputAcquirer;
pub use error::{Error, ErrorCategory, FetchError, LanguageAttempt};
pub use llm::gemini;
pub use llm::invoker::ModelInvoker;
pub use pipeline::{builder::SynapseBuilder, Synapse};
