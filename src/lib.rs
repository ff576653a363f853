pub mod commit;
pub mod config;
pub mod error;
pub mod git;
pub mod invocation;
pub mod openai;
pub mod pipeline;
pub mod prompt;
pub mod resolve;
pub mod stdin;

// Re-exports
pub use error::{Error, Result};
pub use invocation::Invocation;
pub use pipeline::{Outcome, Pipeline};
