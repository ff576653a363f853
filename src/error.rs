//! Error types for the gitiax pipeline.
//!
//! Every failure is fatal to the run. Configuration problems surface before any
//! I/O happens, repository failures abort the remaining steps, and gateway
//! failures stop the run before a commit is attempted. An empty diff is not an
//! error; see [`crate::pipeline::Outcome::NoChanges`].

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
  #[error("missing {0} environment variable")]
  Missing(&'static str),

  #[error("invalid base URL {url:?}: {reason}")]
  InvalidBaseUrl { url: String, reason: String },

  #[error("failed to load configuration: {0}")]
  Load(#[from] ::config::ConfigError)
}

#[derive(Error, Debug)]
pub enum GitError {
  #[error("Git error: {0}")]
  Git(#[from] git2::Error),

  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),

  #[error("Failed to add files: pathspec {0:?} did not match any files")]
  PathspecNotFound(String),

  #[error("Failed to add files: {0:?} is outside the repository")]
  OutsideRepository(String),

  #[error("Repository has no working directory")]
  BareRepository
}

#[derive(Error, Debug)]
pub enum GatewayError {
  #[error("HTTP error: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("API Error ({status}): {body}")]
  BadStatus { status: u16, body: String },

  #[error("no choices returned from API")]
  NoChoices,

  #[error("failed to decode response: {0}")]
  Decode(#[from] serde_json::Error)
}

impl GatewayError {
  /// True when the endpoint rejected the credentials (401 or 403).
  ///
  /// ```
  /// use gitiax::error::GatewayError;
  ///
  /// let error = GatewayError::BadStatus { status: 401, body: "unauthorized".into() };
  /// assert!(error.is_auth_failure());
  /// ```
  pub fn is_auth_failure(&self) -> bool {
    matches!(self, GatewayError::BadStatus { status: 401 | 403, .. })
  }
}

#[derive(Error, Debug)]
pub enum Error {
  #[error("Configuration error: {0}")]
  Config(#[from] ConfigError),

  #[error(transparent)]
  Git(#[from] GitError),

  #[error("AI Error: {0}")]
  Gateway(#[from] GatewayError),

  #[error("Failed to read standard input: {0}")]
  Input(std::io::Error),

  #[error("Failed to write output: {0}")]
  Output(#[from] std::io::Error)
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
