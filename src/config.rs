use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use config::{Config, Environment, File, FileFormat};
use url::Url;

use crate::error::ConfigError;

// Constants
const DEFAULT_TIMEOUT: u64 = 60;
const ENV_PREFIX: &str = "GITIAX";
const COMPLETIONS_PATH: &str = "/chat/completions";

/// Raw, layered settings as read from defaults, `~/.config/gitiax/config.ini`
/// and `GITIAX_*` environment variables. Nothing here is validated yet.
#[derive(Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
pub struct App {
  pub api_key:  Option<String>,
  pub base_url: Option<String>,
  pub model:    Option<String>,
  pub timeout:  Option<u64>
}

/// Validated settings handed to the completion gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
  pub api_key:  String,
  pub base_url: String,
  pub model:    String,
  pub timeout:  u64
}

fn config_file() -> Option<PathBuf> {
  home::home_dir().map(|dir| dir.join(".config/gitiax/config.ini"))
}

impl App {
  pub fn load() -> Result<Self, ConfigError> {
    dotenv::dotenv().ok();

    let mut builder = Config::builder().set_default("timeout", DEFAULT_TIMEOUT)?;

    if let Some(file) = config_file() {
      log::debug!("Reading config file {:?}", file);
      builder = builder.add_source(File::new(file.to_string_lossy().as_ref(), FileFormat::Ini).required(false));
    }

    let config = builder
      .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
      .build()?;

    config.try_deserialize().map_err(ConfigError::from)
  }

  /// Checks the required settings in order: API key, base URL, model.
  /// The first one that is missing or blank is reported.
  pub fn validate(self) -> Result<Settings, ConfigError> {
    let api_key = required(self.api_key, "GITIAX_API_KEY")?;
    let base_url = required(self.base_url, "GITIAX_BASE_URL")?;
    let model = required(self.model, "GITIAX_MODEL")?;

    check_base_url(&base_url)?;

    Ok(Settings {
      api_key,
      base_url,
      model,
      timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT)
    })
  }
}

impl Settings {
  pub fn load() -> Result<Self, ConfigError> {
    App::load()?.validate()
  }

  pub fn completions_url(&self) -> String {
    format!("{}{}", self.base_url.trim_end_matches('/'), COMPLETIONS_PATH)
  }
}

fn required(value: Option<String>, name: &'static str) -> Result<String, ConfigError> {
  value
    .map(|value| value.trim().to_string())
    .filter(|value| !value.is_empty())
    .ok_or(ConfigError::Missing(name))
}

fn check_base_url(base_url: &str) -> Result<(), ConfigError> {
  let invalid = |reason: String| ConfigError::InvalidBaseUrl { url: base_url.to_string(), reason };

  let url = Url::parse(base_url).map_err(|err| invalid(err.to_string()))?;
  match url.scheme() {
    "http" | "https" => Ok(()),
    scheme => Err(invalid(format!("unsupported scheme {:?}", scheme)))
  }
}
