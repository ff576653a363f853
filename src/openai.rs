use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use reqwest::StatusCode;
use log::debug;

use crate::config::Settings;
use crate::error::GatewayError;

/// Anything that turns a system/user prompt pair into generated text.
#[async_trait]
pub trait Completion {
  async fn complete(&self, system: &str, user: &str) -> Result<String, GatewayError>;
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
struct ChatMessage {
  role:    String,
  content: String
}

impl ChatMessage {
  fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
    Self { role: role.into(), content: content.into() }
  }
}

#[derive(Serialize, Debug)]
struct Request<'a> {
  model:    &'a str,
  messages: Vec<ChatMessage>
}

mod response {
  use super::*;

  #[derive(Debug, Deserialize)]
  pub struct Success {
    #[serde(default)]
    pub choices: Option<Vec<Choice>>
  }

  #[derive(Debug, Deserialize)]
  pub struct Choice {
    pub message: Message
  }

  #[derive(Debug, Deserialize)]
  pub struct Message {
    #[serde(default)]
    pub content: Option<String>
  }
}

/// Maps a raw HTTP status and body onto the completion text.
///
/// Any non-2xx status is reported with its body untouched. A body that is not
/// JSON fails to decode, while a body without choices (or whose first choice
/// carries no content) is reported as [`GatewayError::NoChoices`].
pub fn parse_response(status: StatusCode, body: &str) -> Result<String, GatewayError> {
  if !status.is_success() {
    return Err(GatewayError::BadStatus { status: status.as_u16(), body: body.to_string() });
  }

  let success: response::Success = serde_json::from_str(body)?;

  success
    .choices
    .and_then(|choices| choices.into_iter().next())
    .and_then(|choice| choice.message.content)
    .ok_or(GatewayError::NoChoices)
}

/// Chat-completions client for any OpenAI-compatible endpoint.
pub struct Client {
  http:     reqwest::Client,
  url:      String,
  api_key:  String,
  model:    String
}

impl Client {
  pub fn new(settings: &Settings) -> Result<Self, GatewayError> {
    let http = reqwest::Client::builder()
      .timeout(Duration::from_secs(settings.timeout))
      .build()?;

    Ok(Self {
      http,
      url: settings.completions_url(),
      api_key: settings.api_key.clone(),
      model: settings.model.clone()
    })
  }
}

#[async_trait]
impl Completion for Client {
  async fn complete(&self, system: &str, user: &str) -> Result<String, GatewayError> {
    let request = Request {
      model:    &self.model,
      messages: vec![ChatMessage::new("system", system), ChatMessage::new("user", user)]
    };

    debug!("[openai] POST {} (model {})", self.url, self.model);

    let response = self
      .http
      .post(&self.url)
      .bearer_auth(&self.api_key)
      .json(&request)
      .send()
      .await?;

    let status = response.status();
    let body = response.text().await?;
    debug!("[openai] Status {} ({} bytes)", status, body.len());

    parse_response(status, &body)
  }
}
