//! Ollama client: the single entry point for all model calls in Skillscope.
//!
//! No other module talks to the inference server directly. Orchestrators
//! depend on the [`TextGenerator`] trait and receive the concrete
//! [`OllamaClient`] through `AppState`; tests substitute scripted fakes.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Deadline for a single generation call. Local inference on modest hardware
/// can take minutes for long completions.
const GENERATE_TIMEOUT: Duration = Duration::from_secs(300);

/// Deadline for the `/api/tags` reachability probe used by the health
/// endpoint. A probe must answer fast or the backend counts as down.
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum OllamaError {
    #[error("request to Ollama timed out")]
    Timeout,

    #[error("cannot reach Ollama: {0}")]
    Unreachable(String),

    #[error("Ollama returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("unreadable Ollama response: {0}")]
    Decode(String),

    #[error("Ollama transport error: {0}")]
    Transport(reqwest::Error),
}

/// Decoding options forwarded verbatim in the request's `options` object.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct GenerateOptions {
    pub temperature: f32,
    pub num_predict: u32,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Seam between the orchestrators and the inference backend.
///
/// Carried as `&dyn TextGenerator` at call sites so pipeline logic can be
/// tested against scripted completions without a running server.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Sends one prompt and returns the completion text, trimmed.
    async fn generate(&self, prompt: &str, options: GenerateOptions)
        -> Result<String, OllamaError>;
}

/// HTTP client for an Ollama-compatible server.
#[derive(Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(base_url: String, model: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(GENERATE_TIMEOUT)
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        }
    }

    /// Probes `GET /api/tags`. Succeeds iff the server answers with a
    /// success status within the probe deadline.
    pub async fn check_reachable(&self) -> Result<(), OllamaError> {
        let response = self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(OllamaError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            })
        }
    }

    fn map_request_error(&self, err: reqwest::Error) -> OllamaError {
        if err.is_timeout() {
            OllamaError::Timeout
        } else if err.is_connect() {
            OllamaError::Unreachable(format!(
                "{err} (is Ollama running at {}?)",
                self.base_url
            ))
        } else if err.is_decode() {
            OllamaError::Decode(err.to_string())
        } else {
            OllamaError::Transport(err)
        }
    }
}

#[async_trait]
impl TextGenerator for OllamaClient {
    async fn generate(
        &self,
        prompt: &str,
        options: GenerateOptions,
    ) -> Result<String, OllamaError> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options,
        };

        debug!(
            "Ollama generate: model={}, temperature={}, num_predict={}, prompt_len={}",
            self.model,
            options.temperature,
            options.num_predict,
            prompt.len()
        );

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(OllamaError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| self.map_request_error(e))?;

        debug!("Ollama completion received ({} bytes)", body.response.len());

        Ok(body.response.trim().to_string())
    }
}
