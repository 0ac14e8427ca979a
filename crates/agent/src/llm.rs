use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};
use tracing::{debug, warn};

use supplybot_core::config::LlmConfig;

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Client for the Hugging Face hosted text-generation endpoint.
///
/// Sends `POST {base_url}/{model}` with a bearer token. Generation length is
/// capped by `max_new_tokens` and the whole request by the client timeout.
/// Failures are returned to the caller without retrying.
pub struct HuggingFaceClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: SecretString,
    max_new_tokens: u32,
}

impl HuggingFaceClient {
    pub fn new(
        base_url: &str,
        model: &str,
        api_key: SecretString,
        timeout: Duration,
        max_new_tokens: u32,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build text-generation HTTP client")?;

        Ok(Self {
            http,
            endpoint: format!("{}/{}", base_url.trim_end_matches('/'), model),
            api_key,
            max_new_tokens,
        })
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| anyhow!("llm.api_key is required to call the text-generation service"))?;

        Self::new(
            &config.base_url,
            &config.model,
            api_key,
            Duration::from_secs(config.timeout_secs),
            config.max_new_tokens,
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl LlmClient for HuggingFaceClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        debug!(
            event_name = "agent.llm.request",
            endpoint = %self.endpoint,
            max_new_tokens = self.max_new_tokens,
            prompt_chars = prompt.len(),
            "sending text-generation request"
        );

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose_secret())
            .json(&request_body(prompt, self.max_new_tokens))
            .send()
            .await
            .with_context(|| format!("text-generation request to {} failed", self.endpoint))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            warn!(
                event_name = "agent.llm.http_error",
                status = status.as_u16(),
                "text-generation service returned an error status"
            );
            bail!("text-generation service returned {}: {}", status, error_message(&body_text));
        }

        let json: Value =
            response.json().await.context("failed to decode text-generation response")?;
        parse_generation(&json)
    }
}

fn request_body(prompt: &str, max_new_tokens: u32) -> Value {
    json!({
        "inputs": prompt,
        "parameters": {
            "max_new_tokens": max_new_tokens,
            "return_full_text": false,
        },
    })
}

/// Extracts `generated_text` from either the list or the single-object
/// response shape. An `error` field is surfaced as a failure.
fn parse_generation(json: &Value) -> Result<String> {
    if let Some(error) = json.get("error").and_then(Value::as_str) {
        bail!("text-generation service error: {error}");
    }

    let item = match json {
        Value::Array(items) => {
            items.first().ok_or_else(|| anyhow!("text-generation response was empty"))?
        }
        other => other,
    };

    item.get("generated_text")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| anyhow!("text-generation response is missing generated_text"))
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| json.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}
