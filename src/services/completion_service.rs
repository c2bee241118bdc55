use serde::Deserialize;
use serde_json::json;
use std::{env, time::Duration};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
const TEMPERATURE: f64 = 0.7;
const MAX_TOKENS: u32 = 3000;

#[derive(Debug)]
pub enum CompletionError {
    MissingCredential(&'static str),
    RequestFailed(String),
    Api(String),
}

impl std::fmt::Display for CompletionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompletionError::MissingCredential(var) => {
                write!(f, "{} environment variable not set", var)
            }
            CompletionError::RequestFailed(err) => {
                write!(f, "Completion request failed: {}", err)
            }
            CompletionError::Api(err) => write!(f, "Completion API error: {}", err),
        }
    }
}

impl std::error::Error for CompletionError {}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionChoice {
    pub message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
pub struct CompletionMessage {
    pub content: Option<String>,
}

/// Thin wrapper over an OpenAI-compatible chat-completions endpoint. One
/// attempt per request; the caller decides what a failure means.
pub struct CompletionService {
    http_client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl CompletionService {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        Self::with_config(
            env::var("OPENAI_API_KEY").ok(),
            DEFAULT_BASE_URL.to_string(),
            env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
        )
    }

    pub fn with_config(
        api_key: Option<String>,
        base_url: String,
        model: String,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http_client,
            api_key,
            base_url,
            model,
        })
    }

    pub async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<ChatCompletionResponse, CompletionError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(CompletionError::MissingCredential("OPENAI_API_KEY"))?;

        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": user_prompt },
            ],
            "temperature": TEMPERATURE,
            "max_tokens": MAX_TOKENS,
        });

        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let response = self
            .http_client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| CompletionError::RequestFailed(err.to_string()))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|err| CompletionError::RequestFailed(err.to_string()))?;

        if !status.is_success() {
            return Err(CompletionError::Api(format!(
                "HTTP {}: {}",
                status, response_text
            )));
        }

        serde_json::from_str(&response_text).map_err(|err| {
            CompletionError::Api(format!(
                "Failed to parse completion response: {}. Response: {}",
                err, response_text
            ))
        })
    }
}
