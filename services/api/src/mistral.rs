use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use chartbot_common::error::{ChartbotError, ChartbotResult};
use chartbot_engine::LlmResolver;

#[derive(Debug, Clone)]
pub struct MistralConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl MistralConfig {
    /// Load Mistral config from environment.
    ///
    /// Returns `Ok(None)` if `MISTRAL_API_KEY` is missing: the service still
    /// runs, keyword-resolvable questions work, and only questions that need
    /// the model fail.
    pub fn from_env() -> Result<Option<Self>, String> {
        let api_key = match std::env::var("MISTRAL_API_KEY").ok() {
            Some(v) => v,
            None => return Ok(None),
        };
        let base_url = std::env::var("MISTRAL_BASE_URL")
            .ok()
            .unwrap_or_else(|| "https://api.mistral.ai".to_string());
        let model = std::env::var("MISTRAL_MODEL")
            .ok()
            .unwrap_or_else(|| "mistral-large-latest".to_string());
        let timeout_secs = std::env::var("MISTRAL_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        Ok(Some(Self {
            base_url,
            api_key,
            model,
            timeout_secs,
        }))
    }
}

#[derive(Clone)]
pub struct MistralClient {
    client: Client,
    config: Option<MistralConfig>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

impl MistralClient {
    pub fn new(config: Option<MistralConfig>) -> Result<Self, reqwest::Error> {
        let timeout = config.as_ref().map(|c| c.timeout_secs).unwrap_or(30);
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()?;
        Ok(Self { client, config })
    }

    /// For testing: point the client at a specific base URL (e.g., wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        if let Some(config) = self.config.as_mut() {
            config.base_url = base_url.to_string();
        }
        self
    }
}

#[async_trait]
impl LlmResolver for MistralClient {
    async fn invoke(&self, prompt: &str) -> ChartbotResult<String> {
        let Some(config) = &self.config else {
            return Err(ChartbotError::Llm(
                "MISTRAL_API_KEY is not set".to_string(),
            ));
        };

        let url = format!("{}/v1/chat/completions", config.base_url);
        let body = serde_json::json!({
            "model": config.model,
            "messages": [{ "role": "user", "content": prompt }],
            "temperature": 0.1,
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ChartbotError::Llm(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChartbotError::Llm(format!("HTTP {status}: {body}")));
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|e| ChartbotError::Llm(format!("invalid response body: {e}")))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ChartbotError::Llm("response contained no choices".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config() -> MistralConfig {
        MistralConfig {
            base_url: String::new(),
            api_key: "test-key".to_string(),
            model: "mistral-large-latest".to_string(),
            timeout_secs: 5,
        }
    }

    #[tokio::test]
    async fn invoke_extracts_the_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [
                    { "message": { "role": "assistant", "content": "{\"groupby\": \"projet\"}" } }
                ]
            })))
            .mount(&server)
            .await;

        let client = MistralClient::new(Some(test_config()))
            .unwrap()
            .with_base_url(&server.uri());
        let out = client.invoke("question").await.unwrap();
        assert_eq!(out, "{\"groupby\": \"projet\"}");
    }

    #[tokio::test]
    async fn invoke_surfaces_http_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = MistralClient::new(Some(test_config()))
            .unwrap()
            .with_base_url(&server.uri());
        let err = client.invoke("question").await.unwrap_err();
        assert!(matches!(err, ChartbotError::Llm(_)));
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn invoke_fails_cleanly_when_unconfigured() {
        let client = MistralClient::new(None).unwrap();
        let err = client.invoke("question").await.unwrap_err();
        assert!(err.to_string().contains("MISTRAL_API_KEY"));
    }

    #[tokio::test]
    async fn empty_choices_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "choices": [] })),
            )
            .mount(&server)
            .await;

        let client = MistralClient::new(Some(test_config()))
            .unwrap()
            .with_base_url(&server.uri());
        let err = client.invoke("question").await.unwrap_err();
        assert!(err.to_string().contains("no choices"));
    }
}
