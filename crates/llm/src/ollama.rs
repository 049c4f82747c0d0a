use crate::models::{ChatMessage, SamplingOptions};
use crate::Generator;
use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct OllamaConfig {
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "llama3.1:8b".to_string(),
            timeout_secs: 60,
            max_retries: 1,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    stream: bool,
    options: &'a SamplingOptions,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatMessage,
}

/// Chat client for a local Ollama server. One request per `generate` call,
/// no streaming.
pub struct OllamaClient {
    client: reqwest::Client,
    config: OllamaConfig,
}

impl OllamaClient {
    pub fn new(config: OllamaConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, config })
    }

    async fn try_chat(&self, messages: &[ChatMessage], options: &SamplingOptions) -> Result<String> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: messages.to_vec(),
            stream: false,
            options,
        };

        let url = format!("{}/api/chat", self.config.base_url.trim_end_matches('/'));
        info!("Sending chat request to {} (model {})", url, self.config.model);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .context("Failed to reach generation backend")?
            .error_for_status()
            .context("Generation backend returned an error status")?;

        let body: ChatResponse = response
            .json()
            .await
            .context("Failed to decode generation backend response")?;

        Ok(body.message.content)
    }
}

#[async_trait]
impl Generator for OllamaClient {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        options: &SamplingOptions,
    ) -> Result<String> {
        let messages = vec![
            ChatMessage::system(system_prompt.to_string()),
            ChatMessage::user(user_prompt.to_string()),
        ];

        let mut attempt = 0;
        let mut last_error = None;

        while attempt <= self.config.max_retries {
            match self.try_chat(&messages, options).await {
                Ok(content) => return Ok(content),
                Err(e) => {
                    error!("Generation attempt {} failed: {e:#}", attempt + 1);
                    last_error = Some(e);
                    attempt += 1;

                    if attempt <= self.config.max_retries {
                        let delay = Duration::from_millis(1000 * (2_u64.pow(attempt - 1)));
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        Err(last_error.expect("at least one attempt was made"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn should_provide_local_defaults() {
        let config = OllamaConfig::default();
        assert_eq!(config.base_url, "http://localhost:11434");
        assert_eq!(config.model, "llama3.1:8b");
        assert_eq!(config.max_retries, 1);
    }

    #[test]
    fn should_serialize_chat_request_wire_shape() {
        let options = SamplingOptions::with_temperature(1.0);
        let request = ChatRequest {
            model: "llama3.1:8b",
            messages: vec![ChatMessage::user("hi".to_string())],
            stream: false,
            options: &options,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "llama3.1:8b");
        assert_eq!(value["stream"], json!(false));
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["options"]["temperature"], json!(1.0));
    }

    #[test]
    fn should_deserialize_chat_response() {
        let body = r#"{
            "model": "llama3.1:8b",
            "message": {"role": "assistant", "content": "Answer: 25"},
            "done": true
        }"#;

        let response: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.message.role, "assistant");
        assert_eq!(response.message.content, "Answer: 25");
    }

    #[test]
    fn should_build_client_from_config() {
        let client = OllamaClient::new(OllamaConfig::default());
        assert!(client.is_ok());
    }
}
