use anyhow::Result;
use async_trait::async_trait;

pub mod models;
pub mod ollama;

pub use models::{ChatMessage, SamplingOptions};
pub use ollama::{OllamaClient, OllamaConfig};

/// One sampling call to the generation backend. Implementations are
/// request/response black boxes; everything downstream depends only on the
/// completion text they return.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        options: &SamplingOptions,
    ) -> Result<String>;
}
