use ollama_rs::Ollama;
use ollama_rs::generation::chat::ChatMessage;
use ollama_rs::generation::chat::request::ChatMessageRequest;
use ollama_rs::generation::embeddings::request::{EmbeddingsInput, GenerateEmbeddingsRequest};
use ollama_rs::models::ModelOptions;

use crate::error::LlmError;
use crate::provider::LlmProvider;

const DEFAULT_PORT: u16 = 11434;

#[derive(Debug, Clone)]
pub struct OllamaProvider {
    client: Ollama,
    model: String,
    embedding_model: String,
    temperature: Option<f32>,
    seed: Option<i32>,
}

impl OllamaProvider {
    #[must_use]
    pub fn new(base_url: &str, model: String, embedding_model: String) -> Self {
        let (host, port) = parse_host_port(base_url);
        Self {
            client: Ollama::new(host, port),
            model,
            embedding_model,
            temperature: None,
            seed: None,
        }
    }

    #[must_use]
    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: Option<i32>) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Check if Ollama is reachable.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection to Ollama fails.
    pub async fn health_check(&self) -> Result<(), LlmError> {
        self.client.list_local_models().await.map_err(|e| {
            LlmError::Unavailable(format!("failed to connect to Ollama, is it running? {e}"))
        })?;
        Ok(())
    }

    /// Verify that the generation model has been pulled into the local Ollama store.
    ///
    /// # Errors
    ///
    /// Returns an error if Ollama is unreachable or the model is not present.
    pub async fn ensure_model_available(&self) -> Result<(), LlmError> {
        let models = self.client.list_local_models().await.map_err(|e| {
            LlmError::Unavailable(format!("failed to list Ollama models: {e}"))
        })?;

        if models.iter().any(|m| model_matches(&m.name, &self.model)) {
            Ok(())
        } else {
            Err(LlmError::ModelNotFound {
                provider: "ollama",
                model: self.model.clone(),
            })
        }
    }

    /// Send a minimal chat request to force Ollama to load the model into memory.
    ///
    /// # Errors
    ///
    /// Returns an error if the warmup request fails.
    pub async fn warmup(&self) -> Result<(), LlmError> {
        let request =
            ChatMessageRequest::new(self.model.clone(), vec![ChatMessage::user("hi".to_owned())]);
        self.client
            .send_chat_messages(request)
            .await
            .map_err(|e| LlmError::Other(format!("Ollama warmup failed: {e}")))?;
        Ok(())
    }

    fn model_options(&self) -> Option<ModelOptions> {
        if self.temperature.is_none() && self.seed.is_none() {
            return None;
        }
        let mut options = ModelOptions::default();
        if let Some(temperature) = self.temperature {
            options = options.temperature(temperature);
        }
        if let Some(seed) = self.seed {
            options = options.seed(seed);
        }
        Some(options)
    }
}

impl LlmProvider for OllamaProvider {
    async fn chat(&self, prompt: &str) -> Result<String, LlmError> {
        let mut request = ChatMessageRequest::new(
            self.model.clone(),
            vec![ChatMessage::user(prompt.to_owned())],
        );
        if let Some(options) = self.model_options() {
            request = request.options(options);
        }

        let response = self
            .client
            .send_chat_messages(request)
            .await
            .map_err(|e| LlmError::Other(format!("Ollama chat request failed: {e}")))?;

        Ok(response.message.content)
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        let request = GenerateEmbeddingsRequest::new(
            self.embedding_model.clone(),
            EmbeddingsInput::from(text),
        );

        let response = self
            .client
            .generate_embeddings(request)
            .await
            .map_err(|e| LlmError::Other(format!("Ollama embedding request failed: {e}")))?;

        response
            .embeddings
            .into_iter()
            .next()
            .ok_or(LlmError::EmptyResponse { provider: "ollama" })
    }

    fn supports_embeddings(&self) -> bool {
        !self.embedding_model.is_empty()
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "ollama"
    }
}

/// `llama3` matches a local `llama3:latest`; an explicit tag must match exactly.
fn model_matches(local: &str, wanted: &str) -> bool {
    local == wanted
        || local
            .strip_prefix(wanted)
            .is_some_and(|rest| rest.starts_with(':') && !wanted.contains(':'))
}

fn parse_host_port(url: &str) -> (String, u16) {
    let url = url.trim_end_matches('/');
    if let Some(colon_pos) = url.rfind(':') {
        let port_str = &url[colon_pos + 1..];
        if let Ok(port) = port_str.parse::<u16>() {
            let host = url[..colon_pos].to_string();
            return (host, port);
        }
    }
    (url.to_string(), DEFAULT_PORT)
}
