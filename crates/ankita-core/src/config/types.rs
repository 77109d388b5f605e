use serde::{Deserialize, Serialize};

pub const DEFAULT_TEMPLATE: &str = "You are Ankita, an experienced and friendly AI physiotherapy assistant.
Based on the following documents and knowledge, answer the question clearly and concisely.

Context:
{context}

Question:
{question}

Helpful Answer with supporting sources:";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub prompt: PromptConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_bind")]
    pub bind: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_server_max_body")]
    pub max_body_size: usize,
    /// Report query failures with 500/502 instead of 200.
    #[serde(default)]
    pub error_status: bool,
}

fn default_server_bind() -> String {
    "0.0.0.0".into()
}

fn default_server_port() -> u16 {
    8000
}

fn default_server_max_body() -> usize {
    1_048_576
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_server_bind(),
            port: default_server_port(),
            max_body_size: default_server_max_body(),
            error_status: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexConfig {
    /// Directory holding the persisted index snapshot.
    #[serde(default = "default_index_path")]
    pub path: String,
}

fn default_index_path() -> String {
    "./faiss_index_combined".into()
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            path: default_index_path(),
        }
    }
}

/// Embedding backend selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProviderKind {
    Candle,
    Ollama,
}

impl EmbeddingProviderKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Candle => "candle",
            Self::Ollama => "ollama",
        }
    }
}

impl std::fmt::Display for EmbeddingProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmbeddingConfig {
    #[serde(default = "default_embedding_provider")]
    pub provider: EmbeddingProviderKind,
    /// Hugging Face repo id for candle, model name for Ollama.
    #[serde(default = "default_embedding_model")]
    pub model: String,
    /// Devices tried in order until one loads the model.
    #[serde(default = "default_embedding_devices")]
    pub devices: Vec<String>,
}

fn default_embedding_provider() -> EmbeddingProviderKind {
    EmbeddingProviderKind::Candle
}

fn default_embedding_model() -> String {
    "sentence-transformers/all-MiniLM-L6-v2".into()
}

fn default_embedding_devices() -> Vec<String> {
    vec!["cuda:0".into(), "cpu".into()]
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_embedding_provider(),
            model: default_embedding_model(),
            devices: default_embedding_devices(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<i32>,
    #[serde(default = "default_true")]
    pub verify_model: bool,
    #[serde(default)]
    pub warmup: bool,
}

fn default_llm_base_url() -> String {
    "http://localhost:11434".into()
}

fn default_llm_model() -> String {
    "llama3".into()
}

fn default_true() -> bool {
    true
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_llm_base_url(),
            model: default_llm_model(),
            temperature: None,
            seed: None,
            verify_model: true,
            warmup: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetrievalConfig {
    #[serde(default = "default_retrieval_k")]
    pub k: usize,
}

fn default_retrieval_k() -> usize {
    3
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            k: default_retrieval_k(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PromptConfig {
    #[serde(default = "default_prompt_template")]
    pub template: String,
}

fn default_prompt_template() -> String {
    DEFAULT_TEMPLATE.into()
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            template: default_prompt_template(),
        }
    }
}
