#[cfg(feature = "candle")]
use crate::candle_provider::CandleEmbedder;
use crate::ollama::OllamaProvider;

use crate::provider::LlmProvider;

/// Generates a match over all `AnyProvider` variants, binding the inner provider
/// and evaluating the given closure for each arm.
macro_rules! delegate_provider {
    ($self:expr, |$p:ident| $expr:expr) => {
        match $self {
            AnyProvider::Ollama($p) => $expr,
            #[cfg(feature = "candle")]
            AnyProvider::Candle($p) => $expr,
        }
    };
}

#[derive(Debug, Clone)]
pub enum AnyProvider {
    Ollama(OllamaProvider),
    #[cfg(feature = "candle")]
    Candle(CandleEmbedder),
}

impl LlmProvider for AnyProvider {
    async fn chat(&self, prompt: &str) -> Result<String, crate::LlmError> {
        delegate_provider!(self, |p| p.chat(prompt).await)
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, crate::LlmError> {
        delegate_provider!(self, |p| p.embed(text).await)
    }

    fn supports_embeddings(&self) -> bool {
        delegate_provider!(self, |p| p.supports_embeddings())
    }

    fn supports_chat(&self) -> bool {
        delegate_provider!(self, |p| p.supports_chat())
    }

    fn name(&self) -> &str {
        delegate_provider!(self, |p| p.name())
    }
}
