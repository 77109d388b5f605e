//! Startup initializer: embedding backend, index, generation backend, composed chain.

use std::path::PathBuf;
use std::sync::Arc;

use ankita_llm::any::AnyProvider;
use ankita_llm::device::{DeviceKind, parse_candidates};
use ankita_llm::ollama::OllamaProvider;
use ankita_llm::provider::LlmProvider;
use ankita_memory::{IndexError, VectorStore, load_index};

use crate::chain::{AnswerChain, RetrievalQa};
use crate::config::{Config, EmbeddingProviderKind, LlmConfig};
use crate::error::InitError;
use crate::prompt::PromptTemplate;
use crate::retriever::Retriever;

const PROBE_TEXT: &str = "dimension probe";

/// Build the chain every request is answered with.
///
/// # Errors
///
/// Returns the first step that fails; nothing is retried.
pub async fn bootstrap(config: &Config) -> Result<Arc<dyn AnswerChain>, InitError> {
    let embedder = Arc::new(acquire_embedder(config).await?);
    let store = acquire_index(config, embedder.as_ref()).await?;
    let generator = Arc::new(acquire_generator(&config.llm).await?);
    compose(config, embedder, store, generator)
}

/// Load the embedding backend on the first configured device that works.
///
/// # Errors
///
/// Returns [`InitError::EmbeddingUnavailable`] with every failed attempt when
/// no device can host the model.
pub async fn acquire_embedder(config: &Config) -> Result<AnyProvider, InitError> {
    let candidates =
        parse_candidates(&config.embedding.devices).map_err(|e| InitError::Config(e.to_string()))?;
    tracing::info!(
        provider = %config.embedding.provider,
        model = %config.embedding.model,
        "loading embedding model"
    );

    match config.embedding.provider {
        EmbeddingProviderKind::Candle => acquire_candle(&config.embedding.model, candidates).await,
        EmbeddingProviderKind::Ollama => {
            if candidates.iter().any(|d| d.is_accelerated()) {
                tracing::info!("ollama embeddings run on the Ollama host, device candidates ignored");
            }
            let provider = OllamaProvider::new(
                &config.llm.base_url,
                config.llm.model.clone(),
                config.embedding.model.clone(),
            );
            provider.health_check().await.map_err(InitError::Embedding)?;
            tracing::info!(backend = provider.name(), "embedding backend ready");
            Ok(AnyProvider::Ollama(provider))
        }
    }
}

#[cfg(feature = "candle")]
async fn acquire_candle(
    model: &str,
    candidates: Vec<DeviceKind>,
) -> Result<AnyProvider, InitError> {
    use ankita_llm::candle_provider::CandleEmbedder;
    use ankita_llm::device::acquire_on_first;

    let model = model.to_owned();
    let (embedder, device) = tokio::task::spawn_blocking(move || {
        acquire_on_first(&candidates, |device| CandleEmbedder::load(&model, device))
    })
    .await
    .map_err(|e| InitError::Task(e.to_string()))?
    .map_err(|attempts| InitError::EmbeddingUnavailable { attempts })?;

    tracing::info!(
        backend = embedder.name(),
        %device,
        dimension = embedder.dimension(),
        "embedding backend ready"
    );
    Ok(AnyProvider::Candle(embedder))
}

#[cfg(not(feature = "candle"))]
#[allow(clippy::unused_async)]
async fn acquire_candle(
    _model: &str,
    _candidates: Vec<DeviceKind>,
) -> Result<AnyProvider, InitError> {
    Err(InitError::Config(
        "embedding.provider = \"candle\" requires building with the `candle` feature".into(),
    ))
}

/// Load the persisted index and check it against the embedding backend.
///
/// # Errors
///
/// Fails when the snapshot cannot be loaded, when the probe embedding fails,
/// or when its dimension differs from the index.
pub async fn acquire_index<E: LlmProvider>(
    config: &Config,
    embedder: &E,
) -> Result<Arc<dyn VectorStore>, InitError> {
    let path = PathBuf::from(&config.index.path);
    tracing::info!(path = %path.display(), "loading vector index");

    let loaded = tokio::task::spawn_blocking(move || load_index(&path))
        .await
        .map_err(|e| InitError::Task(e.to_string()))??;

    if let Some(recorded) = loaded.embedding_model.as_deref()
        && recorded != config.embedding.model
    {
        tracing::warn!(
            index_model = recorded,
            configured_model = %config.embedding.model,
            "index was built with a different embedding model"
        );
    }

    let probe = embedder.embed(PROBE_TEXT).await.map_err(InitError::Embedding)?;
    loaded.check_dimension(probe.len())?;

    tracing::info!(
        path = %loaded.path.display(),
        documents = loaded.store.len(),
        dimension = loaded.dimension,
        "vector index ready"
    );
    Ok(Arc::new(loaded.store))
}

/// Connect to Ollama and make sure the generation model can serve requests.
///
/// # Errors
///
/// Returns [`InitError::Generation`] when Ollama is unreachable, the model is
/// not pulled (unless `verify_model` is off), or warmup fails.
pub async fn acquire_generator(llm: &LlmConfig) -> Result<OllamaProvider, InitError> {
    tracing::info!(
        base_url = %llm.base_url,
        model = %llm.model,
        "connecting to generation backend"
    );
    let provider = OllamaProvider::new(&llm.base_url, llm.model.clone(), String::new())
        .with_temperature(llm.temperature)
        .with_seed(llm.seed);

    provider.health_check().await.map_err(InitError::Generation)?;
    if llm.verify_model {
        provider
            .ensure_model_available()
            .await
            .map_err(InitError::Generation)?;
    } else {
        tracing::info!("skipping model availability check");
    }
    if llm.warmup {
        provider.warmup().await.map_err(InitError::Generation)?;
        tracing::info!("generation model warmed up");
    }

    tracing::info!(model = provider.model(), "generation backend ready");
    Ok(provider)
}

/// Wire retriever, template and generator into one chain.
///
/// # Errors
///
/// Returns [`InitError::Template`] when the configured template is invalid,
/// [`InitError::Unsupported`] when a backend lacks the capability its role
/// needs, and [`IndexError::Empty`] when the store holds no passages.
pub fn compose<E, G>(
    config: &Config,
    embedder: Arc<E>,
    store: Arc<dyn VectorStore>,
    generator: Arc<G>,
) -> Result<Arc<dyn AnswerChain>, InitError>
where
    E: LlmProvider + 'static,
    G: LlmProvider + 'static,
{
    let template = PromptTemplate::parse(&config.prompt.template)?;
    if !embedder.supports_embeddings() {
        return Err(InitError::Unsupported {
            backend: embedder.name().to_owned(),
            capability: "embeddings",
        });
    }
    if !generator.supports_chat() {
        return Err(InitError::Unsupported {
            backend: generator.name().to_owned(),
            capability: "generation",
        });
    }
    if store.is_empty() {
        return Err(IndexError::Empty(PathBuf::from(&config.index.path)).into());
    }

    tracing::info!(
        embedder = embedder.name(),
        generator = generator.name(),
        k = config.retrieval.k,
        "retrieval chain composed"
    );
    let retriever = Retriever::new(embedder, store, config.retrieval.k);
    Ok(Arc::new(RetrievalQa::new(retriever, template, generator)))
}
