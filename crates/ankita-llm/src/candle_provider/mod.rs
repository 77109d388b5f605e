pub mod embed;

pub use candle_core::Device;

use std::sync::Arc;

use self::embed::EmbedModel;
use crate::device::DeviceKind;
use crate::error::LlmError;
use crate::provider::LlmProvider;

const PROBE_TEXT: &str = "device probe";

/// Open the candle device described by `kind`.
///
/// # Errors
///
/// Returns [`LlmError::DeviceUnavailable`] if the device is absent, busy, or
/// the crate was compiled without its backend.
pub fn open_device(kind: DeviceKind) -> Result<Device, LlmError> {
    let opened = match kind {
        DeviceKind::Cpu => return Ok(Device::Cpu),
        DeviceKind::Cuda(ordinal) => Device::new_cuda(ordinal),
        DeviceKind::Metal(ordinal) => Device::new_metal(ordinal),
    };
    opened.map_err(|e| LlmError::DeviceUnavailable {
        device: kind.to_string(),
        reason: e.to_string(),
    })
}

/// In-process sentence embedder. Generation is not supported.
#[derive(Clone)]
pub struct CandleEmbedder {
    model: Arc<EmbedModel>,
    device: DeviceKind,
    dimension: usize,
}

impl std::fmt::Debug for CandleEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CandleEmbedder")
            .field("device", &self.device)
            .field("dimension", &self.dimension)
            .finish_non_exhaustive()
    }
}

impl CandleEmbedder {
    /// Load `repo_id` on `device` and run one forward pass.
    ///
    /// The probe surfaces allocation failures that only show up once tensors
    /// are materialized, so callers can fall back to another device.
    ///
    /// # Errors
    ///
    /// Returns an error if the device cannot be opened, the model cannot be
    /// loaded, or the probe forward pass fails.
    pub fn load(repo_id: &str, device: DeviceKind) -> Result<Self, LlmError> {
        let candle_device = open_device(device)?;
        let model = EmbedModel::load(repo_id, &candle_device)?;
        let probe = model.embed_sync(PROBE_TEXT).map_err(|e| LlmError::DeviceUnavailable {
            device: device.to_string(),
            reason: format!("probe forward pass failed: {e}"),
        })?;

        tracing::info!(%device, dimension = probe.len(), "loaded embedding model {repo_id}");

        Ok(Self {
            model: Arc::new(model),
            device,
            dimension: probe.len(),
        })
    }

    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }
}

impl LlmProvider for CandleEmbedder {
    async fn chat(&self, _prompt: &str) -> Result<String, LlmError> {
        Err(LlmError::ChatUnsupported { provider: "candle" })
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        let model = Arc::clone(&self.model);
        let text = text.to_owned();
        tokio::task::spawn_blocking(move || model.embed_sync(&text))
            .await
            .map_err(|e| LlmError::Inference(format!("candle embedding task failed: {e}")))?
    }

    fn supports_embeddings(&self) -> bool {
        true
    }

    fn supports_chat(&self) -> bool {
        false
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "candle"
    }
}
