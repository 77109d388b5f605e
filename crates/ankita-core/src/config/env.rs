use std::str::FromStr;

use super::Config;

fn parsed<T: FromStr>(key: &str) -> Option<T> {
    let v = std::env::var(key).ok()?;
    if let Ok(parsed) = v.trim().parse::<T>() {
        Some(parsed)
    } else {
        tracing::warn!("ignoring invalid {key} value: {v}");
        None
    }
}

impl Config {
    pub(crate) fn apply_env_overrides(&mut self) {
        self.apply_env_overrides_server();
        self.apply_env_overrides_pipeline();
    }

    fn apply_env_overrides_server(&mut self) {
        if let Ok(v) = std::env::var("ANKITA_SERVER_BIND") {
            self.server.bind = v;
        }
        if let Some(port) = parsed::<u16>("ANKITA_SERVER_PORT") {
            self.server.port = port;
        }
        if let Some(bytes) = parsed::<usize>("ANKITA_SERVER_MAX_BODY_SIZE") {
            self.server.max_body_size = bytes;
        }
        if let Some(enabled) = parsed::<bool>("ANKITA_SERVER_ERROR_STATUS") {
            self.server.error_status = enabled;
        }
    }

    fn apply_env_overrides_pipeline(&mut self) {
        if let Ok(v) = std::env::var("ANKITA_INDEX_PATH") {
            self.index.path = v;
        }
        if let Ok(v) = std::env::var("ANKITA_EMBEDDING_PROVIDER") {
            if let Ok(kind) = serde_json::from_value(serde_json::Value::String(v.clone())) {
                self.embedding.provider = kind;
            } else {
                tracing::warn!("ignoring invalid ANKITA_EMBEDDING_PROVIDER value: {v}");
            }
        }
        if let Ok(v) = std::env::var("ANKITA_EMBEDDING_MODEL") {
            self.embedding.model = v;
        }
        if let Ok(v) = std::env::var("ANKITA_EMBEDDING_DEVICES") {
            self.embedding.devices = v
                .split(',')
                .map(|s| s.trim().to_owned())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Ok(v) = std::env::var("ANKITA_LLM_BASE_URL") {
            self.llm.base_url = v;
        }
        if let Ok(v) = std::env::var("ANKITA_LLM_MODEL") {
            self.llm.model = v;
        }
        if let Some(t) = parsed::<f32>("ANKITA_LLM_TEMPERATURE") {
            self.llm.temperature = Some(t);
        }
        if let Some(seed) = parsed::<i32>("ANKITA_LLM_SEED") {
            self.llm.seed = Some(seed);
        }
        if let Some(verify) = parsed::<bool>("ANKITA_LLM_VERIFY_MODEL") {
            self.llm.verify_model = verify;
        }
        if let Some(warmup) = parsed::<bool>("ANKITA_LLM_WARMUP") {
            self.llm.warmup = warmup;
        }
        if let Some(k) = parsed::<usize>("ANKITA_RETRIEVAL_K") {
            self.retrieval.k = k;
        }
        if let Ok(v) = std::env::var("ANKITA_PROMPT_TEMPLATE") {
            self.prompt.template = v;
        }
    }
}
