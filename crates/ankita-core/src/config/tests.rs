use std::io::Write;

use serial_test::serial;

use super::*;

const ENV_KEYS: [&str; 16] = [
    "ANKITA_SERVER_BIND",
    "ANKITA_SERVER_PORT",
    "ANKITA_SERVER_MAX_BODY_SIZE",
    "ANKITA_SERVER_ERROR_STATUS",
    "ANKITA_INDEX_PATH",
    "ANKITA_EMBEDDING_PROVIDER",
    "ANKITA_EMBEDDING_MODEL",
    "ANKITA_EMBEDDING_DEVICES",
    "ANKITA_LLM_BASE_URL",
    "ANKITA_LLM_MODEL",
    "ANKITA_LLM_TEMPERATURE",
    "ANKITA_LLM_SEED",
    "ANKITA_LLM_VERIFY_MODEL",
    "ANKITA_LLM_WARMUP",
    "ANKITA_RETRIEVAL_K",
    "ANKITA_PROMPT_TEMPLATE",
];

fn clear_env() {
    for key in ENV_KEYS {
        unsafe { std::env::remove_var(key) };
    }
}

#[test]
fn defaults() {
    let config = Config::default();
    assert_eq!(config.server.bind, "0.0.0.0");
    assert_eq!(config.server.port, 8000);
    assert_eq!(config.server.max_body_size, 1_048_576);
    assert!(!config.server.error_status);
    assert_eq!(config.index.path, "./faiss_index_combined");
    assert_eq!(config.embedding.provider, EmbeddingProviderKind::Candle);
    assert_eq!(
        config.embedding.model,
        "sentence-transformers/all-MiniLM-L6-v2"
    );
    assert_eq!(config.embedding.devices, ["cuda:0", "cpu"]);
    assert_eq!(config.llm.base_url, "http://localhost:11434");
    assert_eq!(config.llm.model, "llama3");
    assert!(config.llm.temperature.is_none());
    assert!(config.llm.seed.is_none());
    assert!(config.llm.verify_model);
    assert!(!config.llm.warmup);
    assert_eq!(config.retrieval.k, 3);
    assert!(config.prompt.template.contains("{context}"));
    assert!(config.prompt.template.contains("{question}"));
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn load_missing_file_uses_defaults() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(config.server.port, 8000);
    assert_eq!(config.llm.model, "llama3");
}

#[test]
#[serial]
fn load_partial_file() {
    clear_env();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[server]
port = 9000
error_status = true

[llm]
model = "mistral:7b"
temperature = 0.0
seed = 42

[retrieval]
k = 5
"#
    )
    .unwrap();

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.server.port, 9000);
    assert_eq!(config.server.bind, "0.0.0.0");
    assert!(config.server.error_status);
    assert_eq!(config.llm.model, "mistral:7b");
    assert_eq!(config.llm.base_url, "http://localhost:11434");
    assert_eq!(config.llm.temperature, Some(0.0));
    assert_eq!(config.llm.seed, Some(42));
    assert_eq!(config.retrieval.k, 5);
    assert_eq!(config.index.path, "./faiss_index_combined");
}

#[test]
#[serial]
fn load_embedding_section() {
    clear_env();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[embedding]
provider = "ollama"
model = "nomic-embed-text"
devices = ["cpu"]
"#
    )
    .unwrap();

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.embedding.provider, EmbeddingProviderKind::Ollama);
    assert_eq!(config.embedding.model, "nomic-embed-text");
    assert_eq!(config.embedding.devices, ["cpu"]);
}

#[test]
#[serial]
fn load_rejects_malformed_toml() {
    clear_env();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "[server\nport = ").unwrap();
    let err = Config::load(file.path()).unwrap_err();
    assert!(err.to_string().contains("failed to parse config file"));
}

#[test]
#[serial]
fn load_rejects_unknown_provider() {
    clear_env();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "[embedding]\nprovider = \"faiss\"\n").unwrap();
    assert!(Config::load(file.path()).is_err());
}

#[test]
#[serial]
fn env_overrides() {
    clear_env();
    unsafe {
        std::env::set_var("ANKITA_SERVER_BIND", "127.0.0.1");
        std::env::set_var("ANKITA_SERVER_PORT", "8123");
        std::env::set_var("ANKITA_SERVER_ERROR_STATUS", "true");
        std::env::set_var("ANKITA_INDEX_PATH", "/srv/index");
        std::env::set_var("ANKITA_EMBEDDING_PROVIDER", "ollama");
        std::env::set_var("ANKITA_EMBEDDING_DEVICES", "metal, cpu");
        std::env::set_var("ANKITA_LLM_MODEL", "llama3:8b");
        std::env::set_var("ANKITA_LLM_TEMPERATURE", "0");
        std::env::set_var("ANKITA_LLM_SEED", "7");
        std::env::set_var("ANKITA_LLM_VERIFY_MODEL", "false");
        std::env::set_var("ANKITA_RETRIEVAL_K", "4");
    }

    let dir = tempfile::tempdir().unwrap();
    let config = Config::load(&dir.path().join("absent.toml")).unwrap();
    clear_env();

    assert_eq!(config.server.bind, "127.0.0.1");
    assert_eq!(config.server.port, 8123);
    assert!(config.server.error_status);
    assert_eq!(config.index.path, "/srv/index");
    assert_eq!(config.embedding.provider, EmbeddingProviderKind::Ollama);
    assert_eq!(config.embedding.devices, ["metal", "cpu"]);
    assert_eq!(config.llm.model, "llama3:8b");
    assert_eq!(config.llm.temperature, Some(0.0));
    assert_eq!(config.llm.seed, Some(7));
    assert!(!config.llm.verify_model);
    assert_eq!(config.retrieval.k, 4);
}

#[test]
#[serial]
fn env_overrides_file_values() {
    clear_env();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "[llm]\nmodel = \"from-file\"\n").unwrap();
    unsafe { std::env::set_var("ANKITA_LLM_MODEL", "from-env") };

    let config = Config::load(file.path()).unwrap();
    clear_env();
    assert_eq!(config.llm.model, "from-env");
}

#[test]
#[serial]
fn invalid_env_values_are_ignored() {
    clear_env();
    unsafe {
        std::env::set_var("ANKITA_SERVER_PORT", "eighty");
        std::env::set_var("ANKITA_RETRIEVAL_K", "-1");
        std::env::set_var("ANKITA_EMBEDDING_PROVIDER", "faiss");
        std::env::set_var("ANKITA_LLM_WARMUP", "sometimes");
    }

    let dir = tempfile::tempdir().unwrap();
    let config = Config::load(&dir.path().join("absent.toml")).unwrap();
    clear_env();

    assert_eq!(config.server.port, 8000);
    assert_eq!(config.retrieval.k, 3);
    assert_eq!(config.embedding.provider, EmbeddingProviderKind::Candle);
    assert!(!config.llm.warmup);
}

#[test]
fn validate_rejects_zero_k() {
    let mut config = Config::default();
    config.retrieval.k = 0;
    assert!(config.validate().unwrap_err().to_string().contains("retrieval.k"));
}

#[test]
fn validate_rejects_empty_devices() {
    let mut config = Config::default();
    config.embedding.devices.clear();
    assert!(
        config
            .validate()
            .unwrap_err()
            .to_string()
            .contains("embedding.devices")
    );
}

#[test]
fn validate_rejects_empty_models_and_path() {
    let mut config = Config::default();
    config.llm.model = "  ".into();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.embedding.model = String::new();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.index.path = String::new();
    assert!(config.validate().is_err());
}

#[test]
fn validate_rejects_unparseable_bind() {
    let mut config = Config::default();
    config.server.bind = "localhost:8000".into();
    let err = config.validate().unwrap_err().to_string();
    assert!(err.contains("server.bind"), "{err}");
}

#[test]
fn socket_addr_accepts_ipv6_unspecified() {
    let mut config = Config::default();
    config.server.bind = "::".into();
    config.server.port = 9000;
    assert!(config.validate().is_ok());
    assert_eq!(config.server.socket_addr().unwrap().to_string(), "[::]:9000");
}

#[test]
fn socket_addr_default() {
    let addr = Config::default().server.socket_addr().unwrap();
    assert_eq!(addr.to_string(), "0.0.0.0:8000");
}

#[test]
fn provider_kind_display() {
    assert_eq!(EmbeddingProviderKind::Candle.to_string(), "candle");
    assert_eq!(EmbeddingProviderKind::Ollama.to_string(), "ollama");
}

