use secrecy::SecretString;
use std::env;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Mongo,
}

impl StorageBackend {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "mongo" | "mongodb" => StorageBackend::Mongo,
            _ => StorageBackend::Memory,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub web_server_host: String,
    pub web_server_port: u16,
    pub storage_backend: StorageBackend,
    pub mongo_conn_string: String,
    pub mongo_db_name: String,
    pub llm_api_base: String,
    pub llm_api_key: Option<SecretString>,
    pub llm_model: String,
    pub max_content_length: usize,
    pub max_chunk_size: usize,
    pub retention_hours: i64,
    pub max_upload_bytes: usize,
    pub min_document_chars: usize,
    pub cors_allowed_origins: Vec<String>,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "127.0.0.1".to_string()),
            web_server_port: env_or("WEB_SERVER_PORT", 5000),
            storage_backend: StorageBackend::parse(
                &env::var("STORAGE_BACKEND").unwrap_or_default(),
            ),
            mongo_conn_string: env::var("MONGO_CONN_STRING")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            mongo_db_name: env::var("MONGO_DB_NAME").unwrap_or_else(|_| "quizgen-local".to_string()),
            llm_api_base: env::var("LLM_API_BASE")
                .unwrap_or_else(|_| "https://openrouter.ai/api/v1".to_string()),
            llm_api_key: env::var("LLM_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty())
                .map(SecretString::from),
            llm_model: env::var("LLM_MODEL")
                .unwrap_or_else(|_| "anthropic/claude-3.5-sonnet".to_string()),
            max_content_length: env_or("MAX_CONTENT_LENGTH", 500_000),
            max_chunk_size: env_or("MAX_CHUNK_SIZE", 12_000),
            retention_hours: env_or("RETENTION_HOURS", 6),
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", 15 * 1024 * 1024),
            min_document_chars: env_or("MIN_DOCUMENT_CHARS", 100),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:5173".to_string())
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
        }
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 5000,
            storage_backend: StorageBackend::Memory,
            mongo_conn_string: "mongodb://localhost:27017".to_string(),
            mongo_db_name: "quizgen-test".to_string(),
            llm_api_base: "http://localhost:9999/v1".to_string(),
            llm_api_key: Some(SecretString::from("test-key".to_string())),
            llm_model: "test-model".to_string(),
            max_content_length: 500_000,
            max_chunk_size: 8_000,
            retention_hours: 6,
            max_upload_bytes: 1024 * 1024,
            min_document_chars: 100,
            cors_allowed_origins: vec!["http://localhost:5173".to_string()],
        }
    }
}
