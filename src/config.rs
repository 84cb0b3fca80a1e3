use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;
use thiserror::Error;

const DEFAULT_ELASTICSEARCH_URL: &str = "http://localhost:9200";
const DEFAULT_INDEX: &str = "articles";
const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_OLLAMA_MODEL: &str = "llama3";
const DEFAULT_WORKSHEET: &str = "Sheet1";
const DEFAULT_SHEETS_API_URL: &str = "https://sheets.googleapis.com";
const DEFAULT_SEARCH_RESULT_SIZE: usize = 10;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable was not provided.
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
    /// Configuration was initialized more than once.
    #[error("Configuration already initialized")]
    AlreadyInitialized,
}

/// Runtime configuration for the search server.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Base URL of the Elasticsearch cluster.
    pub elasticsearch_url: String,
    /// Name of the single index rebuilt on every sync.
    pub elasticsearch_index: String,
    /// Optional API key sent as `Authorization: ApiKey <key>`.
    pub elasticsearch_api_key: Option<String>,
    /// Optional basic-auth username.
    pub elasticsearch_username: Option<String>,
    /// Optional basic-auth password.
    pub elasticsearch_password: Option<String>,
    /// Chat-completion backend used by the semantic interpreter.
    pub llm_provider: LlmProvider,
    /// API key for hosted LLM providers.
    pub llm_api_key: Option<String>,
    /// Optional override for the provider base URL.
    pub llm_base_url: Option<String>,
    /// Model identifier passed to the provider.
    pub llm_model: String,
    /// Spreadsheet identifier of the article source.
    pub google_sheet_id: String,
    /// Worksheet (tab) name read during sync.
    pub google_worksheet: String,
    /// Path to the Google JSON key used to authorize Sheets reads.
    pub google_credentials_path: PathBuf,
    /// Base URL of the Sheets REST API.
    pub google_sheets_api_url: String,
    /// Number of hits requested from Elasticsearch per search.
    pub search_result_size: usize,
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
}

/// Supported chat-completion backends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// Hosted OpenAI-compatible chat completions API.
    OpenAI,
    /// Local Ollama runtime.
    Ollama,
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Blank values are treated as absent.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let require = |key: &str| get(key).ok_or_else(|| ConfigError::MissingVariable(key.into()));

        let llm_provider = match get("LLM_PROVIDER") {
            Some(value) => value
                .parse::<LlmProvider>()
                .map_err(|()| ConfigError::InvalidValue("LLM_PROVIDER".into()))?,
            None => LlmProvider::OpenAI,
        };
        let llm_api_key = get("LLM_API_KEY");
        if llm_provider == LlmProvider::OpenAI && llm_api_key.is_none() {
            return Err(ConfigError::MissingVariable("LLM_API_KEY".into()));
        }

        let elasticsearch_username = get("ELASTICSEARCH_USERNAME");
        let elasticsearch_password = get("ELASTICSEARCH_PASSWORD");
        if elasticsearch_password.is_some() && elasticsearch_username.is_none() {
            return Err(ConfigError::InvalidValue(
                "ELASTICSEARCH_PASSWORD (set without ELASTICSEARCH_USERNAME)".into(),
            ));
        }

        let search_result_size = get("SEARCH_RESULT_SIZE")
            .map(|value| {
                value
                    .parse::<usize>()
                    .ok()
                    .filter(|size| *size > 0)
                    .ok_or_else(|| ConfigError::InvalidValue("SEARCH_RESULT_SIZE".into()))
            })
            .transpose()?
            .unwrap_or(DEFAULT_SEARCH_RESULT_SIZE);

        Ok(Self {
            elasticsearch_url: get("ELASTICSEARCH_URL")
                .unwrap_or_else(|| DEFAULT_ELASTICSEARCH_URL.into()),
            elasticsearch_index: get("ELASTICSEARCH_INDEX").unwrap_or_else(|| DEFAULT_INDEX.into()),
            elasticsearch_api_key: get("ELASTICSEARCH_API_KEY"),
            elasticsearch_username,
            elasticsearch_password,
            llm_provider,
            llm_api_key,
            llm_base_url: get("LLM_BASE_URL"),
            llm_model: get("LLM_MODEL").unwrap_or_else(|| llm_provider.default_model().into()),
            google_sheet_id: require("GOOGLE_SHEET_ID")?,
            google_worksheet: get("GOOGLE_WORKSHEET").unwrap_or_else(|| DEFAULT_WORKSHEET.into()),
            google_credentials_path: require("GOOGLE_CREDENTIALS_PATH")?.into(),
            google_sheets_api_url: get("GOOGLE_SHEETS_API_URL")
                .unwrap_or_else(|| DEFAULT_SHEETS_API_URL.into()),
            search_result_size,
            server_port: get("SERVER_PORT")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".into()))
                })
                .transpose()?,
        })
    }
}

impl LlmProvider {
    /// Model used when `LLM_MODEL` is not set.
    pub fn default_model(self) -> &'static str {
        match self {
            Self::OpenAI => DEFAULT_OPENAI_MODEL,
            Self::Ollama => DEFAULT_OLLAMA_MODEL,
        }
    }
}

impl std::str::FromStr for LlmProvider {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "ollama" => Ok(Self::Ollama),
            _ => Err(()),
        }
    }
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, panicking if initialization has not occurred.
pub fn get_config() -> &'static Config {
    CONFIG.get().expect("Config not initialized")
}

/// Load configuration from the environment (and `.env`) and install it in the global cache.
pub fn init_config() -> Result<&'static Config, ConfigError> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    tracing::debug!(
        elasticsearch_url = %config.elasticsearch_url,
        index = %config.elasticsearch_index,
        llm_provider = ?config.llm_provider,
        llm_model = %config.llm_model,
        worksheet = %config.google_worksheet,
        server_port = ?config.server_port,
        "Loaded configuration"
    );
    CONFIG
        .set(config)
        .map_err(|_| ConfigError::AlreadyInitialized)?;
    Ok(get_config())
}
