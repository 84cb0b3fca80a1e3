//! Semantic interpretation of search queries through a hosted or local chat model.
//!
//! The interpreter forwards the literal user query, behind a fixed system prompt, to a
//! chat-completion endpoint and hands the first reply back untouched. Both providers are
//! spoken to over plain HTTP, mirroring the Elasticsearch client.

use crate::config::{Config, LlmProvider};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";
const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";

/// System prompt sent ahead of every query.
pub const SYSTEM_PROMPT: &str = "You are a semantic search assistant. Interpret the user's \
search query and describe its intent using related concepts, synonyms, and key terms that \
would help find relevant articles.";

/// Errors surfaced while interpreting a query.
#[derive(Debug, Error)]
pub enum InterpreterError {
    /// Provider could not be reached.
    #[error("LLM provider unavailable: {0}")]
    ProviderUnavailable(String),
    /// Provider returned an error response.
    #[error("LLM request failed: {0}")]
    RequestFailed(String),
    /// Provider response could not be parsed or carried no reply.
    #[error("Malformed LLM response: {0}")]
    InvalidResponse(String),
}

/// Interface implemented by chat-completion backends.
#[async_trait]
pub trait SemanticInterpreter: Send + Sync {
    /// Return the model's free-text interpretation of `query`.
    async fn interpret(&self, query: &str) -> Result<String, InterpreterError>;
}

/// Build an interpreter for the configured provider.
pub fn get_interpreter(config: &Config) -> Box<dyn SemanticInterpreter> {
    match config.llm_provider {
        LlmProvider::OpenAI => Box::new(OpenAiInterpreter::new(
            config
                .llm_base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_OPENAI_URL.to_string()),
            config.llm_api_key.clone().unwrap_or_default(),
            config.llm_model.clone(),
        )),
        LlmProvider::Ollama => Box::new(OllamaInterpreter::new(
            config
                .llm_base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string()),
            config.llm_model.clone(),
        )),
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

fn conversation(query: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage {
            role: "system".into(),
            content: SYSTEM_PROMPT.into(),
        },
        ChatMessage {
            role: "user".into(),
            content: query.into(),
        },
    ]
}

fn build_http(agent: &str) -> Client {
    Client::builder()
        .user_agent(agent)
        .build()
        .unwrap_or_else(|_| Client::new())
}

async fn read_success(
    response: reqwest::Response,
    endpoint: &str,
) -> Result<reqwest::Response, InterpreterError> {
    if response.status() == StatusCode::NOT_FOUND {
        return Err(InterpreterError::ProviderUnavailable(format!(
            "endpoint {endpoint} returned 404"
        )));
    }
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(InterpreterError::RequestFailed(format!(
            "{endpoint} returned {status}: {body}"
        )));
    }
    Ok(response)
}

/// OpenAI-compatible `/v1/chat/completions` client.
pub struct OpenAiInterpreter {
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiInterpreter {
    /// Create a client for the given base URL, key, and model.
    pub fn new(base_url: String, api_key: String, model: String) -> Self {
        Self {
            http: build_http("sheetsearch/interpreter"),
            base_url,
            api_key,
            model,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Serialize)]
struct OpenAiChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
}

#[derive(Deserialize)]
struct OpenAiChatResponse {
    #[serde(default)]
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiReply,
}

#[derive(Deserialize)]
struct OpenAiReply {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl SemanticInterpreter for OpenAiInterpreter {
    async fn interpret(&self, query: &str) -> Result<String, InterpreterError> {
        let endpoint = self.endpoint();
        let request = OpenAiChatRequest {
            model: &self.model,
            messages: conversation(query),
        };

        let response = self
            .http
            .post(&endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|error| {
                InterpreterError::ProviderUnavailable(format!(
                    "failed to reach {}: {error}",
                    self.base_url
                ))
            })?;
        let response = read_success(response, &endpoint).await?;

        let body: OpenAiChatResponse = response.json().await.map_err(|error| {
            InterpreterError::InvalidResponse(format!("failed to decode chat completion: {error}"))
        })?;

        let reply = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| InterpreterError::InvalidResponse("no choices returned".into()))?;
        tracing::debug!(model = %self.model, "Query interpreted");
        Ok(reply.message.content.unwrap_or_default())
    }
}

/// Ollama `/api/chat` client.
pub struct OllamaInterpreter {
    http: Client,
    base_url: String,
    model: String,
}

impl OllamaInterpreter {
    /// Create a client for the given runtime URL and model.
    pub fn new(base_url: String, model: String) -> Self {
        Self {
            http: build_http("sheetsearch/interpreter"),
            base_url,
            model,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/api/chat", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    stream: bool,
}

#[derive(Deserialize)]
struct OllamaChatResponse {
    message: ChatMessage,
    #[serde(default = "default_done")]
    done: bool,
}

fn default_done() -> bool {
    true
}

#[async_trait]
impl SemanticInterpreter for OllamaInterpreter {
    async fn interpret(&self, query: &str) -> Result<String, InterpreterError> {
        let endpoint = self.endpoint();
        let request = OllamaChatRequest {
            model: &self.model,
            messages: conversation(query),
            stream: false,
        };

        let response = self
            .http
            .post(&endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|error| {
                InterpreterError::ProviderUnavailable(format!(
                    "failed to reach Ollama at {}: {error}",
                    self.base_url
                ))
            })?;
        let response = read_success(response, &endpoint).await?;

        let body: OllamaChatResponse = response.json().await.map_err(|error| {
            InterpreterError::InvalidResponse(format!("failed to decode Ollama response: {error}"))
        })?;

        if !body.done {
            return Err(InterpreterError::InvalidResponse(
                "Ollama response incomplete (streaming not supported)".into(),
            ));
        }

        tracing::debug!(model = %self.model, "Query interpreted");
        Ok(body.message.content)
    }
}
