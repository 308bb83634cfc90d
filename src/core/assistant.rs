//! Chat assistant boundary - a request/response text relay
//!
//! The assistant is a fully separate feature surface: it shares no
//! transactional state with the workflow engine, and its failures are
//! reported through its own error type, never through the store's.

use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

/// Longest user message forwarded to the model
const MAX_MESSAGE_CHARS: usize = 4000;

/// Fallback when neither the override nor the preferred list is available
const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

/// Tried in order when no override is set
const PREFERRED_MODELS: [&str; 5] = [
    "llama-3.1-8b-instant",
    "llama-3.2-3b-preview",
    "llama-3.2-11b-text-preview",
    "llama-3.1-70b-instant",
    "llama-3.1-8b-instant-fp16",
];

const SYSTEM_PROMPT: &str = "You are the HR service-desk assistant, a helpful, factual HR expert \
    in HR operations, shared services, policies, payroll, benefits, attendance rules, and \
    employee relations. Answer briefly and clearly in the language of the user's message. \
    If asked about a specific company policy you don't know, ask clarifying questions.";

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("GROQ_API_KEY not set")]
    MissingApiKey,

    #[error("Empty message")]
    EmptyMessage,

    #[error("Chat API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Chat API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Model returned no text")]
    EmptyReply,
}

/// Text relay to an external language model
pub trait Assistant {
    fn ask(&self, message: &str) -> Result<String, AssistantError>;
}

/// Assistant backed by the Groq chat-completions API
pub struct GroqAssistant {
    client: reqwest::blocking::Client,
    api_key: String,
    model_override: Option<String>,
    base_url: String,
}

impl GroqAssistant {
    pub fn new(api_key: String, model_override: Option<String>) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            api_key,
            model_override: model_override.filter(|m| !m.trim().is_empty()),
            base_url: "https://api.groq.com/openai/v1".to_string(),
        }
    }

    /// Build from `GROQ_API_KEY` / `GROQ_MODEL_ID`, with an optional
    /// configured model used when the env override is absent
    pub fn from_env(configured_model: Option<String>) -> Result<Self, AssistantError> {
        let api_key = std::env::var("GROQ_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or(AssistantError::MissingApiKey)?;
        let model = std::env::var("GROQ_MODEL_ID")
            .ok()
            .filter(|m| !m.trim().is_empty())
            .or(configured_model);
        Ok(Self::new(api_key, model))
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Pick a model: override if available, else the preferred list, else
    /// any `llama*`, else the fixed default. A failed model listing falls
    /// back to the override or the default.
    fn pick_model(&self) -> String {
        match self.list_models() {
            Ok(available) => {
                pick_from_available(&available, self.model_override.as_deref())
            }
            Err(_) => self
                .model_override
                .clone()
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        }
    }

    fn list_models(&self) -> Result<Vec<String>, AssistantError> {
        #[derive(Deserialize)]
        struct ModelList {
            #[serde(default)]
            data: Vec<ModelEntry>,
        }
        #[derive(Deserialize)]
        struct ModelEntry {
            id: String,
        }

        let resp = self
            .client
            .get(format!("{}/models", self.base_url))
            .bearer_auth(&self.api_key)
            .send()?;
        let list: ModelList = resp.error_for_status()?.json()?;
        Ok(list.data.into_iter().map(|m| m.id).collect())
    }
}

/// Selection order over a known set of available model ids
fn pick_from_available(available: &[String], override_model: Option<&str>) -> String {
    if let Some(wanted) = override_model {
        if available.iter().any(|m| m == wanted) {
            return wanted.to_string();
        }
    }
    for preferred in PREFERRED_MODELS {
        if available.iter().any(|m| m == preferred) {
            return preferred.to_string();
        }
    }
    if let Some(llama) = available.iter().find(|m| m.starts_with("llama")) {
        return llama.clone();
    }
    DEFAULT_MODEL.to_string()
}

/// Trim a message to the forwarded length on a char boundary
fn truncate_message(message: &str) -> &str {
    match message.char_indices().nth(MAX_MESSAGE_CHARS) {
        Some((idx, _)) => &message[..idx],
        None => message,
    }
}

impl Assistant for GroqAssistant {
    fn ask(&self, message: &str) -> Result<String, AssistantError> {
        let message = truncate_message(message.trim());
        if message.is_empty() {
            return Err(AssistantError::EmptyMessage);
        }

        let model = self.pick_model();
        let body = json!({
            "model": model,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": message},
            ],
            "temperature": 0.4,
            "top_p": 0.9,
            "max_tokens": 512,
        });

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().unwrap_or_default();
            return Err(AssistantError::Api {
                status: status.as_u16(),
                message,
            });
        }

        #[derive(Deserialize)]
        struct ChatResponse {
            #[serde(default)]
            choices: Vec<Choice>,
        }
        #[derive(Deserialize)]
        struct Choice {
            message: ChoiceMessage,
        }
        #[derive(Deserialize)]
        struct ChoiceMessage {
            #[serde(default)]
            content: String,
        }

        let parsed: ChatResponse = resp.json()?;
        let text = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default();

        if text.is_empty() {
            return Err(AssistantError::EmptyReply);
        }
        Ok(text)
    }
}
