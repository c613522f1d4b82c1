//! Wire types for the Perplexity chat completions endpoint.

use crate::error::{PerplexityError, PerplexityResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Model used when the caller doesn't pick one.
pub const DEFAULT_MODEL: &str = "llama-3.1-sonar-small-128k-online";

/// Sampling temperature used when the caller doesn't pick one.
pub const DEFAULT_TEMPERATURE: f64 = 0.2;

/// Restricts search results to a freshness window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecencyFilter {
    Day,
    Week,
    #[default]
    Month,
    Year,
}

impl RecencyFilter {
    pub const ALL: [RecencyFilter; 4] = [Self::Day, Self::Week, Self::Month, Self::Year];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

impl fmt::Display for RecencyFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecencyFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|filter| filter.as_str() == s)
            .ok_or_else(|| format!("Unknown recency filter: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single message in a chat exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Body of `POST /chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    /// Absent means the upstream default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<serde_json::Number>,
    pub temperature: f64,
    pub top_p: f64,
    pub search_domain_filter: Vec<String>,
    pub return_images: bool,
    pub return_related_questions: bool,
    pub search_recency_filter: RecencyFilter,
    pub top_k: u32,
    pub stream: bool,
    pub presence_penalty: f64,
    pub frequency_penalty: f64,
}

impl ChatCompletionRequest {
    /// A non-streamed request with the given messages and default sampling.
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            messages,
            max_tokens: None,
            temperature: DEFAULT_TEMPERATURE,
            top_p: 0.9,
            search_domain_filter: vec!["perplexity.ai".to_string()],
            return_images: false,
            return_related_questions: false,
            search_recency_filter: RecencyFilter::default(),
            top_k: 0,
            stream: false,
            presence_penalty: 0.0,
            frequency_penalty: 1.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub finish_reason: Option<String>,
    pub message: ChatMessage,
}

/// Reply from `POST /chat/completions`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub created: Option<i64>,
    #[serde(default)]
    pub citations: Option<Vec<String>>,
    pub choices: Vec<Choice>,
    /// Token counters, kept as the upstream sent them.
    #[serde(default)]
    pub usage: Option<serde_json::Value>,
}

impl ChatCompletionResponse {
    /// Content of the first choice.
    pub fn answer(&self) -> PerplexityResult<&str> {
        self.choices
            .first()
            .map(|choice| choice.message.content.as_str())
            .ok_or(PerplexityError::EmptyChoices)
    }
}
