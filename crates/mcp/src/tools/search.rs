// Perplexity-backed search tool

use crate::error::ToolError;
use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{json_schema_number, json_schema_object, json_schema_string, Tool};
use anyhow::Context;
use perplexity_sdk::{
    ChatCompletionRequest, ChatMessage, PerplexityClient, RecencyFilter, DEFAULT_MODEL,
    DEFAULT_TEMPERATURE,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

pub const SEARCH_TOOL_NAME: &str = "search";

const SYSTEM_PROMPT: &str = "Be precise and concise.";

pub const INVALID_ARGUMENTS_MESSAGE: &str = "Invalid search arguments. Required: query (string)";

/// Why a `search` call's arguments were rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ArgumentsError {
    #[error("arguments must be an object")]
    NotAnObject,

    #[error("query must be a string")]
    InvalidQuery,

    #[error("{field} must be a {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("search_recency_filter must be one of day, week, month, year")]
    InvalidRecencyFilter,
}

/// Validated arguments of a `search` call.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchArguments {
    pub query: String,
    pub model: Option<String>,
    pub max_tokens: Option<serde_json::Number>,
    pub temperature: Option<f64>,
    pub search_recency_filter: Option<RecencyFilter>,
}

impl SearchArguments {
    /// Shape-check raw arguments. Only types are checked, never content.
    pub fn parse(arguments: &Value) -> Result<Self, ArgumentsError> {
        let object = arguments.as_object().ok_or(ArgumentsError::NotAnObject)?;

        let query = match object.get("query") {
            Some(Value::String(query)) => query.clone(),
            _ => return Err(ArgumentsError::InvalidQuery),
        };

        let model = match object.get("model") {
            None => None,
            Some(Value::String(model)) => Some(model.clone()),
            Some(_) => {
                return Err(ArgumentsError::WrongType {
                    field: "model",
                    expected: "string",
                })
            }
        };

        let max_tokens = match object.get("max_tokens") {
            None => None,
            Some(Value::Number(n)) => Some(n.clone()),
            Some(_) => {
                return Err(ArgumentsError::WrongType {
                    field: "max_tokens",
                    expected: "number",
                })
            }
        };

        let temperature = match object.get("temperature") {
            None => None,
            Some(Value::Number(n)) => Some(n.as_f64().ok_or(ArgumentsError::WrongType {
                field: "temperature",
                expected: "number",
            })?),
            Some(_) => {
                return Err(ArgumentsError::WrongType {
                    field: "temperature",
                    expected: "number",
                })
            }
        };

        let search_recency_filter = match object.get("search_recency_filter") {
            None => None,
            Some(Value::String(filter)) => Some(
                filter
                    .parse::<RecencyFilter>()
                    .map_err(|_| ArgumentsError::InvalidRecencyFilter)?,
            ),
            Some(_) => return Err(ArgumentsError::InvalidRecencyFilter),
        };

        Ok(Self {
            query,
            model,
            max_tokens,
            temperature,
            search_recency_filter,
        })
    }

    /// Build the upstream request, filling in defaults.
    ///
    /// Only absent fields are defaulted: an explicit `temperature: 0` or
    /// `model: ""` is sent as given rather than replaced.
    pub fn into_request(self) -> ChatCompletionRequest {
        let mut request = ChatCompletionRequest::new(vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(self.query),
        ]);

        request.model = self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string());
        request.max_tokens = self.max_tokens;
        request.temperature = self.temperature.unwrap_or(DEFAULT_TEMPERATURE);
        request.search_recency_filter = self.search_recency_filter.unwrap_or_default();
        request
    }
}

/// Success payload, rendered as indented JSON text.
#[derive(Debug, Serialize)]
struct SearchAnswer<'a> {
    answer: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    citations: Option<&'a Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    usage: Option<&'a Value>,
}

/// Tool that answers natural-language queries through Perplexity
pub struct SearchTool {
    client: PerplexityClient,
}

impl SearchTool {
    pub fn new(client: PerplexityClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for SearchTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: SEARCH_TOOL_NAME.to_string(),
            description: "Search using Perplexity AI".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "query": json_schema_string("The search query"),
                    "model": {
                        "type": "string",
                        "description": "Model to use for the search",
                        "default": DEFAULT_MODEL
                    },
                    "max_tokens": json_schema_number("Maximum number of tokens to generate"),
                    "temperature": {
                        "type": "number",
                        "description": "Sampling temperature",
                        "default": DEFAULT_TEMPERATURE
                    },
                    "search_recency_filter": {
                        "type": "string",
                        "description": "Filter for search recency",
                        "enum": RecencyFilter::ALL.map(|filter| filter.as_str()),
                        "default": RecencyFilter::default().as_str()
                    }
                }),
                vec!["query"],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult, ToolError> {
        let args = SearchArguments::parse(&arguments).map_err(|reason| {
            debug!(%reason, "Rejected search arguments");
            ToolError::InvalidParams(INVALID_ARGUMENTS_MESSAGE.to_string())
        })?;

        let request = args.into_request();
        debug!(model = %request.model, recency = %request.search_recency_filter, "Querying Perplexity");

        let response = match self.client.chat().completions(&request).await {
            Ok(response) => response,
            Err(e) if e.is_transport() => {
                warn!(error = %e, "Perplexity request failed");
                return Ok(CallToolResult::error(format!(
                    "Perplexity API error: {}",
                    e.upstream_message()
                )));
            }
            Err(e) => return Err(ToolError::Internal(e.into())),
        };

        let answer = response
            .answer()
            .context("Perplexity returned no answer")?;

        let text = serde_json::to_string_pretty(&SearchAnswer {
            answer,
            citations: response.citations.as_ref(),
            usage: response.usage.as_ref(),
        })
        .context("Failed to render search answer")?;

        Ok(CallToolResult::success(text))
    }
}
