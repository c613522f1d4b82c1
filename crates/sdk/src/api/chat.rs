//! Chat completions API endpoint.

use crate::client::PerplexityClient;
use crate::error::PerplexityResult;
use crate::types::{ChatCompletionRequest, ChatCompletionResponse};

/// Chat API for online-search-backed completions.
pub struct ChatApi<'a> {
    client: &'a PerplexityClient,
}

impl<'a> ChatApi<'a> {
    pub(crate) fn new(client: &'a PerplexityClient) -> Self {
        Self { client }
    }

    /// Request a single, non-streamed completion.
    pub async fn completions(&self, request: &ChatCompletionRequest) -> PerplexityResult<ChatCompletionResponse> {
        self.client.http.post("/chat/completions", request).await
    }
}

#[cfg(test)]
mod tests {
    use crate::types::{ChatCompletionRequest, ChatMessage};
    use crate::PerplexityClient;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_completions_posts_to_endpoint() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer pplx-key"))
            .and(body_partial_json(json!({
                "model": "llama-3.1-sonar-small-128k-online",
                "stream": false,
                "messages": [{"role": "user", "content": "tallest mountain"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "cmpl-1",
                "model": "llama-3.1-sonar-small-128k-online",
                "created": 1700000000,
                "citations": ["https://example.com/everest"],
                "choices": [{
                    "index": 0,
                    "finish_reason": "stop",
                    "message": {"role": "assistant", "content": "Mount Everest"}
                }],
                "usage": {"prompt_tokens": 4, "completion_tokens": 3, "total_tokens": 7}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = PerplexityClient::builder()
            .base_url(server.uri())
            .api_key("pplx-key")
            .build()
            .unwrap();

        let request = ChatCompletionRequest::new(vec![ChatMessage::user("tallest mountain")]);
        let response = client.chat().completions(&request).await.unwrap();

        assert_eq!(response.answer().unwrap(), "Mount Everest");
        assert_eq!(response.id.as_deref(), Some("cmpl-1"));
        assert_eq!(response.usage, Some(json!({"prompt_tokens": 4, "completion_tokens": 3, "total_tokens": 7})));
    }
}
