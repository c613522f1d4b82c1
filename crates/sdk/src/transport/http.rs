//! HTTP transport layer for the Perplexity SDK.

use crate::config::ClientConfig;
use crate::error::{PerplexityError, PerplexityResult};
use reqwest::{header, Client, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tracing::debug;

/// HTTP transport for making API requests.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    config: Arc<ClientConfig>,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given configuration.
    pub fn new(config: Arc<ClientConfig>) -> PerplexityResult<Self> {
        let mut headers = header::HeaderMap::new();

        let mut auth = header::HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|_| PerplexityError::Config("Invalid API key format".to_string()))?;
        auth.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self { client, config })
    }

    /// Build a URL for the given path.
    fn build_url(&self, path: &str) -> PerplexityResult<url::Url> {
        Ok(self.config.base_url.join(path)?)
    }

    /// Send once; non-success statuses become `PerplexityError::Api`.
    async fn execute<T: DeserializeOwned>(&self, request_builder: RequestBuilder) -> PerplexityResult<T> {
        let response = request_builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            debug!(status = status.as_u16(), "Request failed");
            return Err(PerplexityError::from_response(status.as_u16(), &body));
        }

        Ok(serde_json::from_str(&body)?)
    }

    /// Execute a POST request.
    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> PerplexityResult<T> {
        let url = self.build_url(path)?;
        debug!(url = %url, "POST request");

        self.execute(self.client.post(url).json(body)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct TestResponse {
        message: String,
        value: i32,
    }

    #[derive(Debug, Serialize)]
    struct TestRequest {
        name: String,
    }

    fn create_config(base_url: &str, api_key: &str) -> Arc<ClientConfig> {
        Arc::new(ClientConfig::new(url::Url::parse(base_url).unwrap(), api_key))
    }

    fn test_request() -> TestRequest {
        TestRequest {
            name: "test".to_string(),
        }
    }

    #[tokio::test]
    async fn test_post_request() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/create"))
            .respond_with(ResponseTemplate::new(200).set_body_json(TestResponse {
                message: "created".to_string(),
                value: 1,
            }))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri(), "pplx-key")).unwrap();

        let result: TestResponse = transport.post("/api/create", &test_request()).await.unwrap();
        assert_eq!(result.message, "created");
        assert_eq!(result.value, 1);
    }

    #[tokio::test]
    async fn test_authorization_and_content_type_headers() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/protected"))
            .and(header("Authorization", "Bearer pplx-test-key"))
            .and(header("Content-Type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(TestResponse {
                message: "authorized".to_string(),
                value: 100,
            }))
            .expect(1)
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri(), "pplx-test-key")).unwrap();

        let result: TestResponse = transport.post("/api/protected", &test_request()).await.unwrap();
        assert_eq!(result.message, "authorized");
    }

    #[tokio::test]
    async fn test_error_on_401_uses_error_field() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/bad"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(serde_json::json!({"error": "unauthorized"})),
            )
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri(), "bad-key")).unwrap();

        let result: PerplexityResult<TestResponse> = transport.post("/api/bad", &test_request()).await;
        match result {
            Err(PerplexityError::Api { status, message }) => {
                assert_eq!(status, 401);
                assert_eq!(message, "unauthorized");
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_error_on_500_without_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/broken"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri(), "pplx-key")).unwrap();

        let err = transport
            .post::<TestResponse, _>("/api/broken", &test_request())
            .await
            .unwrap_err();
        assert!(err.is_transport());
        assert_eq!(err.upstream_message(), "Request failed with status code 500");
    }

    #[tokio::test]
    async fn test_undecodable_success_body_is_not_transport() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/garbled"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri(), "pplx-key")).unwrap();

        let err = transport
            .post::<TestResponse, _>("/api/garbled", &test_request())
            .await
            .unwrap_err();
        assert!(matches!(err, PerplexityError::Json(_)));
        assert!(!err.is_transport());
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport() {
        // Nothing listens on port 9 locally.
        let transport = HttpTransport::new(create_config("http://127.0.0.1:9", "pplx-key")).unwrap();

        let err = transport
            .post::<TestResponse, _>("/api/anything", &test_request())
            .await
            .unwrap_err();
        assert!(matches!(err, PerplexityError::Http(_)));
        assert!(err.is_transport());
    }

    #[test]
    fn test_build_url() {
        let transport =
            HttpTransport::new(create_config("https://api.perplexity.ai", "pplx-key")).unwrap();

        let url = transport.build_url("/chat/completions").unwrap();
        assert_eq!(url.as_str(), "https://api.perplexity.ai/chat/completions");
    }

    #[test]
    fn test_invalid_api_key_header() {
        let result = HttpTransport::new(create_config("https://api.perplexity.ai", "bad\nkey"));
        assert!(matches!(result, Err(PerplexityError::Config(_))));
    }
}
