// MCP server: JSON-RPC dispatch and the stdio serve loop

use crate::protocol::{
    negotiate_protocol_version, CallToolParams, InitializeParams, InitializeResult,
    JsonRpcError, JsonRpcRequest, JsonRpcResponse, ListToolsResult, ServerCapabilities,
    ServerInfo, ToolsCapability,
};
use crate::tools::ToolRegistry;
use anyhow::{Context, Result};
use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::{AnyDelimiterCodec, FramedRead, FramedWrite, LinesCodec};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

pub const SERVER_NAME: &str = "perplexity-server";
pub const SERVER_VERSION: &str = "0.1.0";

type MethodResult = std::result::Result<Value, JsonRpcError>;

pub struct McpServer {
    registry: ToolRegistry,
    server_info: ServerInfo,
}

impl McpServer {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry,
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
            },
        }
    }

    /// Serve over the process's stdin/stdout until EOF or `shutdown` fires.
    pub async fn run_stdio(&self, shutdown: CancellationToken) -> Result<()> {
        self.serve(tokio::io::stdin(), tokio::io::stdout(), shutdown).await
    }

    /// Serve newline-delimited JSON-RPC over an arbitrary byte stream.
    ///
    /// Requests are handled one at a time. The writer is closed on every
    /// clean exit path.
    pub async fn serve<R, W>(&self, reader: R, writer: W, shutdown: CancellationToken) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        // Frames are read as bytes so a line that isn't UTF-8 can be
        // rejected on its own instead of failing the stream.
        let mut frames = FramedRead::new(reader, AnyDelimiterCodec::new(b"\n".to_vec(), b"\n".to_vec()));
        let mut sink = FramedWrite::new(writer, LinesCodec::new());

        loop {
            let frame = tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Shutdown requested, closing transport");
                    break;
                }
                next = frames.next() => match next {
                    Some(frame) => frame.context("Failed to read from transport")?,
                    None => {
                        info!("Transport closed by client");
                        break;
                    }
                },
            };

            let response = match std::str::from_utf8(&frame) {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => tokio::select! {
                    _ = shutdown.cancelled() => {
                        info!("Shutdown requested during a request, closing transport");
                        break;
                    }
                    response = self.handle_message(line) => response,
                },
                Err(e) => {
                    error!(error = %e, "Frame is not valid UTF-8");
                    Some(JsonRpcResponse::error(Value::Null, JsonRpcError::parse_error()))
                }
            };

            if let Some(response) = response {
                let encoded = serde_json::to_string(&response).context("Failed to encode response")?;
                sink.send(encoded).await.context("Failed to write to transport")?;
            }
        }

        SinkExt::<String>::close(&mut sink)
            .await
            .context("Failed to close transport")?;
        Ok(())
    }

    /// Handle one raw frame. Returns `None` when nothing should be written back.
    pub async fn handle_message(&self, message: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(message) {
            Ok(value) => value,
            Err(e) => {
                error!(error = %e, "Unparseable message");
                return Some(JsonRpcResponse::error(Value::Null, JsonRpcError::parse_error()));
            }
        };

        // Replies to requests we never send; nothing to do with them.
        if value.get("method").is_none() && (value.get("result").is_some() || value.get("error").is_some()) {
            debug!("Ignoring client response");
            return None;
        }

        // A null id would otherwise read as a notification and go unanswered.
        if value.get("id").is_some_and(Value::is_null) {
            warn!("Request with null id");
            return Some(JsonRpcResponse::error(Value::Null, JsonRpcError::invalid_request()));
        }

        let id = value.get("id").cloned().unwrap_or(Value::Null);
        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "Malformed JSON-RPC request");
                return Some(JsonRpcResponse::error(id, JsonRpcError::invalid_request()));
            }
        };

        if request.jsonrpc != "2.0" {
            warn!(version = %request.jsonrpc, "Unsupported JSON-RPC version");
            return Some(JsonRpcResponse::error(id, JsonRpcError::invalid_request()));
        }

        self.handle_request(request).await
    }

    /// Dispatch a parsed request or notification.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let Some(id) = request.id else {
            self.handle_notification(&request.method);
            return None;
        };

        debug!(method = %request.method, "Handling request");
        let outcome = match request.method.as_str() {
            "initialize" => self.initialize(request.params),
            "ping" => Ok(serde_json::json!({})),
            "tools/list" => self.list_tools(),
            "tools/call" => self.call_tool(request.params).await,
            method => Err(JsonRpcError::method_not_found(format!("Method not found: {}", method))),
        };

        Some(match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(e) => {
                if e.code == JsonRpcError::INTERNAL_ERROR {
                    error!(method = %request.method, error = %e.message, "Request failed");
                }
                JsonRpcResponse::error(id, e)
            }
        })
    }

    fn handle_notification(&self, method: &str) {
        match method {
            "notifications/initialized" => info!("Client confirmed initialization"),
            "notifications/cancelled" => debug!("Client cancelled a request"),
            other => debug!(method = %other, "Ignoring notification"),
        }
    }

    fn initialize(&self, params: Option<Value>) -> MethodResult {
        let params: InitializeParams = params
            .ok_or_else(|| JsonRpcError::invalid_params("Missing initialize params"))
            .and_then(|params| {
                serde_json::from_value(params)
                    .map_err(|e| JsonRpcError::invalid_params(format!("Invalid initialize params: {}", e)))
            })?;

        if let Some(client) = &params.client_info {
            info!(client = %client.name, version = %client.version, "Client connected");
        }

        to_result(InitializeResult {
            protocol_version: negotiate_protocol_version(&params.protocol_version).to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability::default(),
            },
            server_info: self.server_info.clone(),
        })
    }

    fn list_tools(&self) -> MethodResult {
        to_result(ListToolsResult {
            tools: self.registry.list_schemas(),
        })
    }

    async fn call_tool(&self, params: Option<Value>) -> MethodResult {
        let params: CallToolParams = params
            .ok_or_else(|| JsonRpcError::invalid_params("Missing tool call params"))
            .and_then(|params| {
                serde_json::from_value(params)
                    .map_err(|e| JsonRpcError::invalid_params(format!("Invalid tool call params: {}", e)))
            })?;

        info!(tool = %params.name, "Calling tool");
        let arguments = params.arguments.unwrap_or(Value::Null);
        let result = self.registry.call(&params.name, arguments).await?;

        to_result(result)
    }
}

fn to_result<T: Serialize>(value: T) -> MethodResult {
    serde_json::to_value(value).map_err(|e| JsonRpcError::internal_error(e.to_string()))
}
