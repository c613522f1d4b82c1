// Errors raised while routing or executing a tool call

use crate::protocol::JsonRpcError;

/// Failure of a `tools/call` that is reported as a JSON-RPC error rather
/// than as an error-flagged tool result.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    MethodNotFound(String),

    #[error("{0}")]
    InvalidParams(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ToolError {
    pub fn to_rpc_error(&self) -> JsonRpcError {
        match self {
            Self::MethodNotFound(_) => JsonRpcError::method_not_found(self.to_string()),
            Self::InvalidParams(_) => JsonRpcError::invalid_params(self.to_string()),
            Self::Internal(e) => JsonRpcError::internal_error(format!("{:#}", e)),
        }
    }
}

impl From<ToolError> for JsonRpcError {
    fn from(error: ToolError) -> Self {
        error.to_rpc_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = ToolError::MethodNotFound("fetch".to_string()).to_rpc_error();
        assert_eq!(err.code, JsonRpcError::METHOD_NOT_FOUND);
        assert_eq!(err.message, "Unknown tool: fetch");

        let err = ToolError::InvalidParams("bad".to_string()).to_rpc_error();
        assert_eq!(err.code, JsonRpcError::INVALID_PARAMS);
        assert_eq!(err.message, "bad");

        let err = ToolError::Internal(anyhow::anyhow!("exploded")).to_rpc_error();
        assert_eq!(err.code, JsonRpcError::INTERNAL_ERROR);
        assert_eq!(err.message, "exploded");
    }
}
