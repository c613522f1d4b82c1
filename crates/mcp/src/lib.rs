// MCP (Model Context Protocol) server exposing Perplexity search as a tool
// to agent hosts over stdio

pub mod error;
pub mod protocol;
pub mod server;
pub mod tools;

pub use error::ToolError;
pub use server::McpServer;
