//! # Perplexity SDK
//!
//! Rust client for the Perplexity chat completions API.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use perplexity_sdk::{ChatCompletionRequest, ChatMessage, PerplexityClient, PerplexityResult};
//!
//! #[tokio::main]
//! async fn main() -> PerplexityResult<()> {
//!     let client = PerplexityClient::builder()
//!         .api_key("pplx-your-api-key")
//!         .build()?;
//!
//!     let request = ChatCompletionRequest::new(vec![
//!         ChatMessage::system("Be precise and concise."),
//!         ChatMessage::user("What is the capital of France?"),
//!     ]);
//!     let response = client.chat().completions(&request).await?;
//!     println!("{}", response.answer()?);
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod transport;
pub mod types;

// Re-export main client
pub use client::{PerplexityClient, PerplexityClientBuilder};
pub use config::ClientConfig;
pub use error::{PerplexityError, PerplexityResult};

// Re-export wire types
pub use types::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, Choice, RecencyFilter, Role,
    DEFAULT_MODEL, DEFAULT_TEMPERATURE,
};
