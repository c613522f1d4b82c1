//! Transport layer for the Perplexity SDK.

pub mod http;

pub use http::HttpTransport;
