//! API endpoint groups.

mod chat;

pub use chat::ChatApi;
