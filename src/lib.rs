//! chatview Core Library
//!
//! Read-only access to Open WebUI chat databases:
//! - Resolve logical store names to database files
//! - List chats and load one chat's messages, tolerating every payload layout
//!   Open WebUI has used
//! - Inspect a database's structure
//! - Serve the above as a small HTTP API
//!
//! Core modules (`locator`, `chats`, `payload`, `inspect`) never log; errors
//! carry the store, path or chat id for the caller to report.

pub mod chats;
pub mod config;
pub mod error;
pub mod inspect;
pub mod locator;
pub mod payload;
pub mod server;

// Re-export main types
pub use chats::{ChatAccessor, ChatDetail, ChatSummary, UNTITLED_CHAT};
pub use config::Config;
pub use error::{ChatStoreError, ErrorKind};
pub use locator::{StoreLocator, StoreRegistry};
pub use payload::PayloadShape;
