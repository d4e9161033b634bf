//! Chat record access for Open WebUI databases.
//!
//! Schema (only the columns read here):
//! - chat: id TEXT PK, title TEXT, chat TEXT (JSON payload),
//!   created_at INTEGER, updated_at INTEGER
//!
//! Every call opens its own read-only connection and drops it before
//! returning. Nothing here writes to the database.

use crate::error::{ChatStoreError, Result};
use crate::locator::{ensure_available, StoreLocator};
use crate::payload::extract_messages;
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

/// Table holding chat records.
pub const CHAT_TABLE: &str = "chat";

/// Title shown for chats stored without one.
pub const UNTITLED_CHAT: &str = "Untitled Chat";

/// Listing view of a chat.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatSummary {
    pub id: String,
    pub title: String,
    /// Raw `updated_at` value (epoch seconds)
    #[serde(skip)]
    pub updated_at: Option<i64>,
}

/// Full view of a chat.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatDetail {
    #[serde(skip)]
    pub id: String,
    pub title: String,
    pub messages: Vec<Value>,
}

/// Open `path` read-only, failing if the file is absent or is not a
/// SQLite database.
pub fn open_read_only(path: &Path) -> Result<Connection> {
    ensure_available(path)?;
    let open_err = |source| ChatStoreError::StoreOpen {
        path: path.to_path_buf(),
        source,
    };

    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(open_err)?;

    // SQLite reads the header lazily; touch it now
    conn.query_row("PRAGMA schema_version", [], |_| Ok(()))
        .map_err(open_err)?;

    Ok(conn)
}

/// Whether `table` exists in the database.
pub fn table_exists(conn: &Connection, table: &str) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT name FROM sqlite_master WHERE type='table' AND name = ?1",
        params![table],
        |_| Ok(()),
    )
    .optional()
    .map(|row| row.is_some())
}

/// All chats, most recently updated first.
///
/// A database without a `chat` table lists as empty.
pub fn list_summaries(path: &Path) -> Result<Vec<ChatSummary>> {
    let conn = open_read_only(path)?;

    if !table_exists(&conn, CHAT_TABLE).map_err(ChatStoreError::query(path))? {
        return Ok(Vec::new());
    }

    let mut stmt = conn
        .prepare("SELECT id, title, created_at, updated_at FROM chat ORDER BY updated_at DESC")
        .map_err(ChatStoreError::query(path))?;

    let summaries = stmt
        .query_map([], |row| {
            Ok(ChatSummary {
                id: text_of(row.get_ref(0)?).unwrap_or_default(),
                title: display_title(text_of(row.get_ref(1)?)),
                updated_at: integer_of(row.get_ref(3)?),
            })
        })
        .map_err(ChatStoreError::query(path))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(ChatStoreError::query(path))?;

    Ok(summaries)
}

/// One chat with its normalized message list.
pub fn get_detail(path: &Path, id: &str) -> Result<ChatDetail> {
    let conn = open_read_only(path)?;

    let row = conn
        .query_row(
            "SELECT chat, title FROM chat WHERE id = ?1",
            params![id],
            |row| {
                let payload = match row.get_ref(0)? {
                    ValueRef::Text(bytes) | ValueRef::Blob(bytes) => Some(bytes.to_vec()),
                    _ => None,
                };
                Ok((payload, text_of(row.get_ref(1)?)))
            },
        )
        .optional()
        .map_err(ChatStoreError::query(path))?;

    // Connection is not needed past this point
    drop(conn);

    let (payload, title) = row.ok_or_else(|| ChatStoreError::ChatNotFound { id: id.to_string() })?;
    let title = display_title(title);

    let messages = match payload {
        Some(bytes) if !bytes.is_empty() => {
            let doc: Value = serde_json::from_slice(&bytes).map_err(|source| {
                ChatStoreError::MalformedPayload {
                    id: id.to_string(),
                    source,
                }
            })?;
            extract_messages(&doc)
        }
        _ => Vec::new(),
    };

    Ok(ChatDetail {
        id: id.to_string(),
        title,
        messages,
    })
}

/// Name-based access: resolve the store name, then read it.
#[derive(Debug, Clone)]
pub struct ChatAccessor {
    locator: StoreLocator,
}

impl ChatAccessor {
    pub fn new(locator: StoreLocator) -> Self {
        Self { locator }
    }

    pub fn locator(&self) -> &StoreLocator {
        &self.locator
    }

    pub fn list_summaries(&self, store: &str) -> Result<Vec<ChatSummary>> {
        list_summaries(self.locator.resolve(store)?)
    }

    pub fn get_detail(&self, store: &str, id: &str) -> Result<ChatDetail> {
        get_detail(self.locator.resolve(store)?, id)
    }
}

fn display_title(title: Option<String>) -> String {
    title
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| UNTITLED_CHAT.to_string())
}

/// Column value as text. Ids may be stored as integers in older databases.
fn text_of(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Some(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

fn integer_of(value: ValueRef<'_>) -> Option<i64> {
    match value {
        ValueRef::Integer(i) => Some(i),
        ValueRef::Real(f) => Some(f as i64),
        ValueRef::Text(bytes) => std::str::from_utf8(bytes).ok()?.trim().parse().ok(),
        _ => None,
    }
}
