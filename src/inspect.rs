//! Database inspection - structural report of an Open WebUI database.
//!
//! Collects the table list, the `chat` table's columns and row count, and a
//! best-effort breakdown of one sample record's payload. Rendering is left to
//! the caller.

use crate::chats::{open_read_only, CHAT_TABLE};
use crate::error::{ChatStoreError, Result};
use crate::payload::{type_name, PayloadShape};
use rusqlite::types::ValueRef;
use rusqlite::Connection;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

/// Column value preview length.
const VALUE_PREVIEW_CHARS: usize = 100;
/// Raw payload preview length when JSON parsing fails.
const RAW_PREVIEW_CHARS: usize = 200;
/// Pretty-printed payload preview length.
const JSON_PREVIEW_CHARS: usize = 1000;

#[derive(Debug, Clone, Serialize)]
pub struct InspectionReport {
    pub tables: Vec<String>,
    /// Present only when the database has a `chat` table
    pub chat_table: Option<ChatTableReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    pub decl_type: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatTableReport {
    pub columns: Vec<ColumnInfo>,
    pub row_count: i64,
    pub sample: Option<SampleRecord>,
}

/// First row of the `chat` table, in column order.
#[derive(Debug, Clone, Serialize)]
pub struct SampleRecord {
    pub fields: Vec<(String, SampleValue)>,
}

impl SampleRecord {
    /// Breakdown of the `chat` column, if it held a payload.
    pub fn payload(&self) -> Option<&PayloadReport> {
        self.fields.iter().find_map(|(_, value)| match value {
            SampleValue::Payload(report) => Some(report),
            SampleValue::Text(_) => None,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub enum SampleValue {
    /// Column value, truncated
    Text(String),
    /// Non-empty `chat` column
    Payload(PayloadReport),
}

#[derive(Debug, Clone, Serialize)]
pub enum PayloadReport {
    Parsed(PayloadOverview),
    Invalid { error: String, raw_preview: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct PayloadOverview {
    pub json_type: &'static str,
    /// Top-level keys, for objects
    pub keys: Vec<String>,
    /// One line per top-level key, e.g. `messages: list with 4 items`
    pub structure: Vec<String>,
    pub preview: String,
    pub truncated: bool,
    pub extraction: Extraction,
}

#[derive(Debug, Clone, Serialize)]
pub struct Extraction {
    /// Matched location (`messages`, `history.messages`, `history`, `(root)`)
    pub location: Option<&'static str>,
    pub message_count: usize,
    pub first_message: Option<Value>,
}

/// Build the inspection report for the database at `path`.
pub fn inspect(path: &Path) -> Result<InspectionReport> {
    let conn = open_read_only(path)?;
    let tables = list_tables(&conn).map_err(ChatStoreError::query(path))?;

    let chat_table = if tables.iter().any(|t| t == CHAT_TABLE) {
        Some(inspect_chat_table(&conn).map_err(ChatStoreError::query(path))?)
    } else {
        None
    };

    Ok(InspectionReport { tables, chat_table })
}

fn list_tables(conn: &Connection) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type='table'")?;
    let tables = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(tables)
}

fn inspect_chat_table(conn: &Connection) -> rusqlite::Result<ChatTableReport> {
    let mut stmt = conn.prepare("PRAGMA table_info(chat)")?;
    let columns = stmt
        .query_map([], |row| {
            Ok(ColumnInfo {
                name: row.get("name")?,
                decl_type: row.get("type")?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let row_count: i64 = conn.query_row("SELECT COUNT(*) FROM chat", [], |row| row.get(0))?;

    let sample = if row_count > 0 {
        sample_record(conn)?
    } else {
        None
    };

    Ok(ChatTableReport {
        columns,
        row_count,
        sample,
    })
}

fn sample_record(conn: &Connection) -> rusqlite::Result<Option<SampleRecord>> {
    let mut stmt = conn.prepare("SELECT * FROM chat LIMIT 1")?;
    let names: Vec<String> = stmt.column_names().iter().map(|s| s.to_string()).collect();
    let mut rows = stmt.query([])?;

    let Some(row) = rows.next()? else {
        return Ok(None);
    };

    let mut fields = Vec::with_capacity(names.len());
    for (idx, name) in names.into_iter().enumerate() {
        let value = match row.get_ref(idx)? {
            ValueRef::Text(bytes) | ValueRef::Blob(bytes)
                if name == "chat" && !bytes.is_empty() =>
            {
                SampleValue::Payload(describe_payload(&String::from_utf8_lossy(bytes)))
            }
            other => SampleValue::Text(truncate(&display_value(other), VALUE_PREVIEW_CHARS)),
        };
        fields.push((name, value));
    }

    Ok(Some(SampleRecord { fields }))
}

/// Parse and summarize one raw payload.
pub fn describe_payload(raw: &str) -> PayloadReport {
    let doc: Value = match serde_json::from_str(raw) {
        Ok(doc) => doc,
        Err(e) => {
            return PayloadReport::Invalid {
                error: e.to_string(),
                raw_preview: raw.chars().take(RAW_PREVIEW_CHARS).collect(),
            }
        }
    };

    let (keys, structure) = match &doc {
        Value::Object(map) => (
            map.keys().cloned().collect(),
            map.iter().map(|(k, v)| describe_entry(k, v)).collect(),
        ),
        Value::Array(items) => (Vec::new(), vec![format!("list with {} items", items.len())]),
        _ => (Vec::new(), Vec::new()),
    };

    let pretty = serde_json::to_string_pretty(&doc).unwrap_or_default();
    let truncated = pretty.chars().count() > JSON_PREVIEW_CHARS;

    let shape = PayloadShape::classify(&doc);
    let messages = shape.messages();

    PayloadOverview {
        json_type: type_name(&doc),
        keys,
        structure,
        preview: pretty.chars().take(JSON_PREVIEW_CHARS).collect(),
        truncated,
        extraction: Extraction {
            location: shape.location(),
            message_count: messages.len(),
            first_message: messages.into_iter().next(),
        },
    }
    .into()
}

impl From<PayloadOverview> for PayloadReport {
    fn from(overview: PayloadOverview) -> Self {
        Self::Parsed(overview)
    }
}

fn describe_entry(key: &str, value: &Value) -> String {
    match value {
        Value::Array(items) => {
            let mut line = format!("{}: list with {} items", key, items.len());
            if let Some(first) = items.first() {
                line.push_str(&format!(", first item type: {}", type_name(first)));
                if let Value::Object(map) = first {
                    let keys: Vec<&str> = map.keys().map(String::as_str).collect();
                    line.push_str(&format!(", first item keys: [{}]", keys.join(", ")));
                }
            }
            line
        }
        Value::Object(map) => {
            let keys: Vec<&str> = map.keys().map(String::as_str).collect();
            format!("{}: dict with keys: [{}]", key, keys.join(", "))
        }
        other => format!("{}: {}", key, type_name(other)),
    }
}

fn display_value(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => "None".to_string(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        ValueRef::Blob(bytes) => format!("<blob {} bytes>", bytes.len()),
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let head: String = s.chars().take(max_chars).collect();
        format!("{}...", head)
    } else {
        s.to_string()
    }
}
