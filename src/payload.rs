//! Payload normalization for the `chat` column.
//!
//! Open WebUI moved the message list around between releases. Observed
//! layouts, checked in this order:
//!
//! ```text
//! {"messages": [...]}                  -> messages
//! {"history": {"messages": ...}}       -> history.messages
//! {"history": [...]}                   -> history
//! [...]                                -> the document itself
//! anything else                        -> no messages
//! ```
//!
//! Messages themselves stay opaque `serde_json::Value`s.

use serde_json::Value;

/// Where the message list lives inside a payload document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PayloadShape<'a> {
    /// Top-level object with a `messages` key.
    Messages(&'a Value),
    /// `history` is an object holding `messages`.
    HistoryMessages(&'a Value),
    /// `history` is present but is not an object holding `messages`.
    History(&'a Value),
    /// Document is itself an array.
    BareList(&'a Value),
    /// No known location.
    Unrecognized,
}

impl<'a> PayloadShape<'a> {
    pub fn classify(doc: &'a Value) -> Self {
        match doc {
            Value::Object(map) => match (map.get("messages"), map.get("history")) {
                (Some(messages), _) => Self::Messages(messages),
                (None, Some(Value::Object(history))) if history.contains_key("messages") => {
                    Self::HistoryMessages(&history["messages"])
                }
                (None, Some(history)) => Self::History(history),
                (None, None) => Self::Unrecognized,
            },
            Value::Array(_) => Self::BareList(doc),
            _ => Self::Unrecognized,
        }
    }

    /// Dotted path of the matched location, for diagnostics.
    pub fn location(&self) -> Option<&'static str> {
        match self {
            Self::Messages(_) => Some("messages"),
            Self::HistoryMessages(_) => Some("history.messages"),
            Self::History(_) => Some("history"),
            Self::BareList(_) => Some("(root)"),
            Self::Unrecognized => None,
        }
    }

    /// The selected value, if any.
    pub fn selected(&self) -> Option<&'a Value> {
        match *self {
            Self::Messages(v) | Self::HistoryMessages(v) | Self::History(v) | Self::BareList(v) => {
                Some(v)
            }
            Self::Unrecognized => None,
        }
    }

    pub fn messages(&self) -> Vec<Value> {
        match *self {
            // Open WebUI keys this map by message id
            Self::HistoryMessages(Value::Object(map)) => map.values().cloned().collect(),
            Self::Messages(v) | Self::HistoryMessages(v) | Self::History(v) | Self::BareList(v) => {
                list_items(v)
            }
            Self::Unrecognized => Vec::new(),
        }
    }
}

/// Messages of a parsed payload document, in stored order.
pub fn extract_messages(doc: &Value) -> Vec<Value> {
    PayloadShape::classify(doc).messages()
}

/// Elements of an array; any other value holds no messages.
fn list_items(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items.clone(),
        _ => Vec::new(),
    }
}

/// JSON type name as shown in inspection output.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_top_level_messages() {
        let doc = json!({
            "messages": [
                {"role": "user", "content": "hi"},
                {"role": "assistant", "content": "hello"}
            ],
            "history": {"messages": [{"role": "system", "content": "ignored"}]}
        });

        let shape = PayloadShape::classify(&doc);
        assert_eq!(shape.location(), Some("messages"));
        let messages = shape.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["content"], "hi");
        assert_eq!(messages[1]["content"], "hello");
    }

    #[test]
    fn test_nested_history_messages() {
        let doc = json!({"history": {"messages": [{"role": "user", "content": "a"}], "currentId": "x"}});

        let shape = PayloadShape::classify(&doc);
        assert_eq!(shape.location(), Some("history.messages"));
        assert_eq!(shape.messages(), vec![json!({"role": "user", "content": "a"})]);
    }

    #[test]
    fn test_history_map_keeps_document_order() {
        let doc: Value = serde_json::from_str(
            r#"{"history": {"messages": {"zz": {"content": "first"}, "aa": {"content": "second"}}}}"#,
        )
        .unwrap();

        let messages = extract_messages(&doc);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["content"], "first");
        assert_eq!(messages[1]["content"], "second");
    }

    #[test]
    fn test_history_list() {
        let doc = json!({"history": [{"content": "1"}, {"content": "2"}]});

        let shape = PayloadShape::classify(&doc);
        assert_eq!(shape.location(), Some("history"));
        assert_eq!(shape.messages(), vec![json!({"content": "1"}), json!({"content": "2"})]);
    }

    #[test]
    fn test_history_object_without_messages_is_empty() {
        let doc = json!({"history": {"currentId": "m2", "models": ["gpt"]}});

        let shape = PayloadShape::classify(&doc);
        assert!(matches!(shape, PayloadShape::History(_)));
        // Metadata fields are not messages
        assert!(shape.messages().is_empty());
    }

    #[test]
    fn test_top_level_messages_object_is_empty() {
        let doc = json!({"messages": {"a": {"content": "x"}}});
        assert!(extract_messages(&doc).is_empty());
    }

    #[test]
    fn test_history_scalar_is_empty() {
        let doc = json!({"history": "legacy"});

        let shape = PayloadShape::classify(&doc);
        assert_eq!(shape.location(), Some("history"));
        assert!(shape.messages().is_empty());
    }

    #[test]
    fn test_bare_list() {
        let doc = json!([{"role": "user"}, {"role": "assistant"}]);

        let shape = PayloadShape::classify(&doc);
        assert_eq!(shape.location(), Some("(root)"));
        assert_eq!(shape.messages(), vec![json!({"role": "user"}), json!({"role": "assistant"})]);
    }

    #[test]
    fn test_unrecognized_shapes() {
        for doc in [json!({"title": "x"}), json!("text"), json!(42), Value::Null] {
            let shape = PayloadShape::classify(&doc);
            assert_eq!(shape, PayloadShape::Unrecognized);
            assert!(shape.messages().is_empty());
        }
    }

    #[test]
    fn test_null_messages_is_empty() {
        let doc = json!({"messages": null, "history": [{"content": "unused"}]});
        assert!(extract_messages(&doc).is_empty());
    }

    #[test]
    fn test_type_names() {
        assert_eq!(type_name(&json!({})), "dict");
        assert_eq!(type_name(&json!([])), "list");
        assert_eq!(type_name(&json!(1)), "int");
        assert_eq!(type_name(&json!(1.5)), "float");
        assert_eq!(type_name(&json!("s")), "str");
    }
}
