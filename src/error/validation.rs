//! Field-level validation error type.
//!
//! Write endpoints reject malformed or duplicate input with a per-field
//! error body of the form `{"field": ["message", ...]}`. This module parses
//! that shape so callers can surface each message next to its field.

use std::collections::BTreeMap;
use std::fmt;

/// A field-level rejection from a write endpoint.
///
/// Not fatal to the session; surfaced per-field to the caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationError {
    /// Messages keyed by field name. Non-field errors use the server's
    /// `non_field_errors` / `detail` keys as-is.
    pub fields: BTreeMap<String, Vec<String>>,
}

impl ValidationError {
    /// Create a validation error with a single field message.
    pub fn single(field: &str, message: &str) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(field.to_string(), vec![message.to_string()]);
        Self { fields }
    }

    /// Parse a server error body into per-field messages.
    ///
    /// Returns `None` when the body is not the expected field-map shape, in
    /// which case the caller should fall back to a status-level error.
    pub fn from_body(body: &[u8]) -> Option<Self> {
        let value: serde_json::Value = serde_json::from_slice(body).ok()?;
        let map = value.as_object()?;
        if map.is_empty() {
            return None;
        }

        let mut fields = BTreeMap::new();
        for (field, messages) in map {
            let collected: Vec<String> = match messages {
                serde_json::Value::Array(items) => items
                    .iter()
                    .filter_map(|m| m.as_str().map(str::to_string))
                    .collect(),
                serde_json::Value::String(s) => vec![s.clone()],
                _ => return None,
            };
            if collected.is_empty() {
                return None;
            }
            fields.insert(field.clone(), collected);
        }
        Some(Self { fields })
    }

    /// Get the messages for one field.
    pub fn messages_for(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Get a user-friendly summary of the first message.
    pub fn user_message(&self) -> String {
        self.fields
            .iter()
            .next()
            .and_then(|(field, messages)| {
                messages.first().map(|m| {
                    if field == "non_field_errors" || field == "detail" {
                        m.clone()
                    } else {
                        format!("{}: {}", field, m)
                    }
                })
            })
            .unwrap_or_else(|| "The request was rejected.".to_string())
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed")?;
        for (field, messages) in &self.fields {
            write!(f, "; {}: {}", field, messages.join(", "))?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}
