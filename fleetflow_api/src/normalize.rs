//! Response envelope detection.
//!
//! The backend has answered list endpoints in several shapes over its
//! life. This module is the one place that decides which shape a payload
//! has. Precedence is fixed and the first match wins:
//!
//! 1. nested paginator: `{"data": {"data": [...], "current_page": 1, ...}}`
//! 2. legacy paginator: `{"data": [...], "links": {...}, "meta": {...}}`
//! 3. bare array: `[...]`
//! 4. anything else
//!
//! Detection only looks at the container; the contents of the items are
//! never inspected. Nothing here fails: payloads that match no envelope
//! degrade to "no data".

use serde_json::{Map, Value};

use crate::types::{Pagination, PaginationLinks, PaginationMeta};

/// The envelope a payload was sent in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Envelope {
    Nested,
    Legacy,
    BareArray,
    Bare,
}

/// Canonical form of a collection response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized {
    pub items: Vec<Value>,
    pub pagination: Pagination,
}

/// Classifies `payload`.
pub fn detect(payload: &Value) -> Envelope {
    match payload {
        Value::Object(obj) => match obj.get("data") {
            Some(Value::Object(inner)) if matches!(inner.get("data"), Some(Value::Array(_))) => {
                Envelope::Nested
            }
            Some(Value::Array(_)) => Envelope::Legacy,
            _ => Envelope::Bare,
        },
        Value::Array(_) => Envelope::BareArray,
        _ => Envelope::Bare,
    }
}

/// Extracts items and pagination for list consumers.
pub fn normalize_collection(payload: Value) -> Normalized {
    match detect(&payload) {
        Envelope::Nested => {
            let mut paginator = take_data_object(payload);
            let items = take_array(&mut paginator, "data");
            Normalized {
                items,
                pagination: Pagination {
                    links: PaginationLinks::from_nested(&paginator),
                    meta: PaginationMeta::from_fields(&paginator),
                },
            }
        }
        Envelope::Legacy => {
            let mut envelope = match payload {
                Value::Object(obj) => obj,
                _ => Map::new(),
            };
            let items = take_array(&mut envelope, "data");
            let links = envelope
                .get("links")
                .and_then(Value::as_object)
                .map(PaginationLinks::from_legacy)
                .unwrap_or_default();
            let meta = envelope
                .get("meta")
                .and_then(Value::as_object)
                .map(PaginationMeta::from_fields)
                .unwrap_or_default();
            Normalized {
                items,
                pagination: Pagination { links, meta },
            }
        }
        Envelope::BareArray => Normalized {
            items: match payload {
                Value::Array(items) => items,
                _ => Vec::new(),
            },
            pagination: Pagination::default(),
        },
        Envelope::Bare => Normalized::default(),
    }
}

/// Extracts the payload for single-value consumers: the item array of a
/// paginated envelope, or the payload itself.
pub fn normalize_single(payload: Value) -> Value {
    match detect(&payload) {
        Envelope::Nested => {
            let mut paginator = take_data_object(payload);
            paginator.remove("data").unwrap_or(Value::Array(Vec::new()))
        }
        Envelope::Legacy => match payload {
            Value::Object(mut obj) => obj.remove("data").unwrap_or(Value::Array(Vec::new())),
            other => other,
        },
        Envelope::BareArray | Envelope::Bare => payload,
    }
}

/// Unwraps a `{"data": {...}}` resource wrapper around a single object.
/// Used where the backend answers a member endpoint either bare or wrapped
/// (`/auth/me`, `/auth/access-token`). Anything else is returned unchanged.
pub fn unwrap_data_object(payload: Value) -> Value {
    match payload {
        Value::Object(mut obj) if matches!(obj.get("data"), Some(Value::Object(_))) => {
            obj.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

fn take_data_object(payload: Value) -> Map<String, Value> {
    match payload {
        Value::Object(mut obj) => match obj.remove("data") {
            Some(Value::Object(inner)) => inner,
            _ => Map::new(),
        },
        _ => Map::new(),
    }
}

fn take_array(obj: &mut Map<String, Value>, key: &str) -> Vec<Value> {
    match obj.remove(key) {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unwrap_wrapped_and_bare() {
        assert_eq!(
            unwrap_data_object(json!({"data": {"id": 1}})),
            json!({"id": 1})
        );
        assert_eq!(unwrap_data_object(json!({"id": 1})), json!({"id": 1}));
        assert_eq!(
            unwrap_data_object(json!({"data": [1, 2]})),
            json!({"data": [1, 2]})
        );
    }

    #[test]
    fn single_keeps_bare_object() {
        let payload = json!({"id": 3, "code": "INV-3"});
        assert_eq!(normalize_single(payload.clone()), payload);
    }
}
