use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Server-assigned identity of a record: numeric or string (UUID), never
/// changed after creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
    Int(i64),
    Str(String),
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceId::Int(id) => write!(f, "{}", id),
            ResourceId::Str(id) => write!(f, "{}", id),
        }
    }
}

impl From<i64> for ResourceId {
    fn from(id: i64) -> Self {
        ResourceId::Int(id)
    }
}

impl From<&str> for ResourceId {
    fn from(id: &str) -> Self {
        ResourceId::Str(id.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(id: String) -> Self {
        ResourceId::Str(id)
    }
}

impl ResourceId {
    /// Parses a command-line style id: digits become `Int`, anything else `Str`.
    pub fn parse(raw: &str) -> Self {
        match raw.parse::<i64>() {
            Ok(id) => ResourceId::Int(id),
            Err(_) => ResourceId::Str(raw.to_string()),
        }
    }

    /// Loose equality used when matching ids that may arrive as `5` or `"5"`.
    pub fn matches(&self, other: &ResourceId) -> bool {
        self.to_string() == other.to_string()
    }
}

/// Anything addressable as `endpoint/{id}`.
pub trait Entity {
    fn id(&self) -> &ResourceId;
}

/// An opaque record: the `id` plus every other field passed through as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: ResourceId,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Entity for Resource {
    fn id(&self) -> &ResourceId {
        &self.id
    }
}

impl Resource {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Follows a dotted path through nested objects, e.g. `vehicle_type.name`.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let mut current = self.fields.get(parts.next()?)?;
        for part in parts {
            current = current.as_object()?.get(part)?;
        }
        Some(current)
    }
}

/// Fields the server assigns; a create request never carries them.
pub const SERVER_ASSIGNED_FIELDS: &[&str] = &["id", "created_at", "updated_at"];

/// Serializes `value` and strips [`SERVER_ASSIGNED_FIELDS`] when the result
/// is an object. Non-object values are returned unchanged.
pub fn mutation_intent<T>(value: &T) -> Result<Value, serde_json::Error>
where
    T: Serialize + ?Sized,
{
    let mut intent = serde_json::to_value(value)?;
    if let Some(obj) = intent.as_object_mut() {
        for field in SERVER_ASSIGNED_FIELDS {
            obj.remove(*field);
        }
    }
    Ok(intent)
}
