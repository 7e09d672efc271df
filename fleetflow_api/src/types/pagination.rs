use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Navigation links of a paginated collection. Values are full URLs or
/// paths, whatever the server sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

/// Position metadata of a paginated collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_page: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_page: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_page: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<i64>,
}

/// Links plus metadata. Both halves are empty for unpaginated responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub links: PaginationLinks,
    pub meta: PaginationMeta,
}

impl PaginationLinks {
    /// Reads `first`/`last`/`prev`/`next` from a legacy `links` object.
    pub fn from_legacy(obj: &Map<String, Value>) -> Self {
        Self {
            first: str_field(obj, "first"),
            last: str_field(obj, "last"),
            prev: str_field(obj, "prev"),
            next: str_field(obj, "next"),
        }
    }

    /// Reads the `*_page_url` fields of a nested paginator object.
    pub fn from_nested(obj: &Map<String, Value>) -> Self {
        Self {
            first: str_field(obj, "first_page_url"),
            last: str_field(obj, "last_page_url"),
            prev: str_field(obj, "prev_page_url"),
            next: str_field(obj, "next_page_url"),
        }
    }
}

impl PaginationMeta {
    /// Reads the metadata fields from either a legacy `meta` object or a
    /// nested paginator object; both use the same field names. Integers sent
    /// as numeric strings are accepted, anything else is dropped.
    pub fn from_fields(obj: &Map<String, Value>) -> Self {
        Self {
            current_page: int_field(obj, "current_page"),
            from: int_field(obj, "from"),
            last_page: int_field(obj, "last_page"),
            path: str_field(obj, "path"),
            per_page: int_field(obj, "per_page"),
            to: int_field(obj, "to"),
            total: int_field(obj, "total"),
        }
    }
}

impl Pagination {
    /// Pagination controls are only worth showing when there is a nonzero total.
    pub fn shows_controls(&self) -> bool {
        self.meta.total.is_some_and(|total| total > 0)
    }

    pub fn next_link(&self) -> Option<&str> {
        self.links.next.as_deref().filter(|l| !l.is_empty())
    }

    pub fn prev_link(&self) -> Option<&str> {
        self.links.prev.as_deref().filter(|l| !l.is_empty())
    }

    pub fn has_next(&self) -> bool {
        self.next_link().is_some()
    }

    pub fn has_prev(&self) -> bool {
        self.prev_link().is_some()
    }

    /// "Showing 1 to 15 of 42 results". Missing numbers read as zero.
    pub fn summary(&self) -> String {
        format!(
            "Showing {} to {} of {} results",
            self.meta.from.unwrap_or(0),
            self.meta.to.unwrap_or(0),
            self.meta.total.unwrap_or(0)
        )
    }
}

fn str_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

fn int_field(obj: &Map<String, Value>, key: &str) -> Option<i64> {
    match obj.get(key)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
