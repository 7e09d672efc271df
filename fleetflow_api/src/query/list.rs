use url::form_urlencoded::Serializer;

use crate::types::ResourceKind;

use super::common::{Query, QueryCommon};

/// Query against a list endpoint: search, pagination and arbitrary
/// `key=value` filters, e.g. `/customers?search=acme&country=KE`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub endpoint: String,
    pub common: QueryCommon,
    pub filters: Vec<(String, String)>,
}

impl Query for ListQuery {
    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }

    fn append_pairs(&self, pairs: &mut Serializer<'_, String>) {
        self.common.append_pairs(pairs);
        for (key, value) in self.filters.iter() {
            pairs.append_pair(key, value);
        }
    }
}

impl ListQuery {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            ..Default::default()
        }
    }

    pub fn for_kind(kind: ResourceKind) -> Self {
        Self::new(kind.endpoint())
    }

    /// Adds a filter. Blank values are skipped, the same way an unset
    /// filter control sends nothing.
    pub fn with_filter(mut self, key: &str, value: &str) -> Self {
        if !value.trim().is_empty() {
            self.filters.push((key.to_string(), value.trim().to_string()));
        }
        self
    }

    pub fn with_filters(mut self, filters: &[(String, String)]) -> Self {
        for (key, value) in filters {
            self = self.with_filter(key, value);
        }
        self
    }

    /// Path plus query string, ready to hand to the client.
    pub fn to_path(&self) -> String {
        let query = self.query_string();
        if query.is_empty() {
            self.endpoint.clone()
        } else if self.endpoint.contains('?') {
            format!("{}&{}", self.endpoint, query)
        } else {
            format!("{}?{}", self.endpoint, query)
        }
    }
}
