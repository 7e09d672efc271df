//! Shared query infrastructure: the [`Query`] trait and [`QueryCommon`] fields.

use url::form_urlencoded::Serializer;

/// Trait implemented by all query builders. Provides query-string
/// serialization and shared builder methods for search and pagination.
pub trait Query {
    /// Appends this query's parameters to the serializer.
    fn append_pairs(&self, pairs: &mut Serializer<'_, String>);

    /// Returns a mutable reference to the common query fields.
    fn get_common(&mut self) -> &mut QueryCommon;

    /// Free-text search. Blank terms are not sent.
    fn with_search(mut self, search: &str) -> Self
    where
        Self: Sized,
    {
        let search = search.trim();
        self.get_common().search = if search.is_empty() {
            None
        } else {
            Some(search.to_string())
        };
        self
    }

    /// Sets the page number (1-indexed).
    fn with_page(mut self, page: i64) -> Self
    where
        Self: Sized,
    {
        self.get_common().page = Some(page);
        self
    }

    /// Sets the number of results per page.
    fn with_per_page(mut self, per_page: i64) -> Self
    where
        Self: Sized,
    {
        self.get_common().per_page = Some(per_page);
        self
    }

    /// Encoded query string without the leading `?`; empty when there is nothing to send.
    fn query_string(&self) -> String {
        let mut pairs = Serializer::new(String::new());
        self.append_pairs(&mut pairs);
        pairs.finish()
    }
}

/// Fields shared by all query types. Everything is optional: the server
/// applies its own defaults for anything not sent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryCommon {
    pub search: Option<String>,
    /// Page number (1-indexed).
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl QueryCommon {
    /// Appends `search`, `page` and `per_page`, in that order.
    pub fn append_pairs(&self, pairs: &mut Serializer<'_, String>) {
        if let Some(search) = &self.search {
            pairs.append_pair("search", search);
        }
        if let Some(page) = self.page {
            pairs.append_pair("page", &page.to_string());
        }
        if let Some(per_page) = self.per_page {
            pairs.append_pair("per_page", &per_page.to_string());
        }
    }
}
