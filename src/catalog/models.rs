//! Product records and list parameters.
//!
//! Products are opaque: apart from `id` and `tags`, every field is carried
//! through untouched and in file order.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_LIMIT: usize = 25;

/// A single product record as stored in the dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Product(Map<String, Value>);

impl Product {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Raw identifier value, string or number
    pub fn id(&self) -> Option<&Value> {
        self.0.get("id")
    }

    /// Strict identifier match against a path segment.
    ///
    /// Path identifiers are always strings, so numeric ids never match.
    pub fn has_id(&self, id: &str) -> bool {
        matches!(self.id(), Some(Value::String(own)) if own == id)
    }

    /// True if any tag object carries exactly this `title`
    pub fn has_tag(&self, title: &str) -> bool {
        self.0
            .get("tags")
            .and_then(Value::as_array)
            .is_some_and(|tags| {
                tags.iter()
                    .any(|tag| tag.get("title").and_then(Value::as_str) == Some(title))
            })
    }
}

/// Filtering and pagination for `Catalog::list`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub offset: usize,
    pub limit: usize,
    pub tag: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_LIMIT,
            tag: None,
        }
    }
}
