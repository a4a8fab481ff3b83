use serde::{Deserialize, Serialize};

use crate::types::DocumentId;

/// Direction of the timestamp ordering applied to a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OrderDirection {
    #[default]
    Ascending,
    Descending,
}

/// Arguments of one cursor-paginated query against a schema.
///
/// `not_in` excludes documents by id at the query layer — already-seen
/// records never travel the wire again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryArgs {
    /// Page size; the store's default applies when unset.
    pub first: Option<u32>,
    /// Cursor returned by the previous page, if any.
    pub after: Option<String>,
    pub direction: OrderDirection,
    /// Document ids to exclude from the result set.
    pub not_in: Vec<DocumentId>,
}

impl QueryArgs {
    pub fn first(n: u32) -> Self {
        Self {
            first: Some(n),
            ..Self::default()
        }
    }

    pub fn after(mut self, cursor: impl Into<String>) -> Self {
        self.after = Some(cursor.into());
        self
    }

    pub fn descending(mut self) -> Self {
        self.direction = OrderDirection::Descending;
        self
    }

    pub fn excluding(mut self, ids: impl IntoIterator<Item = DocumentId>) -> Self {
        self.not_in = ids.into_iter().collect();
        self
    }
}

/// One page of a cursor-paginated result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Total number of documents matching the query's filter, across all
    /// pages.
    pub total_count: u64,
    pub has_next_page: bool,
    /// Cursor to pass as `after` for the next page.
    pub end_cursor: Option<String>,
    pub documents: Vec<T>,
}

impl<T> Page<T> {
    /// An empty result — zero matches, no further pages.
    pub fn empty() -> Self {
        Self {
            total_count: 0,
            has_next_page: false,
            end_cursor: None,
            documents: Vec::new(),
        }
    }
}
