//! Row and paging types shared by every repository backend.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::filter::FilterSet;

/// A stored entity row: declared attributes plus `id`, `created_at` and
/// `updated_at`.
pub type Record = Map<String, Value>;

/// System-managed attributes; never writable through the API.
pub const SYSTEM_FIELDS: [&str; 3] = ["id", "created_at", "updated_at"];

/// Read the `id` of a stored record.
pub fn record_id(record: &Record) -> Option<i64> {
    record.get("id").and_then(Value::as_i64)
}

/// Read an integer attribute (usually a foreign key).
pub fn record_i64(record: &Record, field: &str) -> Option<i64> {
    record.get(field).and_then(Value::as_i64)
}

/// Read a string attribute.
pub fn record_str<'a>(record: &'a Record, field: &str) -> Option<&'a str> {
    record.get(field).and_then(Value::as_str)
}

/// Read a boolean attribute, treating missing/null as `false`.
pub fn record_flag(record: &Record, field: &str) -> bool {
    record.get(field).and_then(Value::as_bool).unwrap_or(false)
}

/// Requested page window (1-based page number).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u64,
    pub per_page: u64,
}

impl PageRequest {
    pub fn new(page: u64, per_page: u64) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    /// A single page wide enough for internal lookups.
    pub fn all() -> Self {
        Self::new(1, u32::MAX as u64)
    }

    /// Number of rows to skip.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, 25)
    }
}

/// One page of results plus the total row count of the filtered set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

impl<T> Page<T> {
    /// Slice an already filtered, ordered collection.
    pub fn from_vec(rows: Vec<T>, request: PageRequest) -> Self {
        let total = rows.len() as u64;
        let items = rows
            .into_iter()
            .skip(request.offset() as usize)
            .take(request.per_page as usize)
            .collect();
        Self {
            items,
            total,
            page: request.page,
            per_page: request.per_page,
        }
    }

    /// Number of pages needed for `total` rows (at least one).
    pub fn total_pages(&self) -> u64 {
        if self.total == 0 {
            1
        } else {
            self.total.div_ceil(self.per_page)
        }
    }
}

/// A parent row plus child rows pointing at it, written all-or-nothing.
#[derive(Debug, Clone)]
pub struct NewFamily {
    pub entity: String,
    pub attrs: Record,
    /// The write is refused when a row of `entity` already matches this.
    pub unique: FilterSet,
    pub child_entity: String,
    /// Set on every child to the new parent's id.
    pub foreign_key: String,
    pub children: Vec<Record>,
}

/// Rows stored by a successful family insert.
#[derive(Debug, Clone)]
pub struct InsertedFamily {
    pub parent: Record,
    pub children: Vec<Record>,
}

/// Connection pool figures reported by `/health`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoolStats {
    pub connections_in_use: u32,
    pub idle_connections: u32,
    pub max_size: u32,
    pub total_queries: u64,
    pub failed_queries: u64,
    pub retried_operations: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_clamps_to_one() {
        let req = PageRequest::new(0, 0);
        assert_eq!(req.page, 1);
        assert_eq!(req.per_page, 1);
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn test_page_from_vec_slices_window() {
        let page = Page::from_vec((1..=12).collect::<Vec<_>>(), PageRequest::new(2, 5));
        assert_eq!(page.items, vec![6, 7, 8, 9, 10]);
        assert_eq!(page.total, 12);
        assert_eq!(page.total_pages(), 3);
    }

    #[test]
    fn test_page_past_the_end_is_empty() {
        let page = Page::from_vec(vec![1, 2, 3], PageRequest::new(4, 2));
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages(), 2);
    }

    #[test]
    fn test_empty_set_has_one_page() {
        let page: Page<i32> = Page::from_vec(vec![], PageRequest::default());
        assert_eq!(page.total_pages(), 1);
    }
}
