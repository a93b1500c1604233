use serde::{Deserialize, Serialize};

/// Paginated response envelope. The derived fields are produced by
/// `logic::pagination::Pagination` from `(total, page, size)` and never set
/// on their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub total: u64,
    pub page: u32,
    pub size: u32,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
    pub data: Vec<T>,
}
