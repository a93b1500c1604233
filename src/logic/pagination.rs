use crate::error::{CatalogError, CatalogResult};
use crate::model::Page;

/// Validated `page`/`size` pair. `page` starts at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    size: u32,
}

impl PageRequest {
    pub fn new(page: u32, size: u32, max_size: u32) -> CatalogResult<Self> {
        if page < 1 {
            return Err(CatalogError::invalid_input("page must be at least 1"));
        }
        check_size("size", size, max_size)?;
        Ok(Self { page, size })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.size)
    }

    /// Rows of this page as an offset/limit window.
    pub fn window(&self) -> Window {
        Window {
            offset: self.offset(),
            limit: self.size,
        }
    }
}

/// Raw `skip`/`limit` slice used by the non-paginated listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: u64,
    pub limit: u32,
}

impl Window {
    pub fn new(skip: u64, limit: u32, max_limit: u32) -> CatalogResult<Self> {
        check_size("limit", limit, max_limit)?;
        Ok(Self {
            offset: skip,
            limit,
        })
    }
}

fn check_size(name: &str, value: u32, max: u32) -> CatalogResult<()> {
    if value < 1 || value > max {
        return Err(CatalogError::invalid_input(format!(
            "{} must be between 1 and {}, got {}",
            name, max, value
        )));
    }
    Ok(())
}

/// Paging metadata derived from `(total, page, size)`.
///
/// This is the one place the derivation lives; every paginated path goes
/// through it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub total: u64,
    pub page: u32,
    pub size: u32,
    pub offset: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn compute(total: u64, request: PageRequest) -> Self {
        let page = request.page();
        let size = request.size();
        let total_pages = total.div_ceil(u64::from(size));

        Self {
            total,
            page,
            size,
            offset: request.offset(),
            total_pages,
            has_next: u64::from(page) < total_pages,
            has_prev: page > 1,
        }
    }

    pub fn into_page<T>(self, data: Vec<T>) -> Page<T> {
        Page {
            total: self.total,
            page: self.page,
            size: self.size,
            total_pages: self.total_pages,
            has_next: self.has_next,
            has_prev: self.has_prev,
            data,
        }
    }
}
