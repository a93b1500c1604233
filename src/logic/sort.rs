use crate::model::{ArtworkSort, SortDirection, SortField};

/// Maps the `sort_by` / `sort_order` query parameters onto an ordering.
///
/// Unknown field names quietly fall back to `id` and anything other than
/// `desc` (in any case) sorts ascending. Existing clients depend on both
/// fallbacks, so neither reports an error.
pub struct SortResolver;

impl SortResolver {
    pub fn resolve(sort_by: Option<&str>, sort_order: Option<&str>) -> ArtworkSort {
        ArtworkSort::new(Self::field(sort_by), Self::direction(sort_order))
    }

    pub fn field(sort_by: Option<&str>) -> SortField {
        match sort_by {
            Some("year") => SortField::Year,
            Some("title") => SortField::Title,
            Some("created_at") => SortField::CreatedAt,
            _ => SortField::Id,
        }
    }

    pub fn direction(sort_order: Option<&str>) -> SortDirection {
        match sort_order {
            Some(order) if order.eq_ignore_ascii_case("desc") => SortDirection::Desc,
            _ => SortDirection::Asc,
        }
    }
}
