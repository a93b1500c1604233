use serde::{Deserialize, Serialize};

/// Artwork attribute a listing can be ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    Id,
    Year,
    Title,
    CreatedAt,
}

impl SortField {
    /// SQL ordering expression over the `artworks` table. Titles compare
    /// bytewise under the `C` collation, like `str` ordering.
    pub fn order_expression(self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Year => "year_created",
            SortField::Title => "title COLLATE \"C\"",
            SortField::CreatedAt => "created_at",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn keyword(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Ordering criterion applied to an artwork listing. Rows that tie on the
/// field come back in ascending id order in both stores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtworkSort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl ArtworkSort {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Identity ascending, the order used by metadata search.
    pub fn by_id() -> Self {
        Self::default()
    }
}
