use crate::model::Id;
use serde::{Deserialize, Serialize};

/// Optional narrowing criteria for artwork listings. Every field is
/// independent: `None` means "no restriction", and `Some(0)` is a real
/// identity to filter on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArtworkFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_year: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_year: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist_id: Option<Id>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub museum_id: Option<Id>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre_id: Option<Id>,
}
