use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, CatalogResult};
use crate::model::{common::is_blank, Id, Metadata};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artwork {
    pub id: Id,
    pub title: String,
    pub artist_id: Id,
    pub genre_id: Id,
    pub museum_id: Id,
    pub year_created: Option<i32>,
    pub description: Option<String>,
    pub metadata_json: Option<Metadata>,
    /// Set by the store on insert and never updated afterwards.
    pub created_at: DateTime<Utc>,
}

/// Insert payload for an artwork. The store stamps `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewArtwork {
    pub title: String,
    pub artist_id: Id,
    pub genre_id: Id,
    pub museum_id: Id,
    #[serde(default)]
    pub year_created: Option<i32>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub metadata_json: Option<Metadata>,
}

impl NewArtwork {
    pub fn validate(&self) -> CatalogResult<()> {
        if is_blank(&self.title) {
            return Err(CatalogError::invalid_input("artwork title must not be empty"));
        }
        Ok(())
    }

    pub fn into_artwork(self, id: Id, created_at: DateTime<Utc>) -> Artwork {
        Artwork {
            id,
            title: self.title,
            artist_id: self.artist_id,
            genre_id: self.genre_id,
            museum_id: self.museum_id,
            year_created: self.year_created,
            description: self.description,
            metadata_json: self.metadata_json,
            created_at,
        }
    }
}
