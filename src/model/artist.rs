use crate::error::{CatalogError, CatalogResult};
use crate::model::{common::is_blank, Id};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    pub id: Id,
    pub name: String,
    pub country: Option<String>,
    pub birth_year: Option<i32>,
    pub death_year: Option<i32>,
}

/// Insert payload for an artist; the id is assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewArtist {
    pub name: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub birth_year: Option<i32>,
    #[serde(default)]
    pub death_year: Option<i32>,
}

impl NewArtist {
    pub fn validate(&self) -> CatalogResult<()> {
        if is_blank(&self.name) {
            return Err(CatalogError::invalid_input("artist name must not be empty"));
        }
        if let (Some(born), Some(died)) = (self.birth_year, self.death_year) {
            if died < born {
                return Err(CatalogError::invalid_input(format!(
                    "death_year {} precedes birth_year {}",
                    died, born
                )));
            }
        }
        Ok(())
    }

    pub fn into_artist(self, id: Id) -> Artist {
        Artist {
            id,
            name: self.name,
            country: self.country,
            birth_year: self.birth_year,
            death_year: self.death_year,
        }
    }
}
