use crate::error::{CatalogError, CatalogResult};
use crate::model::{common::is_blank, Id};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: Id,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewGenre {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewGenre {
    pub fn validate(&self) -> CatalogResult<()> {
        if is_blank(&self.name) {
            return Err(CatalogError::invalid_input("genre name must not be empty"));
        }
        Ok(())
    }

    pub fn into_genre(self, id: Id) -> Genre {
        Genre {
            id,
            name: self.name,
            description: self.description,
        }
    }
}
