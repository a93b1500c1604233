use crate::error::{CatalogError, CatalogResult};
use crate::model::{common::is_blank, Id};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Museum {
    pub id: Id,
    pub name: String,
    pub city: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMuseum {
    pub name: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl NewMuseum {
    pub fn validate(&self) -> CatalogResult<()> {
        if is_blank(&self.name) {
            return Err(CatalogError::invalid_input("museum name must not be empty"));
        }
        Ok(())
    }

    pub fn into_museum(self, id: Id) -> Museum {
        Museum {
            id,
            name: self.name,
            city: self.city,
            country: self.country,
        }
    }
}
