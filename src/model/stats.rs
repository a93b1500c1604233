use serde::{Deserialize, Serialize};

/// Artwork count and mean creation year for one museum country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryStats {
    /// Museums without a country form their own group.
    pub country: Option<String>,
    pub artwork_count: u64,
    /// `None` when every artwork in the group lacks a year.
    pub average_year: Option<f64>,
}
