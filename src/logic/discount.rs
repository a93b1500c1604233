use serde_json::{Number, Value};

use crate::error::{CatalogError, CatalogResult};
use crate::model::Metadata;
use crate::store::traits::MetadataRewriter;

pub const ESTIMATED_VALUE_KEY: &str = "estimated_value_usd";
pub const HAS_DISCOUNT_KEY: &str = "has_discount";
pub const DISCOUNT_PERCENT_KEY: &str = "discount_percent";

/// Values strictly above this are discounted.
pub const EXPENSIVE_THRESHOLD: f64 = 1_000_000.0;

/// One discount campaign: a percent applied to every expensive artwork.
///
/// There is no idempotency key. Running the same campaign twice discounts
/// qualifying documents twice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscountCampaign {
    percent: f64,
}

impl DiscountCampaign {
    pub fn new(percent: f64) -> CatalogResult<Self> {
        if !percent.is_finite() || !(0.0..=100.0).contains(&percent) {
            return Err(CatalogError::invalid_input(format!(
                "discount_percent must be between 0 and 100, got {}",
                percent
            )));
        }
        Ok(Self { percent })
    }

    pub fn percent(&self) -> f64 {
        self.percent
    }

    /// Discount the document in place if it holds a numeric estimated value
    /// above the threshold. Returns whether the document was changed.
    ///
    /// Missing keys and non-numeric values leave the document untouched.
    pub fn apply(&self, document: &mut Metadata) -> bool {
        let Some(value) = document.get(ESTIMATED_VALUE_KEY).and_then(Value::as_f64) else {
            return false;
        };
        if value <= EXPENSIVE_THRESHOLD {
            return false;
        }

        let discounted = value * (1.0 - self.percent / 100.0);
        let (Some(discounted), Some(percent)) =
            (Number::from_f64(discounted), Number::from_f64(self.percent))
        else {
            return false;
        };

        document.insert(ESTIMATED_VALUE_KEY.to_string(), Value::Number(discounted));
        document.insert(HAS_DISCOUNT_KEY.to_string(), Value::Bool(true));
        document.insert(DISCOUNT_PERCENT_KEY.to_string(), Value::Number(percent));
        true
    }
}

impl MetadataRewriter for DiscountCampaign {
    fn rewrite(&self, document: &mut Metadata) -> bool {
        self.apply(document)
    }
}
