use serde::{Deserialize, Serialize};

/// A single venue. Immutable once the catalog is built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RestaurantRecord {
    pub name: String,
    /// Free-text ambience description; this is the field that gets embedded.
    pub atmosphere_description: String,
    pub exterior_image_url: String,
    pub menu_text: String,
    pub product_image_url: String,
    /// Average spend per person, in yen.
    pub average_price: u32,
    pub address: String,
    /// Rough 1-10 indicator of how broad the clientele is.
    pub customer_demographics_score: u8,
}

impl RestaurantRecord {
    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name is empty".into());
        }
        if self.atmosphere_description.trim().is_empty() {
            return Err("atmosphere description is empty".into());
        }
        Ok(())
    }
}
