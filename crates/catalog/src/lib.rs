//! Restaurant catalog
//!
//! The catalog is the fixed set of venues every query is ranked against. It is
//! built once at startup (either from the built-in list or from a JSON file)
//! and never mutated afterwards, so it can be shared freely behind an `Arc`.
//!
//! Identity is positional: the record at index `i` is "restaurant `i`" for the
//! lifetime of the process. Anything that pairs data with records (embeddings,
//! ranking output) relies on that ordering staying put.
//!
//! ```
//! use catalog::Catalog;
//!
//! let catalog = Catalog::builtin();
//! assert_eq!(catalog.len(), 7);
//! assert!(catalog.get(1).unwrap().name.contains("笑顔亭"));
//! ```

mod builtin;
pub mod error;
pub mod record;

pub use crate::error::CatalogError;
pub use crate::record::RestaurantRecord;

use std::path::Path;

/// Immutable, index-addressed collection of restaurant records.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    records: Vec<RestaurantRecord>,
}

impl Catalog {
    /// Builds a catalog from `records`, validating every entry.
    ///
    /// Fails on an empty list or on a record without a name or atmosphere
    /// description, since neither can be displayed or embedded.
    pub fn new(records: Vec<RestaurantRecord>) -> Result<Self, CatalogError> {
        if records.is_empty() {
            return Err(CatalogError::Empty);
        }
        for (index, record) in records.iter().enumerate() {
            record
                .validate()
                .map_err(|reason| CatalogError::InvalidRecord { index, reason })?;
        }
        Ok(Self { records })
    }

    /// The seven venues shipped with the application.
    pub fn builtin() -> Self {
        Self {
            records: builtin::records(),
        }
    }

    /// Parses a JSON array of records.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let records: Vec<RestaurantRecord> = serde_json::from_str(json)?;
        Self::new(records)
    }

    /// Reads and parses a JSON catalog file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&RestaurantRecord> {
        self.records.get(index)
    }

    pub fn records(&self) -> &[RestaurantRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RestaurantRecord> {
        self.records.iter()
    }

    /// Atmosphere descriptions in catalog order, ready for batch embedding.
    pub fn atmosphere_texts(&self) -> Vec<&str> {
        self.records
            .iter()
            .map(|r| r.atmosphere_description.as_str())
            .collect()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a RestaurantRecord;
    type IntoIter = std::slice::Iter<'a, RestaurantRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
