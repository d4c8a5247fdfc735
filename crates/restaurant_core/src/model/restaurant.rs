//! Restaurant record.
//!
//! # Invariants
//! - `table_ids` mirrors every table whose `restaurant_id` points here.
//! - `table_ids` never grows past `max_tables` through the relation API.

use super::{require_id, require_text, EntityId, ValidationError};
use crate::extent::Entity;
use crate::model::table::TableId;
use serde::{Deserialize, Serialize};

pub type RestaurantId = EntityId;

const NAME_MIN_CHARS: usize = 2;
const NAME_MAX_CHARS: usize = 100;

/// Venue aggregating a bounded number of tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: RestaurantId,
    pub name: String,
    /// Upper bound on `table_ids.len()`.
    pub max_tables: u32,
    #[serde(default)]
    pub(crate) table_ids: Vec<TableId>,
}

impl Restaurant {
    /// # Errors
    /// - `ValidationError::InvalidLength` for a name outside 2..=100 characters.
    /// - `ValidationError::ZeroCapacity` when `max_tables == 0`.
    pub fn new(
        id: RestaurantId,
        name: impl Into<String>,
        max_tables: u32,
    ) -> Result<Self, ValidationError> {
        let id = require_id(Self::KIND, id)?;
        let name = require_text("restaurant name", name, NAME_MIN_CHARS, NAME_MAX_CHARS)?;
        if max_tables == 0 {
            return Err(ValidationError::ZeroCapacity);
        }
        Ok(Self {
            id,
            name,
            max_tables,
            table_ids: Vec::new(),
        })
    }

    pub fn table_ids(&self) -> &[TableId] {
        &self.table_ids
    }

    pub fn is_full(&self) -> bool {
        self.table_ids.len() >= self.max_tables as usize
    }
}

impl Entity for Restaurant {
    const KIND: &'static str = "Restaurant";
    type Key = (RestaurantId, String);

    fn id(&self) -> EntityId {
        self.id
    }

    fn key(&self) -> Self::Key {
        (self.id, self.name.clone())
    }

    fn has_links(&self) -> bool {
        !self.table_ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::Restaurant;
    use crate::model::ValidationError;

    #[test]
    fn new_trims_and_bounds_name() {
        let restaurant = Restaurant::new(1, "  Bistro  ", 3).expect("valid restaurant");
        assert_eq!(restaurant.name, "Bistro");
        assert!(matches!(
            Restaurant::new(1, " B ", 3),
            Err(ValidationError::InvalidLength { min: 2, max: 100, .. })
        ));
    }

    #[test]
    fn new_rejects_zero_table_capacity() {
        assert_eq!(
            Restaurant::new(1, "Bistro", 0).expect_err("zero capacity must be rejected"),
            ValidationError::ZeroCapacity
        );
    }
}
