//! Parking valet record.

use super::{require_id, require_text, EntityId, ValidationError};
use crate::extent::Entity;
use serde::{Deserialize, Serialize};

pub type ValetId = EntityId;

const LOCATION_MIN_CHARS: usize = 3;
const LOCATION_MAX_CHARS: usize = 100;

/// Valet stationed at one location. Carries no relationship links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Valet {
    pub id: ValetId,
    pub assigned_location: String,
}

impl Valet {
    /// # Errors
    /// - `ValidationError::InvalidLength` for a location outside 3..=100 characters.
    pub fn new(id: ValetId, assigned_location: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self {
            id: require_id(Self::KIND, id)?,
            assigned_location: require_text(
                "assigned location",
                assigned_location,
                LOCATION_MIN_CHARS,
                LOCATION_MAX_CHARS,
            )?,
        })
    }
}

impl Entity for Valet {
    const KIND: &'static str = "Valet";
    type Key = (ValetId, String);

    fn id(&self) -> EntityId {
        self.id
    }

    fn key(&self) -> Self::Key {
        (self.id, self.assigned_location.clone())
    }
}
