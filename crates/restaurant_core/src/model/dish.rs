//! Dish record.

use super::{require_id, trimmed, EntityId, ValidationError};
use crate::extent::Entity;
use crate::model::menu::MenuId;
use serde::{Deserialize, Serialize};

pub type DishId = EntityId;

/// Prepared dish offered by the kitchen.
///
/// `menu_id` is mirrored by the menu's `dish_ids`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dish {
    pub id: DishId,
    pub name: String,
    pub cuisine: String,
    #[serde(default)]
    pub is_vegetarian: bool,
    #[serde(default)]
    pub is_vegan: bool,
    pub price_cents: u32,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) menu_id: Option<MenuId>,
}

impl Dish {
    /// Creates a dish that is not yet on any menu.
    ///
    /// # Errors
    /// - `ValidationError::ZeroId` when `id == 0`.
    /// - `ValidationError::MissingIngredients` when no non-blank ingredient is given.
    pub fn new(
        id: DishId,
        name: impl Into<String>,
        cuisine: impl Into<String>,
        price_cents: u32,
        ingredients: Vec<String>,
    ) -> Result<Self, ValidationError> {
        let id = require_id(Self::KIND, id)?;
        let ingredients: Vec<String> = ingredients
            .into_iter()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .collect();
        if ingredients.is_empty() {
            return Err(ValidationError::MissingIngredients);
        }
        Ok(Self {
            id,
            name: trimmed(name),
            cuisine: trimmed(cuisine),
            is_vegetarian: false,
            is_vegan: false,
            price_cents,
            ingredients,
            menu_id: None,
        })
    }

    pub fn menu_id(&self) -> Option<MenuId> {
        self.menu_id
    }
}

impl Entity for Dish {
    const KIND: &'static str = "Dish";
    type Key = (DishId, String);

    fn id(&self) -> EntityId {
        self.id
    }

    fn key(&self) -> Self::Key {
        (self.id, self.name.clone())
    }

    fn has_links(&self) -> bool {
        self.menu_id.is_some()
    }
}
