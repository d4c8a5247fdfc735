//! Menu record.

use super::{require_id, trimmed, EntityId, ValidationError};
use crate::extent::Entity;
use crate::model::dish::DishId;
use serde::{Deserialize, Serialize};

pub type MenuId = EntityId;

/// Named collection of dishes.
///
/// `dish_ids` mirrors every dish whose `menu_id` points here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Menu {
    pub id: MenuId,
    pub name: String,
    pub menu_type: String,
    #[serde(default)]
    pub(crate) dish_ids: Vec<DishId>,
}

impl Menu {
    pub fn new(
        id: MenuId,
        name: impl Into<String>,
        menu_type: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id: require_id(Self::KIND, id)?,
            name: trimmed(name),
            menu_type: trimmed(menu_type),
            dish_ids: Vec::new(),
        })
    }

    pub fn dish_ids(&self) -> &[DishId] {
        &self.dish_ids
    }

    /// Number of dishes currently on the menu.
    pub fn positions(&self) -> usize {
        self.dish_ids.len()
    }
}

impl Entity for Menu {
    const KIND: &'static str = "Menu";
    type Key = (MenuId, String);

    fn id(&self) -> EntityId {
        self.id
    }

    fn key(&self) -> Self::Key {
        (self.id, self.name.clone())
    }

    fn has_links(&self) -> bool {
        !self.dish_ids.is_empty()
    }
}
