//! Menu 1:* Dish association.

use super::{remove_child, set_owner, LinkOutcome, OneToMany, RelationResult};
use crate::extent::Registry;
use crate::model::dish::{Dish, DishId};
use crate::model::menu::{Menu, MenuId};
use crate::model::EntityId;

pub(crate) struct MenuDishes;

impl OneToMany for MenuDishes {
    type Owner = Menu;
    type Child = Dish;

    const NAME: &'static str = "menu_dish";

    fn owner_of(child: &Dish) -> Option<EntityId> {
        child.menu_id
    }

    fn set_owner_field(child: &mut Dish, owner: Option<EntityId>) {
        child.menu_id = owner;
    }

    fn children(owner: &Menu) -> &[EntityId] {
        &owner.dish_ids
    }

    fn children_mut(owner: &mut Menu) -> &mut Vec<EntityId> {
        &mut owner.dish_ids
    }
}

impl Registry {
    /// Puts a dish on `menu_id`; a dish already on that menu is a no-op.
    pub fn add_dish(&mut self, menu_id: MenuId, dish_id: DishId) -> RelationResult<LinkOutcome> {
        set_owner::<MenuDishes>(self, dish_id, Some(menu_id))
    }

    /// Takes a dish off `menu_id` and clears its back-pointer.
    ///
    /// # Errors
    /// - `RelationError::NotFound` when the menu is unknown.
    /// - `RelationError::NotLinked` when the menu does not list the dish.
    pub fn remove_dish(&mut self, menu_id: MenuId, dish_id: DishId) -> RelationResult<LinkOutcome> {
        remove_child::<MenuDishes>(self, menu_id, dish_id)
    }

    /// Sets or clears the menu of a dish.
    pub fn assign_dish_menu(
        &mut self,
        dish_id: DishId,
        menu_id: Option<MenuId>,
    ) -> RelationResult<LinkOutcome> {
        set_owner::<MenuDishes>(self, dish_id, menu_id)
    }

    /// Dishes currently on `menu_id`, in menu order.
    pub fn dishes_on(&self, menu_id: MenuId) -> Vec<&Dish> {
        let Some(menu) = self.extent::<Menu>().get(menu_id) else {
            return Vec::new();
        };
        menu.dish_ids
            .iter()
            .filter_map(|dish_id| self.extent::<Dish>().get(*dish_id))
            .collect()
    }
}
