//! Restaurant 1:* Table association, bounded by `Restaurant::max_tables`.

use super::{
    remove_child, set_owner, LinkOutcome, OneToMany, RelationError, RelationResult,
};
use crate::extent::{Entity, Registry};
use crate::model::restaurant::{Restaurant, RestaurantId};
use crate::model::table::{Table, TableId};
use crate::model::EntityId;
use log::info;

pub(crate) struct RestaurantTables;

impl OneToMany for RestaurantTables {
    type Owner = Restaurant;
    type Child = Table;

    const NAME: &'static str = "restaurant_table";

    fn owner_of(child: &Table) -> Option<EntityId> {
        child.restaurant_id
    }

    fn set_owner_field(child: &mut Table, owner: Option<EntityId>) {
        child.restaurant_id = owner;
    }

    fn children(owner: &Restaurant) -> &[EntityId] {
        &owner.table_ids
    }

    fn children_mut(owner: &mut Restaurant) -> &mut Vec<EntityId> {
        &mut owner.table_ids
    }
}

impl Registry {
    /// Adds a table to `restaurant_id`, moving it from any other restaurant.
    ///
    /// A table already in that restaurant is a no-op, even when full.
    ///
    /// # Errors
    /// - `RelationError::NotFound` when either side is unknown.
    /// - `RelationError::CapacityReached` when the restaurant is full.
    pub fn add_table(
        &mut self,
        restaurant_id: RestaurantId,
        table_id: TableId,
    ) -> RelationResult<LinkOutcome> {
        let restaurant = self
            .extent::<Restaurant>()
            .get(restaurant_id)
            .ok_or_else(|| RelationError::not_found::<Restaurant>(restaurant_id))?;
        let table = self
            .extent::<Table>()
            .get(table_id)
            .ok_or_else(|| RelationError::not_found::<Table>(table_id))?;

        if table.restaurant_id == Some(restaurant_id) {
            return Ok(LinkOutcome::Unchanged);
        }
        if restaurant.is_full() {
            info!(
                "event=table_rejected module=relation status=skip restaurant={} table={} max_tables={}",
                restaurant.entity_ref(),
                table.entity_ref(),
                restaurant.max_tables
            );
            return Err(RelationError::CapacityReached {
                owner: restaurant.entity_ref(),
                max: restaurant.max_tables,
            });
        }
        set_owner::<RestaurantTables>(self, table_id, Some(restaurant_id))
    }

    /// Takes a table out of `restaurant_id` and clears its back-pointer.
    ///
    /// # Errors
    /// - `RelationError::NotFound` when the restaurant is unknown.
    /// - `RelationError::NotLinked` when the restaurant does not list the table.
    pub fn remove_table(
        &mut self,
        restaurant_id: RestaurantId,
        table_id: TableId,
    ) -> RelationResult<LinkOutcome> {
        remove_child::<RestaurantTables>(self, restaurant_id, table_id)
    }

    /// Sets or clears the restaurant of a table; setting honors capacity.
    pub fn assign_table_restaurant(
        &mut self,
        table_id: TableId,
        restaurant_id: Option<RestaurantId>,
    ) -> RelationResult<LinkOutcome> {
        match restaurant_id {
            Some(restaurant_id) => self.add_table(restaurant_id, table_id),
            None => set_owner::<RestaurantTables>(self, table_id, None),
        }
    }

    /// Tables of `restaurant_id`, in insertion order.
    pub fn tables_of(&self, restaurant_id: RestaurantId) -> Vec<&Table> {
        let Some(restaurant) = self.extent::<Restaurant>().get(restaurant_id) else {
            return Vec::new();
        };
        restaurant
            .table_ids
            .iter()
            .filter_map(|table_id| self.extent::<Table>().get(*table_id))
            .collect()
    }
}
