//! Link-aware entity deletion.
//!
//! # Invariants
//! - Many-side deletes sever every link before leaving their extent.
//! - One-side deletes never leave dependents pointing at a removed owner:
//!   they are either refused (`RemovalPolicy::Reject`) or the dependents are
//!   detached first (`RemovalPolicy::Detach`).

use super::customer_order::CustomerOrders;
use super::menu_dish::MenuDishes;
use super::restaurant_table::RestaurantTables;
use super::table_reservation::TableReservations;
use super::{dependents, detach_all, set_owner, OneToMany, RelationError, RelationResult};
use crate::extent::{Entity, EntityRef, HasExtent, Registry};
use crate::model::customer::{Customer, CustomerId};
use crate::model::dish::{Dish, DishId};
use crate::model::menu::{Menu, MenuId};
use crate::model::order::{Order, OrderId};
use crate::model::payment::{Payment, PaymentId};
use crate::model::reservation::{Reservation, ReservationId};
use crate::model::restaurant::{Restaurant, RestaurantId};
use crate::model::table::{Table, TableId};
use crate::model::EntityId;
use log::info;

/// What to do with dependents when deleting the "one" side of an association.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RemovalPolicy {
    /// Refuse while any dependent is attached.
    #[default]
    Reject,
    /// Detach every dependent, then delete.
    Detach,
}

impl Registry {
    /// Detaches a dish from its menu and deletes it.
    pub fn delete_dish(&mut self, dish_id: DishId) -> RelationResult<Dish> {
        set_owner::<MenuDishes>(self, dish_id, None)?;
        take_detached::<Dish>(self, dish_id)
    }

    /// Detaches an order from its customer and payment and deletes it.
    pub fn delete_order(&mut self, order_id: OrderId) -> RelationResult<Order> {
        set_owner::<CustomerOrders>(self, order_id, None)?;
        self.link_payment(order_id, None)?;
        take_detached::<Order>(self, order_id)
    }

    /// Detaches a reservation from its table and deletes it.
    pub fn delete_reservation(&mut self, reservation_id: ReservationId) -> RelationResult<Reservation> {
        set_owner::<TableReservations>(self, reservation_id, None)?;
        take_detached::<Reservation>(self, reservation_id)
    }

    /// Detaches a payment from its order and deletes it.
    pub fn delete_payment(&mut self, payment_id: PaymentId) -> RelationResult<Payment> {
        let order_id = self
            .extent::<Payment>()
            .get(payment_id)
            .ok_or_else(|| RelationError::not_found::<Payment>(payment_id))?
            .order_id;
        match order_id {
            Some(order_id) if self.extent::<Order>().contains_id(order_id) => {
                self.link_payment(order_id, None)?;
            }
            Some(_) => {
                if let Some(payment) = self.extent_mut::<Payment>().get_mut(payment_id) {
                    payment.order_id = None;
                }
            }
            None => {}
        }
        take_detached::<Payment>(self, payment_id)
    }

    pub fn delete_customer(
        &mut self,
        customer_id: CustomerId,
        policy: RemovalPolicy,
    ) -> RelationResult<Customer> {
        delete_owner::<CustomerOrders>(self, customer_id, policy)
    }

    /// Deletes a table, releasing its reservations under `policy` and
    /// leaving its restaurant.
    pub fn delete_table(&mut self, table_id: TableId, policy: RemovalPolicy) -> RelationResult<Table> {
        release_dependents::<TableReservations>(self, table_id, policy)?;
        set_owner::<RestaurantTables>(self, table_id, None)?;
        take_detached::<Table>(self, table_id)
    }

    pub fn delete_restaurant(
        &mut self,
        restaurant_id: RestaurantId,
        policy: RemovalPolicy,
    ) -> RelationResult<Restaurant> {
        delete_owner::<RestaurantTables>(self, restaurant_id, policy)
    }

    pub fn delete_menu(&mut self, menu_id: MenuId, policy: RemovalPolicy) -> RelationResult<Menu> {
        delete_owner::<MenuDishes>(self, menu_id, policy)
    }
}

fn delete_owner<R: OneToMany>(
    registry: &mut Registry,
    owner_id: EntityId,
    policy: RemovalPolicy,
) -> RelationResult<R::Owner>
where
    Registry: HasExtent<R::Owner> + HasExtent<R::Child>,
{
    release_dependents::<R>(registry, owner_id, policy)?;
    take_detached::<R::Owner>(registry, owner_id)
}

fn release_dependents<R: OneToMany>(
    registry: &mut Registry,
    owner_id: EntityId,
    policy: RemovalPolicy,
) -> RelationResult<()>
where
    Registry: HasExtent<R::Owner> + HasExtent<R::Child>,
{
    if !registry.extent::<R::Owner>().contains_id(owner_id) {
        return Err(RelationError::not_found::<R::Owner>(owner_id));
    }
    let count = dependents::<R>(registry, owner_id);
    if count > 0 {
        match policy {
            RemovalPolicy::Reject => {
                return Err(RelationError::HasDependents {
                    entity: EntityRef::of::<R::Owner>(owner_id),
                    dependents: count,
                });
            }
            RemovalPolicy::Detach => {
                detach_all::<R>(registry, owner_id);
            }
        }
    }
    Ok(())
}

fn take_detached<T: Entity>(registry: &mut Registry, id: EntityId) -> RelationResult<T>
where
    Registry: HasExtent<T>,
{
    let entity = registry
        .extent_mut::<T>()
        .take(id)
        .ok_or_else(|| RelationError::not_found::<T>(id))?;
    info!(
        "event=entity_deleted module=relation status=ok entity={}",
        entity.entity_ref()
    );
    Ok(entity)
}

#[cfg(test)]
mod tests {
    use super::RemovalPolicy;
    use crate::extent::Registry;
    use crate::model::customer::Customer;
    use crate::model::order::Order;
    use crate::model::payment::{Payment, PaymentMethod};
    use crate::model::restaurant::Restaurant;
    use crate::model::table::Table;
    use crate::relation::RelationError;
    use chrono::NaiveDate;

    fn setup() -> Registry {
        let placed = NaiveDate::from_ymd_opt(2030, 2, 2)
            .expect("valid date")
            .and_hms_opt(18, 0, 0)
            .expect("valid time");
        let mut registry = Registry::new();
        registry.register(Customer::new(1).expect("valid customer")).expect("entity should register");
        registry.register(Order::new(3, placed).expect("valid order")).expect("entity should register");
        registry
            .register(Payment::new(4, 1_000, PaymentMethod::Cash).expect("valid payment"))
            .expect("entity should register");
        registry.add_order(1, 3).expect("add_order should succeed");
        registry.set_payment(3, 4).expect("set_payment should succeed");
        registry
    }

    #[test]
    fn delete_order_releases_customer_and_payment() {
        let mut registry = setup();
        let order = registry.delete_order(3).expect("delete_order should succeed");
        assert_eq!(order.customer_id(), None);
        assert_eq!(order.payment_id(), None);
        assert!(registry.extent::<Customer>().get(1).expect("entity should exist").order_ids().is_empty());
        assert_eq!(registry.extent::<Payment>().get(4).expect("entity should exist").order_id(), None);
    }

    #[test]
    fn delete_payment_releases_order() {
        let mut registry = setup();
        registry.delete_payment(4).expect("delete_payment should succeed");
        assert_eq!(registry.extent::<Order>().get(3).expect("entity should exist").payment_id(), None);
    }

    #[test]
    fn reject_policy_keeps_state() {
        let mut registry = setup();
        let err = registry
            .delete_customer(1, RemovalPolicy::Reject)
            .expect_err("delete_customer should fail");
        assert!(matches!(err, RelationError::HasDependents { dependents: 1, .. }));
        assert_eq!(registry.extent::<Customer>().len(), 1);
        assert_eq!(registry.extent::<Order>().get(3).expect("entity should exist").customer_id(), Some(1));
    }

    #[test]
    fn detach_policy_orphans_dependents() {
        let mut registry = setup();
        registry.delete_customer(1, RemovalPolicy::Detach).expect("delete_customer should succeed");
        assert!(registry.extent::<Customer>().is_empty());
        assert_eq!(registry.extent::<Order>().get(3).expect("entity should exist").customer_id(), None);
    }

    #[test]
    fn delete_table_leaves_its_restaurant() {
        let mut registry = Registry::new();
        registry
            .register(Restaurant::new(1, "Harbor", 3).expect("valid restaurant"))
            .expect("restaurant should register");
        registry
            .register(Table::new(2, 4, "Booth").expect("valid table"))
            .expect("table should register");
        registry.add_table(1, 2).expect("table fits");

        let table = registry
            .delete_table(2, RemovalPolicy::Reject)
            .expect("table without reservations deletes");
        assert_eq!(table.restaurant_id(), None);
        assert!(registry.extent::<Restaurant>().get(1).expect("restaurant 1").table_ids().is_empty());
    }

    #[test]
    fn delete_restaurant_follows_policy() {
        let mut registry = Registry::new();
        registry
            .register(Restaurant::new(1, "Harbor", 3).expect("valid restaurant"))
            .expect("restaurant should register");
        registry
            .register(Table::new(2, 4, "Booth").expect("valid table"))
            .expect("table should register");
        registry.add_table(1, 2).expect("table fits");

        assert!(matches!(
            registry.delete_restaurant(1, RemovalPolicy::Reject),
            Err(RelationError::HasDependents { dependents: 1, .. })
        ));
        registry
            .delete_restaurant(1, RemovalPolicy::Detach)
            .expect("detach policy deletes");
        assert_eq!(registry.extent::<Table>().get(2).expect("table 2").restaurant_id(), None);
    }

    #[test]
    fn deleting_missing_entity_is_not_found() {
        let mut registry = setup();
        assert!(matches!(
            registry.delete_order(99).expect_err("delete_order should fail"),
            RelationError::NotFound(entity) if entity.kind == "Order" && entity.id == 99
        ));
    }
}
