//! Customer 1:* Order association and order placement.

use super::{remove_child, set_owner, LinkOutcome, OneToMany, RelationError, RelationResult};
use crate::extent::Registry;
use crate::model::customer::{Customer, CustomerId};
use crate::model::dish::{Dish, DishId};
use crate::model::order::{Order, OrderId, OrderLine};
use crate::model::{EntityId, ValidationError};
use chrono::Local;
use log::info;

pub(crate) struct CustomerOrders;

impl OneToMany for CustomerOrders {
    type Owner = Customer;
    type Child = Order;

    const NAME: &'static str = "customer_order";

    fn owner_of(child: &Order) -> Option<EntityId> {
        child.customer_id
    }

    fn set_owner_field(child: &mut Order, owner: Option<EntityId>) {
        child.customer_id = owner;
    }

    fn children(owner: &Customer) -> &[EntityId] {
        &owner.order_ids
    }

    fn children_mut(owner: &mut Customer) -> &mut Vec<EntityId> {
        &mut owner.order_ids
    }
}

impl Registry {
    /// Sets or clears the owning customer of an order.
    pub fn assign_order_customer(
        &mut self,
        order_id: OrderId,
        customer_id: Option<CustomerId>,
    ) -> RelationResult<LinkOutcome> {
        set_owner::<CustomerOrders>(self, order_id, customer_id)
    }

    /// Links `order_id` to `customer_id`, moving it from any previous customer.
    pub fn add_order(
        &mut self,
        customer_id: CustomerId,
        order_id: OrderId,
    ) -> RelationResult<LinkOutcome> {
        set_owner::<CustomerOrders>(self, order_id, Some(customer_id))
    }

    /// Detaches `order_id` from `customer_id`.
    ///
    /// # Errors
    /// - `RelationError::NotFound` when the customer is unknown.
    /// - `RelationError::NotLinked` when the customer does not list the order.
    pub fn remove_order(
        &mut self,
        customer_id: CustomerId,
        order_id: OrderId,
    ) -> RelationResult<LinkOutcome> {
        remove_child::<CustomerOrders>(self, customer_id, order_id)
    }

    /// Creates, registers and links a new order for `customer_id`.
    ///
    /// Members accrue one credit point per placed order.
    ///
    /// # Errors
    /// - `ValidationError::EmptyOrder` when `lines` is empty.
    /// - `ValidationError::ZeroQuantity` for any zero quantity.
    /// - `RelationError::NotFound` for an unknown customer or dish.
    pub fn place_order(
        &mut self,
        customer_id: CustomerId,
        lines: &[(DishId, u32)],
    ) -> RelationResult<OrderId> {
        if !self.extent::<Customer>().contains_id(customer_id) {
            return Err(RelationError::not_found::<Customer>(customer_id));
        }
        if lines.is_empty() {
            return Err(ValidationError::EmptyOrder.into());
        }

        let order_id = self.extent::<Order>().next_id();
        let mut order = Order::new(order_id, Local::now().naive_local())?;
        for (dish_id, quantity) in lines {
            let dish = self
                .extent::<Dish>()
                .get(*dish_id)
                .ok_or_else(|| RelationError::not_found::<Dish>(*dish_id))?;
            let line = OrderLine::new(dish, *quantity)?;
            if !order.items.contains(&line) {
                order.items.push(line);
            }
        }

        self.extent_mut::<Order>().add(order);
        set_owner::<CustomerOrders>(self, order_id, Some(customer_id))?;
        if let Some(customer) = self.extent_mut::<Customer>().get_mut(customer_id) {
            if customer.is_member() {
                customer.credit_points = customer.credit_points.saturating_add(1);
            }
        }

        info!(
            "event=order_placed module=relation status=ok order_id={} customer_id={} lines={}",
            order_id,
            customer_id,
            lines.len()
        );
        Ok(order_id)
    }

    /// Appends a dish line to an order.
    ///
    /// An identical dish/quantity line already on the order is a no-op.
    pub fn add_order_item(
        &mut self,
        order_id: OrderId,
        dish_id: DishId,
        quantity: u32,
    ) -> RelationResult<LinkOutcome> {
        if quantity == 0 {
            return Err(ValidationError::ZeroQuantity.into());
        }
        if !self.extent::<Order>().contains_id(order_id) {
            return Err(RelationError::not_found::<Order>(order_id));
        }
        let line = self
            .extent::<Dish>()
            .get(dish_id)
            .ok_or_else(|| RelationError::not_found::<Dish>(dish_id))
            .and_then(|dish| OrderLine::new(dish, quantity).map_err(Into::into))?;

        let Some(order) = self.extent_mut::<Order>().get_mut(order_id) else {
            return Err(RelationError::not_found::<Order>(order_id));
        };
        if order
            .items
            .iter()
            .any(|existing| existing.dish_id == line.dish_id && existing.quantity == line.quantity)
        {
            return Ok(LinkOutcome::Unchanged);
        }
        order.items.push(line);
        Ok(LinkOutcome::Changed)
    }
}

#[cfg(test)]
mod tests {
    use crate::extent::Registry;
    use crate::model::customer::Customer;
    use crate::model::dish::Dish;
    use crate::model::order::Order;
    use crate::model::ValidationError;
    use crate::relation::{LinkOutcome, RelationError};

    fn registry_with_menu() -> Registry {
        let mut registry = Registry::new();
        registry.register(Customer::member(1, None).expect("valid member")).expect("entity should register");
        registry.register(Customer::new(2).expect("valid customer")).expect("entity should register");
        registry
            .register(Dish::new(10, "Pizza", "Italian", 1200, vec!["dough".into()]).expect("valid dish"))
            .expect("entity should register");
        registry
    }

    #[test]
    fn place_order_links_and_accrues_member_credit() {
        let mut registry = registry_with_menu();
        let order_id = registry.place_order(1, &[(10, 2)]).expect("place_order should succeed");

        let order = registry.extent::<Order>().get(order_id).expect("entity should exist");
        assert_eq!(order.customer_id(), Some(1));
        assert_eq!(order.total_items(), 2);
        let customer = registry.extent::<Customer>().get(1).expect("entity should exist");
        assert_eq!(customer.order_ids(), &[order_id]);
        assert_eq!(customer.credit_points, 1);
    }

    #[test]
    fn place_order_for_non_member_keeps_credit() {
        let mut registry = registry_with_menu();
        registry.place_order(2, &[(10, 1)]).expect("place_order should succeed");
        assert_eq!(registry.extent::<Customer>().get(2).expect("entity should exist").credit_points, 0);
    }

    #[test]
    fn place_order_rejects_bad_input_without_side_effects() {
        let mut registry = registry_with_menu();
        assert_eq!(
            registry.place_order(1, &[]).expect_err("place_order should fail"),
            RelationError::Validation(ValidationError::EmptyOrder)
        );
        assert_eq!(
            registry.place_order(1, &[(10, 0)]).expect_err("place_order should fail"),
            RelationError::Validation(ValidationError::ZeroQuantity)
        );
        assert!(matches!(
            registry.place_order(1, &[(99, 1)]).expect_err("place_order should fail"),
            RelationError::NotFound(entity) if entity.kind == "Dish"
        ));
        assert!(registry.extent::<Order>().is_empty());
        assert!(registry.extent::<Customer>().get(1).expect("entity should exist").order_ids().is_empty());
    }

    #[test]
    fn add_order_item_skips_identical_line() {
        let mut registry = registry_with_menu();
        let order_id = registry.place_order(1, &[(10, 1)]).expect("place_order should succeed");
        assert_eq!(
            registry.add_order_item(order_id, 10, 1).expect("add_order_item should succeed"),
            LinkOutcome::Unchanged
        );
        assert_eq!(
            registry.add_order_item(order_id, 10, 3).expect("add_order_item should succeed"),
            LinkOutcome::Changed
        );
        assert_eq!(
            registry.extent::<Order>().get(order_id).expect("entity should exist").total_items(),
            4
        );
    }
}
