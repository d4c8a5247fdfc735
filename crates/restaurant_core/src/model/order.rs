//! Order record and its dish lines.
//!
//! # Invariants
//! - `customer_id` is mirrored by the customer's `order_ids`.
//! - `payment_id` is mirrored by the payment's `order_id`.
//! - Lines carry a snapshot of the dish at order time, so removing a dish
//!   from the menu never leaves an order line dangling.

use super::{require_id, EntityId, ValidationError};
use crate::extent::Entity;
use crate::model::customer::CustomerId;
use crate::model::dish::{Dish, DishId};
use crate::model::payment::PaymentId;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub type OrderId = EntityId;

/// One ordered dish with quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub dish_id: DishId,
    pub dish_name: String,
    pub unit_price_cents: u32,
    pub quantity: u32,
}

impl OrderLine {
    /// Snapshots `dish` into a new line.
    ///
    /// # Errors
    /// - `ValidationError::ZeroQuantity` when `quantity == 0`.
    pub fn new(dish: &Dish, quantity: u32) -> Result<Self, ValidationError> {
        if quantity == 0 {
            return Err(ValidationError::ZeroQuantity);
        }
        Ok(Self {
            dish_id: dish.id,
            dish_name: dish.name.clone(),
            unit_price_cents: dish.price_cents,
            quantity,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub placed_at: NaiveDateTime,
    #[serde(default)]
    pub items: Vec<OrderLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) customer_id: Option<CustomerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) payment_id: Option<PaymentId>,
}

impl Order {
    pub fn new(id: OrderId, placed_at: NaiveDateTime) -> Result<Self, ValidationError> {
        Ok(Self {
            id: require_id(Self::KIND, id)?,
            placed_at,
            items: Vec::new(),
            customer_id: None,
            payment_id: None,
        })
    }

    /// Owning customer, if linked.
    pub fn customer_id(&self) -> Option<CustomerId> {
        self.customer_id
    }

    /// Settling payment, if linked.
    pub fn payment_id(&self) -> Option<PaymentId> {
        self.payment_id
    }

    /// Sum of line quantities.
    pub fn total_items(&self) -> u32 {
        self.items.iter().map(|line| line.quantity).sum()
    }
}

impl Entity for Order {
    const KIND: &'static str = "Order";
    type Key = (OrderId, NaiveDateTime);

    fn id(&self) -> EntityId {
        self.id
    }

    fn key(&self) -> Self::Key {
        (self.id, self.placed_at)
    }

    fn has_links(&self) -> bool {
        self.customer_id.is_some() || self.payment_id.is_some()
    }
}
