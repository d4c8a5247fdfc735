//! Dining table record.
//!
//! # Invariants
//! - `reservation_ids` mirrors every reservation whose `table_id` points here.
//! - No two reservations in `reservation_ids` share a calendar date.
//! - `restaurant_id` is mirrored by the restaurant's `table_ids`.

use super::{require_id, trimmed, EntityId, ValidationError};
use crate::extent::Entity;
use crate::model::reservation::ReservationId;
use crate::model::restaurant::RestaurantId;
use serde::{Deserialize, Serialize};

pub type TableId = EntityId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub id: TableId,
    pub chairs: u32,
    pub table_type: String,
    #[serde(default)]
    pub(crate) reservation_ids: Vec<ReservationId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) restaurant_id: Option<RestaurantId>,
}

impl Table {
    pub fn new(
        id: TableId,
        chairs: u32,
        table_type: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id: require_id(Self::KIND, id)?,
            chairs,
            table_type: trimmed(table_type),
            reservation_ids: Vec::new(),
            restaurant_id: None,
        })
    }

    /// Confirmed reservations, in booking order.
    pub fn reservation_ids(&self) -> &[ReservationId] {
        &self.reservation_ids
    }

    /// Owning restaurant, if linked.
    pub fn restaurant_id(&self) -> Option<RestaurantId> {
        self.restaurant_id
    }
}

impl Entity for Table {
    const KIND: &'static str = "Table";
    type Key = TableId;

    fn id(&self) -> EntityId {
        self.id
    }

    fn key(&self) -> Self::Key {
        self.id
    }

    fn has_links(&self) -> bool {
        !self.reservation_ids.is_empty() || self.restaurant_id.is_some()
    }
}
