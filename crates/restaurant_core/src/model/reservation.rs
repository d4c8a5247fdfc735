//! Table reservation record.

use super::{require_id, EntityId, ValidationError};
use crate::extent::Entity;
use crate::model::table::TableId;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

pub type ReservationId = EntityId;

/// Booking of one table for one point in time.
///
/// Double-booking is checked at day granularity: the time of day in
/// `reserved_for` never distinguishes two bookings of the same table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: ReservationId,
    pub reserved_for: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) table_id: Option<TableId>,
}

impl Reservation {
    pub fn new(id: ReservationId, reserved_for: NaiveDateTime) -> Result<Self, ValidationError> {
        Ok(Self {
            id: require_id(Self::KIND, id)?,
            reserved_for,
            table_id: None,
        })
    }

    /// Calendar date used by the double-booking guard.
    pub fn date(&self) -> NaiveDate {
        self.reserved_for.date()
    }

    pub fn table_id(&self) -> Option<TableId> {
        self.table_id
    }
}

impl Entity for Reservation {
    const KIND: &'static str = "Reservation";
    type Key = (ReservationId, NaiveDateTime);

    fn id(&self) -> EntityId {
        self.id
    }

    fn key(&self) -> Self::Key {
        (self.id, self.reserved_for)
    }

    fn has_links(&self) -> bool {
        self.table_id.is_some()
    }
}
