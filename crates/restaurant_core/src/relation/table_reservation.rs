//! Table 1:* Reservation association with the double-booking guard.
//!
//! # Invariants
//! - A table never lists two reservations on the same calendar date.
//! - Declined reservations leave both the table and the reservation as they
//!   were before the call.

use super::{remove_child, set_owner, LinkOutcome, OneToMany, RelationError, RelationResult};
use crate::extent::Registry;
use crate::model::reservation::{Reservation, ReservationId};
use crate::model::table::{Table, TableId};
use crate::model::EntityId;
use chrono::{Local, NaiveDate};
use log::info;
use std::fmt::{Display, Formatter};

pub(crate) struct TableReservations;

impl OneToMany for TableReservations {
    type Owner = Table;
    type Child = Reservation;

    const NAME: &'static str = "table_reservation";

    fn owner_of(child: &Reservation) -> Option<EntityId> {
        child.table_id
    }

    fn set_owner_field(child: &mut Reservation, owner: Option<EntityId>) {
        child.table_id = owner;
    }

    fn children(owner: &Table) -> &[EntityId] {
        &owner.reservation_ids
    }

    fn children_mut(owner: &mut Table) -> &mut Vec<EntityId> {
        &mut owner.reservation_ids
    }
}

/// Why a reservation request was declined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclineReason {
    CapacityOutOfRange { chairs: u32, min: u32, max: u32 },
    PastDate { date: NaiveDate, today: NaiveDate },
    DateTaken { date: NaiveDate, existing: ReservationId },
}

impl DeclineReason {
    /// Stable code used in log events.
    pub fn code(self) -> &'static str {
        match self {
            Self::CapacityOutOfRange { .. } => "capacity_out_of_range",
            Self::PastDate { .. } => "past_date",
            Self::DateTaken { .. } => "date_taken",
        }
    }
}

impl Display for DeclineReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CapacityOutOfRange { chairs, min, max } => write!(
                f,
                "table has {chairs} chairs, outside the requested {min}..={max}"
            ),
            Self::PastDate { date, today } => {
                write!(f, "cannot reserve {date}, which is before {today}")
            }
            Self::DateTaken { date, existing } => write!(
                f,
                "table is already reserved on {date} by Reservation#{existing}"
            ),
        }
    }
}

/// Result of a reservation request that reached the integrity checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationOutcome {
    Confirmed,
    Declined(DeclineReason),
}

impl ReservationOutcome {
    pub fn is_confirmed(self) -> bool {
        self == Self::Confirmed
    }
}

impl Registry {
    /// Books `table_id` for `reservation_id` relative to today's local date.
    ///
    /// See [`Registry::reserve_table_on`].
    pub fn reserve_table(
        &mut self,
        reservation_id: ReservationId,
        table_id: TableId,
        min_capacity: u32,
        max_capacity: u32,
    ) -> RelationResult<ReservationOutcome> {
        let today = Local::now().date_naive();
        self.reserve_table_on(reservation_id, table_id, min_capacity, max_capacity, today)
    }

    /// Books `table_id` for `reservation_id`, treating `today` as the current
    /// date.
    ///
    /// Checks run in order: capacity bounds, past date, same-date booking on
    /// the table. The first failing check declines the request.
    ///
    /// # Errors
    /// - `RelationError::NotFound` when the table or reservation is unknown.
    pub fn reserve_table_on(
        &mut self,
        reservation_id: ReservationId,
        table_id: TableId,
        min_capacity: u32,
        max_capacity: u32,
        today: NaiveDate,
    ) -> RelationResult<ReservationOutcome> {
        let table = self
            .extent::<Table>()
            .get(table_id)
            .ok_or_else(|| RelationError::not_found::<Table>(table_id))?;
        let date = self
            .extent::<Reservation>()
            .get(reservation_id)
            .map(Reservation::date)
            .ok_or_else(|| RelationError::not_found::<Reservation>(reservation_id))?;

        let decline = if table.chairs < min_capacity || table.chairs > max_capacity {
            Some(DeclineReason::CapacityOutOfRange {
                chairs: table.chairs,
                min: min_capacity,
                max: max_capacity,
            })
        } else if date < today {
            Some(DeclineReason::PastDate { date, today })
        } else {
            table
                .reservation_ids
                .iter()
                .copied()
                .filter(|id| *id != reservation_id)
                .find(|id| {
                    self.extent::<Reservation>()
                        .get(*id)
                        .is_some_and(|existing| existing.date() == date)
                })
                .map(|existing| DeclineReason::DateTaken { date, existing })
        };

        if let Some(reason) = decline {
            info!(
                "event=reservation_declined module=relation status=skip reservation_id={} table_id={} reason={}",
                reservation_id,
                table_id,
                reason.code()
            );
            return Ok(ReservationOutcome::Declined(reason));
        }

        set_owner::<TableReservations>(self, reservation_id, Some(table_id))?;
        info!(
            "event=reservation_confirmed module=relation status=ok reservation_id={} table_id={} date={}",
            reservation_id, table_id, date
        );
        Ok(ReservationOutcome::Confirmed)
    }

    /// Releases a reservation from its table.
    pub fn cancel_reservation(
        &mut self,
        table_id: TableId,
        reservation_id: ReservationId,
    ) -> RelationResult<LinkOutcome> {
        remove_child::<TableReservations>(self, table_id, reservation_id)
    }

    /// Reservations held by `table_id`, in booking order.
    pub fn reservations_for(&self, table_id: TableId) -> Vec<&Reservation> {
        let Some(table) = self.extent::<Table>().get(table_id) else {
            return Vec::new();
        };
        table
            .reservation_ids
            .iter()
            .filter_map(|id| self.extent::<Reservation>().get(*id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{DeclineReason, ReservationOutcome};
    use crate::extent::Registry;
    use crate::model::reservation::Reservation;
    use crate::model::table::Table;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 6, d).expect("valid date")
    }

    fn setup() -> Registry {
        let mut registry = Registry::new();
        registry.register(Table::new(1, 4, "Booth").expect("valid table")).expect("entity should register");
        registry.register(Table::new(2, 8, "Banquet").expect("valid table")).expect("entity should register");
        registry
            .register(Reservation::new(10, day(12).and_hms_opt(19, 0, 0).expect("valid time")).expect("valid reservation"))
            .expect("entity should register");
        registry
            .register(Reservation::new(11, day(12).and_hms_opt(12, 30, 0).expect("valid time")).expect("valid reservation"))
            .expect("entity should register");
        registry
    }

    #[test]
    fn same_day_different_time_is_declined() {
        let mut registry = setup();
        let today = day(1);
        assert!(registry
            .reserve_table_on(10, 1, 2, 6, today)
            .expect("reserve_table_on should succeed")
            .is_confirmed());
        let outcome = registry.reserve_table_on(11, 1, 2, 6, today).expect("reserve_table_on should succeed");
        assert_eq!(
            outcome,
            ReservationOutcome::Declined(DeclineReason::DateTaken {
                date: day(12),
                existing: 10
            })
        );
        assert_eq!(registry.extent::<Table>().get(1).expect("entity should exist").reservation_ids(), &[10]);
        assert_eq!(registry.extent::<Reservation>().get(11).expect("entity should exist").table_id(), None);
    }

    #[test]
    fn rebooking_same_reservation_is_confirmed() {
        let mut registry = setup();
        let today = day(1);
        registry.reserve_table_on(10, 1, 2, 6, today).expect("reserve_table_on should succeed");
        assert!(registry
            .reserve_table_on(10, 1, 2, 6, today)
            .expect("reserve_table_on should succeed")
            .is_confirmed());
        assert_eq!(registry.extent::<Table>().get(1).expect("entity should exist").reservation_ids(), &[10]);
    }

    #[test]
    fn capacity_is_checked_before_date() {
        let mut registry = setup();
        let outcome = registry.reserve_table_on(10, 2, 2, 6, day(20)).expect("reserve_table_on should succeed");
        assert_eq!(
            outcome,
            ReservationOutcome::Declined(DeclineReason::CapacityOutOfRange {
                chairs: 8,
                min: 2,
                max: 6
            })
        );
    }

    #[test]
    fn reservation_on_today_is_allowed() {
        let mut registry = setup();
        assert!(registry
            .reserve_table_on(10, 1, 1, 4, day(12))
            .expect("reserve_table_on should succeed")
            .is_confirmed());
    }

    #[test]
    fn moving_reservation_between_tables_keeps_mirror() {
        let mut registry = setup();
        let today = day(1);
        registry.reserve_table_on(10, 1, 1, 10, today).expect("reserve_table_on should succeed");
        registry.reserve_table_on(10, 2, 1, 10, today).expect("reserve_table_on should succeed");
        assert!(registry.extent::<Table>().get(1).expect("entity should exist").reservation_ids().is_empty());
        assert_eq!(registry.reservations_for(2).len(), 1);
        assert_eq!(registry.extent::<Reservation>().get(10).expect("entity should exist").table_id(), Some(2));
    }
}
