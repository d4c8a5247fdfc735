//! Registry-wide relationship audit.
//!
//! Used after bulk loads, where link fields come from disk rather than from
//! the relationship protocols.

use super::customer_order::CustomerOrders;
use super::menu_dish::MenuDishes;
use super::restaurant_table::RestaurantTables;
use super::table_reservation::TableReservations;
use super::OneToMany;
use crate::extent::{Entity, EntityRef, HasExtent, Registry};
use crate::model::customer::Customer;
use crate::model::dish::Dish;
use crate::model::menu::Menu;
use crate::model::order::Order;
use crate::model::payment::Payment;
use crate::model::reservation::Reservation;
use crate::model::restaurant::Restaurant;
use crate::model::staff::Employee;
use crate::model::table::Table;
use crate::model::valet::Valet;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// One broken relationship or extent invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityViolation {
    /// `from` points at `to`, but `to` does not point back.
    OneSided { from: EntityRef, to: EntityRef },
    /// `from` points at an entity that is not registered.
    Dangling { from: EntityRef, to: EntityRef },
    /// Two reservations of one table share a date.
    DoubleBooked {
        table: EntityRef,
        date: NaiveDate,
        first: EntityRef,
        second: EntityRef,
    },
    /// Two entities of one kind share an identifier.
    DuplicateId(EntityRef),
    /// A restaurant lists more tables than it allows.
    OverCapacity {
        restaurant: EntityRef,
        tables: usize,
        max: u32,
    },
}

impl Display for IntegrityViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OneSided { from, to } => write!(f, "{from} -> {to} has no back-reference"),
            Self::Dangling { from, to } => write!(f, "{from} -> {to} points at a missing entity"),
            Self::DoubleBooked {
                table,
                date,
                first,
                second,
            } => write!(f, "{table} double-booked on {date} by {first} and {second}"),
            Self::DuplicateId(entity) => write!(f, "{entity} is registered more than once"),
            Self::OverCapacity {
                restaurant,
                tables,
                max,
            } => write!(f, "{restaurant} lists {tables} tables but allows {max}"),
        }
    }
}

/// Lists every violation in `registry`; empty means consistent.
pub fn audit(registry: &Registry) -> Vec<IntegrityViolation> {
    let mut violations = Vec::new();

    audit_ids::<Customer>(registry, &mut violations);
    audit_ids::<Order>(registry, &mut violations);
    audit_ids::<Payment>(registry, &mut violations);
    audit_ids::<Table>(registry, &mut violations);
    audit_ids::<Reservation>(registry, &mut violations);
    audit_ids::<Menu>(registry, &mut violations);
    audit_ids::<Dish>(registry, &mut violations);
    audit_ids::<Employee>(registry, &mut violations);
    audit_ids::<Restaurant>(registry, &mut violations);
    audit_ids::<Valet>(registry, &mut violations);

    audit_one_to_many::<CustomerOrders>(registry, &mut violations);
    audit_one_to_many::<MenuDishes>(registry, &mut violations);
    audit_one_to_many::<TableReservations>(registry, &mut violations);
    audit_one_to_many::<RestaurantTables>(registry, &mut violations);
    audit_restaurant_capacity(registry, &mut violations);
    audit_order_payments(registry, &mut violations);
    audit_double_bookings(registry, &mut violations);

    violations
}

fn audit_ids<T: Entity>(registry: &Registry, out: &mut Vec<IntegrityViolation>)
where
    Registry: HasExtent<T>,
{
    let mut seen = Vec::new();
    for entity in registry.extent::<T>() {
        if seen.contains(&entity.id()) {
            out.push(IntegrityViolation::DuplicateId(entity.entity_ref()));
        } else {
            seen.push(entity.id());
        }
    }
}

fn audit_one_to_many<R: OneToMany>(registry: &Registry, out: &mut Vec<IntegrityViolation>)
where
    Registry: HasExtent<R::Owner> + HasExtent<R::Child>,
{
    let owners = registry.extent::<R::Owner>();
    let children = registry.extent::<R::Child>();

    for child in children {
        let Some(owner_id) = R::owner_of(child) else {
            continue;
        };
        let to = EntityRef::of::<R::Owner>(owner_id);
        match owners.get(owner_id) {
            None => out.push(IntegrityViolation::Dangling {
                from: child.entity_ref(),
                to,
            }),
            Some(owner) if !R::children(owner).contains(&child.id()) => {
                out.push(IntegrityViolation::OneSided {
                    from: child.entity_ref(),
                    to,
                });
            }
            Some(_) => {}
        }
    }

    for owner in owners {
        for child_id in R::children(owner) {
            let to = EntityRef::of::<R::Child>(*child_id);
            match children.get(*child_id) {
                None => out.push(IntegrityViolation::Dangling {
                    from: owner.entity_ref(),
                    to,
                }),
                Some(child) if R::owner_of(child) != Some(owner.id()) => {
                    out.push(IntegrityViolation::OneSided {
                        from: owner.entity_ref(),
                        to,
                    });
                }
                Some(_) => {}
            }
        }
    }
}

fn audit_order_payments(registry: &Registry, out: &mut Vec<IntegrityViolation>) {
    let payments = registry.extent::<Payment>();
    let orders = registry.extent::<Order>();

    for order in orders {
        let Some(payment_id) = order.payment_id else {
            continue;
        };
        let to = EntityRef::of::<Payment>(payment_id);
        match payments.get(payment_id) {
            None => out.push(IntegrityViolation::Dangling {
                from: order.entity_ref(),
                to,
            }),
            Some(payment) if payment.order_id != Some(order.id) => {
                out.push(IntegrityViolation::OneSided {
                    from: order.entity_ref(),
                    to,
                });
            }
            Some(_) => {}
        }
    }

    for payment in payments {
        let Some(order_id) = payment.order_id else {
            continue;
        };
        let to = EntityRef::of::<Order>(order_id);
        match orders.get(order_id) {
            None => out.push(IntegrityViolation::Dangling {
                from: payment.entity_ref(),
                to,
            }),
            Some(order) if order.payment_id != Some(payment.id) => {
                out.push(IntegrityViolation::OneSided {
                    from: payment.entity_ref(),
                    to,
                });
            }
            Some(_) => {}
        }
    }
}

fn audit_restaurant_capacity(registry: &Registry, out: &mut Vec<IntegrityViolation>) {
    for restaurant in registry.extent::<Restaurant>() {
        let tables = restaurant.table_ids.len();
        if tables > restaurant.max_tables as usize {
            out.push(IntegrityViolation::OverCapacity {
                restaurant: restaurant.entity_ref(),
                tables,
                max: restaurant.max_tables,
            });
        }
    }
}

fn audit_double_bookings(registry: &Registry, out: &mut Vec<IntegrityViolation>) {
    let reservations = registry.extent::<Reservation>();
    for table in registry.extent::<Table>() {
        let mut by_date: BTreeMap<NaiveDate, EntityRef> = BTreeMap::new();
        for reservation in table
            .reservation_ids
            .iter()
            .filter_map(|id| reservations.get(*id))
        {
            let current = reservation.entity_ref();
            if let Some(first) = by_date.get(&reservation.date()) {
                out.push(IntegrityViolation::DoubleBooked {
                    table: table.entity_ref(),
                    date: reservation.date(),
                    first: *first,
                    second: current,
                });
            } else {
                by_date.insert(reservation.date(), current);
            }
        }
    }
}
