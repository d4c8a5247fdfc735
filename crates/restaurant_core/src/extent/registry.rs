//! Registry context owning one extent per entity kind.

use super::{Entity, Extent};
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
use crate::model::ValidationError;
use crate::relation::{RelationError, RelationResult};

/// Typed access to the extent of kind `T`.
pub trait HasExtent<T: Entity> {
    fn extent_ref(&self) -> &Extent<T>;
    fn extent_mut_ref(&mut self) -> &mut Extent<T>;
}

/// All live entities of one process or test.
///
/// Replaces process-wide per-kind lists: every caller owns or borrows an
/// explicit registry, so two registries never share state.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    customers: Extent<Customer>,
    orders: Extent<Order>,
    payments: Extent<Payment>,
    tables: Extent<Table>,
    reservations: Extent<Reservation>,
    menus: Extent<Menu>,
    dishes: Extent<Dish>,
    employees: Extent<Employee>,
    restaurants: Extent<Restaurant>,
    valets: Extent<Valet>,
}

macro_rules! impl_has_extent {
    ($kind:ty, $field:ident) => {
        impl HasExtent<$kind> for Registry {
            fn extent_ref(&self) -> &Extent<$kind> {
                &self.$field
            }

            fn extent_mut_ref(&mut self) -> &mut Extent<$kind> {
                &mut self.$field
            }
        }
    };
}

impl_has_extent!(Customer, customers);
impl_has_extent!(Order, orders);
impl_has_extent!(Payment, payments);
impl_has_extent!(Table, tables);
impl_has_extent!(Reservation, reservations);
impl_has_extent!(Menu, menus);
impl_has_extent!(Dish, dishes);
impl_has_extent!(Employee, employees);
impl_has_extent!(Restaurant, restaurants);
impl_has_extent!(Valet, valets);

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extent<T: Entity>(&self) -> &Extent<T>
    where
        Self: HasExtent<T>,
    {
        self.extent_ref()
    }

    /// Raw extent access for the relation and load paths.
    ///
    /// Skips the `register` checks; `Extent::remove` and `Extent::clear`
    /// do not cascade.
    pub(crate) fn extent_mut<T: Entity>(&mut self) -> &mut Extent<T>
    where
        Self: HasExtent<T>,
    {
        self.extent_mut_ref()
    }

    /// Registers a freshly constructed, unlinked entity.
    ///
    /// Returns `Ok(false)` when a structurally-equal entity already exists.
    ///
    /// # Errors
    /// - `ValidationError::Prelinked` when the entity already carries links.
    /// - `ValidationError::IdInUse` when the id belongs to a different entity.
    pub fn register<T: Entity>(&mut self, entity: T) -> RelationResult<bool>
    where
        Self: HasExtent<T>,
    {
        if entity.has_links() {
            return Err(ValidationError::Prelinked {
                kind: T::KIND,
                id: entity.id(),
            }
            .into());
        }
        let extent = self.extent_mut::<T>();
        if let Some(existing) = extent.get(entity.id()) {
            if !existing.same_entity(&entity) {
                return Err(ValidationError::IdInUse {
                    kind: T::KIND,
                    id: entity.id(),
                }
                .into());
            }
        }
        Ok(extent.add(entity))
    }

    /// Removes an entity that carries no relationship links.
    ///
    /// # Errors
    /// - `RelationError::NotFound` when no entity has `id`.
    /// - `RelationError::HasLinks` when links must be torn down first.
    pub fn remove_unlinked<T: Entity>(&mut self, id: u32) -> RelationResult<T>
    where
        Self: HasExtent<T>,
    {
        let extent = self.extent_mut::<T>();
        let entity = extent
            .get(id)
            .ok_or_else(|| RelationError::not_found::<T>(id))?;
        if entity.has_links() {
            return Err(RelationError::HasLinks(entity.entity_ref()));
        }
        extent
            .take(id)
            .ok_or_else(|| RelationError::not_found::<T>(id))
    }

    /// Empties every extent.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Total number of live entities across all kinds.
    pub fn total_len(&self) -> usize {
        self.customers.len()
            + self.orders.len()
            + self.payments.len()
            + self.tables.len()
            + self.reservations.len()
            + self.menus.len()
            + self.dishes.len()
            + self.employees.len()
            + self.restaurants.len()
            + self.valets.len()
    }
}

#[cfg(test)]
mod tests {
    use super::Registry;
    use crate::model::customer::Customer;
    use crate::model::dish::Dish;
    use crate::model::ValidationError;
    use crate::relation::RelationError;

    #[test]
    fn registries_are_isolated() {
        let mut first = Registry::new();
        let second = Registry::new();
        first.register(Customer::new(1).expect("valid customer")).expect("entity should register");
        assert_eq!(first.extent::<Customer>().len(), 1);
        assert!(second.extent::<Customer>().is_empty());
    }

    #[test]
    fn register_rejects_id_reuse_with_different_key() {
        let mut registry = Registry::new();
        let pizza = Dish::new(1, "Pizza", "Italian", 1000, vec!["dough".into()]).expect("valid dish");
        let soup = Dish::new(1, "Soup", "French", 700, vec!["onion".into()]).expect("valid dish");
        assert!(registry.register(pizza.clone()).expect("entity should register"));
        assert!(!registry.register(pizza).expect("entity should register"));
        let err = registry.register(soup).expect_err("register should fail");
        assert!(matches!(
            err,
            RelationError::Validation(ValidationError::IdInUse { kind: "Dish", id: 1 })
        ));
    }

    #[test]
    fn remove_unlinked_reports_missing() {
        let mut registry = Registry::new();
        let err = registry.remove_unlinked::<Customer>(5).expect_err("remove_unlinked should fail");
        assert!(matches!(err, RelationError::NotFound(entity) if entity.id == 5));
    }
}
