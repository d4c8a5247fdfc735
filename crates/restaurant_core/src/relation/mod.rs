//! Bidirectional relationship maintenance.
//!
//! # Responsibility
//! - Keep both ends of every association consistent after each mutation.
//! - Separate integrity conflicts (returned as outcomes) from caller errors
//!   (returned as `RelationError`).
//!
//! # Invariants
//! - A child's owner field and its owner's child list always agree.
//! - Every operation resolves all participants before mutating, so an error
//!   leaves the registry untouched.
//! - The lower-half list primitives never call back into `set_owner`.

use crate::extent::{Entity, EntityRef, HasExtent, Registry};
use crate::model::{EntityId, ValidationError};
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod cascade;
pub mod customer_order;
pub mod integrity;
pub mod menu_dish;
pub mod order_payment;
pub mod restaurant_table;
pub mod table_reservation;

pub use cascade::RemovalPolicy;
pub use integrity::{audit, IntegrityViolation};
pub use table_reservation::{DeclineReason, ReservationOutcome};

pub type RelationResult<T> = Result<T, RelationError>;

/// Caller-facing relationship errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationError {
    /// Bad argument; nothing was stored.
    Validation(ValidationError),
    /// Referenced entity is not registered.
    NotFound(EntityRef),
    /// Owner exists but does not list the child.
    NotLinked { owner: EntityRef, child: EntityRef },
    /// Removal refused while dependents are still attached.
    HasDependents { entity: EntityRef, dependents: usize },
    /// Removal refused while the entity still carries links.
    HasLinks(EntityRef),
    /// Owner already holds its maximum number of children.
    CapacityReached { owner: EntityRef, max: u32 },
}

impl RelationError {
    pub(crate) fn not_found<T: Entity>(id: EntityId) -> Self {
        Self::NotFound(EntityRef::of::<T>(id))
    }
}

impl Display for RelationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(entity) => write!(f, "{entity} not found"),
            Self::NotLinked { owner, child } => write!(f, "{child} is not linked to {owner}"),
            Self::HasDependents { entity, dependents } => write!(
                f,
                "{entity} still has {dependents} dependent(s); reassign or detach them first"
            ),
            Self::HasLinks(entity) => {
                write!(f, "{entity} still carries relationship links")
            }
            Self::CapacityReached { owner, max } => {
                write!(f, "{owner} already holds its maximum of {max}")
            }
        }
    }
}

impl Error for RelationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RelationError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Whether a link operation changed any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    Changed,
    /// Requested state already held; idempotent no-op.
    Unchanged,
}

impl LinkOutcome {
    pub fn is_changed(self) -> bool {
        self == Self::Changed
    }
}

/// One-to-many association with a back-pointer on the child.
pub(crate) trait OneToMany {
    type Owner: Entity;
    type Child: Entity;

    const NAME: &'static str;

    fn owner_of(child: &Self::Child) -> Option<EntityId>;
    fn set_owner_field(child: &mut Self::Child, owner: Option<EntityId>);
    fn children(owner: &Self::Owner) -> &[EntityId];
    fn children_mut(owner: &mut Self::Owner) -> &mut Vec<EntityId>;
}

/// Moves `child_id` under `new_owner` (or detaches it for `None`).
///
/// 1. identical owner: no-op;
/// 2. drop the child from the old owner's list;
/// 3. assign the child's owner field;
/// 4. append to the new owner's list unless already present.
pub(crate) fn set_owner<R: OneToMany>(
    registry: &mut Registry,
    child_id: EntityId,
    new_owner: Option<EntityId>,
) -> RelationResult<LinkOutcome>
where
    Registry: HasExtent<R::Owner> + HasExtent<R::Child>,
{
    let current = registry
        .extent::<R::Child>()
        .get(child_id)
        .map(|child| R::owner_of(child))
        .ok_or_else(|| RelationError::not_found::<R::Child>(child_id))?;
    if let Some(owner_id) = new_owner {
        if !registry.extent::<R::Owner>().contains_id(owner_id) {
            return Err(RelationError::not_found::<R::Owner>(owner_id));
        }
    }

    if current == new_owner {
        return Ok(LinkOutcome::Unchanged);
    }

    if let Some(old_owner) = current {
        detach_from_owner::<R>(registry, old_owner, child_id);
    }
    if let Some(child) = registry.extent_mut::<R::Child>().get_mut(child_id) {
        R::set_owner_field(child, new_owner);
    }
    if let Some(owner_id) = new_owner {
        attach_to_owner::<R>(registry, owner_id, child_id);
    }

    debug!(
        "event=link_set module=relation status=ok relation={} child={} old_owner={:?} new_owner={:?}",
        R::NAME,
        EntityRef::of::<R::Child>(child_id),
        current,
        new_owner
    );
    Ok(LinkOutcome::Changed)
}

/// Detaches `child_id` from `owner_id`, reporting children the owner does
/// not list as `NotLinked`.
pub(crate) fn remove_child<R: OneToMany>(
    registry: &mut Registry,
    owner_id: EntityId,
    child_id: EntityId,
) -> RelationResult<LinkOutcome>
where
    Registry: HasExtent<R::Owner> + HasExtent<R::Child>,
{
    let owner = registry
        .extent::<R::Owner>()
        .get(owner_id)
        .ok_or_else(|| RelationError::not_found::<R::Owner>(owner_id))?;
    if !R::children(owner).contains(&child_id) {
        return Err(RelationError::NotLinked {
            owner: EntityRef::of::<R::Owner>(owner_id),
            child: EntityRef::of::<R::Child>(child_id),
        });
    }

    if !registry.extent::<R::Child>().contains_id(child_id) {
        // Listed but unregistered: repair the owner's list.
        detach_from_owner::<R>(registry, owner_id, child_id);
        return Ok(LinkOutcome::Changed);
    }
    set_owner::<R>(registry, child_id, None)
}

/// Detaches every child of `owner_id`; returns how many were detached.
pub(crate) fn detach_all<R: OneToMany>(registry: &mut Registry, owner_id: EntityId) -> usize
where
    Registry: HasExtent<R::Owner> + HasExtent<R::Child>,
{
    let child_ids: Vec<EntityId> = registry
        .extent::<R::Owner>()
        .get(owner_id)
        .map(|owner| R::children(owner).to_vec())
        .unwrap_or_default();
    for child_id in &child_ids {
        if let Some(child) = registry.extent_mut::<R::Child>().get_mut(*child_id) {
            if R::owner_of(child) == Some(owner_id) {
                R::set_owner_field(child, None);
            }
        }
    }
    if let Some(owner) = registry.extent_mut::<R::Owner>().get_mut(owner_id) {
        R::children_mut(owner).clear();
    }
    child_ids.len()
}

pub(crate) fn dependents<R: OneToMany>(registry: &Registry, owner_id: EntityId) -> usize
where
    Registry: HasExtent<R::Owner>,
{
    registry
        .extent::<R::Owner>()
        .get(owner_id)
        .map_or(0, |owner| R::children(owner).len())
}

fn detach_from_owner<R: OneToMany>(registry: &mut Registry, owner_id: EntityId, child_id: EntityId)
where
    Registry: HasExtent<R::Owner>,
{
    if let Some(owner) = registry.extent_mut::<R::Owner>().get_mut(owner_id) {
        R::children_mut(owner).retain(|id| *id != child_id);
    }
}

fn attach_to_owner<R: OneToMany>(registry: &mut Registry, owner_id: EntityId, child_id: EntityId)
where
    Registry: HasExtent<R::Owner>,
{
    if let Some(owner) = registry.extent_mut::<R::Owner>().get_mut(owner_id) {
        let children = R::children_mut(owner);
        if !children.contains(&child_id) {
            children.push(child_id);
        }
    }
}
