//! Restaurant domain records.
//!
//! # Responsibility
//! - Define the persisted shape of every entity kind.
//! - Keep constructor-level argument checks next to the record they guard.
//!
//! # Invariants
//! - Every record carries a positive numeric identifier.
//! - Relationship fields are identifiers only and are mutated exclusively by
//!   `crate::relation`; records never hold references to each other.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod customer;
pub mod dish;
pub mod menu;
pub mod order;
pub mod payment;
pub mod reservation;
pub mod restaurant;
pub mod staff;
pub mod table;
pub mod valet;

/// Numeric identifier shared by every entity kind.
///
/// Per-kind aliases (`CustomerId`, `OrderId`, ...) make intent explicit in
/// signatures while keeping one numeric space for link fields.
pub type EntityId = u32;

/// Caller-supplied argument rejected before any state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Identifier must be positive.
    ZeroId { kind: &'static str },
    /// Order line quantity must be positive.
    ZeroQuantity,
    /// Payment amount must be positive.
    ZeroAmount,
    /// Dishes need at least one ingredient.
    MissingIngredients,
    /// Orders need at least one line.
    EmptyOrder,
    /// Entity already carries relationship links and cannot be registered
    /// directly.
    Prelinked { kind: &'static str, id: EntityId },
    /// Another entity with the same identifier but different key fields is
    /// already registered.
    IdInUse { kind: &'static str, id: EntityId },
    /// Trimmed text length outside `min..=max` characters.
    InvalidLength {
        field: &'static str,
        min: usize,
        max: usize,
    },
    /// Restaurant table limit must be positive.
    ZeroCapacity,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroId { kind } => write!(f, "{kind} id must be a positive integer"),
            Self::ZeroQuantity => write!(f, "quantity must be greater than zero"),
            Self::ZeroAmount => write!(f, "amount must be greater than zero"),
            Self::MissingIngredients => write!(f, "at least one ingredient is required"),
            Self::EmptyOrder => write!(f, "at least one dish must be ordered"),
            Self::Prelinked { kind, id } => write!(
                f,
                "{kind}#{id} already carries relationship links; link it through the relation API"
            ),
            Self::IdInUse { kind, id } => {
                write!(f, "{kind}#{id} is already used by a different entity")
            }
            Self::InvalidLength { field, min, max } => {
                write!(f, "{field} must be between {min} and {max} characters")
            }
            Self::ZeroCapacity => write!(f, "maximum table count must be greater than zero"),
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn require_id(kind: &'static str, id: EntityId) -> Result<EntityId, ValidationError> {
    if id == 0 {
        return Err(ValidationError::ZeroId { kind });
    }
    Ok(id)
}

/// Trimmed copy of `value`; XML reads drop surrounding whitespace.
pub(crate) fn trimmed(value: impl Into<String>) -> String {
    let value = value.into();
    if value.trim().len() == value.len() {
        value
    } else {
        value.trim().to_string()
    }
}

pub(crate) fn require_text(
    field: &'static str,
    value: impl Into<String>,
    min: usize,
    max: usize,
) -> Result<String, ValidationError> {
    let value = trimmed(value);
    let len = value.chars().count();
    if len < min || len > max {
        return Err(ValidationError::InvalidLength { field, min, max });
    }
    Ok(value)
}
