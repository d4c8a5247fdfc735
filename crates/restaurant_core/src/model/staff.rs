//! Staff record with role-dispatched capabilities.
//!
//! # Responsibility
//! - Represent every staff member with one record shape.
//! - Resolve role behavior through `StaffCapability` lookups instead of
//!   per-role record types.
//!
//! # Invariants
//! - `cuisine` is set only for kitchen roles.
//! - `manager_level` is set only for `StaffRole::Manager`.

use super::{require_id, trimmed, EntityId, ValidationError};
use crate::extent::Entity;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type EmployeeId = EntityId;

/// Job role tag carried by every employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    Chef,
    ExecutiveChef,
    SousChef,
    Waiter,
    Manager,
}

impl StaffRole {
    /// Capabilities granted by this role.
    pub fn capabilities(self) -> &'static [StaffCapability] {
        match self {
            Self::Chef => &[StaffCapability::ManageKitchen, StaffCapability::DevelopCuisine],
            Self::ExecutiveChef => &[
                StaffCapability::ManageKitchen,
                StaffCapability::DevelopCuisine,
                StaffCapability::CurateMenu,
            ],
            Self::SousChef => &[StaffCapability::DevelopCuisine],
            Self::Waiter => &[StaffCapability::ServeTables],
            Self::Manager => &[StaffCapability::AssignTables, StaffCapability::CurateMenu],
        }
    }

    pub fn is_kitchen(self) -> bool {
        matches!(self, Self::Chef | Self::ExecutiveChef | Self::SousChef)
    }
}

/// Seniority of a manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManagerLevel {
    Shift,
    Floor,
    General,
}

/// Role-specific behavior an employee may perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StaffCapability {
    ManageKitchen,
    DevelopCuisine,
    CurateMenu,
    ServeTables,
    AssignTables,
}

impl StaffCapability {
    /// Stable string id.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ManageKitchen => "manage_kitchen",
            Self::DevelopCuisine => "develop_cuisine",
            Self::CurateMenu => "curate_menu",
            Self::ServeTables => "serve_tables",
            Self::AssignTables => "assign_tables",
        }
    }
}

const ALL_CAPABILITIES: &[StaffCapability] = &[
    StaffCapability::ManageKitchen,
    StaffCapability::DevelopCuisine,
    StaffCapability::CurateMenu,
    StaffCapability::ServeTables,
    StaffCapability::AssignTables,
];

/// Parses one capability from its stable string id.
pub fn parse_staff_capability(value: &str) -> Result<StaffCapability, StaffCapabilityError> {
    let normalized = value.trim();
    if normalized.is_empty() {
        return Err(StaffCapabilityError::EmptyCapability);
    }
    ALL_CAPABILITIES
        .iter()
        .copied()
        .find(|capability| capability.as_str() == normalized)
        .ok_or_else(|| StaffCapabilityError::UnsupportedCapability(normalized.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaffCapabilityError {
    EmptyCapability,
    UnsupportedCapability(String),
}

impl Display for StaffCapabilityError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyCapability => write!(f, "staff capability must not be empty"),
            Self::UnsupportedCapability(value) => {
                write!(f, "unsupported staff capability `{value}`")
            }
        }
    }
}

impl Error for StaffCapabilityError {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub hired_on: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_on: Option<NaiveDate>,
    pub department: String,
    pub role: StaffRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager_level: Option<ManagerLevel>,
}

impl Employee {
    fn with_role(
        id: EmployeeId,
        hired_on: NaiveDate,
        department: impl Into<String>,
        role: StaffRole,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id: require_id(Self::KIND, id)?,
            hired_on,
            left_on: None,
            department: trimmed(department),
            role,
            cuisine: None,
            manager_level: None,
        })
    }

    /// Creates a kitchen employee. Non-kitchen roles fall back to `Chef`.
    pub fn kitchen(
        id: EmployeeId,
        hired_on: NaiveDate,
        role: StaffRole,
        cuisine: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let role = if role.is_kitchen() { role } else { StaffRole::Chef };
        let mut employee = Self::with_role(id, hired_on, "Kitchen", role)?;
        employee.cuisine = Some(trimmed(cuisine));
        Ok(employee)
    }

    pub fn waiter(id: EmployeeId, hired_on: NaiveDate) -> Result<Self, ValidationError> {
        Self::with_role(id, hired_on, "Floor", StaffRole::Waiter)
    }

    pub fn manager(
        id: EmployeeId,
        hired_on: NaiveDate,
        level: ManagerLevel,
    ) -> Result<Self, ValidationError> {
        let mut employee = Self::with_role(id, hired_on, "Management", StaffRole::Manager)?;
        employee.manager_level = Some(level);
        Ok(employee)
    }

    pub fn has_capability(&self, capability: StaffCapability) -> bool {
        self.role.capabilities().contains(&capability)
    }

    /// Days employed up to `today`, or up to `left_on` when set.
    pub fn employed_days(&self, today: NaiveDate) -> i64 {
        let end = self.left_on.unwrap_or(today);
        (end - self.hired_on).num_days()
    }
}

impl Entity for Employee {
    const KIND: &'static str = "Employee";
    type Key = (EmployeeId, NaiveDate);

    fn id(&self) -> EntityId {
        self.id
    }

    fn key(&self) -> Self::Key {
        (self.id, self.hired_on)
    }
}
