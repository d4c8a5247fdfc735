//! Customer record.
//!
//! # Invariants
//! - `order_ids` mirrors every order whose `customer_id` points here.
//! - `credit_points` only accrues for `Membership::Member`.

use super::{require_id, trimmed, EntityId, ValidationError};
use crate::extent::Entity;
use crate::model::order::OrderId;
use serde::{Deserialize, Serialize};

pub type CustomerId = EntityId;

/// Loyalty status of a customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Membership {
    Member,
    NonMember,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub membership: Membership,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub credit_points: u32,
    #[serde(default)]
    pub(crate) order_ids: Vec<OrderId>,
}

impl Customer {
    /// Creates a walk-in customer without loyalty membership.
    pub fn new(id: CustomerId) -> Result<Self, ValidationError> {
        Ok(Self {
            id: require_id(Self::KIND, id)?,
            membership: Membership::NonMember,
            email: None,
            credit_points: 0,
            order_ids: Vec::new(),
        })
    }

    /// Creates a loyalty member with an optional contact address.
    pub fn member(id: CustomerId, email: Option<String>) -> Result<Self, ValidationError> {
        let mut customer = Self::new(id)?;
        customer.membership = Membership::Member;
        customer.email = email.map(trimmed).filter(|email| !email.is_empty());
        Ok(customer)
    }

    /// Orders placed by this customer, in link order.
    pub fn order_ids(&self) -> &[OrderId] {
        &self.order_ids
    }

    pub fn is_member(&self) -> bool {
        self.membership == Membership::Member
    }
}

impl Entity for Customer {
    const KIND: &'static str = "Customer";
    type Key = CustomerId;

    fn id(&self) -> EntityId {
        self.id
    }

    fn key(&self) -> Self::Key {
        self.id
    }

    fn has_links(&self) -> bool {
        !self.order_ids.is_empty()
    }
}
