//! Payment record.

use super::{require_id, EntityId, ValidationError};
use crate::extent::Entity;
use crate::model::order::OrderId;
use serde::{Deserialize, Serialize};

pub type PaymentId = EntityId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    Voucher,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Refunded,
}

/// Settlement for exactly one order.
///
/// `order_id` is mirrored by the order's `payment_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub amount_cents: u64,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) order_id: Option<OrderId>,
}

impl Payment {
    /// Creates a pending payment.
    ///
    /// # Errors
    /// - `ValidationError::ZeroId` when `id == 0`.
    /// - `ValidationError::ZeroAmount` when `amount_cents == 0`.
    pub fn new(
        id: PaymentId,
        amount_cents: u64,
        method: PaymentMethod,
    ) -> Result<Self, ValidationError> {
        let id = require_id(Self::KIND, id)?;
        if amount_cents == 0 {
            return Err(ValidationError::ZeroAmount);
        }
        Ok(Self {
            id,
            amount_cents,
            method,
            status: PaymentStatus::Pending,
            order_id: None,
        })
    }

    pub fn order_id(&self) -> Option<OrderId> {
        self.order_id
    }
}

impl Entity for Payment {
    const KIND: &'static str = "Payment";
    type Key = (PaymentId, u64, PaymentMethod);

    fn id(&self) -> EntityId {
        self.id
    }

    fn key(&self) -> Self::Key {
        (self.id, self.amount_cents, self.method)
    }

    fn has_links(&self) -> bool {
        self.order_id.is_some()
    }
}
