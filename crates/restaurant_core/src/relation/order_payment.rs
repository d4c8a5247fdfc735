//! Order 1:1 Payment association.

use super::{LinkOutcome, RelationError, RelationResult};
use crate::extent::{EntityRef, Registry};
use crate::model::order::{Order, OrderId};
use crate::model::payment::{Payment, PaymentId};
use log::debug;

impl Registry {
    /// Settles `order_id` with `payment_id`.
    ///
    /// The order's previous payment and the payment's previous order are both
    /// released so each side keeps at most one counterpart.
    pub fn set_payment(
        &mut self,
        order_id: OrderId,
        payment_id: PaymentId,
    ) -> RelationResult<LinkOutcome> {
        self.link_payment(order_id, Some(payment_id))
    }

    /// Releases the payment of `order_id`.
    ///
    /// Returns the released payment id, or `None` when the order had none.
    pub fn remove_payment(&mut self, order_id: OrderId) -> RelationResult<Option<PaymentId>> {
        let previous = self
            .extent::<Order>()
            .get(order_id)
            .ok_or_else(|| RelationError::not_found::<Order>(order_id))?
            .payment_id;
        self.link_payment(order_id, None)?;
        Ok(previous)
    }

    pub(crate) fn link_payment(
        &mut self,
        order_id: OrderId,
        payment_id: Option<PaymentId>,
    ) -> RelationResult<LinkOutcome> {
        let current = self
            .extent::<Order>()
            .get(order_id)
            .ok_or_else(|| RelationError::not_found::<Order>(order_id))?
            .payment_id;
        let previous_order = match payment_id {
            Some(id) => {
                self.extent::<Payment>()
                    .get(id)
                    .ok_or_else(|| RelationError::not_found::<Payment>(id))?
                    .order_id
            }
            None => None,
        };

        if current == payment_id {
            return Ok(LinkOutcome::Unchanged);
        }

        if let Some(old_payment) = current {
            if let Some(payment) = self.extent_mut::<Payment>().get_mut(old_payment) {
                if payment.order_id == Some(order_id) {
                    payment.order_id = None;
                }
            }
        }
        if let Some(new_payment) = payment_id {
            if let Some(other_order) = previous_order.filter(|id| *id != order_id) {
                if let Some(order) = self.extent_mut::<Order>().get_mut(other_order) {
                    if order.payment_id == Some(new_payment) {
                        order.payment_id = None;
                    }
                }
            }
            if let Some(payment) = self.extent_mut::<Payment>().get_mut(new_payment) {
                payment.order_id = Some(order_id);
            }
        }
        if let Some(order) = self.extent_mut::<Order>().get_mut(order_id) {
            order.payment_id = payment_id;
        }

        debug!(
            "event=link_set module=relation status=ok relation=order_payment child={} old={:?} new={:?}",
            EntityRef::of::<Order>(order_id),
            current,
            payment_id
        );
        Ok(LinkOutcome::Changed)
    }
}
