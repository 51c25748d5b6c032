//! Restaurant checkout flow
//!
//! Precondition order is fixed: identity, cart presence, payment
//! selection, then field validation. A guest with an empty cart is told
//! about the permission problem, not the cart.

use chrono::{NaiveDate, NaiveTime};
use shared::order::{CheckoutRequest, DeliveryDetails, Receipt};

use super::{
    CheckoutError, CheckoutResult, CheckoutService, MAX_CODE_ATTEMPTS, generate_order_code,
    pricing, require,
};
use crate::session::SessionData;
use crate::storage::{NewOrder, NewOrderLine, StoreError};

impl CheckoutService {
    /// Finalize one restaurant's cart into a committed order
    ///
    /// On success the restaurant's cart partition is removed from the
    /// session; other restaurants' carts and the payment selection are
    /// untouched. On any error the whole session is untouched.
    pub fn checkout_restaurant(
        &self,
        session: &mut SessionData,
        restaurant_id: &str,
        req: &CheckoutRequest,
    ) -> CheckoutResult<Receipt> {
        let user_id = session
            .identity
            .user_id()
            .ok_or(CheckoutError::PermissionDenied)?
            .to_string();

        let lines = session
            .carts
            .lines(restaurant_id)
            .ok_or(CheckoutError::EmptyCart)?
            .to_vec();
        let payment = session.payment.clone().ok_or(CheckoutError::PaymentMissing)?;

        let client_name = require(&req.client_name, "client_name")?.to_string();
        let delivery = validate_delivery(req)?;

        let priced = pricing::price_cart(&lines);

        let mut committed = None;
        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let draft = NewOrder {
                code: generate_order_code(),
                user_id: user_id.clone(),
                restaurant_id: restaurant_id.to_string(),
                client_name: client_name.clone(),
                subtotal: priced.subtotal,
                tax: priced.tax,
                total: priced.total,
                payment: payment.clone(),
                delivery: delivery.clone(),
                lines: lines
                    .iter()
                    .map(|l| NewOrderLine {
                        item_id: l.item_id.clone(),
                        quantity: l.quantity,
                        unit_price: l.unit_price,
                    })
                    .collect(),
            };

            match self.store.commit_order(draft) {
                Ok(order) => {
                    committed = Some(order);
                    break;
                }
                Err(StoreError::DuplicateOrderCode(code)) => {
                    tracing::warn!(attempt, %code, "order code collision, regenerating");
                }
                Err(e) => return Err(e.into()),
            }
        }

        let order = committed.ok_or_else(|| {
            CheckoutError::CommitFailed(format!(
                "could not allocate a unique order code in {MAX_CODE_ATTEMPTS} attempts"
            ))
        })?;

        session.carts.take_restaurant(restaurant_id);
        tracing::info!(
            code = %order.code,
            restaurant_id,
            total = %order.total,
            "restaurant order committed"
        );

        Ok(Receipt {
            code: order.code,
            restaurant_id: order.restaurant_id,
            client_name: order.client_name,
            lines: priced.lines,
            subtotal: order.subtotal,
            tax: order.tax,
            total: order.total,
            payment: order.payment,
            delivery: order.delivery,
            created_at: order.created_at,
        })
    }
}

/// Build typed delivery details from the flat request fields
fn validate_delivery(req: &CheckoutRequest) -> CheckoutResult<DeliveryDetails> {
    match req.delivery_type.as_str() {
        "domicilio" => Ok(DeliveryDetails::Domicilio {
            address: require(&req.address, "address")?.to_string(),
            phone: require(&req.phone, "phone")?.to_string(),
        }),
        "reserva" => {
            let date = NaiveDate::parse_from_str(require(&req.date, "date")?, "%Y-%m-%d")
                .map_err(|_| {
                    CheckoutError::Validation("date must be YYYY-MM-DD".to_string())
                })?;
            let time = NaiveTime::parse_from_str(require(&req.time, "time")?, "%H:%M")
                .map_err(|_| CheckoutError::Validation("time must be HH:MM".to_string()))?;
            Ok(DeliveryDetails::Reserva { date, time })
        }
        other => Err(CheckoutError::Validation(format!(
            "delivery_type must be domicilio or reserva, got {other}"
        ))),
    }
}
