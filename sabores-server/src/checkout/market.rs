//! Agricultural market checkout flow
//!
//! Same precondition ladder as the restaurant flow, but stock-aware:
//! a read-only pass re-checks every line against current stock before
//! the commit transaction performs the authoritative
//! compare-and-decrement. Market totals carry no tax.

use chrono::NaiveTime;
use rust_decimal::Decimal;
use shared::order::{MarketCheckoutRequest, MarketDeliveryDetails, MarketReceipt, ReceiptLine};

use super::{
    CheckoutError, CheckoutResult, CheckoutService, MAX_CODE_ATTEMPTS, generate_order_code,
    require,
};
use crate::catalog::CatalogError;
use crate::session::SessionData;
use crate::storage::{NewMarketOrder, NewMarketOrderLine, StoreError};

impl CheckoutService {
    /// Finalize the market cart into a committed order, decrementing
    /// product stock atomically
    ///
    /// On success the market cart is emptied; on any error the cart and
    /// every product's stock are untouched. When two sessions race over
    /// the last units, exactly one commit succeeds and the other gets
    /// [`CheckoutError::StockConflict`].
    pub fn checkout_market(
        &self,
        session: &mut SessionData,
        req: &MarketCheckoutRequest,
    ) -> CheckoutResult<MarketReceipt> {
        let user_id = session
            .identity
            .user_id()
            .ok_or(CheckoutError::PermissionDenied)?
            .to_string();

        let lines = session.market_cart.lines().to_vec();
        if lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let payment = session.payment.clone().ok_or(CheckoutError::PaymentMissing)?;

        let delivery = validate_delivery(req)?;

        // Early stock pass against current catalog state, so a stale
        // cart fails before any code is reserved. The commit transaction
        // repeats this check authoritatively.
        for line in &lines {
            let product = self.catalog.get_product(&line.product_id).map_err(|e| match e {
                CatalogError::Storage(err) => CheckoutError::CommitFailed(err.to_string()),
                _ => CheckoutError::NotFound(line.product_id.clone()),
            })?;
            if product.stock < line.quantity {
                return Err(CheckoutError::StockConflict {
                    product_id: line.product_id.clone(),
                    requested: line.quantity,
                    available: product.stock,
                });
            }
        }

        let total: Decimal = lines
            .iter()
            .map(|l| l.unit_price * Decimal::from(l.quantity))
            .sum();

        let mut committed = None;
        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let draft = NewMarketOrder {
                code: generate_order_code(),
                user_id: user_id.clone(),
                total,
                payment: payment.clone(),
                delivery: delivery.clone(),
                lines: lines
                    .iter()
                    .map(|l| NewMarketOrderLine {
                        product_id: l.product_id.clone(),
                        quantity: l.quantity,
                        unit_price: l.unit_price,
                    })
                    .collect(),
            };

            match self.store.commit_market_order(draft) {
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

        let receipt_lines: Vec<ReceiptLine> = lines
            .iter()
            .map(|l| ReceiptLine {
                name: l.name.clone(),
                quantity: l.quantity,
                unit_price: l.unit_price,
                subtotal: l.unit_price * Decimal::from(l.quantity),
            })
            .collect();

        session.market_cart.take_all();
        tracing::info!(code = %order.code, total = %order.total, "market order committed");

        Ok(MarketReceipt {
            code: order.code,
            lines: receipt_lines,
            total: order.total,
            payment: order.payment,
            delivery: order.delivery,
            created_at: order.created_at,
        })
    }
}

fn validate_delivery(req: &MarketCheckoutRequest) -> CheckoutResult<MarketDeliveryDetails> {
    match req.delivery_type.as_str() {
        "domicilio" => Ok(MarketDeliveryDetails::Domicilio {
            address: require(&req.address, "address")?.to_string(),
            phone: require(&req.phone, "phone")?.to_string(),
        }),
        "recogida" => {
            let time =
                NaiveTime::parse_from_str(require(&req.pickup_time, "pickup_time")?, "%H:%M")
                    .map_err(|_| {
                        CheckoutError::Validation("pickup_time must be HH:MM".to_string())
                    })?;
            Ok(MarketDeliveryDetails::Recogida { time })
        }
        other => Err(CheckoutError::Validation(format!(
            "delivery_type must be domicilio or recogida, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogService;
    use crate::session::Identity;
    use crate::storage::Store;
    use shared::models::Product;
    use shared::order::{PaymentMethod, PaymentSelection};

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn service_with_stock(stock: u32) -> CheckoutService {
        let store = Store::open_in_memory().unwrap();
        store
            .put_product(&Product {
                id: "p1".to_string(),
                name: "Tomates".to_string(),
                purchase_price: dec("1.00"),
                sale_price: dec("2.50"),
                stock,
            })
            .unwrap();
        CheckoutService::new(store.clone(), CatalogService::new(store))
    }

    fn session_with_market_cart(quantity: u32) -> SessionData {
        let mut session = SessionData {
            identity: Identity::User {
                id: "u1".to_string(),
                name: "Ana".to_string(),
            },
            carts: Default::default(),
            market_cart: Default::default(),
            payment: Some(PaymentSelection {
                method: PaymentMethod::Transferencia,
                detail: "Cuenta: 6789 ****".to_string(),
            }),
        };
        session.market_cart.add("p1", "Tomates", dec("2.50"), quantity);
        session
    }

    fn recogida_request() -> MarketCheckoutRequest {
        MarketCheckoutRequest {
            delivery_type: "recogida".to_string(),
            address: None,
            phone: None,
            pickup_time: Some("10:30".to_string()),
        }
    }

    #[test]
    fn successful_checkout_decrements_stock_and_clears_cart() {
        let service = service_with_stock(5);
        let mut session = session_with_market_cart(3);

        let receipt = service
            .checkout_market(&mut session, &recogida_request())
            .unwrap();

        // No tax on market totals
        assert_eq!(receipt.total, dec("7.50"));
        assert!(session.market_cart.lines().is_empty());

        let product = service.catalog.get_product("p1").unwrap();
        assert_eq!(product.stock, 2);
    }

    #[test]
    fn stale_cart_hits_stock_conflict_and_changes_nothing() {
        let service = service_with_stock(5);
        let mut session = session_with_market_cart(3);

        // Stock shrank between add and checkout
        service
            .store
            .put_product(&Product {
                id: "p1".to_string(),
                name: "Tomates".to_string(),
                purchase_price: dec("1.00"),
                sale_price: dec("2.50"),
                stock: 2,
            })
            .unwrap();

        let err = service
            .checkout_market(&mut session, &recogida_request())
            .unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::StockConflict {
                requested: 3,
                available: 2,
                ..
            }
        ));

        // Cart and stock untouched
        assert_eq!(session.market_cart.quantity_of("p1"), 3);
        assert_eq!(service.catalog.get_product("p1").unwrap().stock, 2);
    }

    #[test]
    fn empty_market_cart_is_rejected() {
        let service = service_with_stock(5);
        let mut session = session_with_market_cart(3);
        session.market_cart.take_all();

        assert!(matches!(
            service.checkout_market(&mut session, &recogida_request()),
            Err(CheckoutError::EmptyCart)
        ));
    }

    #[test]
    fn domicilio_requires_address_and_phone() {
        let service = service_with_stock(5);
        let mut session = session_with_market_cart(1);

        let req = MarketCheckoutRequest {
            delivery_type: "domicilio".to_string(),
            address: Some("Calle 5 #12".to_string()),
            phone: None,
            pickup_time: None,
        };
        assert!(matches!(
            service.checkout_market(&mut session, &req),
            Err(CheckoutError::Validation(msg)) if msg.contains("phone")
        ));
    }
}
