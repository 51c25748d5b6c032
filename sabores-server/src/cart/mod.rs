//! Cart Engine - session cart mutations and totals
//!
//! Owns every mutation of the session's [`MultiCart`] and
//! [`shared::cart::MarketCart`]. The engine enforces:
//!
//! - guests cannot mutate (every write requires a signed-in identity)
//! - merged line quantities stay within [`MAX_LINE_QUANTITY`], so the
//!   sum of accepted adds is always exactly representable
//! - prices are snapshotted from the catalog at add time
//! - market additions are soft-checked against current stock
//!   (cumulative cart quantity + new quantity ≤ stock); the hard check
//!   happens again at commit time inside the store transaction
//!
//! Every successful mutation is immediately visible to the next read of
//! the same session; the cart structures themselves guarantee no empty
//! restaurant partition is ever observable.

mod error;

pub use error::{CartError, CartResult};

use crate::catalog::CatalogService;
use crate::session::SessionData;
use rust_decimal::Decimal;
use shared::cart::{CartLine, CartSummaryEntry, MarketCartLine};

/// Upper bound on one line's merged quantity
pub const MAX_LINE_QUANTITY: u32 = 10_000;

/// Cart mutation engine
#[derive(Clone)]
pub struct CartEngine {
    catalog: CatalogService,
}

impl CartEngine {
    pub fn new(catalog: CatalogService) -> Self {
        Self { catalog }
    }

    /// Add a menu item to one restaurant's cart
    ///
    /// Merges into an existing line for the same item (keeping the
    /// original price snapshot) or appends a new line priced from the
    /// catalog's current value. The merged quantity must stay within
    /// [`MAX_LINE_QUANTITY`].
    pub fn add_item(
        &self,
        session: &mut SessionData,
        restaurant_id: &str,
        item_id: &str,
        quantity: u32,
    ) -> CartResult<()> {
        if session.identity.is_guest() {
            return Err(CartError::PermissionDenied);
        }
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }
        let merged = session
            .carts
            .quantity_of(restaurant_id, item_id)
            .checked_add(quantity)
            .ok_or(CartError::InvalidQuantity)?;
        if merged > MAX_LINE_QUANTITY {
            return Err(CartError::InvalidQuantity);
        }

        let meta = self.catalog.get_item(item_id)?;
        session.carts.add(CartLine {
            item_id: item_id.to_string(),
            name: meta.name,
            unit_price: meta.price,
            quantity,
            restaurant_id: restaurant_id.to_string(),
        });
        tracing::debug!(restaurant_id, item_id, quantity, "cart item added");
        Ok(())
    }

    /// Remove one line from a restaurant's cart
    ///
    /// Returns whether the line was present; removal of an absent line
    /// is a no-op, not an error.
    pub fn remove_item(
        &self,
        session: &mut SessionData,
        restaurant_id: &str,
        item_id: &str,
    ) -> CartResult<bool> {
        if session.identity.is_guest() {
            return Err(CartError::PermissionDenied);
        }
        Ok(session.carts.remove(restaurant_id, item_id))
    }

    /// Overwrite a line's quantity; `new_quantity == 0` behaves as removal
    pub fn edit_quantity(
        &self,
        session: &mut SessionData,
        restaurant_id: &str,
        item_id: &str,
        new_quantity: u32,
    ) -> CartResult<bool> {
        if session.identity.is_guest() {
            return Err(CartError::PermissionDenied);
        }
        if new_quantity > MAX_LINE_QUANTITY {
            return Err(CartError::InvalidQuantity);
        }
        Ok(session.carts.set_quantity(restaurant_id, item_id, new_quantity))
    }

    /// Σ(unit_price × quantity) over one restaurant's cart; pure
    pub fn compute_total(&self, session: &SessionData, restaurant_id: &str) -> Decimal {
        session.carts.total(restaurant_id)
    }

    /// Item counts per restaurant with a non-empty cart
    pub fn cart_summary(&self, session: &SessionData) -> Vec<CartSummaryEntry> {
        session.carts.summary()
    }

    /// Add a product to the market cart
    ///
    /// The requested cumulative quantity (already in the cart + new) is
    /// checked against the product's current stock. This is the soft
    /// check; the commit transaction re-validates.
    pub fn add_market_item(
        &self,
        session: &mut SessionData,
        product_id: &str,
        quantity: u32,
    ) -> CartResult<()> {
        if session.identity.is_guest() {
            return Err(CartError::PermissionDenied);
        }
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }

        let meta = self.catalog.get_product(product_id)?;
        let cumulative = session
            .market_cart
            .quantity_of(product_id)
            .checked_add(quantity)
            .ok_or(CartError::InvalidQuantity)?;
        if cumulative > meta.stock {
            return Err(CartError::InsufficientStock {
                product_id: product_id.to_string(),
                requested: cumulative,
                available: meta.stock,
            });
        }

        session
            .market_cart
            .add(product_id, &meta.name, meta.sale_price, quantity);
        tracing::debug!(product_id, quantity, "market item added");
        Ok(())
    }

    /// Remove one product from the market cart
    pub fn remove_market_item(
        &self,
        session: &mut SessionData,
        product_id: &str,
    ) -> CartResult<bool> {
        if session.identity.is_guest() {
            return Err(CartError::PermissionDenied);
        }
        Ok(session.market_cart.remove(product_id))
    }

    /// Current market cart lines with the running total
    pub fn market_cart_view(&self, session: &SessionData) -> (Vec<MarketCartLine>, Decimal) {
        (
            session.market_cart.lines().to_vec(),
            session.market_cart.total(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Identity;
    use crate::storage::Store;
    use shared::models::{MenuItem, Product};

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn engine_with_catalog() -> CartEngine {
        let store = Store::open_in_memory().unwrap();
        store
            .put_menu_item(&MenuItem {
                id: "m1".to_string(),
                restaurant_id: "r1".to_string(),
                name: "Tacos al pastor".to_string(),
                price: dec("4.50"),
                description: None,
            })
            .unwrap();
        store
            .put_menu_item(&MenuItem {
                id: "m2".to_string(),
                restaurant_id: "r1".to_string(),
                name: "Agua de horchata".to_string(),
                price: dec("3.00"),
                description: None,
            })
            .unwrap();
        store
            .put_product(&Product {
                id: "p1".to_string(),
                name: "Tomates".to_string(),
                purchase_price: dec("1.00"),
                sale_price: dec("2.50"),
                stock: 5,
            })
            .unwrap();
        CartEngine::new(CatalogService::new(store))
    }

    fn user_session() -> SessionData {
        SessionData {
            identity: Identity::User {
                id: "u1".to_string(),
                name: "Ana".to_string(),
            },
            carts: Default::default(),
            market_cart: Default::default(),
            payment: None,
        }
    }

    fn guest_session() -> SessionData {
        SessionData {
            identity: Identity::Guest,
            carts: Default::default(),
            market_cart: Default::default(),
            payment: None,
        }
    }

    #[test]
    fn repeated_adds_accumulate_into_one_line() {
        let engine = engine_with_catalog();
        let mut session = user_session();

        engine.add_item(&mut session, "r1", "m1", 2).unwrap();
        engine.add_item(&mut session, "r1", "m1", 3).unwrap();

        let lines = session.carts.lines("r1").unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 5);
        assert_eq!(lines[0].name, "Tacos al pastor");
    }

    #[test]
    fn add_unknown_item_fails_not_found() {
        let engine = engine_with_catalog();
        let mut session = user_session();

        let err = engine.add_item(&mut session, "r1", "missing", 1).unwrap_err();
        assert!(matches!(err, CartError::NotFound(_)));
    }

    #[test]
    fn guests_cannot_mutate() {
        let engine = engine_with_catalog();
        let mut session = guest_session();

        assert!(matches!(
            engine.add_item(&mut session, "r1", "m1", 1),
            Err(CartError::PermissionDenied)
        ));
        assert!(matches!(
            engine.remove_item(&mut session, "r1", "m1"),
            Err(CartError::PermissionDenied)
        ));
        assert!(matches!(
            engine.add_market_item(&mut session, "p1", 1),
            Err(CartError::PermissionDenied)
        ));
    }

    #[test]
    fn merge_that_would_overflow_is_rejected() {
        let engine = engine_with_catalog();
        let mut session = user_session();

        engine.add_item(&mut session, "r1", "m1", 2).unwrap();
        let err = engine
            .add_item(&mut session, "r1", "m1", u32::MAX)
            .unwrap_err();
        assert!(matches!(err, CartError::InvalidQuantity));

        // The existing line is untouched
        assert_eq!(session.carts.lines("r1").unwrap()[0].quantity, 2);
    }

    #[test]
    fn line_quantity_is_capped() {
        let engine = engine_with_catalog();
        let mut session = user_session();

        assert!(matches!(
            engine.add_item(&mut session, "r1", "m1", MAX_LINE_QUANTITY + 1),
            Err(CartError::InvalidQuantity)
        ));

        engine.add_item(&mut session, "r1", "m1", MAX_LINE_QUANTITY).unwrap();
        assert!(matches!(
            engine.add_item(&mut session, "r1", "m1", 1),
            Err(CartError::InvalidQuantity)
        ));
        assert!(matches!(
            engine.edit_quantity(&mut session, "r1", "m1", MAX_LINE_QUANTITY + 1),
            Err(CartError::InvalidQuantity)
        ));
        assert_eq!(session.carts.quantity_of("r1", "m1"), MAX_LINE_QUANTITY);
    }

    #[test]
    fn market_merge_that_would_overflow_is_rejected() {
        let engine = engine_with_catalog();
        let mut session = user_session();

        engine.add_market_item(&mut session, "p1", 3).unwrap();
        let err = engine
            .add_market_item(&mut session, "p1", u32::MAX)
            .unwrap_err();
        assert!(matches!(err, CartError::InvalidQuantity));
        assert_eq!(session.market_cart.quantity_of("p1"), 3);
    }

    #[test]
    fn compute_total_matches_expected_scenario() {
        let engine = engine_with_catalog();
        let mut session = user_session();

        engine.add_item(&mut session, "r1", "m1", 2).unwrap();
        engine.add_item(&mut session, "r1", "m2", 1).unwrap();

        assert_eq!(engine.compute_total(&session, "r1"), dec("12.00"));
        // Idempotent
        assert_eq!(engine.compute_total(&session, "r1"), dec("12.00"));
    }

    #[test]
    fn edit_quantity_zero_removes_and_prunes() {
        let engine = engine_with_catalog();
        let mut session = user_session();

        engine.add_item(&mut session, "r1", "m1", 2).unwrap();
        assert!(engine.edit_quantity(&mut session, "r1", "m1", 0).unwrap());
        assert!(session.carts.lines("r1").is_none());
    }

    #[test]
    fn remove_absent_line_signals_empty_cart() {
        let engine = engine_with_catalog();
        let mut session = user_session();

        assert!(!engine.remove_item(&mut session, "r1", "m1").unwrap());
    }

    #[test]
    fn market_add_respects_cumulative_stock() {
        let engine = engine_with_catalog();
        let mut session = user_session();

        engine.add_market_item(&mut session, "p1", 3).unwrap();
        let err = engine.add_market_item(&mut session, "p1", 3).unwrap_err();
        assert!(matches!(
            err,
            CartError::InsufficientStock {
                requested: 6,
                available: 5,
                ..
            }
        ));
        // First add is untouched
        assert_eq!(session.market_cart.quantity_of("p1"), 3);
        assert_eq!(session.market_cart.total(), dec("7.50"));
    }

    #[test]
    fn market_remove_and_view() {
        let engine = engine_with_catalog();
        let mut session = user_session();

        engine.add_market_item(&mut session, "p1", 2).unwrap();
        let (lines, total) = engine.market_cart_view(&session);
        assert_eq!(lines.len(), 1);
        assert_eq!(total, dec("5.00"));

        assert!(engine.remove_market_item(&mut session, "p1").unwrap());
        assert!(!engine.remove_market_item(&mut session, "p1").unwrap());
    }
}
