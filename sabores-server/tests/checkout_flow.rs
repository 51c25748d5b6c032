//! End-to-end checkout flows over a real on-disk store

use rust_decimal::Decimal;
use sabores_server::checkout::CheckoutError;
use sabores_server::core::{Config, ServerState};
use sabores_server::storage::{CommittedOrder, Store};
use shared::models::{MenuItem, Product};
use shared::order::{CheckoutRequest, MarketCheckoutRequest, PaymentRequest};
use tempfile::TempDir;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn seeded_state(dir: &TempDir) -> ServerState {
    let store = Store::open(dir.path().join("sabores.redb")).unwrap();
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

    let config = Config::with_overrides(dir.path().to_string_lossy().to_string(), 0);
    ServerState::with_store(config, store)
}

fn card_payment() -> PaymentRequest {
    PaymentRequest {
        method: "tarjeta".to_string(),
        card_number: Some("4111111111111111".to_string()),
        expiry: Some("12/27".to_string()),
        cvv: Some("123".to_string()),
        ..Default::default()
    }
}

fn domicilio() -> CheckoutRequest {
    CheckoutRequest {
        delivery_type: "domicilio".to_string(),
        client_name: Some("Ana Pérez".to_string()),
        address: Some("Calle 5 #12".to_string()),
        phone: Some("5512345678".to_string()),
        ..Default::default()
    }
}

#[test]
fn restaurant_checkout_end_to_end() {
    let dir = TempDir::new().unwrap();
    let state = seeded_state(&dir);

    let token = state.sessions.login("u1", "Ana");

    state
        .sessions
        .with_session_mut(&token, |session| {
            state.cart.add_item(session, "r1", "m1", 2).unwrap();
            state.cart.add_item(session, "r1", "m2", 1).unwrap();
            sabores_server::checkout::select_payment(session, &card_payment()).unwrap();
        })
        .unwrap();

    let receipt = state
        .sessions
        .with_session_mut(&token, |session| {
            state.checkout.checkout_restaurant(session, "r1", &domicilio())
        })
        .unwrap()
        .unwrap();

    assert_eq!(receipt.subtotal, dec("12.00"));
    assert_eq!(receipt.tax, dec("1.92"));
    assert_eq!(receipt.total, dec("13.92"));
    assert_eq!(receipt.code.len(), 8);

    // Cart cleared, payment kept
    state
        .sessions
        .with_session(&token, |session| {
            assert!(session.carts.is_empty());
            assert!(session.payment.is_some());
        })
        .unwrap();

    // The committed order is durable and owner-visible
    let committed = state.store.get_order_by_code(&receipt.code).unwrap().unwrap();
    match committed {
        CommittedOrder::Restaurant { order, lines } => {
            assert_eq!(order.user_id, "u1");
            assert_eq!(order.total, dec("13.92"));
            assert_eq!(lines.len(), 2);
        }
        CommittedOrder::Market { .. } => panic!("expected restaurant order"),
    }
}

#[test]
fn failed_preconditions_commit_nothing() {
    let dir = TempDir::new().unwrap();
    let state = seeded_state(&dir);

    let token = state.sessions.login("u1", "Ana");

    // Empty cart
    let err = state
        .sessions
        .with_session_mut(&token, |session| {
            state.checkout.checkout_restaurant(session, "r1", &domicilio())
        })
        .unwrap()
        .unwrap_err();
    assert!(matches!(err, CheckoutError::EmptyCart));

    // Cart but no payment
    let err = state
        .sessions
        .with_session_mut(&token, |session| {
            state.cart.add_item(session, "r1", "m1", 1).unwrap();
            state.checkout.checkout_restaurant(session, "r1", &domicilio())
        })
        .unwrap()
        .unwrap_err();
    assert!(matches!(err, CheckoutError::PaymentMissing));

    // No order was allocated by either failure
    assert!(state.store.get_order(1).unwrap().is_none());
}

#[test]
fn concurrent_market_checkouts_decrement_exactly_once() {
    let dir = TempDir::new().unwrap();
    let state = seeded_state(&dir);

    let recogida = MarketCheckoutRequest {
        delivery_type: "recogida".to_string(),
        pickup_time: Some("10:30".to_string()),
        ..Default::default()
    };

    // Two sessions each want 4 of the 5 in stock
    let mut handles = Vec::new();
    for user in ["u1", "u2"] {
        let state = state.clone();
        let recogida = recogida.clone();
        handles.push(std::thread::spawn(move || {
            let token = state.sessions.login(user, user);
            state
                .sessions
                .with_session_mut(&token, |session| {
                    state.cart.add_market_item(session, "p1", 4).unwrap();
                    sabores_server::checkout::select_payment(session, &PaymentRequest {
                        method: "transferencia".to_string(),
                        account_number: Some("00123456789".to_string()),
                        holder_name: Some(user.to_string()),
                        ..Default::default()
                    })
                    .unwrap();
                    state.checkout.checkout_market(session, &recogida)
                })
                .unwrap()
        }));
    }

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);

    let conflict = results.into_iter().find_map(Result::err).unwrap();
    assert!(matches!(conflict, CheckoutError::StockConflict { .. }));

    // Stock decremented exactly once
    assert_eq!(state.catalog.get_product("p1").unwrap().stock, 1);
}

#[test]
fn market_checkout_carries_no_tax_and_clears_cart() {
    let dir = TempDir::new().unwrap();
    let state = seeded_state(&dir);

    let token = state.sessions.login("u1", "Ana");

    let receipt = state
        .sessions
        .with_session_mut(&token, |session| {
            state.cart.add_market_item(session, "p1", 3).unwrap();
            sabores_server::checkout::select_payment(session, &card_payment()).unwrap();
            state.checkout.checkout_market(
                session,
                &MarketCheckoutRequest {
                    delivery_type: "domicilio".to_string(),
                    address: Some("Calle 5 #12".to_string()),
                    phone: Some("5512345678".to_string()),
                    ..Default::default()
                },
            )
        })
        .unwrap()
        .unwrap();

    assert_eq!(receipt.total, dec("7.50"));
    assert_eq!(state.catalog.get_product("p1").unwrap().stock, 2);

    state
        .sessions
        .with_session(&token, |session| {
            assert!(session.market_cart.is_empty());
        })
        .unwrap();

    // Both order kinds share the code namespace
    let committed = state.store.get_order_by_code(&receipt.code).unwrap().unwrap();
    assert!(matches!(committed, CommittedOrder::Market { .. }));
}

#[test]
fn logout_drops_carts_wholesale() {
    let dir = TempDir::new().unwrap();
    let state = seeded_state(&dir);

    let token = state.sessions.login("u1", "Ana");
    state
        .sessions
        .with_session_mut(&token, |session| {
            state.cart.add_item(session, "r1", "m1", 2).unwrap();
            state.cart.add_market_item(session, "p1", 1).unwrap();
        })
        .unwrap();

    assert!(state.sessions.logout(&token));
    assert!(state.sessions.with_session(&token, |_| ()).is_none());

    // Nothing was committed and no stock moved
    assert_eq!(state.catalog.get_product("p1").unwrap().stock, 5);
}
