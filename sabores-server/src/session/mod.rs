//! Session state and session store
//!
//! Each session owns a typed [`SessionData`]: identity, the
//! per-restaurant [`MultiCart`], the flat [`MarketCart`] and the payment
//! selection. Sessions live in a [`DashMap`] keyed by an opaque v4 UUID
//! token; per-session mutations go through the map's entry lock, so
//! overlapping requests for the same session serialize in-process.
//!
//! Every access refreshes the session's idle clock; sessions abandoned
//! past [`SESSION_IDLE_TIMEOUT`] are dropped by a periodic sweep, so the
//! map stays bounded by active traffic rather than growing until logout.
//!
//! Identity itself (OAuth, passwords) is an external concern - the store
//! only records the already-authenticated user id and display name it is
//! handed at login, or marks the session as a guest.

mod extractor;

pub use extractor::SessionToken;

use dashmap::DashMap;
use shared::cart::{MarketCart, MultiCart};
use shared::order::PaymentSelection;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Sessions idle longer than this are evicted by the sweep
pub const SESSION_IDLE_TIMEOUT: Duration = Duration::from_secs(2 * 60 * 60);

/// How often the background sweep runs
pub const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Who owns a session
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Identity {
    /// Browsing-only access; every mutating cart operation is denied
    Guest,
    User { id: String, name: String },
}

impl Identity {
    pub fn is_guest(&self) -> bool {
        matches!(self, Identity::Guest)
    }

    /// The user id, if this is a signed-in session
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Identity::User { id, .. } => Some(id),
            Identity::Guest => None,
        }
    }
}

/// Everything a session persists between requests
///
/// The shape is serde-stable: a map of restaurant carts, a flat market
/// cart and the scalar payment selection.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SessionData {
    pub identity: Identity,
    pub carts: MultiCart,
    pub market_cart: MarketCart,
    pub payment: Option<PaymentSelection>,
}

impl SessionData {
    fn new(identity: Identity) -> Self {
        Self {
            identity,
            carts: MultiCart::new(),
            market_cart: MarketCart::new(),
            payment: None,
        }
    }
}

/// A stored session with its idle clock
struct SessionEntry {
    data: SessionData,
    last_seen: Instant,
}

/// In-memory session store
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<DashMap<String, SessionEntry>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn create(&self, identity: Identity) -> String {
        let token = uuid::Uuid::new_v4().to_string();
        self.sessions.insert(
            token.clone(),
            SessionEntry {
                data: SessionData::new(identity),
                last_seen: Instant::now(),
            },
        );
        token
    }

    /// Start a signed-in session, returning its token
    pub fn login(&self, user_id: impl Into<String>, name: impl Into<String>) -> String {
        self.create(Identity::User {
            id: user_id.into(),
            name: name.into(),
        })
    }

    /// Start a guest session, returning its token
    pub fn guest(&self) -> String {
        self.create(Identity::Guest)
    }

    /// End a session, dropping its carts and payment selection wholesale
    ///
    /// Returns whether the token was known.
    pub fn logout(&self, token: &str) -> bool {
        self.sessions.remove(token).is_some()
    }

    /// Read from a session; `None` if the token is unknown
    ///
    /// Refreshes the idle clock.
    pub fn with_session<R>(&self, token: &str, f: impl FnOnce(&SessionData) -> R) -> Option<R> {
        self.sessions.get_mut(token).map(|mut entry| {
            entry.last_seen = Instant::now();
            f(&entry.data)
        })
    }

    /// Mutate a session under its entry lock; `None` if unknown
    ///
    /// Refreshes the idle clock.
    pub fn with_session_mut<R>(
        &self,
        token: &str,
        f: impl FnOnce(&mut SessionData) -> R,
    ) -> Option<R> {
        self.sessions.get_mut(token).map(|mut entry| {
            entry.last_seen = Instant::now();
            f(&mut entry.data)
        })
    }

    /// Drop every session idle longer than `max_idle`
    ///
    /// Returns how many sessions were removed.
    pub fn evict_idle(&self, max_idle: Duration) -> usize {
        let before = self.sessions.len();
        self.sessions
            .retain(|_, entry| entry.last_seen.elapsed() <= max_idle);
        before.saturating_sub(self.sessions.len())
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_creates_user_session() {
        let store = SessionStore::new();
        let token = store.login("u1", "Ana");

        let is_guest = store.with_session(&token, |s| s.identity.is_guest()).unwrap();
        assert!(!is_guest);
    }

    #[test]
    fn logout_drops_session_and_carts() {
        let store = SessionStore::new();
        let token = store.login("u1", "Ana");

        store
            .with_session_mut(&token, |s| {
                s.carts.add(shared::cart::CartLine {
                    item_id: "m1".to_string(),
                    name: "Tacos".to_string(),
                    unit_price: "4.50".parse().unwrap(),
                    quantity: 1,
                    restaurant_id: "r1".to_string(),
                });
            })
            .unwrap();

        assert!(store.logout(&token));
        assert!(store.with_session(&token, |_| ()).is_none());
        assert!(!store.logout(&token));
    }

    #[test]
    fn idle_sessions_are_evicted_fresh_ones_kept() {
        let store = SessionStore::new();
        let stale = store.login("u1", "Ana");
        std::thread::sleep(Duration::from_millis(200));
        let fresh = store.guest();

        assert_eq!(store.evict_idle(Duration::from_millis(100)), 1);

        assert!(store.with_session(&stale, |_| ()).is_none());
        assert!(store.with_session(&fresh, |_| ()).is_some());
    }

    #[test]
    fn access_refreshes_the_idle_clock() {
        let store = SessionStore::new();
        let token = store.login("u1", "Ana");
        std::thread::sleep(Duration::from_millis(200));

        store.with_session(&token, |_| ()).unwrap();

        assert_eq!(store.evict_idle(Duration::from_millis(100)), 0);
        assert!(store.with_session(&token, |_| ()).is_some());
    }

    #[test]
    fn unknown_token_yields_none() {
        let store = SessionStore::new();
        assert!(store.with_session("missing", |_| ()).is_none());
        assert!(store.with_session_mut("missing", |_| ()).is_none());
    }
}
