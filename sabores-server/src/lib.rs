//! Sabores Server - session carts and order finalization for a
//! food-delivery platform
//!
//! # Architecture
//!
//! - **Sessions** (`session`): in-memory session map holding identity,
//!   per-restaurant carts, the market cart and the payment selection
//! - **Carts** (`cart`): all session cart mutations, guest-gated and
//!   price-snapshotted
//! - **Checkout** (`checkout`): pricing, order codes and the
//!   transactional commit flows
//! - **Storage** (`storage`): embedded redb database for catalog and
//!   committed orders, with atomic stock decrement
//! - **HTTP API** (`api`): RESTful interface over all of the above
//!
//! # Module layout
//!
//! ```text
//! sabores-server/src/
//! ├── core/          # config, state, server, lifecycle errors
//! ├── session/       # session store and token extractor
//! ├── cart/          # cart engine
//! ├── checkout/      # pricing, codes, checkout flows
//! ├── catalog/       # read-side catalog lookups
//! ├── storage/       # redb store
//! ├── api/           # HTTP routes and handlers
//! └── utils/         # errors, logging, validation
//! ```

pub mod api;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod core;
pub mod session;
pub mod storage;
pub mod utils;

// Re-export the types embedding applications need
pub use cart::{CartEngine, CartError};
pub use checkout::{CheckoutError, CheckoutService};
pub use core::{Config, Server, ServerState};
pub use session::{SessionStore, SessionToken};
pub use storage::Store;
pub use utils::{AppError, AppResult};
pub use utils::logger::{init_logger, init_logger_with_file};

/// Load `.env` and initialize logging from the resulting environment
pub fn setup_environment() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env();
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   _____       __
  / ___/____ _/ /_  ____  ________  _____
  \__ \/ __ `/ __ \/ __ \/ ___/ _ \/ ___/
 ___/ / /_/ / /_/ / /_/ / /  /  __(__  )
/____/\__,_/_.___/\____/_/   \___/____/
    "#
    );
}
