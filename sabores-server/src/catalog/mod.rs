//! Catalog Service - read-only lookups for menu items and products
//!
//! The cart and checkout engines never touch the storage tables
//! directly; they ask this service for the current price/stock snapshot
//! of a catalog entity.

use crate::storage::{Store, StoreError};
use rust_decimal::Decimal;
use thiserror::Error;

/// Menu item metadata for cart price snapshots
#[derive(Debug, Clone)]
pub struct ItemMeta {
    pub name: String,
    pub price: Decimal,
}

/// Product metadata for stock checks and market pricing
#[derive(Debug, Clone)]
pub struct ProductMeta {
    pub name: String,
    pub sale_price: Decimal,
    pub stock: u32,
}

/// Catalog lookup errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Menu item not found: {0}")]
    ItemNotFound(String),

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Catalog lookups backed by the persistence store
#[derive(Clone)]
pub struct CatalogService {
    store: Store,
}

impl CatalogService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Current name + price of a menu item
    pub fn get_item(&self, item_id: &str) -> CatalogResult<ItemMeta> {
        let item = self
            .store
            .get_menu_item(item_id)?
            .ok_or_else(|| CatalogError::ItemNotFound(item_id.to_string()))?;
        Ok(ItemMeta {
            name: item.name,
            price: item.price,
        })
    }

    /// Current name, sale price and stock of an agricultural product
    pub fn get_product(&self, product_id: &str) -> CatalogResult<ProductMeta> {
        let product = self
            .store
            .get_product(product_id)?
            .ok_or_else(|| CatalogError::ProductNotFound(product_id.to_string()))?;
        Ok(ProductMeta {
            name: product.name,
            sale_price: product.sale_price,
            stock: product.stock,
        })
    }
}
