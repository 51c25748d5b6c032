//! redb-backed persistence store for catalog and committed orders
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `restaurants` | `restaurant_id` | `Restaurant` | Restaurant directory |
//! | `menu_items` | `item_id` | `MenuItem` | Restaurant menu catalog |
//! | `products` | `product_id` | `Product` | Agricultural catalog + stock |
//! | `orders` | `order_id` | `Order` | Committed order headers |
//! | `order_lines` | `(order_id, line_no)` | `OrderLine` | Order line items |
//! | `market_orders` | `order_id` | `MarketOrder` | Committed market orders |
//! | `market_order_lines` | `(order_id, line_no)` | `MarketOrderLine` | Market line items |
//! | `order_codes` | `code` | `(kind, order_id)` | Public code uniqueness index |
//! | `counters` | name | `u64` | Id allocation |
//!
//! # Transactions
//!
//! Every commit protocol runs inside a single write transaction; dropping
//! the transaction without committing is the rollback, so no partial
//! order is ever visible. redb allows one write transaction at a time,
//! which makes the stock re-check + decrement in
//! [`Store::commit_market_order`] an atomic compare-and-decrement: of two
//! racing checkouts, the second observes the already-decremented stock
//! and fails with [`StoreError::StockConflict`].

use redb::{
    Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction,
};
use rust_decimal::Decimal;
use shared::models::{MenuItem, Product, Restaurant};
use shared::order::{
    DeliveryDetails, MarketDeliveryDetails, MarketOrder, MarketOrderLine, Order, OrderLine,
    OrderStatus, PaymentSelection,
};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Restaurants: key = restaurant id, value = JSON-serialized Restaurant
const RESTAURANTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("restaurants");

/// Menu item catalog: key = item id, value = JSON-serialized MenuItem
const MENU_ITEMS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("menu_items");

/// Agricultural products: key = product id, value = JSON-serialized Product
const PRODUCTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("products");

/// Order headers: key = order id, value = JSON-serialized Order
const ORDERS_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("orders");

/// Order lines: key = (order id, line number), value = JSON-serialized OrderLine
const ORDER_LINES_TABLE: TableDefinition<(u64, u32), &[u8]> = TableDefinition::new("order_lines");

/// Market order headers: key = order id, value = JSON-serialized MarketOrder
const MARKET_ORDERS_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("market_orders");

/// Market order lines: key = (order id, line number), value = JSON-serialized MarketOrderLine
const MARKET_ORDER_LINES_TABLE: TableDefinition<(u64, u32), &[u8]> =
    TableDefinition::new("market_order_lines");

/// Public order codes: key = code, value = (kind, order id)
/// Existence of a key is the uniqueness constraint for code generation.
const ORDER_CODES_TABLE: TableDefinition<&str, (u8, u64)> = TableDefinition::new("order_codes");

/// Counters: key = "order_id" or "market_order_id", value = u64
const COUNTERS_TABLE: TableDefinition<&str, u64> = TableDefinition::new("counters");

const ORDER_ID_KEY: &str = "order_id";
const MARKET_ORDER_ID_KEY: &str = "market_order_id";

/// `order_codes` kind discriminants
const CODE_KIND_RESTAURANT: u8 = 0;
const CODE_KIND_MARKET: u8 = 1;

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Order code already in use: {0}")]
    DuplicateOrderCode(String),

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Insufficient stock for {product_id}: requested {requested}, available {available}")]
    StockConflict {
        product_id: String,
        requested: u32,
        available: u32,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Order header + lines awaiting commit
///
/// Ids are assigned by the store inside the commit transaction, after
/// the code reservation and before line insertion.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub code: String,
    pub user_id: String,
    pub restaurant_id: String,
    pub client_name: String,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub payment: PaymentSelection,
    pub delivery: DeliveryDetails,
    pub lines: Vec<NewOrderLine>,
}

#[derive(Debug, Clone)]
pub struct NewOrderLine {
    pub item_id: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

/// Market order header + lines awaiting commit
#[derive(Debug, Clone)]
pub struct NewMarketOrder {
    pub code: String,
    pub user_id: String,
    pub total: Decimal,
    pub payment: PaymentSelection,
    pub delivery: MarketDeliveryDetails,
    pub lines: Vec<NewMarketOrderLine>,
}

#[derive(Debug, Clone)]
pub struct NewMarketOrderLine {
    pub product_id: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

/// A committed order looked up by its public code
#[derive(Debug, Clone, serde::Serialize)]
#[serde(untagged)]
pub enum CommittedOrder {
    Restaurant { order: Order, lines: Vec<OrderLine> },
    Market {
        order: MarketOrder,
        lines: Vec<MarketOrderLine>,
    },
}

/// Persistence store backed by redb
#[derive(Clone)]
pub struct Store {
    db: Arc<Database>,
}

impl Store {
    /// Open or create the database at the given path
    ///
    /// redb commits with `Durability::Immediate`, so a commit that
    /// returned is persistent and the file is always in a consistent
    /// state, including across power loss.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let db = Database::create(path)?;
        let store = Self { db: Arc::new(db) };
        store.init_tables()?;
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StoreResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        let store = Self { db: Arc::new(db) };
        store.init_tables()?;
        Ok(store)
    }

    fn init_tables(&self) -> StoreResult<()> {
        let txn = self.db.begin_write()?;
        {
            let _ = txn.open_table(RESTAURANTS_TABLE)?;
            let _ = txn.open_table(MENU_ITEMS_TABLE)?;
            let _ = txn.open_table(PRODUCTS_TABLE)?;
            let _ = txn.open_table(ORDERS_TABLE)?;
            let _ = txn.open_table(ORDER_LINES_TABLE)?;
            let _ = txn.open_table(MARKET_ORDERS_TABLE)?;
            let _ = txn.open_table(MARKET_ORDER_LINES_TABLE)?;
            let _ = txn.open_table(ORDER_CODES_TABLE)?;
            let _ = txn.open_table(COUNTERS_TABLE)?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Increment and return a counter (within transaction)
    fn next_counter(&self, txn: &WriteTransaction, key: &str) -> StoreResult<u64> {
        let mut table = txn.open_table(COUNTERS_TABLE)?;
        let next = table.get(key)?.map(|g| g.value()).unwrap_or(0) + 1;
        table.insert(key, next)?;
        Ok(next)
    }

    // ========== Catalog Operations ==========

    /// Insert or replace a restaurant
    pub fn put_restaurant(&self, restaurant: &Restaurant) -> StoreResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(RESTAURANTS_TABLE)?;
            table.insert(
                restaurant.id.as_str(),
                serde_json::to_vec(restaurant)?.as_slice(),
            )?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Look up a restaurant by id
    pub fn get_restaurant(&self, restaurant_id: &str) -> StoreResult<Option<Restaurant>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(RESTAURANTS_TABLE)?;
        match table.get(restaurant_id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// All restaurants, id-ordered
    pub fn list_restaurants(&self) -> StoreResult<Vec<Restaurant>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(RESTAURANTS_TABLE)?;
        let mut restaurants = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            restaurants.push(serde_json::from_slice(value.value())?);
        }
        Ok(restaurants)
    }

    /// Insert or replace a menu item
    pub fn put_menu_item(&self, item: &MenuItem) -> StoreResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(MENU_ITEMS_TABLE)?;
            table.insert(item.id.as_str(), serde_json::to_vec(item)?.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Look up a menu item by id
    pub fn get_menu_item(&self, item_id: &str) -> StoreResult<Option<MenuItem>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(MENU_ITEMS_TABLE)?;
        match table.get(item_id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// One restaurant's menu, id-ordered
    pub fn list_menu_items(&self, restaurant_id: &str) -> StoreResult<Vec<MenuItem>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(MENU_ITEMS_TABLE)?;
        let mut items: Vec<MenuItem> = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let item: MenuItem = serde_json::from_slice(value.value())?;
            if item.restaurant_id == restaurant_id {
                items.push(item);
            }
        }
        items.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(items)
    }

    /// Insert or replace an agricultural product
    pub fn put_product(&self, product: &Product) -> StoreResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(PRODUCTS_TABLE)?;
            table.insert(product.id.as_str(), serde_json::to_vec(product)?.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Look up a product by id
    pub fn get_product(&self, product_id: &str) -> StoreResult<Option<Product>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(PRODUCTS_TABLE)?;
        match table.get(product_id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// All products with remaining stock (storefront listing)
    pub fn list_products_in_stock(&self) -> StoreResult<Vec<Product>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(PRODUCTS_TABLE)?;
        let mut products = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let product: Product = serde_json::from_slice(value.value())?;
            if product.stock > 0 {
                products.push(product);
            }
        }
        products.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(products)
    }

    // ========== Restaurant Order Commit ==========

    /// Commit a restaurant order atomically
    ///
    /// Within one write transaction: reserve the public code (failing
    /// [`StoreError::DuplicateOrderCode`] if taken), allocate the order
    /// id, insert the header, then one line per cart line. Any failure
    /// drops the transaction and nothing is visible.
    pub fn commit_order(&self, new: NewOrder) -> StoreResult<Order> {
        let txn = self.db.begin_write()?;
        let order = {
            self.reserve_code(&txn, &new.code, CODE_KIND_RESTAURANT)?;
            let id = self.next_counter(&txn, ORDER_ID_KEY)?;
            self.bind_code(&txn, &new.code, CODE_KIND_RESTAURANT, id)?;

            let order = Order {
                id,
                code: new.code,
                user_id: new.user_id,
                restaurant_id: new.restaurant_id,
                client_name: new.client_name,
                subtotal: new.subtotal,
                tax: new.tax,
                total: new.total,
                payment: new.payment,
                delivery: new.delivery,
                status: OrderStatus::Pendiente,
                created_at: chrono::Utc::now(),
            };

            let mut orders = txn.open_table(ORDERS_TABLE)?;
            orders.insert(id, serde_json::to_vec(&order)?.as_slice())?;
            drop(orders);

            let mut lines = txn.open_table(ORDER_LINES_TABLE)?;
            for (line_no, line) in new.lines.iter().enumerate() {
                let record = OrderLine {
                    order_id: id,
                    item_id: line.item_id.clone(),
                    quantity: line.quantity,
                    unit_price: line.unit_price,
                };
                lines.insert((id, line_no as u32), serde_json::to_vec(&record)?.as_slice())?;
            }
            drop(lines);

            order
        };
        txn.commit()?;
        Ok(order)
    }

    // ========== Market Order Commit ==========

    /// Commit a market order, decrementing product stock atomically
    ///
    /// Stock is re-read and checked inside this write transaction,
    /// immediately before the decrement. A concurrent commit that
    /// emptied the shelf in the meantime surfaces as
    /// [`StoreError::StockConflict`] and the transaction is dropped
    /// with no stock touched.
    pub fn commit_market_order(&self, new: NewMarketOrder) -> StoreResult<MarketOrder> {
        let txn = self.db.begin_write()?;
        let order = {
            // Compare-and-decrement for every line before any insert
            let mut products = txn.open_table(PRODUCTS_TABLE)?;
            for line in &new.lines {
                let mut product: Product = match products.get(line.product_id.as_str())? {
                    Some(guard) => serde_json::from_slice(guard.value())?,
                    None => return Err(StoreError::ProductNotFound(line.product_id.clone())),
                };
                if product.stock < line.quantity {
                    return Err(StoreError::StockConflict {
                        product_id: line.product_id.clone(),
                        requested: line.quantity,
                        available: product.stock,
                    });
                }
                product.stock -= line.quantity;
                products.insert(line.product_id.as_str(), serde_json::to_vec(&product)?.as_slice())?;
            }
            drop(products);

            self.reserve_code(&txn, &new.code, CODE_KIND_MARKET)?;
            let id = self.next_counter(&txn, MARKET_ORDER_ID_KEY)?;
            self.bind_code(&txn, &new.code, CODE_KIND_MARKET, id)?;

            let order = MarketOrder {
                id,
                code: new.code,
                user_id: new.user_id,
                total: new.total,
                payment: new.payment,
                delivery: new.delivery,
                status: OrderStatus::Pendiente,
                created_at: chrono::Utc::now(),
            };

            let mut orders = txn.open_table(MARKET_ORDERS_TABLE)?;
            orders.insert(id, serde_json::to_vec(&order)?.as_slice())?;
            drop(orders);

            let mut lines = txn.open_table(MARKET_ORDER_LINES_TABLE)?;
            for (line_no, line) in new.lines.iter().enumerate() {
                let record = MarketOrderLine {
                    order_id: id,
                    product_id: line.product_id.clone(),
                    quantity: line.quantity,
                    unit_price: line.unit_price,
                };
                lines.insert((id, line_no as u32), serde_json::to_vec(&record)?.as_slice())?;
            }
            drop(lines);

            order
        };
        txn.commit()?;
        Ok(order)
    }

    /// Fail if the code is already reserved
    fn reserve_code(&self, txn: &WriteTransaction, code: &str, _kind: u8) -> StoreResult<()> {
        let table = txn.open_table(ORDER_CODES_TABLE)?;
        if table.get(code)?.is_some() {
            return Err(StoreError::DuplicateOrderCode(code.to_string()));
        }
        Ok(())
    }

    /// Bind a reserved code to its order id
    fn bind_code(&self, txn: &WriteTransaction, code: &str, kind: u8, id: u64) -> StoreResult<()> {
        let mut table = txn.open_table(ORDER_CODES_TABLE)?;
        table.insert(code, (kind, id))?;
        Ok(())
    }

    // ========== Order Lookup ==========

    /// Look up a committed order (restaurant or market) by public code
    pub fn get_order_by_code(&self, code: &str) -> StoreResult<Option<CommittedOrder>> {
        let txn = self.db.begin_read()?;
        let codes = txn.open_table(ORDER_CODES_TABLE)?;
        let Some(guard) = codes.get(code)? else {
            return Ok(None);
        };
        let (kind, id) = guard.value();
        drop(guard);

        match kind {
            CODE_KIND_RESTAURANT => {
                let orders = txn.open_table(ORDERS_TABLE)?;
                let Some(order_guard) = orders.get(id)? else {
                    return Ok(None);
                };
                let order: Order = serde_json::from_slice(order_guard.value())?;
                drop(order_guard);

                let lines_table = txn.open_table(ORDER_LINES_TABLE)?;
                let mut lines = Vec::new();
                for result in lines_table.range((id, 0u32)..=(id, u32::MAX))? {
                    let (_key, value) = result?;
                    lines.push(serde_json::from_slice(value.value())?);
                }
                Ok(Some(CommittedOrder::Restaurant { order, lines }))
            }
            _ => {
                let orders = txn.open_table(MARKET_ORDERS_TABLE)?;
                let Some(order_guard) = orders.get(id)? else {
                    return Ok(None);
                };
                let order: MarketOrder = serde_json::from_slice(order_guard.value())?;
                drop(order_guard);

                let lines_table = txn.open_table(MARKET_ORDER_LINES_TABLE)?;
                let mut lines = Vec::new();
                for result in lines_table.range((id, 0u32)..=(id, u32::MAX))? {
                    let (_key, value) = result?;
                    lines.push(serde_json::from_slice(value.value())?);
                }
                Ok(Some(CommittedOrder::Market { order, lines }))
            }
        }
    }

    /// Fetch one restaurant order header by id
    pub fn get_order(&self, id: u64) -> StoreResult<Option<Order>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(ORDERS_TABLE)?;
        match table.get(id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// Lines belonging to one restaurant order
    pub fn get_order_lines(&self, id: u64) -> StoreResult<Vec<OrderLine>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(ORDER_LINES_TABLE)?;
        let mut lines = Vec::new();
        for result in table.range((id, 0u32)..=(id, u32::MAX))? {
            let (_key, value) = result?;
            lines.push(serde_json::from_slice(value.value())?);
        }
        Ok(lines)
    }

    /// Delete a restaurant order with its lines and code reservation
    ///
    /// The order exclusively owns its lines: header, every line and the
    /// code entry go in the same transaction. Returns whether the order
    /// existed.
    pub fn delete_order(&self, id: u64) -> StoreResult<bool> {
        let txn = self.db.begin_write()?;
        let existed = {
            let mut orders = txn.open_table(ORDERS_TABLE)?;
            let order: Option<Order> = match orders.remove(id)? {
                Some(guard) => Some(serde_json::from_slice(guard.value())?),
                None => None,
            };
            drop(orders);

            match order {
                Some(order) => {
                    let mut lines = txn.open_table(ORDER_LINES_TABLE)?;
                    let keys: Vec<(u64, u32)> = lines
                        .range((id, 0u32)..=(id, u32::MAX))?
                        .map(|r| r.map(|(k, _)| k.value()))
                        .collect::<Result<_, _>>()?;
                    for key in keys {
                        lines.remove(key)?;
                    }
                    drop(lines);

                    let mut codes = txn.open_table(ORDER_CODES_TABLE)?;
                    codes.remove(order.code.as_str())?;
                    true
                }
                None => false,
            }
        };
        txn.commit()?;
        Ok(existed)
    }

    /// Delete a market order with its lines and code reservation,
    /// restoring the stock its commit decremented
    ///
    /// Restock is skipped for products that no longer exist in the
    /// catalog. Returns whether the order existed.
    pub fn delete_market_order(&self, id: u64) -> StoreResult<bool> {
        let txn = self.db.begin_write()?;
        let existed = {
            let mut orders = txn.open_table(MARKET_ORDERS_TABLE)?;
            let order: Option<MarketOrder> = match orders.remove(id)? {
                Some(guard) => Some(serde_json::from_slice(guard.value())?),
                None => None,
            };
            drop(orders);

            match order {
                Some(order) => {
                    let mut lines_table = txn.open_table(MARKET_ORDER_LINES_TABLE)?;
                    let mut removed: Vec<MarketOrderLine> = Vec::new();
                    let keys: Vec<(u64, u32)> = lines_table
                        .range((id, 0u32)..=(id, u32::MAX))?
                        .map(|r| r.map(|(k, _)| k.value()))
                        .collect::<Result<_, _>>()?;
                    for key in keys {
                        if let Some(guard) = lines_table.remove(key)? {
                            removed.push(serde_json::from_slice(guard.value())?);
                        }
                    }
                    drop(lines_table);

                    let mut products = txn.open_table(PRODUCTS_TABLE)?;
                    for line in &removed {
                        let product: Option<Product> = match products.get(line.product_id.as_str())? {
                            Some(guard) => Some(serde_json::from_slice(guard.value())?),
                            None => None,
                        };
                        if let Some(mut product) = product {
                            // Stock may have been adjusted since the order
                            // decremented it; never wrap on restock.
                            product.stock = product.stock.saturating_add(line.quantity);
                            products.insert(
                                line.product_id.as_str(),
                                serde_json::to_vec(&product)?.as_slice(),
                            )?;
                        }
                    }
                    drop(products);

                    let mut codes = txn.open_table(ORDER_CODES_TABLE)?;
                    codes.remove(order.code.as_str())?;
                    true
                }
                None => false,
            }
        };
        txn.commit()?;
        Ok(existed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::order::PaymentMethod;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn payment() -> PaymentSelection {
        PaymentSelection {
            method: PaymentMethod::Tarjeta,
            detail: "Número: 1234 **** **** ****".to_string(),
        }
    }

    fn new_order(code: &str) -> NewOrder {
        NewOrder {
            code: code.to_string(),
            user_id: "u1".to_string(),
            restaurant_id: "r1".to_string(),
            client_name: "Ana".to_string(),
            subtotal: dec("12.00"),
            tax: dec("1.92"),
            total: dec("13.92"),
            payment: payment(),
            delivery: DeliveryDetails::Domicilio {
                address: "Calle 1".to_string(),
                phone: "555123".to_string(),
            },
            lines: vec![
                NewOrderLine {
                    item_id: "m1".to_string(),
                    quantity: 2,
                    unit_price: dec("4.50"),
                },
                NewOrderLine {
                    item_id: "m2".to_string(),
                    quantity: 1,
                    unit_price: dec("3.00"),
                },
            ],
        }
    }

    fn product(id: &str, stock: u32) -> Product {
        Product {
            id: id.to_string(),
            name: format!("product {id}"),
            purchase_price: dec("1.00"),
            sale_price: dec("2.50"),
            stock,
        }
    }

    fn new_market_order(code: &str, product_id: &str, quantity: u32) -> NewMarketOrder {
        NewMarketOrder {
            code: code.to_string(),
            user_id: "u1".to_string(),
            total: dec("2.50") * Decimal::from(quantity),
            payment: payment(),
            delivery: MarketDeliveryDetails::Recogida {
                time: chrono::NaiveTime::parse_from_str("10:30", "%H:%M").unwrap(),
            },
            lines: vec![NewMarketOrderLine {
                product_id: product_id.to_string(),
                quantity,
                unit_price: dec("2.50"),
            }],
        }
    }

    #[test]
    fn commit_order_assigns_ids_and_persists_lines() {
        let store = Store::open_in_memory().unwrap();
        let order = store.commit_order(new_order("AB12CD34")).unwrap();

        assert_eq!(order.id, 1);
        assert_eq!(order.status, OrderStatus::Pendiente);

        let lines = store.get_order_lines(order.id).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].order_id, order.id);
        assert_eq!(lines[0].quantity, 2);

        let next = store.commit_order(new_order("EF56AB78")).unwrap();
        assert_eq!(next.id, 2);
    }

    #[test]
    fn duplicate_code_fails_and_rolls_back() {
        let store = Store::open_in_memory().unwrap();
        store.commit_order(new_order("AB12CD34")).unwrap();

        let err = store.commit_order(new_order("AB12CD34")).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateOrderCode(_)));

        // The failed commit allocated nothing
        let order = store.commit_order(new_order("EF56AB78")).unwrap();
        assert_eq!(order.id, 2);
    }

    #[test]
    fn lookup_by_code_returns_order_with_lines() {
        let store = Store::open_in_memory().unwrap();
        store.commit_order(new_order("AB12CD34")).unwrap();

        match store.get_order_by_code("AB12CD34").unwrap() {
            Some(CommittedOrder::Restaurant { order, lines }) => {
                assert_eq!(order.code, "AB12CD34");
                assert_eq!(lines.len(), 2);
            }
            other => panic!("unexpected lookup result: {other:?}"),
        }
        assert!(store.get_order_by_code("ZZZZZZZZ").unwrap().is_none());
    }

    #[test]
    fn market_commit_decrements_stock() {
        let store = Store::open_in_memory().unwrap();
        store.put_product(&product("p1", 5)).unwrap();

        let order = store
            .commit_market_order(new_market_order("AA11BB22", "p1", 4))
            .unwrap();
        assert_eq!(order.id, 1);
        assert_eq!(store.get_product("p1").unwrap().unwrap().stock, 1);
    }

    #[test]
    fn market_commit_rejects_overdraw_without_touching_stock() {
        let store = Store::open_in_memory().unwrap();
        store.put_product(&product("p1", 3)).unwrap();

        let err = store
            .commit_market_order(new_market_order("AA11BB22", "p1", 4))
            .unwrap_err();
        assert!(matches!(err, StoreError::StockConflict { available: 3, .. }));
        assert_eq!(store.get_product("p1").unwrap().unwrap().stock, 3);
        assert!(store.get_order_by_code("AA11BB22").unwrap().is_none());
    }

    #[test]
    fn multi_line_market_conflict_rolls_back_every_decrement() {
        let store = Store::open_in_memory().unwrap();
        store.put_product(&product("p1", 10)).unwrap();
        store.put_product(&product("p2", 1)).unwrap();

        let mut new = new_market_order("AA11BB22", "p1", 5);
        new.lines.push(NewMarketOrderLine {
            product_id: "p2".to_string(),
            quantity: 2,
            unit_price: dec("2.50"),
        });

        let err = store.commit_market_order(new).unwrap_err();
        assert!(matches!(err, StoreError::StockConflict { .. }));
        // p1 was decremented inside the dropped transaction only
        assert_eq!(store.get_product("p1").unwrap().unwrap().stock, 10);
        assert_eq!(store.get_product("p2").unwrap().unwrap().stock, 1);
    }

    #[test]
    fn delete_order_cascades_to_lines_and_code() {
        let store = Store::open_in_memory().unwrap();
        let order = store.commit_order(new_order("AB12CD34")).unwrap();

        assert!(store.delete_order(order.id).unwrap());
        assert!(store.get_order(order.id).unwrap().is_none());
        assert!(store.get_order_lines(order.id).unwrap().is_empty());
        // Code is released for reuse
        store.commit_order(new_order("AB12CD34")).unwrap();
    }

    #[test]
    fn list_products_filters_out_of_stock() {
        let store = Store::open_in_memory().unwrap();
        store.put_product(&product("p1", 0)).unwrap();
        store.put_product(&product("p2", 3)).unwrap();

        let products = store.list_products_in_stock().unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, "p2");
    }

    #[test]
    fn delete_market_order_restores_stock_and_releases_code() {
        let store = Store::open_in_memory().unwrap();
        store.put_product(&product("p1", 10)).unwrap();

        let order = store
            .commit_market_order(new_market_order("CC33DD44", "p1", 4))
            .unwrap();
        assert_eq!(store.get_product("p1").unwrap().unwrap().stock, 6);

        assert!(store.delete_market_order(order.id).unwrap());
        assert_eq!(store.get_product("p1").unwrap().unwrap().stock, 10);
        assert!(store.get_order_by_code("CC33DD44").unwrap().is_none());
        assert!(!store.delete_market_order(order.id).unwrap());
    }

    #[test]
    fn restaurant_directory_and_menu_listing() {
        let store = Store::open_in_memory().unwrap();
        store
            .put_restaurant(&Restaurant {
                id: "r1".to_string(),
                name: "La Esquina".to_string(),
                category: "mexicana".to_string(),
                description: None,
            })
            .unwrap();
        store
            .put_menu_item(&MenuItem {
                id: "m1".to_string(),
                restaurant_id: "r1".to_string(),
                name: "Tacos".to_string(),
                price: dec("4.50"),
                description: None,
            })
            .unwrap();
        store
            .put_menu_item(&MenuItem {
                id: "m2".to_string(),
                restaurant_id: "r2".to_string(),
                name: "Arepas".to_string(),
                price: dec("3.00"),
                description: None,
            })
            .unwrap();

        assert_eq!(store.list_restaurants().unwrap().len(), 1);
        assert!(store.get_restaurant("r1").unwrap().is_some());

        let menu = store.list_menu_items("r1").unwrap();
        assert_eq!(menu.len(), 1);
        assert_eq!(menu[0].id, "m1");
    }
}
