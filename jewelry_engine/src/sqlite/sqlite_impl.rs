//! `SqliteDatabase` is a concrete implementation of a jewelry shop engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the storage traits defined in the [`traits`]
//! module.
//!
//! [`traits`]: crate::traits
use std::fmt::Debug;

use log::*;
use sqlx::{migrate, SqlitePool};

use super::db::{catalog, new_pool, orders, transactions};
use crate::{
    db_types::{NewOrder, Order, OrderItem, PricedProduct, TransactionStatus},
    traits::{CatalogError, CatalogReader, OrderStore, OrderStoreError},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl CatalogReader for SqliteDatabase {
    async fn fetch_priced_products(&self, product_ids: &[i64]) -> Result<Vec<PricedProduct>, CatalogError> {
        let mut conn = self.pool.acquire().await?;
        let products = catalog::fetch_priced_products(product_ids, &mut conn).await?;
        Ok(products)
    }
}

impl OrderStore for SqliteDatabase {
    async fn create_order(
        &self,
        order: NewOrder,
        items: &[OrderItem],
        transaction_id: &str,
    ) -> Result<i64, OrderStoreError> {
        if items.is_empty() {
            return Err(OrderStoreError::EmptyOrder);
        }
        let mut tx = self.pool.begin().await?;
        let order_id = orders::insert_order(order, &mut tx).await?;
        orders::insert_order_items(order_id, items, &mut tx).await?;
        transactions::insert_transaction(transaction_id, order_id, &mut tx).await?;
        transactions::insert_history(transaction_id, None, TransactionStatus::Created, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Order #{order_id} with {} items saved for transaction {transaction_id}", items.len());
        Ok(order_id)
    }

    async fn append_transaction_history(
        &self,
        transaction_id: &str,
        card_mask: Option<String>,
        status: TransactionStatus,
    ) -> Result<(), OrderStoreError> {
        let mut tx = self.pool.begin().await?;
        if transactions::fetch_transaction(transaction_id, &mut tx).await?.is_none() {
            return Err(OrderStoreError::TransactionNotFound(transaction_id.to_string()));
        }
        let entry = transactions::insert_history(transaction_id, card_mask.as_deref(), status, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Transaction {transaction_id} is now '{status}' (history entry #{})", entry.id);
        Ok(())
    }

    async fn fetch_order_id_for_transaction(&self, transaction_id: &str) -> Result<Option<i64>, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        let tx = transactions::fetch_transaction(transaction_id, &mut conn).await?;
        Ok(tx.map(|t| t.order_id))
    }

    async fn fetch_orders(&self, offset: i64, limit: i64) -> Result<(Vec<Order>, i64), OrderStoreError> {
        let mut tx = self.pool.begin().await?;
        let total = orders::count_orders(&mut tx).await?;
        let mut page = orders::fetch_order_rows(offset, limit, &mut tx).await?;
        for order in &mut page {
            orders::load_order_details(order, &mut tx).await?;
        }
        tx.commit().await?;
        trace!("🗃️ Fetched {} of {total} orders (offset {offset}, limit {limit})", page.len());
        Ok((page, total))
    }

    async fn fetch_order(&self, id: i64) -> Result<Option<Order>, OrderStoreError> {
        let mut tx = self.pool.begin().await?;
        let mut order = orders::fetch_order_row(id, &mut tx).await?;
        if let Some(order) = order.as_mut() {
            orders::load_order_details(order, &mut tx).await?;
        }
        tx.commit().await?;
        Ok(order)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    /// Brings the schema up to date.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        migrate!("./src/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Database migrations complete");
        Ok(())
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&mut self) -> Result<(), sqlx::Error> {
        self.pool.close().await;
        Ok(())
    }
}
