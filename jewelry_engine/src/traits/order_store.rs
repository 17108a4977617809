use thiserror::Error;

use crate::db_types::{NewOrder, Order, OrderItem, TransactionStatus};

#[derive(Debug, Clone, Error)]
pub enum OrderStoreError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Transaction {0} does not exist")]
    TransactionNotFound(String),
    #[error("An order must contain at least one item")]
    EmptyOrder,
}

impl From<sqlx::Error> for OrderStoreError {
    fn from(e: sqlx::Error) -> Self {
        Self::DatabaseError(e.to_string())
    }
}

/// Durable storage for orders and their payment transactions.
#[allow(async_fn_in_trait)]
pub trait OrderStore {
    /// Stores the order, its items, the transaction record for `transaction_id` and an initial `Created` history
    /// entry in a single atomic transaction. Returns the new order id.
    ///
    /// If any of the inserts fail, nothing is stored.
    async fn create_order(
        &self,
        order: NewOrder,
        items: &[OrderItem],
        transaction_id: &str,
    ) -> Result<i64, OrderStoreError>;

    /// Appends a status entry to the history of the given transaction. Earlier entries are never modified.
    ///
    /// Fails with [`OrderStoreError::TransactionNotFound`] if the transaction does not exist.
    async fn append_transaction_history(
        &self,
        transaction_id: &str,
        card_mask: Option<String>,
        status: TransactionStatus,
    ) -> Result<(), OrderStoreError>;

    /// Returns the id of the order that owns the given transaction, if any.
    async fn fetch_order_id_for_transaction(&self, transaction_id: &str) -> Result<Option<i64>, OrderStoreError>;

    /// Returns a page of orders, ordered by id, along with the total number of orders. Each order includes its items
    /// and full transaction history.
    async fn fetch_orders(&self, offset: i64, limit: i64) -> Result<(Vec<Order>, i64), OrderStoreError>;

    /// Returns the order with the given id, including items and transaction history.
    async fn fetch_order(&self, id: i64) -> Result<Option<Order>, OrderStoreError>;
}
