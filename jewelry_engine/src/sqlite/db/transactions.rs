use chrono::Utc;
use log::trace;
use sqlx::SqliteConnection;

use crate::db_types::{Transaction, TransactionHistory, TransactionStatus};

/// Records a new payment transaction for an order.
pub async fn insert_transaction(
    transaction_id: &str,
    order_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Transaction, sqlx::Error> {
    let tx = sqlx::query_as("INSERT INTO transactions (uuid, order_id, created_at) VALUES ($1, $2, $3) RETURNING *")
        .bind(transaction_id)
        .bind(order_id)
        .bind(Utc::now())
        .fetch_one(conn)
        .await?;
    Ok(tx)
}

pub async fn fetch_transaction(
    transaction_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Transaction>, sqlx::Error> {
    let tx = sqlx::query_as("SELECT * FROM transactions WHERE uuid = $1")
        .bind(transaction_id)
        .fetch_optional(conn)
        .await?;
    Ok(tx)
}

/// Appends an entry to the transaction history. Existing entries are never touched.
pub async fn insert_history(
    transaction_id: &str,
    card_mask: Option<&str>,
    status: TransactionStatus,
    conn: &mut SqliteConnection,
) -> Result<TransactionHistory, sqlx::Error> {
    let entry: TransactionHistory = sqlx::query_as(
        "INSERT INTO transactions_history (uuid, status, card_mask, created_at) VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(transaction_id)
    .bind(status)
    .bind(card_mask)
    .bind(Utc::now())
    .fetch_one(conn)
    .await?;
    trace!("🗃️ History entry #{} ({status}) appended for transaction {transaction_id}", entry.id);
    Ok(entry)
}

/// The full status history for a transaction, oldest first.
pub async fn fetch_history(
    transaction_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Vec<TransactionHistory>, sqlx::Error> {
    let history = sqlx::query_as("SELECT * FROM transactions_history WHERE uuid = $1 ORDER BY id")
        .bind(transaction_id)
        .fetch_all(conn)
        .await?;
    Ok(history)
}
