use log::{debug, trace};
use sqlx::{QueryBuilder, SqliteConnection};

use super::transactions;
use crate::db_types::{NewOrder, Order, OrderItem};

const ORDER_COLUMNS: &str = r#"
    SELECT
        orders.id,
        orders.ordered_at,
        orders.first_name,
        orders.last_name,
        orders.additional_name,
        orders.email,
        orders.phone,
        orders.country,
        orders.address,
        orders.postal_code,
        orders.total_cost,
        orders.currency,
        transactions.uuid AS transaction_id
    FROM orders JOIN transactions ON transactions.order_id = orders.id
"#;

/// Inserts a new order row using the given connection and returns its id. This is not atomic. You can embed this call
/// inside a transaction if you need to ensure atomicity, and pass `&mut *tx` as the connection argument.
pub async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
    let id = sqlx::query_scalar(
        r#"
            INSERT INTO orders (
                ordered_at,
                first_name,
                last_name,
                additional_name,
                email,
                phone,
                country,
                address,
                postal_code,
                total_cost,
                currency
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id;
        "#,
    )
    .bind(order.ordered_at)
    .bind(order.first_name)
    .bind(order.last_name)
    .bind(order.additional_name)
    .bind(order.email)
    .bind(order.phone)
    .bind(order.country)
    .bind(order.address)
    .bind(order.postal_code)
    .bind(order.total_cost)
    .bind(order.currency)
    .fetch_one(conn)
    .await?;
    debug!("🗃️ Order #{id} inserted");
    Ok(id)
}

/// Inserts the line items for an order in a single statement. Not atomic on its own.
pub async fn insert_order_items(
    order_id: i64,
    items: &[OrderItem],
    conn: &mut SqliteConnection,
) -> Result<(), sqlx::Error> {
    if items.is_empty() {
        return Ok(());
    }
    let mut builder = QueryBuilder::new("INSERT INTO order_items (order_id, product_id, quantity) ");
    builder.push_values(items, |mut row, item| {
        row.push_bind(order_id).push_bind(item.product_id).push_bind(item.quantity);
    });
    builder.build().execute(conn).await?;
    trace!("🗃️ {} items inserted for order #{order_id}", items.len());
    Ok(())
}

pub async fn fetch_items_for_order(order_id: i64, conn: &mut SqliteConnection) -> Result<Vec<OrderItem>, sqlx::Error> {
    let items = sqlx::query_as("SELECT product_id, quantity FROM order_items WHERE order_id = $1 ORDER BY id")
        .bind(order_id)
        .fetch_all(conn)
        .await?;
    Ok(items)
}

pub async fn count_orders(conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM orders").fetch_one(conn).await?;
    Ok(count)
}

/// Fetches the order with the given id, without items or history.
pub async fn fetch_order_row(id: i64, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    let mut builder = QueryBuilder::new(ORDER_COLUMNS);
    builder.push(" WHERE orders.id = ").push_bind(id);
    builder.build_query_as().fetch_optional(conn).await
}

/// Fetches a page of orders ordered by id, without items or history.
pub async fn fetch_order_rows(offset: i64, limit: i64, conn: &mut SqliteConnection) -> Result<Vec<Order>, sqlx::Error> {
    let mut builder = QueryBuilder::new(ORDER_COLUMNS);
    builder.push(" ORDER BY orders.id LIMIT ").push_bind(limit).push(" OFFSET ").push_bind(offset);
    builder.build_query_as().fetch_all(conn).await
}

/// Attaches line items and the full transaction history to the order.
pub async fn load_order_details(order: &mut Order, conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    order.items = fetch_items_for_order(order.id, &mut *conn).await?;
    order.transactions = transactions::fetch_history(&order.transaction_id, conn).await?;
    Ok(())
}
