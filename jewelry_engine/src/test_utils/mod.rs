//! Helpers for tests that run against a real SQLite database.
mod prepare_env;

pub use prepare_env::{create_database, prepare_test_env, random_db_path, run_migrations};

use crate::{
    db_types::{Cents, OrderItem},
    order_objects::NewOrderRequest,
    sqlite::db::catalog,
    SqliteDatabase,
};

/// Adds a product to the catalog and returns its id.
pub async fn seed_product(db: &SqliteDatabase, title: &str, price: i64, in_stock: bool) -> i64 {
    let mut conn = db.pool().acquire().await.expect("Error acquiring connection");
    catalog::insert_product(title, Cents::from(price), in_stock, &mut conn).await.expect("Error inserting product")
}

pub async fn seed_product_image(db: &SqliteDatabase, product_id: i64, url: &str) -> i64 {
    let mut conn = db.pool().acquire().await.expect("Error acquiring connection");
    catalog::insert_product_image(product_id, url, "product photo", &mut conn)
        .await
        .expect("Error inserting product image")
}

pub async fn update_product(db: &SqliteDatabase, id: i64, price: i64, in_stock: bool) {
    let mut conn = db.pool().acquire().await.expect("Error acquiring connection");
    catalog::update_product(id, Cents::from(price), in_stock, &mut conn).await.expect("Error updating product");
}

/// A valid order request for the given `(product_id, quantity)` pairs.
pub fn order_request(items: &[(i64, i64)]) -> NewOrderRequest {
    NewOrderRequest {
        items: items.iter().map(|&(product_id, quantity)| OrderItem::new(product_id, quantity)).collect(),
        first_name: "Jane".to_string(),
        last_name: "Doe".to_string(),
        additional_name: None,
        email: "jane@example.com".to_string(),
        phone: Some("0501234567".to_string()),
        country: "IL".to_string(),
        address: "1 Herzl St, Tel Aviv".to_string(),
        postal_code: "61000".to_string(),
    }
}
