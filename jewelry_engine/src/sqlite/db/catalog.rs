use std::collections::BTreeSet;

use log::trace;
use sqlx::{QueryBuilder, SqliteConnection};

use crate::db_types::{Cents, PricedProduct, ProductImage};

/// Fetches the products among `ids`, in stock or not, with their images attached. Unknown ids are ignored.
pub async fn fetch_priced_products(
    ids: &[i64],
    conn: &mut SqliteConnection,
) -> Result<Vec<PricedProduct>, sqlx::Error> {
    let ids = ids.iter().copied().collect::<BTreeSet<i64>>();
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut builder = QueryBuilder::new("SELECT id, title, price, in_stock FROM products WHERE id IN (");
    let mut list = builder.separated(", ");
    for id in &ids {
        list.push_bind(*id);
    }
    builder.push(") ORDER BY id");
    let mut products: Vec<PricedProduct> = builder.build_query_as().fetch_all(&mut *conn).await?;
    trace!(
        "🗃️ {} of {} requested products exist, {} are in stock",
        products.len(),
        ids.len(),
        products.iter().filter(|p| p.in_stock).count()
    );
    let found = products.iter().map(|p| p.id).collect::<Vec<i64>>();
    let mut images = fetch_images_for_products(&found, conn).await?;
    for product in &mut products {
        let (own, rest): (Vec<ProductImage>, Vec<ProductImage>) =
            images.into_iter().partition(|i| i.product_id == product.id);
        product.images = own;
        images = rest;
    }
    Ok(products)
}

pub async fn fetch_images_for_products(
    product_ids: &[i64],
    conn: &mut SqliteConnection,
) -> Result<Vec<ProductImage>, sqlx::Error> {
    if product_ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut builder = QueryBuilder::new("SELECT id, product_id, url, alt_text FROM product_images WHERE product_id IN (");
    let mut list = builder.separated(", ");
    for id in product_ids {
        list.push_bind(*id);
    }
    builder.push(") ORDER BY id");
    builder.build_query_as().fetch_all(conn).await
}

/// Adds a product to the catalog. Catalog management lives outside this crate; this is used for seeding data.
pub async fn insert_product(
    title: &str,
    price: Cents,
    in_stock: bool,
    conn: &mut SqliteConnection,
) -> Result<i64, sqlx::Error> {
    let id = sqlx::query_scalar("INSERT INTO products (title, price, in_stock) VALUES ($1, $2, $3) RETURNING id")
        .bind(title)
        .bind(price)
        .bind(in_stock)
        .fetch_one(conn)
        .await?;
    Ok(id)
}

pub async fn insert_product_image(
    product_id: i64,
    url: &str,
    alt_text: &str,
    conn: &mut SqliteConnection,
) -> Result<i64, sqlx::Error> {
    let id =
        sqlx::query_scalar("INSERT INTO product_images (product_id, url, alt_text) VALUES ($1, $2, $3) RETURNING id")
            .bind(product_id)
            .bind(url)
            .bind(alt_text)
            .fetch_one(conn)
            .await?;
    Ok(id)
}

/// Updates the stock flag and price of a product.
pub async fn update_product(
    id: i64,
    price: Cents,
    in_stock: bool,
    conn: &mut SqliteConnection,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE products SET price = $1, in_stock = $2 WHERE id = $3")
        .bind(price)
        .bind(in_stock)
        .bind(id)
        .execute(conn)
        .await?;
    Ok(())
}
