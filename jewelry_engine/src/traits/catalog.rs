use thiserror::Error;

use crate::db_types::PricedProduct;

#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for CatalogError {
    fn from(e: sqlx::Error) -> Self {
        Self::DatabaseError(e.to_string())
    }
}

#[allow(async_fn_in_trait)]
pub trait CatalogReader {
    /// Fetches the current price, stock flag and metadata (including images) of the given products.
    ///
    /// Products that do not exist are left out of the result. Duplicate ids are returned once.
    async fn fetch_priced_products(&self, product_ids: &[i64]) -> Result<Vec<PricedProduct>, CatalogError>;
}
