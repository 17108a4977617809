use thiserror::Error;

use crate::traits::{CatalogError, OrderStoreError, PaymentProviderError};

#[derive(Debug, Clone, Error)]
pub enum OrderFlowError {
    #[error("{0}")]
    Validation(String),
    #[error("These products are not available: {0:?}")]
    ProductsUnavailable(Vec<i64>),
    #[error("Could not store the order. {0}")]
    Persistence(String),
    #[error("Could not open a sale with the payment provider. {0}")]
    Gateway(String),
    #[error("Transaction {0} does not exist")]
    UnknownTransaction(String),
    #[error("Order #{0} does not exist")]
    OrderNotFound(i64),
}

impl From<CatalogError> for OrderFlowError {
    fn from(e: CatalogError) -> Self {
        Self::Persistence(e.to_string())
    }
}

impl From<OrderStoreError> for OrderFlowError {
    fn from(e: OrderStoreError) -> Self {
        match e {
            OrderStoreError::TransactionNotFound(id) => Self::UnknownTransaction(id),
            OrderStoreError::EmptyOrder => Self::Validation("order should have at least 1 item".to_string()),
            OrderStoreError::DatabaseError(e) => Self::Persistence(e),
        }
    }
}

impl From<PaymentProviderError> for OrderFlowError {
    fn from(e: PaymentProviderError) -> Self {
        Self::Gateway(e.to_string())
    }
}
