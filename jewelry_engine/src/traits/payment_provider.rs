use async_trait::async_trait;
use jewelry_common::Cents;
use thiserror::Error;

/// A request to open a sale with the payment provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSale {
    /// The amount to charge, in minor currency units
    pub price: Cents,
    /// A human-readable label shown to the customer, e.g. "Order #12"
    pub product_name: String,
    /// Correlates the sale with the callbacks the provider sends later
    pub transaction_id: String,
    pub currency: String,
}

#[derive(Debug, Clone, Error)]
pub enum PaymentProviderError {
    #[error("The payment provider could not be reached. {0}")]
    Unavailable(String),
    #[error("The payment provider rejected the sale. {0}")]
    Rejected(String),
    #[error("The payment provider did not respond in time")]
    Timeout,
}

#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Opens a sale and returns the URL the customer should be redirected to in order to pay.
    async fn generate_sale(&self, sale: NewSale) -> Result<String, PaymentProviderError>;
}
