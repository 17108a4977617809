use async_trait::async_trait;
use jewelry_engine::traits::{NewSale, PaymentProvider, PaymentProviderError};
use log::*;
use payme_tools::{PaymeApi, PaymeApiError, PaymeConfig};

/// [`PaymentProvider`] backed by the PayMe `generate-sale` API.
#[derive(Clone)]
pub struct PaymeGateway {
    api: PaymeApi,
}

impl PaymeGateway {
    pub fn new(config: PaymeConfig) -> Result<Self, PaymeApiError> {
        let api = PaymeApi::new(config)?;
        Ok(Self { api })
    }
}

#[async_trait]
impl PaymentProvider for PaymeGateway {
    async fn generate_sale(&self, sale: NewSale) -> Result<String, PaymentProviderError> {
        self.api
            .generate_sale(sale.price.value(), &sale.currency, &sale.product_name, &sale.transaction_id)
            .await
            .map_err(|e| {
                warn!("💳 PayMe could not open a sale for transaction {}. {e}", sale.transaction_id);
                provider_error(e)
            })
    }
}

fn provider_error(e: PaymeApiError) -> PaymentProviderError {
    match e {
        PaymeApiError::Timeout => PaymentProviderError::Timeout,
        PaymeApiError::SaleRejected(msg) => PaymentProviderError::Rejected(msg),
        e @ PaymeApiError::QueryError { .. } => PaymentProviderError::Rejected(e.to_string()),
        e => PaymentProviderError::Unavailable(e.to_string()),
    }
}
