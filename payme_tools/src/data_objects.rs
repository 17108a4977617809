use serde::{Deserialize, Serialize};

use crate::PaymeApiError;

pub const SALE_STATUS_FAILURE: i64 = 1;

/// The body of a `generate-sale` request.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateSaleRequest {
    pub seller_payme_id: String,
    /// The sale price in minor currency units
    pub sale_price: i64,
    pub currency: String,
    pub product_name: String,
    pub transaction_id: String,
    pub sale_callback_url: String,
    pub sale_return_url: String,
    pub language: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GenerateSaleResponse {
    pub status_code: i64,
    #[serde(default)]
    pub status_error_details: Option<String>,
    #[serde(default)]
    pub sale_url: String,
    #[serde(default)]
    pub payme_sale_id: Option<String>,
    #[serde(default)]
    pub payme_sale_code: Option<i64>,
}

impl GenerateSaleResponse {
    /// Returns the redirect URL for the sale, unless the provider flagged the request as failed or omitted the URL.
    pub fn into_sale_url(self) -> Result<String, PaymeApiError> {
        if self.status_code == SALE_STATUS_FAILURE {
            let details = self.status_error_details.unwrap_or_else(|| "no details given".to_string());
            return Err(PaymeApiError::SaleRejected(details));
        }
        if self.sale_url.is_empty() {
            return Err(PaymeApiError::SaleRejected("the response did not contain a sale url".to_string()));
        }
        Ok(self.sale_url)
    }
}
