use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
    Method,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    config::PaymeConfig,
    data_objects::{GenerateSaleRequest, GenerateSaleResponse},
    PaymeApiError,
};

const GENERATE_SALE_PATH: &str = "generate-sale";

#[derive(Clone)]
pub struct PaymeApi {
    config: PaymeConfig,
    client: Arc<Client>,
}

impl PaymeApi {
    pub fn new(config: PaymeConfig) -> Result<Self, PaymeApiError> {
        let mut headers = HeaderMap::with_capacity(1);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| PaymeApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<B>,
    ) -> Result<T, PaymeApiError> {
        let url = self.url(path);
        trace!("Sending REST query: {url}");
        let mut req = self.client.request(method, url);
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await?;
        if response.status().is_success() {
            trace!("REST query successful. {}", response.status());
            response.json::<T>().await.map_err(|e| PaymeApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message = response.text().await?;
            Err(PaymeApiError::QueryError { status, message })
        }
    }

    pub fn url(&self, path: &str) -> String {
        let base = self.config.endpoint.trim_end_matches('/');
        format!("{base}/{}", path.trim_start_matches('/'))
    }

    /// Asks PayMe to open a sale for `price` minor units. The `transaction_id` is echoed back in every callback for
    /// this sale. On success, the customer-facing sale URL is returned.
    pub async fn generate_sale(
        &self,
        price: i64,
        currency: &str,
        product_name: &str,
        transaction_id: &str,
    ) -> Result<String, PaymeApiError> {
        let request = GenerateSaleRequest {
            seller_payme_id: self.config.seller_id.reveal().clone(),
            sale_price: price,
            currency: currency.to_string(),
            product_name: product_name.to_string(),
            transaction_id: transaction_id.to_string(),
            sale_callback_url: self.config.callback_url.clone(),
            sale_return_url: self.config.return_url.clone(),
            language: self.config.language.clone(),
        };
        debug!("Requesting sale for transaction {transaction_id}: {price} {currency} ({product_name})");
        let response =
            self.rest_query::<GenerateSaleResponse, GenerateSaleRequest>(Method::POST, GENERATE_SALE_PATH, Some(request))
                .await?;
        trace!("generate-sale response: {response:?}");
        let url = response.into_sale_url()?;
        info!("Sale generated for transaction {transaction_id}");
        Ok(url)
    }
}
