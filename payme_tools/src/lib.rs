//! A minimal client for the PayMe payment provider.
//!
//! Only the `generate-sale` call is supported. The provider reports the outcome of a sale asynchronously by posting a
//! form-encoded callback to the `sale_callback_url` supplied when the sale was generated.
mod api;
mod config;
mod error;

mod data_objects;

pub use api::PaymeApi;
pub use config::PaymeConfig;
pub use data_objects::{GenerateSaleRequest, GenerateSaleResponse, SALE_STATUS_FAILURE};
pub use error::PaymeApiError;
