use std::time::Duration;

use jewelry_common::{helpers::parse_seconds, Secret};
use log::*;

pub const DEFAULT_PAYME_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct PaymeConfig {
    /// Base URL of the PayMe API, e.g. `https://sandbox.payme.io/api/`
    pub endpoint: String,
    pub seller_id: Secret<String>,
    /// Where PayMe posts sale status callbacks. Should point at this server's `/payment/callback` route.
    pub callback_url: String,
    /// Where the customer is sent after completing the payment.
    pub return_url: String,
    pub language: String,
    pub timeout: Duration,
}

impl Default for PaymeConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://sandbox.payme.io/api/".to_string(),
            seller_id: Secret::default(),
            callback_url: "http://localhost:8480/payment/callback".to_string(),
            return_url: "http://localhost:8480/payment/success".to_string(),
            language: "en".to_string(),
            timeout: DEFAULT_PAYME_TIMEOUT,
        }
    }
}

impl PaymeConfig {
    pub fn new_from_env_or_default() -> Self {
        let defaults = Self::default();
        let endpoint = std::env::var("JSB_PAYME_ENDPOINT").unwrap_or_else(|_| {
            warn!("JSB_PAYME_ENDPOINT not set, using the sandbox endpoint {}", defaults.endpoint);
            defaults.endpoint.clone()
        });
        let seller_id = Secret::new(std::env::var("JSB_PAYME_SELLER_ID").unwrap_or_else(|_| {
            warn!("JSB_PAYME_SELLER_ID not set. Sales will be rejected by the provider");
            String::default()
        }));
        let callback_url = std::env::var("JSB_PAYME_CALLBACK_URL").unwrap_or_else(|_| {
            warn!("JSB_PAYME_CALLBACK_URL not set, using (probably useless) default {}", defaults.callback_url);
            defaults.callback_url.clone()
        });
        let return_url = std::env::var("JSB_PAYME_RETURN_URL").unwrap_or_else(|_| {
            warn!("JSB_PAYME_RETURN_URL not set, using (probably useless) default {}", defaults.return_url);
            defaults.return_url.clone()
        });
        let language = std::env::var("JSB_PAYME_LANGUAGE").unwrap_or_else(|_| defaults.language.clone());
        let timeout = match std::env::var("JSB_GATEWAY_TIMEOUT") {
            Ok(s) => parse_seconds(&s).unwrap_or_else(|| {
                warn!("{s} is not a valid value for JSB_GATEWAY_TIMEOUT. Using {}s", DEFAULT_PAYME_TIMEOUT.as_secs());
                DEFAULT_PAYME_TIMEOUT
            }),
            Err(_) => DEFAULT_PAYME_TIMEOUT,
        };
        Self { endpoint, seller_id, callback_url, return_url, language, timeout }
    }
}
