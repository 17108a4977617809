use std::collections::BTreeSet;

use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    db_types::{Cents, NewOrder, Order, OrderItem, TransactionStatus},
    helpers::is_valid_email,
    shop_api::errors::OrderFlowError,
};

pub const DEFAULT_LIMIT: i64 = 20;
pub const DEFAULT_OFFSET: i64 = 0;
pub const MAX_LIMIT: i64 = 100;

/// The body of a new order request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrderRequest {
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub additional_name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub country: String,
    pub address: String,
    pub postal_code: String,
}

impl NewOrderRequest {
    /// Checks the request before anything is looked up or stored.
    pub fn validate(&self) -> Result<(), OrderFlowError> {
        if self.items.is_empty() {
            return Err(OrderFlowError::Validation("order should have at least 1 item".to_string()));
        }
        if !self.items.iter().all(OrderItem::is_valid) {
            return Err(OrderFlowError::Validation("order item is invalid".to_string()));
        }
        let required = [&self.first_name, &self.last_name, &self.email, &self.country, &self.address, &self.postal_code];
        if required.iter().any(|s| s.trim().is_empty()) || !is_valid_email(&self.email) {
            return Err(OrderFlowError::Validation("invalid input body".to_string()));
        }
        Ok(())
    }

    /// The distinct product ids in the order, in ascending order.
    pub fn product_ids(&self) -> Vec<i64> {
        self.items.iter().map(|i| i.product_id).collect::<BTreeSet<_>>().into_iter().collect()
    }

    /// Phone number, if one was given and it is not blank.
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref().map(str::trim).filter(|p| !p.is_empty())
    }

    pub fn to_new_order(&self, total_cost: Cents, currency: &str) -> NewOrder {
        NewOrder {
            ordered_at: Utc::now(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            additional_name: self
                .additional_name
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from),
            email: self.email.trim().to_string(),
            phone: self.phone().map(String::from),
            country: self.country.trim().to_string(),
            address: self.address.trim().to_string(),
            postal_code: self.postal_code.trim().to_string(),
            total_cost,
            currency: currency.to_string(),
        }
    }
}

/// The response to a successful new order request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrderResponse {
    /// Where the customer completes the payment
    pub url: String,
}

/// The payment provider's form-encoded sale notification.
///
/// Every field is optional. Only `notify_type` and `transaction_id` are needed to record a status. Numeric fields
/// that are empty or not numbers are read as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionCallback {
    #[serde(deserialize_with = "lenient_i64")]
    pub status_code: Option<i64>,
    #[serde(deserialize_with = "lenient_i64")]
    pub status_error_code: Option<i64>,
    pub status_error_details: Option<String>,
    pub notify_type: String,
    pub sale_created: Option<String>,
    pub transaction_id: String,
    pub sale_status: Option<String>,
    pub buyer_card_mask: Option<String>,
    pub buyer_card_exp: Option<String>,
    pub payme_transaction_card_brand: Option<String>,
    pub buyer_name: Option<String>,
    pub buyer_email: Option<String>,
    pub buyer_phone: Option<String>,
    /// In minor units
    #[serde(deserialize_with = "lenient_i64")]
    pub price: Option<i64>,
    pub currency: Option<String>,
    pub sale_paid_date: Option<String>,
    pub sale_release_date: Option<String>,
    pub sale_invoice_url: Option<String>,
}

impl TransactionCallback {
    pub fn card_mask(&self) -> Option<&str> {
        self.buyer_card_mask.as_deref().filter(|m| !m.is_empty())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(i64),
    Text(String),
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where D: Deserializer<'de> {
    let value = Option::<NumberOrText>::deserialize(deserializer)?;
    Ok(match value {
        Some(NumberOrText::Number(n)) => Some(n),
        Some(NumberOrText::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}

/// What happened to a payment callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    /// The status was appended to the transaction history
    Recorded(TransactionStatus),
    /// The notification type is not one that is tracked. Nothing was stored.
    Ignored(String),
    /// The callback refers to a transaction that does not exist. Nothing was stored.
    UnknownTransaction(String),
}

/// Pagination parameters for order listings.
///
/// Values are kept as raw strings so that garbage input falls back to the defaults instead of being rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderListFilter {
    pub offset: Option<String>,
    pub limit: Option<String>,
}

impl OrderListFilter {
    pub fn new(offset: i64, limit: i64) -> Self {
        Self { offset: Some(offset.to_string()), limit: Some(limit.to_string()) }
    }

    /// The offset to use. Missing, unparseable and negative values become [`DEFAULT_OFFSET`].
    pub fn effective_offset(&self) -> i64 {
        match self.offset.as_deref().map(|s| s.trim().parse::<i64>()) {
            Some(Ok(v)) if v >= 0 => v,
            _ => DEFAULT_OFFSET,
        }
    }

    /// The page size to use. Missing, unparseable and non-positive values become [`DEFAULT_LIMIT`]. The result never
    /// exceeds [`MAX_LIMIT`].
    pub fn effective_limit(&self) -> i64 {
        match self.limit.as_deref().map(|s| s.trim().parse::<i64>()) {
            Some(Ok(v)) if v > 0 => v.min(MAX_LIMIT),
            _ => DEFAULT_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderList {
    pub orders: Vec<Order>,
    /// The total number of orders in the store, not just on this page
    pub total: i64,
    pub offset: i64,
    pub limit: i64,
}
