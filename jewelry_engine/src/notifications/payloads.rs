use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    db_types::{NewOrder, PricedProduct, TransactionStatus},
    events::PaymentReceivedEvent,
};

/// RFC 822 style timestamp, e.g. `02 Jan 06 15:04 UTC`
const ORDERED_AT_FORMAT: &str = "%d %b %y %H:%M %Z";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderInfoItem {
    pub product_id: i64,
    pub title: String,
    /// Unit price in major units, e.g. "10.00"
    pub price: String,
    pub quantity: i64,
    /// URL of the first product image, or empty
    pub thumbnail: String,
}

impl OrderInfoItem {
    pub fn new(product: &PricedProduct, quantity: i64) -> Self {
        Self {
            product_id: product.id,
            title: product.title.clone(),
            price: product.price.to_string(),
            quantity,
            thumbnail: product.thumbnail().unwrap_or_default().to_string(),
        }
    }
}

/// Everything the "new order" e-mails are rendered from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderInfoEmail {
    pub order_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub country: String,
    pub address: String,
    pub postal_code: String,
    pub card_mask: String,
    /// In major units
    pub total_cost: String,
    pub currency: String,
    pub transaction_id: String,
    pub transaction_status: String,
    pub ordered_at: DateTime<Utc>,
    pub ordered_at_formatted: String,
    pub items: Vec<OrderInfoItem>,
}

impl OrderInfoEmail {
    pub fn new(order_id: i64, order: &NewOrder, transaction_id: &str, items: Vec<OrderInfoItem>) -> Self {
        Self {
            order_id,
            first_name: order.first_name.clone(),
            last_name: order.last_name.clone(),
            email: order.email.clone(),
            phone: order.phone.clone().unwrap_or_default(),
            country: order.country.clone(),
            address: order.address.clone(),
            postal_code: order.postal_code.clone(),
            card_mask: String::new(),
            total_cost: order.total_cost.to_string(),
            currency: order.currency.clone(),
            transaction_id: transaction_id.to_string(),
            transaction_status: TransactionStatus::Created.to_string(),
            ordered_at: order.ordered_at,
            ordered_at_formatted: order.ordered_at.format(ORDERED_AT_FORMAT).to_string(),
            items,
        }
    }
}

/// Everything the "payment received" e-mails are rendered from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentInfoEmail {
    pub order_id: i64,
    pub transaction_id: String,
    pub card_mask: String,
    pub card_brand: String,
    pub buyer_name: String,
    pub buyer_email: String,
    pub buyer_phone: String,
    /// The amount paid in major units, e.g. "40.00"
    pub price: String,
    pub currency: String,
    pub status: String,
}

impl PaymentInfoEmail {
    pub fn new(order_id: i64, payment: &PaymentReceivedEvent) -> Self {
        Self {
            order_id,
            transaction_id: payment.transaction_id.clone(),
            card_mask: payment.card_mask.clone(),
            card_brand: payment.card_brand.clone(),
            buyer_name: payment.buyer_name.clone(),
            buyer_email: payment.buyer_email.clone(),
            buyer_phone: payment.buyer_phone.clone(),
            price: payment.price.to_string(),
            currency: payment.currency.clone(),
            status: payment.status.to_string(),
        }
    }
}
