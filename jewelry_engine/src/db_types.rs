use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
pub use jewelry_common::Cents;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

//--------------------------------------   TransactionStatus   ---------------------------------------------------------
/// The closed vocabulary of payment statuses recorded in the transaction history.
///
/// Statuses are stored and serialized using their display names, e.g. `"Payment Authorized"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
pub enum TransactionStatus {
    /// The order was placed and a sale was requested. Every transaction starts here.
    Created,
    /// The sale was completed and the funds captured.
    Paid,
    #[sqlx(rename = "Payment Authorized")]
    #[serde(rename = "Payment Authorized")]
    PaymentAuthorized,
    #[sqlx(rename = "Payment Refunded")]
    #[serde(rename = "Payment Refunded")]
    PaymentRefunded,
    #[sqlx(rename = "Payment Failed")]
    #[serde(rename = "Payment Failed")]
    PaymentFailed,
    #[sqlx(rename = "Payment Chargeback")]
    #[serde(rename = "Payment Chargeback")]
    PaymentChargeback,
    /// A chargeback was reversed in the merchant's favour.
    #[sqlx(rename = "Payment Reverted")]
    #[serde(rename = "Payment Reverted")]
    PaymentReverted,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unrecognised notify type: {0}")]
pub struct StatusMappingError(pub String);

impl TransactionStatus {
    /// Maps the payment provider's `notify_type` onto a status.
    pub fn from_notify_type(notify_type: &str) -> Result<Self, StatusMappingError> {
        match notify_type {
            "sale-complete" => Ok(Self::Paid),
            "sale-authorized" => Ok(Self::PaymentAuthorized),
            "refund" => Ok(Self::PaymentRefunded),
            "sale-failure" => Ok(Self::PaymentFailed),
            "sale-chargeback" => Ok(Self::PaymentChargeback),
            "sale-chargeback-refund" => Ok(Self::PaymentReverted),
            other => Err(StatusMappingError(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "Created",
            Self::Paid => "Paid",
            Self::PaymentAuthorized => "Payment Authorized",
            Self::PaymentRefunded => "Payment Refunded",
            Self::PaymentFailed => "Payment Failed",
            Self::PaymentChargeback => "Payment Chargeback",
            Self::PaymentReverted => "Payment Reverted",
        }
    }
}

impl Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid transaction status: {0}")]
pub struct ConversionError(String);

impl FromStr for TransactionStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Created" => Ok(Self::Created),
            "Paid" => Ok(Self::Paid),
            "Payment Authorized" => Ok(Self::PaymentAuthorized),
            "Payment Refunded" => Ok(Self::PaymentRefunded),
            "Payment Failed" => Ok(Self::PaymentFailed),
            "Payment Chargeback" => Ok(Self::PaymentChargeback),
            "Payment Reverted" => Ok(Self::PaymentReverted),
            s => Err(ConversionError(s.to_string())),
        }
    }
}

//--------------------------------------       Products        ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct ProductImage {
    pub id: i64,
    pub product_id: i64,
    pub url: String,
    pub alt_text: String,
}

/// A catalog product with its current unit price and stock flag.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct PricedProduct {
    pub id: i64,
    pub title: String,
    pub price: Cents,
    /// Out-of-stock products can be ordered, but are not charged for
    pub in_stock: bool,
    #[sqlx(skip)]
    pub images: Vec<ProductImage>,
}

impl PricedProduct {
    /// The first image of the product, used as the thumbnail in e-mails.
    pub fn thumbnail(&self) -> Option<&str> {
        self.images.first().map(|i| i.url.as_str())
    }
}

//--------------------------------------       OrderItem       ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: i64,
    pub quantity: i64,
}

impl OrderItem {
    pub fn new(product_id: i64, quantity: i64) -> Self {
        Self { product_id, quantity }
    }

    pub fn is_valid(&self) -> bool {
        self.product_id > 0 && self.quantity > 0
    }
}

//--------------------------------------      Transaction      ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Transaction {
    #[sqlx(rename = "uuid")]
    pub transaction_id: String,
    pub order_id: i64,
    pub created_at: DateTime<Utc>,
}

/// One entry in the append-only audit log of payment statuses for a transaction.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct TransactionHistory {
    /// Insertion sequence. The entry with the highest id is the current status.
    pub id: i64,
    #[sqlx(rename = "uuid")]
    pub transaction_id: String,
    pub status: TransactionStatus,
    pub card_mask: Option<String>,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------         Order         ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub ordered_at: DateTime<Utc>,
    pub first_name: String,
    pub last_name: String,
    pub additional_name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub country: String,
    pub address: String,
    pub postal_code: String,
    /// Frozen at creation time. Later catalog price changes never affect it.
    pub total_cost: Cents,
    pub currency: String,
    pub transaction_id: String,
    #[sqlx(skip)]
    pub items: Vec<OrderItem>,
    #[sqlx(skip)]
    pub transactions: Vec<TransactionHistory>,
}

impl Order {
    /// The most recently recorded payment status, if the history has been loaded.
    pub fn current_status(&self) -> Option<TransactionStatus> {
        self.transactions.iter().max_by_key(|t| t.id).map(|t| t.status)
    }
}

//--------------------------------------        NewOrder       ---------------------------------------------------------
/// A priced order that is ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub ordered_at: DateTime<Utc>,
    pub first_name: String,
    pub last_name: String,
    pub additional_name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub country: String,
    pub address: String,
    pub postal_code: String,
    pub total_cost: Cents,
    pub currency: String,
}
