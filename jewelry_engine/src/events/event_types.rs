use crate::{
    db_types::{Cents, TransactionStatus},
    notifications::OrderInfoEmail,
};

/// Published once an order has been stored and the sale opened with the payment provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderCreatedEvent {
    pub email: OrderInfoEmail,
}

impl OrderCreatedEvent {
    pub fn new(email: OrderInfoEmail) -> Self {
        Self { email }
    }
}

/// Published when a payment callback records a [`TransactionStatus::Paid`] status.
///
/// The buyer details are those reported by the payment provider, not the ones on the order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentReceivedEvent {
    pub transaction_id: String,
    pub status: TransactionStatus,
    pub price: Cents,
    pub currency: String,
    pub card_mask: String,
    pub card_brand: String,
    pub buyer_name: String,
    pub buyer_email: String,
    pub buyer_phone: String,
}
