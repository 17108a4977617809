//! # Collaborator contracts
//!
//! This module defines the interfaces the order workflow depends on. Storage backends implement the first two, the
//! server supplies implementations of the last two.
//!
//! * [`CatalogReader`] returns current prices, stock flags and metadata for products.
//! * [`OrderStore`] persists orders atomically, appends to the transaction history and serves the read path.
//! * [`PaymentProvider`] opens a sale with the remote payment provider and returns the customer-facing sale URL.
//! * [`NotificationSender`] delivers a rendered e-mail.
//!
//! The storage traits are used through generics. The provider and sender are used as `Arc<dyn ...>` trait objects and
//! are therefore declared with `async_trait`.
mod catalog;
mod notification_sender;
mod order_store;
mod payment_provider;

pub use catalog::{CatalogError, CatalogReader};
pub use notification_sender::{NotificationError, NotificationSender};
pub use order_store::{OrderStore, OrderStoreError};
pub use payment_provider::{NewSale, PaymentProvider, PaymentProviderError};
