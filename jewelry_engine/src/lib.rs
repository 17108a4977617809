//! Jewelry Shop Engine
//!
//! The engine holds the order placement and payment settlement workflow of the jewelry shop backend. It is
//! storage- and provider-agnostic: storage backends implement the traits in [`mod@traits`], and the payment provider
//! and mail transport are injected as trait objects.
//!
//! The library is divided into these sections:
//! 1. Storage ([`mod@sqlite`] and [`mod@traits`]). SQLite is the supported backend. You should never need to access
//!    the database directly. Instead, use the public API. The exception is the data types used in the database, which
//!    are defined in the [`mod@db_types`] module.
//! 2. The public API ([`mod@shop_api`]). [`OrderFlowApi`] prices and places orders and reconciles payment callbacks.
//!    [`OrdersApi`] serves the read path.
//! 3. Notifications ([`mod@notifications`]). E-mail payloads, template rendering and the [`Notifier`] that sends the
//!    support and customer e-mails.
//!
//! Side effects that must not hold up a request (e-mails) are published as events. See [`mod@events`] for the bounded
//! queue and worker machinery that runs them.
pub mod db_types;
pub mod events;
pub mod helpers;
pub mod notifications;
pub mod shop_api;
#[cfg(feature = "sqlite")]
pub mod sqlite;
pub mod traits;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use notifications::Notifier;
pub use shop_api::{
    errors::OrderFlowError,
    order_flow_api::{OrderFlowApi, OrderFlowOptions, UnpricedItemPolicy},
    order_objects,
    orders_api::OrdersApi,
};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use traits::{CatalogReader, NotificationSender, OrderStore, PaymentProvider};
