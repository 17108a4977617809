//! # Jewelry shop public API
//!
//! The `shop_api` module exposes the programmatic API of the order workflow.
//!
//! * [`order_flow_api`] prices and places new orders, opens the sale with the payment provider and reconciles the
//!   provider's payment callbacks.
//! * [`orders_api`] serves the read path: paginated order listings and single orders, with items and payment history.
//!
//! The other submodules hold the request, response and error types.
//!
//! # API usage
//!
//! An API instance is created by supplying the storage backends that implement the traits required by the API.
//!
//! ```rust,ignore
//! use jewelry_engine::{OrdersApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url(...).await?;
//! // SqliteDatabase implements OrderStore
//! let api = OrdersApi::new(db);
//! let order = api.order_by_id(12).await?;
//! ```
pub mod errors;
pub mod order_flow_api;
pub mod order_objects;
pub mod orders_api;
