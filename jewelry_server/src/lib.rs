//! # Jewelry shop server
//! This crate hosts the HTTP server for the jewelry shop backend. It is responsible for:
//! * Accepting new orders, pricing and storing them, and sending the customer on to the payment provider.
//! * Receiving payment status callbacks from the payment provider and recording them against the order.
//! * Serving the order list and order details to shop administrators.
//!
//! E-mails for new orders and received payments are sent from background workers. See [`integrations`].
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `POST /order`: Place a new order. Returns the payment URL.
//! * `POST /payment/callback`: Payment status notifications from PayMe (form-encoded).
//! * `GET /orders` and `GET /orders/{id}`: Order listings and details. Requires an admin access token.

pub mod auth;
pub mod cli;
pub mod config;
pub mod errors;
pub mod integrations;
pub mod middleware;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
