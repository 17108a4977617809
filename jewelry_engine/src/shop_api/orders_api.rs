use std::fmt::Debug;

use log::*;

use crate::{
    db_types::Order,
    shop_api::{
        errors::OrderFlowError,
        order_objects::{OrderList, OrderListFilter},
    },
    traits::OrderStore,
};

/// Read-only access to orders, their items and their payment history.
pub struct OrdersApi<S> {
    store: S,
}

impl<S> Debug for OrdersApi<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrdersApi")
    }
}

impl<S> OrdersApi<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S> OrdersApi<S>
where S: OrderStore
{
    /// Returns a page of orders. Missing or nonsensical pagination values fall back to the defaults.
    pub async fn list_orders(&self, filter: OrderListFilter) -> Result<OrderList, OrderFlowError> {
        let offset = filter.effective_offset();
        let limit = filter.effective_limit();
        let (orders, total) = self.store.fetch_orders(offset, limit).await?;
        trace!("🛒 Fetched {} of {total} orders (offset {offset}, limit {limit})", orders.len());
        Ok(OrderList { orders, total, offset, limit })
    }

    pub async fn order_by_id(&self, id: i64) -> Result<Order, OrderFlowError> {
        self.store.fetch_order(id).await?.ok_or(OrderFlowError::OrderNotFound(id))
    }
}
