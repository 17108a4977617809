use std::{collections::HashMap, fmt::Debug, str::FromStr, sync::Arc, time::Duration};

use jewelry_common::DEFAULT_CURRENCY_CODE;
use log::*;
use url::Url;
use uuid::Uuid;

use crate::{
    db_types::{Cents, OrderItem, PricedProduct, TransactionStatus},
    events::{EventProducers, OrderCreatedEvent, PaymentReceivedEvent},
    notifications::{OrderInfoEmail, OrderInfoItem},
    shop_api::{
        errors::OrderFlowError,
        order_objects::{CallbackOutcome, NewOrderRequest, TransactionCallback},
    },
    traits::{CatalogReader, NewSale, OrderStore, OrderStoreError, PaymentProvider},
};

pub const DEFAULT_GATEWAY_TIMEOUT: Duration = Duration::from_secs(5);

/// What to do with order lines whose product is missing from the catalog or out of stock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnpricedItemPolicy {
    /// Keep out-of-stock lines in the order but leave them out of the total. Lines for unknown products are dropped.
    /// The order still fails if none of its products exist.
    #[default]
    Exclude,
    /// Fail the whole order.
    Reject,
}

impl FromStr for UnpricedItemPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "exclude" => Ok(Self::Exclude),
            "reject" => Ok(Self::Reject),
            other => Err(format!("Unknown unpriced item policy: {other}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OrderFlowOptions {
    /// The currency of every order and sale
    pub currency: String,
    pub unpriced_items: UnpricedItemPolicy,
    /// How long to wait for the payment provider to open a sale
    pub gateway_timeout: Duration,
}

impl Default for OrderFlowOptions {
    fn default() -> Self {
        Self {
            currency: DEFAULT_CURRENCY_CODE.to_string(),
            unpriced_items: UnpricedItemPolicy::default(),
            gateway_timeout: DEFAULT_GATEWAY_TIMEOUT,
        }
    }
}

#[derive(Default)]
struct PricedItems {
    items: Vec<OrderItem>,
    lines: Vec<OrderInfoItem>,
    total: Cents,
}

/// `OrderFlowApi` is the primary API for placing orders and for reconciling the payment provider's callbacks against
/// them.
pub struct OrderFlowApi<C, S> {
    catalog: C,
    store: S,
    gateway: Arc<dyn PaymentProvider>,
    producers: EventProducers,
    options: OrderFlowOptions,
}

impl<C, S> Debug for OrderFlowApi<C, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi ({:?})", self.options)
    }
}

impl<C, S> OrderFlowApi<C, S> {
    pub fn new(
        catalog: C,
        store: S,
        gateway: Arc<dyn PaymentProvider>,
        producers: EventProducers,
        options: OrderFlowOptions,
    ) -> Self {
        Self { catalog, store, gateway, producers, options }
    }
}

impl<C, S> OrderFlowApi<C, S>
where
    C: CatalogReader,
    S: OrderStore,
{
    /// Places a new order and opens the sale with the payment provider.
    ///
    /// The order is priced from the current catalog, and stored along with its items, a new transaction and the
    /// initial `Created` status in a single database transaction. Returns the URL the customer should be redirected
    /// to in order to pay, with the customer's details attached as query parameters.
    ///
    /// If the payment provider fails, the stored order is kept and [`OrderFlowError::Gateway`] is returned.
    pub async fn create_order(&self, request: NewOrderRequest) -> Result<String, OrderFlowError> {
        request.validate()?;
        let products = self.catalog.fetch_priced_products(&request.product_ids()).await?;
        let priced = self.price_items(&request, &products)?;
        let transaction_id = Uuid::new_v4().to_string();
        let order = request.to_new_order(priced.total, &self.options.currency);
        let order_id = self.store.create_order(order.clone(), &priced.items, &transaction_id).await.map_err(|e| {
            error!("🛒 Could not store the order for transaction {transaction_id}. {e}");
            OrderFlowError::from(e)
        })?;
        info!(
            "🛒 Order #{order_id} stored with transaction {transaction_id}. Total: {} {}",
            order.total_cost, order.currency
        );
        let sale = NewSale {
            price: order.total_cost,
            product_name: format!("Order #{order_id}"),
            transaction_id: transaction_id.clone(),
            currency: self.options.currency.clone(),
        };
        let sale_url = match tokio::time::timeout(self.options.gateway_timeout, self.gateway.generate_sale(sale)).await {
            Ok(Ok(url)) => url,
            Ok(Err(e)) => {
                error!("💳 Could not open a sale for order #{order_id} (transaction {transaction_id}). {e}");
                return Err(e.into());
            },
            Err(_) => {
                error!(
                    "💳 The payment provider did not open a sale for order #{order_id} (transaction {transaction_id}) \
                     within {:?}",
                    self.options.gateway_timeout
                );
                return Err(OrderFlowError::Gateway("The payment provider did not respond in time".to_string()));
            },
        };
        debug!("💳 Sale opened for order #{order_id} (transaction {transaction_id})");
        let email = OrderInfoEmail::new(order_id, &order, &transaction_id, priced.lines);
        self.producers.publish_order_created(OrderCreatedEvent::new(email)).await;
        redirect_url(&sale_url, &request)
    }

    fn price_items(
        &self,
        request: &NewOrderRequest,
        products: &[PricedProduct],
    ) -> Result<PricedItems, OrderFlowError> {
        let catalog = products.iter().map(|p| (p.id, p)).collect::<HashMap<_, _>>();
        let unavailable = request
            .product_ids()
            .into_iter()
            .filter(|id| !catalog.get(id).is_some_and(|p| p.in_stock))
            .collect::<Vec<_>>();
        if !unavailable.is_empty() {
            match self.options.unpriced_items {
                UnpricedItemPolicy::Reject => {
                    warn!("🛒 Rejecting order. These products are missing or out of stock: {unavailable:?}");
                    return Err(OrderFlowError::ProductsUnavailable(unavailable));
                },
                UnpricedItemPolicy::Exclude => {
                    warn!("🛒 These products are missing or out of stock and are not charged for: {unavailable:?}");
                },
            }
        }
        let mut priced = PricedItems::default();
        for item in &request.items {
            // Unknown products cannot be referenced by a stored line
            let Some(product) = catalog.get(&item.product_id) else { continue };
            priced.items.push(*item);
            if !product.in_stock {
                continue;
            }
            priced.total = product
                .price
                .checked_mul(item.quantity)
                .and_then(|line| priced.total.checked_add(line))
                .ok_or_else(|| OrderFlowError::Validation("order total is too large".to_string()))?;
            priced.lines.push(OrderInfoItem::new(product, item.quantity));
        }
        if priced.items.is_empty() {
            warn!("🛒 None of the products in the order exist");
            return Err(OrderFlowError::ProductsUnavailable(unavailable));
        }
        Ok(priced)
    }

    /// Records the status reported by a payment callback.
    ///
    /// Notification types that are not tracked are ignored, as are callbacks for unknown transactions. A `Paid`
    /// status publishes a [`PaymentReceivedEvent`] so that the payment e-mails go out. If the callback carries no
    /// price, the event uses the stored order's total and currency. An error is only returned if the status could not
    /// be stored, in which case the provider should retry.
    pub async fn process_callback(&self, callback: TransactionCallback) -> Result<CallbackOutcome, OrderFlowError> {
        let transaction_id = callback.transaction_id.as_str();
        let status = match TransactionStatus::from_notify_type(&callback.notify_type) {
            Ok(status) => status,
            Err(e) => {
                warn!("💳 Ignoring callback for transaction {transaction_id}. {e}");
                return Ok(CallbackOutcome::Ignored(callback.notify_type));
            },
        };
        let card_mask = callback.card_mask().map(String::from);
        match self.store.append_transaction_history(transaction_id, card_mask, status).await {
            Ok(()) => info!("💳 Transaction {transaction_id} is now '{status}'"),
            Err(OrderStoreError::TransactionNotFound(id)) => {
                warn!("💳 Received a '{status}' callback for transaction {id}, which does not exist");
                return Ok(CallbackOutcome::UnknownTransaction(id));
            },
            Err(e) => {
                error!("💳 Could not record '{status}' for transaction {transaction_id}. {e}");
                return Err(e.into());
            },
        }
        if status == TransactionStatus::Paid {
            let event = self.payment_received(status, &callback).await;
            self.producers.publish_payment_received(event).await;
        }
        Ok(CallbackOutcome::Recorded(status))
    }

    async fn payment_received(
        &self,
        status: TransactionStatus,
        callback: &TransactionCallback,
    ) -> PaymentReceivedEvent {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        let transaction_id = callback.transaction_id.as_str();
        let (price, currency) = match callback.price {
            Some(price) => (Cents::from(price), text(&callback.currency)),
            None => {
                warn!(
                    "💳 The '{status}' callback for transaction {transaction_id} has no price. Using the order total."
                );
                match self.order_total(transaction_id).await {
                    Some((total, currency)) => (total, callback.currency.clone().unwrap_or(currency)),
                    None => (Cents::default(), text(&callback.currency)),
                }
            },
        };
        PaymentReceivedEvent {
            transaction_id: transaction_id.to_string(),
            status,
            price,
            currency,
            card_mask: text(&callback.buyer_card_mask),
            card_brand: text(&callback.payme_transaction_card_brand),
            buyer_name: text(&callback.buyer_name),
            buyer_email: text(&callback.buyer_email),
            buyer_phone: text(&callback.buyer_phone),
        }
    }

    async fn order_total(&self, transaction_id: &str) -> Option<(Cents, String)> {
        let lookup = match self.store.fetch_order_id_for_transaction(transaction_id).await {
            Ok(Some(order_id)) => self.store.fetch_order(order_id).await,
            Ok(None) => Ok(None),
            Err(e) => Err(e),
        };
        match lookup {
            Ok(Some(order)) => Some((order.total_cost, order.currency)),
            Ok(None) => {
                warn!("💳 No order is linked to transaction {transaction_id}. The payment e-mails will show 0.00");
                None
            },
            Err(e) => {
                error!("💳 Could not look up the order for transaction {transaction_id}. {e}");
                None
            },
        }
    }
}

fn redirect_url(sale_url: &str, request: &NewOrderRequest) -> Result<String, OrderFlowError> {
    let mut url = Url::parse(sale_url)
        .map_err(|e| OrderFlowError::Gateway(format!("The sale URL '{sale_url}' is not valid. {e}")))?;
    {
        let mut query = url.query_pairs_mut();
        query
            .append_pair("first_name", request.first_name.trim())
            .append_pair("last_name", request.last_name.trim())
            .append_pair("email", request.email.trim())
            .append_pair("zip_code", request.postal_code.trim());
        if let Some(phone) = request.phone() {
            query.append_pair("phone", phone);
        }
    }
    Ok(url.into())
}
