use std::sync::Arc;

use futures::future::BoxFuture;
use jewelry_engine::{
    events::EventHooks,
    notifications::PaymentInfoEmail,
    traits::OrderStore,
    Notifier,
    SqliteDatabase,
};
use log::*;

/// Assigns the e-mail notifications to the engine's events.
///
/// 1. OrderCreatedEvent: the order details go to the shop's support address and to the customer.
/// 2. PaymentReceivedEvent: the payment details go to support and to the buyer. The order id is looked up from the
///    transaction id, since the payment provider does not know about orders.
pub fn create_email_event_hooks(notifier: Notifier, db: SqliteDatabase) -> EventHooks {
    let notifier = Arc::new(notifier);
    let mut hooks = EventHooks::default();
    let order_notifier = Arc::clone(&notifier);
    hooks.on_order_created(move |ev| {
        let notifier = Arc::clone(&order_notifier);
        Box::pin(async move {
            let order_id = ev.email.order_id;
            let sent = notifier.send_order_info(&ev.email).await;
            info!("📧 Sent {sent} e-mail(s) for new order #{order_id}");
        })
    });
    hooks.on_payment_received(move |ev| {
        let notifier = Arc::clone(&notifier);
        let db = db.clone();
        let fut: BoxFuture<'static, ()> = Box::pin(async move {
            let order_id = match db.fetch_order_id_for_transaction(&ev.transaction_id).await {
                Ok(Some(id)) => id,
                Ok(None) => {
                    warn!("📧 No order found for transaction {}. No payment e-mails were sent.", ev.transaction_id);
                    return;
                },
                Err(e) => {
                    error!("📧 Could not look up the order for transaction {}. {e}", ev.transaction_id);
                    return;
                },
            };
            let sent = notifier.send_payment_info(&PaymentInfoEmail::new(order_id, &ev)).await;
            info!("📧 Sent {sent} e-mail(s) for the payment on order #{order_id}");
        });
        fut
    });
    hooks
}
