//! Request handlers
//!
//! Each route is declared with the [`route!`](crate::route) macro next to its handler. Handlers stay thin: they
//! unpack the request, call into the engine APIs held in the app data and turn the result into a response.
//!
//! Everything here runs on the actix worker threads, so handlers must never block. Database and provider calls are
//! awaited, never waited on.
use actix_web::{get, web, HttpResponse, Responder};
use jewelry_engine::{
    order_objects::{CallbackOutcome, NewOrderRequest, NewOrderResponse, OrderListFilter, TransactionCallback},
    traits::{CatalogReader, OrderStore},
    OrderFlowApi,
    OrderFlowError,
    OrdersApi,
};
use log::*;
use serde_json::json;

use crate::{auth::Role, errors::ServerError};

// actix cannot register generic handlers directly, so each generic route gets a small service type from `route!`
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };

    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+ where requires [$($roles:ty),*])  => {
        paste::paste! { pub struct [<$name:camel Route>]<A>(core::marker::PhantomData<fn() -> A>);}
        paste::paste! { impl<A> [<$name:camel Route>]<A> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> A>)
            }
        }}
        paste::paste! { impl<A> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<A>
        where
            A: $($bounds)++ 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<A>)
                    .wrap($crate::middleware::AclMiddlewareFactory::new(&[$($roles),+]));
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Orders  ----------------------------------------------------
route!(create_order => Post "/order" impl CatalogReader, OrderStore);
/// Route handler for placing a new order.
///
/// The order is priced from the catalog and stored, and a sale is opened with the payment provider. The response
/// contains the URL the customer should be sent to in order to pay.
pub async fn create_order<TCatalogReader, TOrderStore>(
    api: web::Data<OrderFlowApi<TCatalogReader, TOrderStore>>,
    body: web::Json<NewOrderRequest>,
) -> Result<HttpResponse, ServerError>
where
    TCatalogReader: CatalogReader,
    TOrderStore: OrderStore,
{
    let request = body.into_inner();
    debug!("💻️ POST new order from {} with {} item(s)", request.email, request.items.len());
    let url = api.create_order(request).await.map_err(|e| {
        warn!("💻️ Could not place the order. {e}");
        ServerError::from(e)
    })?;
    Ok(HttpResponse::Ok().json(NewOrderResponse { url }))
}

//----------------------------------------------   Payments  ----------------------------------------------------
route!(payment_callback => Post "/payment/callback" impl CatalogReader, OrderStore);
/// Route handler for the payment provider's sale notifications.
///
/// Anything that retrying cannot fix (unknown notification types, unknown transactions) is acknowledged with a 200
/// response. Only a storage failure is reported as an error, so that the provider sends the notification again.
pub async fn payment_callback<TCatalogReader, TOrderStore>(
    api: web::Data<OrderFlowApi<TCatalogReader, TOrderStore>>,
    body: web::Form<TransactionCallback>,
) -> Result<HttpResponse, ServerError>
where
    TCatalogReader: CatalogReader,
    TOrderStore: OrderStore,
{
    let callback = body.into_inner();
    debug!("💻️ Payment callback '{}' for transaction {}", callback.notify_type, callback.transaction_id);
    let outcome = match api.process_callback(callback).await {
        Ok(outcome) => outcome,
        Err(OrderFlowError::Persistence(e)) => return Err(ServerError::BackendError(e)),
        Err(e) => {
            warn!("💻️ Payment callback could not be processed. {e}");
            return Ok(HttpResponse::Ok().json(json!({ "result": "rejected", "reason": e.to_string() })));
        },
    };
    let body = match outcome {
        CallbackOutcome::Recorded(status) => json!({ "result": "recorded", "status": status }),
        CallbackOutcome::Ignored(notify_type) => json!({ "result": "ignored", "notify_type": notify_type }),
        CallbackOutcome::UnknownTransaction(id) => json!({ "result": "unknown_transaction", "transaction_id": id }),
    };
    Ok(HttpResponse::Ok().json(body))
}

//----------------------------------------------   Admin  ----------------------------------------------------
route!(orders => Get "/orders" impl OrderStore where requires [Role::Admin]);
pub async fn orders<B: OrderStore>(
    query: web::Query<OrderListFilter>,
    api: web::Data<OrdersApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let filter = query.into_inner();
    debug!("💻️ GET orders ({filter:?})");
    let orders = api.list_orders(filter).await?;
    Ok(HttpResponse::Ok().json(orders))
}

route!(order_by_id => Get "/orders/{id}" impl OrderStore where requires [Role::Admin]);
pub async fn order_by_id<B: OrderStore>(
    path: web::Path<String>,
    api: web::Data<OrdersApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let raw = path.into_inner();
    debug!("💻️ GET order_by_id({raw})");
    let id = raw.parse::<i64>().map_err(|_| ServerError::InvalidRequestPath(format!("'{raw}' is not an order id")))?;
    let order = api.order_by_id(id).await?;
    Ok(HttpResponse::Ok().json(order))
}
