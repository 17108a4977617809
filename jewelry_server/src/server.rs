use std::{sync::Arc, time::Duration};

use actix_web::{
    dev::Server,
    error::{JsonPayloadError, UrlencodedError},
    http::KeepAlive,
    middleware::Logger,
    web,
    App,
    Error,
    HttpRequest,
    HttpServer,
};
use jewelry_engine::{
    events::{EventHandlers, EventProducers},
    traits::{NotificationSender, PaymentProvider},
    Notifier,
    OrderFlowApi,
    OrdersApi,
    SqliteDatabase,
};
use log::*;

use crate::{
    config::{EmailConfig, ServerConfig},
    errors::ServerError,
    integrations::{
        email::create_email_event_hooks,
        mailer::{HttpMailer, LogMailer},
        payme::PaymeGateway,
    },
    routes::{health, CreateOrderRoute, OrderByIdRoute, OrdersRoute, PaymentCallbackRoute},
};

const MAX_DB_CONNECTIONS: u32 = 25;
/// How long to wait for queued e-mails to go out once the server has stopped
const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(30);
const INVALID_BODY_MESSAGE: &str = "invalid input body";

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, MAX_DB_CONNECTIONS)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.run_migrations().await.map_err(|e| ServerError::InitializeError(format!("Migrations failed. {e}")))?;
    let gateway = PaymeGateway::new(config.payme.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let notifier = create_notifier(&config.email)?;
    let hooks = create_email_event_hooks(notifier, db.clone());
    let handlers = EventHandlers::new(config.shop.event_buffer_size, hooks);
    let producers = handlers.producers();
    let workers = handlers.start_handlers();
    info!("📬️ Started {} event worker(s)", workers.len());

    let srv = create_server_instance(config, db, Arc::new(gateway), producers)?;
    let result = srv.await.map_err(|e| ServerError::Unspecified(e.to_string()));

    // The producers lived in the app instances, so the queues close now and the workers drain what is left.
    let drain = futures::future::join_all(workers);
    match tokio::time::timeout(SHUTDOWN_GRACE_PERIOD, drain).await {
        Ok(summaries) => summaries.into_iter().for_each(|s| match s {
            Ok(summary) => info!("📬️ Event worker stopped. {} handled, {} panicked", summary.handled, summary.panicked),
            Err(e) => error!("📬️ Event worker failed. {e}"),
        }),
        Err(_) => warn!(
            "📬️ Event workers did not finish within {}s. Some e-mails may not have been sent.",
            SHUTDOWN_GRACE_PERIOD.as_secs()
        ),
    }
    result
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    gateway: Arc<dyn PaymentProvider>,
    producers: EventProducers,
) -> Result<Server, ServerError> {
    let srv = HttpServer::new(move || {
        let order_flow_api = OrderFlowApi::new(
            db.clone(),
            db.clone(),
            Arc::clone(&gateway),
            producers.clone(),
            config.shop.order_flow_options(),
        );
        let orders_api = OrdersApi::new(db.clone());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("jsb::access_log"))
            .app_data(web::Data::new(order_flow_api))
            .app_data(web::Data::new(orders_api))
            .app_data(web::Data::new(config.auth.clone()))
            .app_data(json_config())
            .app_data(form_config())
            .service(health)
            .service(CreateOrderRoute::<SqliteDatabase, SqliteDatabase>::new())
            .service(PaymentCallbackRoute::<SqliteDatabase, SqliteDatabase>::new())
            .service(OrdersRoute::<SqliteDatabase>::new())
            .service(OrderByIdRoute::<SqliteDatabase>::new())
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

fn create_notifier(config: &EmailConfig) -> Result<Notifier, ServerError> {
    let sender: Arc<dyn NotificationSender> = match &config.mailer_url {
        Some(url) => {
            let mailer = HttpMailer::new(url, &config.mailer_api_key)
                .map_err(|e| ServerError::InitializeError(e.to_string()))?;
            info!("📧 E-mails will be sent via {url}");
            Arc::new(mailer)
        },
        None => Arc::new(LogMailer),
    };
    Ok(Notifier::new(sender, config.settings.clone(), config.templates()))
}

/// Malformed JSON bodies get a 400 with a generic message instead of the parser's error.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, req: &HttpRequest| -> Error {
        debug!("💻️ Rejected JSON body for {}. {err}", req.path());
        ServerError::InvalidRequestBody(INVALID_BODY_MESSAGE.to_string()).into()
    })
}

pub fn form_config() -> web::FormConfig {
    web::FormConfig::default().error_handler(|err: UrlencodedError, req: &HttpRequest| -> Error {
        debug!("💻️ Rejected form body for {}. {err}", req.path());
        ServerError::InvalidRequestBody(INVALID_BODY_MESSAGE.to_string()).into()
    })
}
