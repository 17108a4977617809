//! Server configuration
//!
//! Everything is read from environment variables (a `.env` file is loaded first, if present). Missing or invalid
//! values are logged and replaced with defaults, so the server always starts. Check the logs on start-up.
use std::{env, fs, path::PathBuf, time::Duration};

use jewelry_common::{helpers::parse_seconds, Secret, DEFAULT_CURRENCY_CODE};
use jewelry_engine::{
    notifications::{EmailSettings, EmailTemplate, EmailTemplates},
    OrderFlowOptions,
    UnpricedItemPolicy,
};
use log::*;
use payme_tools::PaymeConfig;
use rand::{distributions::Alphanumeric, Rng};

use crate::errors::ServerError;

const DEFAULT_JSB_HOST: &str = "127.0.0.1";
const DEFAULT_JSB_PORT: u16 = 8480;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/jewelry_shop.db";
const DEFAULT_GATEWAY_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_EVENT_BUFFER_SIZE: usize = 25;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub auth: AuthConfig,
    pub shop: ShopConfig,
    pub payme: PaymeConfig,
    pub email: EmailConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_JSB_HOST.to_string(),
            port: DEFAULT_JSB_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            auth: AuthConfig::default(),
            shop: ShopConfig::default(),
            payme: PaymeConfig::default(),
            email: EmailConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_env_or_default() -> Self {
        let host = env::var("JSB_HOST").ok().unwrap_or_else(|| DEFAULT_JSB_HOST.into());
        let port = env::var("JSB_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for JSB_PORT. {e} Using the default, {DEFAULT_JSB_PORT}, instead."
                    );
                    DEFAULT_JSB_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_JSB_PORT);
        let database_url = env::var("JSB_DATABASE_URL").ok().unwrap_or_else(|| {
            warn!("🪛️ JSB_DATABASE_URL is not set. Using {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.to_string()
        });
        let auth = AuthConfig::try_from_env().unwrap_or_else(|e| {
            warn!(
                "🪛️ Could not load the authentication configuration from environment variables. {e}. Reverting to the \
                 default configuration."
            );
            AuthConfig::default()
        });
        let shop = ShopConfig::from_env_or_default();
        let mut payme = PaymeConfig::new_from_env_or_default();
        payme.timeout = shop.gateway_timeout;
        let email = EmailConfig::from_env_or_default();
        Self { host, port, database_url, auth, shop, payme, email }
    }
}

//-------------------------------------------------  AuthConfig  -------------------------------------------------------
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// The shared secret used to verify (HS256) access tokens for the admin routes.
    pub jwt_secret: Secret<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        warn!(
            "🚨️🚨️🚨️ The JWT secret has not been set. I'm using a random value for this session. No existing access \
             token will be accepted. DO NOT operate on production like this. 🚨️🚨️🚨️"
        );
        let secret = rand::thread_rng().sample_iter(&Alphanumeric).take(48).map(char::from).collect::<String>();
        Self { jwt_secret: Secret::new(secret) }
    }
}

impl AuthConfig {
    pub fn try_from_env() -> Result<Self, ServerError> {
        let secret =
            env::var("JSB_JWT_SECRET").map_err(|e| ServerError::ConfigurationError(format!("{e} [JSB_JWT_SECRET]")))?;
        if secret.trim().is_empty() {
            return Err(ServerError::ConfigurationError("JSB_JWT_SECRET is empty".to_string()));
        }
        Ok(Self { jwt_secret: Secret::new(secret) })
    }
}

//-------------------------------------------------  ShopConfig  -------------------------------------------------------
/// Settings for the order workflow.
#[derive(Clone, Debug)]
pub struct ShopConfig {
    pub currency: String,
    pub unpriced_items: UnpricedItemPolicy,
    pub gateway_timeout: Duration,
    /// The capacity of each background event queue
    pub event_buffer_size: usize,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            currency: DEFAULT_CURRENCY_CODE.to_string(),
            unpriced_items: UnpricedItemPolicy::default(),
            gateway_timeout: DEFAULT_GATEWAY_TIMEOUT,
            event_buffer_size: DEFAULT_EVENT_BUFFER_SIZE,
        }
    }
}

impl ShopConfig {
    pub fn from_env_or_default() -> Self {
        let defaults = Self::default();
        let currency = env::var("JSB_CURRENCY")
            .ok()
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| {
                info!("🪛️ JSB_CURRENCY is not set. Using {DEFAULT_CURRENCY_CODE}.");
                defaults.currency.clone()
            });
        let unpriced_items = match env::var("JSB_UNPRICED_ITEMS") {
            Ok(s) => s.parse().unwrap_or_else(|e| {
                warn!("🪛️ {e}. Set JSB_UNPRICED_ITEMS to 'exclude' or 'reject'. Using 'exclude'.");
                UnpricedItemPolicy::Exclude
            }),
            Err(_) => defaults.unpriced_items,
        };
        let gateway_timeout = match env::var("JSB_GATEWAY_TIMEOUT") {
            Ok(s) => parse_seconds(&s).unwrap_or_else(|| {
                warn!("🪛️ Invalid configuration value for JSB_GATEWAY_TIMEOUT: {s}. Using the default.");
                defaults.gateway_timeout
            }),
            Err(_) => defaults.gateway_timeout,
        };
        let event_buffer_size = env::var("JSB_EVENT_BUFFER_SIZE")
            .ok()
            .and_then(|s| {
                s.parse::<usize>()
                    .ok()
                    .filter(|n| *n > 0)
                    .or_else(|| {
                        warn!("🪛️ Invalid configuration value for JSB_EVENT_BUFFER_SIZE: {s}. Using the default.");
                        None
                    })
            })
            .unwrap_or(defaults.event_buffer_size);
        info!(
            "🪛️ Orders are in {currency}. Unpriced items: {unpriced_items:?}. Gateway timeout: {}s",
            gateway_timeout.as_secs()
        );
        Self { currency, unpriced_items, gateway_timeout, event_buffer_size }
    }

    pub fn order_flow_options(&self) -> OrderFlowOptions {
        OrderFlowOptions {
            currency: self.currency.clone(),
            unpriced_items: self.unpriced_items,
            gateway_timeout: self.gateway_timeout,
        }
    }
}

//-------------------------------------------------  EmailConfig  ------------------------------------------------------
const ORDER_INFO_SUPPORT_SUBJECT: &str = "New order #{{order_id}}";
const ORDER_INFO_CUSTOMER_SUBJECT: &str = "Thank you for your order #{{order_id}}";
const PAYMENT_INFO_SUPPORT_SUBJECT: &str = "Payment for order #{{order_id}}: {{status}}";
const PAYMENT_INFO_CUSTOMER_SUBJECT: &str = "We have received your payment for order #{{order_id}}";

const ORDER_INFO_SUPPORT_TEMPLATE: &str = include_str!("../templates/order_info_support.html");
const ORDER_INFO_CUSTOMER_TEMPLATE: &str = include_str!("../templates/order_info_customer.html");
const PAYMENT_INFO_SUPPORT_TEMPLATE: &str = include_str!("../templates/payment_info_support.html");
const PAYMENT_INFO_CUSTOMER_TEMPLATE: &str = include_str!("../templates/payment_info_customer.html");

#[derive(Clone, Debug, Default)]
pub struct EmailConfig {
    pub settings: EmailSettings,
    /// The HTTP endpoint of the mail delivery service. When it is not set, e-mails are only logged.
    pub mailer_url: Option<String>,
    pub mailer_api_key: Secret<String>,
    /// A directory with `order_info_support.html` etc. that override the built-in templates.
    pub template_dir: Option<PathBuf>,
}

impl EmailConfig {
    pub fn from_env_or_default() -> Self {
        let var = |name: &str, default: &str| {
            env::var(name).ok().filter(|s| !s.trim().is_empty()).unwrap_or_else(|| {
                warn!("🪛️ {name} is not set. Using '{default}'.");
                default.to_string()
            })
        };
        let settings = EmailSettings {
            support_name: var("JSB_SUPPORT_NAME", "Support"),
            support_email: var("JSB_SUPPORT_EMAIL", "support@localhost.localdomain"),
            sender_name: var("JSB_SENDER_NAME", "Jewelry Shop"),
            sender_email: var("JSB_SENDER_EMAIL", "noreply@localhost.localdomain"),
        };
        let mailer_url = env::var("JSB_MAILER_URL").ok().filter(|s| !s.trim().is_empty());
        if mailer_url.is_none() {
            warn!("🪛️ JSB_MAILER_URL is not set. E-mails will be written to the log instead of being sent.");
        }
        let mailer_api_key = Secret::new(env::var("JSB_MAILER_API_KEY").unwrap_or_default());
        let template_dir = env::var("JSB_EMAIL_TEMPLATE_DIR").ok().map(PathBuf::from);
        Self { settings, mailer_url, mailer_api_key, template_dir }
    }

    /// The e-mail templates. Files in the template directory take precedence over the built-in templates.
    pub fn templates(&self) -> EmailTemplates {
        EmailTemplates {
            order_info_support: self.template(
                "order_info_support.html",
                ORDER_INFO_SUPPORT_SUBJECT,
                ORDER_INFO_SUPPORT_TEMPLATE,
            ),
            order_info_customer: self.template(
                "order_info_customer.html",
                ORDER_INFO_CUSTOMER_SUBJECT,
                ORDER_INFO_CUSTOMER_TEMPLATE,
            ),
            payment_info_support: self.template(
                "payment_info_support.html",
                PAYMENT_INFO_SUPPORT_SUBJECT,
                PAYMENT_INFO_SUPPORT_TEMPLATE,
            ),
            payment_info_customer: self.template(
                "payment_info_customer.html",
                PAYMENT_INFO_CUSTOMER_SUBJECT,
                PAYMENT_INFO_CUSTOMER_TEMPLATE,
            ),
        }
    }

    fn template(&self, file_name: &str, subject: &str, built_in: &str) -> EmailTemplate {
        let body = self.template_dir.as_ref().and_then(|dir| {
            let path = dir.join(file_name);
            fs::read_to_string(&path)
                .map_err(|e| warn!("🪛️ Could not read {}. {e}. Using the built-in template.", path.display()))
                .ok()
        });
        EmailTemplate::new(subject, body.unwrap_or_else(|| built_in.to_string()))
    }
}
