use std::sync::Arc;

use actix_web::{
    body::MessageBody,
    http::StatusCode,
    test,
    test::TestRequest,
    web,
    web::ServiceConfig,
    App,
};
use chrono::{Duration, TimeZone, Utc};
use jewelry_common::{Cents, Secret};
use jewelry_engine::{
    db_types::{Order, OrderItem, TransactionHistory, TransactionStatus},
    events::EventProducers,
    OrderFlowApi,
    OrderFlowOptions,
};
use log::debug;

use super::mocks::{MockCatalog, MockGateway, MockStore};
use crate::{
    auth::{issue_access_token, Role},
    config::AuthConfig,
    server::{form_config, json_config},
};

// Only for tests. DO NOT re-use this secret anywhere.
pub fn get_auth_config() -> AuthConfig {
    AuthConfig { jwt_secret: Secret::new("endpoint-tests-only-4f1c9a7e2b".to_string()) }
}

pub fn issue_token(roles: &[Role], lifetime: Duration) -> String {
    issue_access_token("tester", roles, lifetime, &get_auth_config()).expect("Failed to sign token")
}

pub fn admin_token() -> String {
    issue_token(&[Role::Admin], Duration::hours(1))
}

pub fn order_flow_api(
    catalog: MockCatalog,
    store: MockStore,
    gateway: MockGateway,
) -> web::Data<OrderFlowApi<MockCatalog, MockStore>> {
    web::Data::new(OrderFlowApi::new(
        catalog,
        store,
        Arc::new(gateway),
        EventProducers::default(),
        OrderFlowOptions::default(),
    ))
}

/// Sends the request to an app set up by `configure`, with the same body parsers and auth config the server uses.
/// Errors raised by middleware are turned into their responses.
pub async fn send_request<F>(req: TestRequest, configure: F) -> (StatusCode, String)
where F: FnOnce(&mut ServiceConfig) {
    let app = App::new()
        .app_data(web::Data::new(get_auth_config()))
        .app_data(json_config())
        .app_data(form_config())
        .configure(configure);
    let service = test::init_service(app).await;
    debug!("Making request");
    match test::try_call_service(&service, req.to_request()).await {
        Ok(res) => {
            let status = res.status();
            let body = test::read_body(res).await;
            (status, String::from_utf8_lossy(&body).into_owned())
        },
        Err(e) => {
            let res = e.error_response();
            let status = res.status();
            let body = res.into_body().try_into_bytes().unwrap_or_default();
            (status, String::from_utf8_lossy(&body).into_owned())
        },
    }
}

pub fn sample_order(id: i64) -> Order {
    let ordered_at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    let transaction_id = format!("tx-{id}");
    Order {
        id,
        ordered_at,
        first_name: "Jane".into(),
        last_name: "Doe".into(),
        additional_name: None,
        email: "jane@example.com".into(),
        phone: Some("+972501234567".into()),
        country: "Israel".into(),
        address: "1 Herzl St, Tel Aviv".into(),
        postal_code: "6100000".into(),
        total_cost: Cents::from(4000),
        currency: "USD".into(),
        transaction_id: transaction_id.clone(),
        items: vec![OrderItem::new(1, 2), OrderItem::new(2, 1)],
        transactions: vec![TransactionHistory {
            id: id * 10,
            transaction_id,
            status: TransactionStatus::Created,
            card_mask: None,
            created_at: ordered_at,
        }],
    }
}
