use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use jewelry_engine::{db_types::TransactionStatus, traits::OrderStoreError, OrderFlowApi};
use serde_json::Value;

use super::{
    helpers::{order_flow_api, send_request},
    mocks::{MockCatalog, MockGateway, MockStore},
};
use crate::routes::PaymentCallbackRoute;

fn configure(api: web::Data<OrderFlowApi<MockCatalog, MockStore>>) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.app_data(api).service(PaymentCallbackRoute::<MockCatalog, MockStore>::new());
    }
}

fn callback(form: &str) -> TestRequest {
    TestRequest::post()
        .uri("/payment/callback")
        .insert_header(("content-type", "application/x-www-form-urlencoded"))
        .set_payload(form.to_string())
}

const SALE_COMPLETE: &str = "notify_type=sale-complete&transaction_id=tx-1&buyer_card_mask=****1234&\
                             payme_transaction_card_brand=Visa&buyer_name=Jane+Doe&buyer_email=jane%40example.com&\
                             price=4000&currency=USD&status_code=0";

#[actix_web::test]
async fn sale_complete_is_recorded() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store
        .expect_append_transaction_history()
        .withf(|id, mask, status| {
            id == "tx-1" && mask.as_deref() == Some("****1234") && *status == TransactionStatus::Paid
        })
        .times(1)
        .returning(|_, _, _| Ok(()));
    let api = order_flow_api(MockCatalog::new(), store, MockGateway::new());
    let (status, body) = send_request(callback(SALE_COMPLETE), configure(api)).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["result"], "recorded");
    assert_eq!(body["status"], "Paid");
}

#[actix_web::test]
async fn empty_numeric_fields_are_accepted() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store
        .expect_append_transaction_history()
        .withf(|id, _, status| id == "tx-1" && *status == TransactionStatus::Paid)
        .times(1)
        .returning(|_, _, _| Ok(()));
    let api = order_flow_api(MockCatalog::new(), store, MockGateway::new());
    let form = "notify_type=sale-complete&transaction_id=tx-1&status_code=0&status_error_code=&price=4000";
    let (status, body) = send_request(callback(form), configure(api)).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["result"], "recorded");
}

#[actix_web::test]
async fn refund_is_recorded() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store
        .expect_append_transaction_history()
        .withf(|id, mask, status| id == "tx-9" && mask.is_none() && *status == TransactionStatus::PaymentRefunded)
        .times(1)
        .returning(|_, _, _| Ok(()));
    let api = order_flow_api(MockCatalog::new(), store, MockGateway::new());
    let (status, body) = send_request(callback("notify_type=refund&transaction_id=tx-9"), configure(api)).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["status"], "Payment Refunded");
}

#[actix_web::test]
async fn unknown_notify_type_is_acknowledged() {
    let _ = env_logger::try_init().ok();
    let api = order_flow_api(MockCatalog::new(), MockStore::new(), MockGateway::new());
    let (status, body) =
        send_request(callback("notify_type=sale-pending&transaction_id=tx-1"), configure(api)).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["result"], "ignored");
    assert_eq!(body["notify_type"], "sale-pending");
}

#[actix_web::test]
async fn unknown_transaction_is_acknowledged() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store
        .expect_append_transaction_history()
        .times(1)
        .returning(|id, _, _| Err(OrderStoreError::TransactionNotFound(id.to_string())));
    let api = order_flow_api(MockCatalog::new(), store, MockGateway::new());
    let (status, body) = send_request(callback("notify_type=sale-failure&transaction_id=nope"), configure(api)).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["result"], "unknown_transaction");
    assert_eq!(body["transaction_id"], "nope");
}

#[actix_web::test]
async fn storage_failure_asks_for_a_retry() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store
        .expect_append_transaction_history()
        .times(1)
        .returning(|_, _, _| Err(OrderStoreError::DatabaseError("database is locked".into())));
    let api = order_flow_api(MockCatalog::new(), store, MockGateway::new());
    let (status, body) = send_request(callback(SALE_COMPLETE), configure(api)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("database is locked"), "{body}");
}

#[actix_web::test]
async fn ambiguous_form_is_rejected() {
    let _ = env_logger::try_init().ok();
    let api = order_flow_api(MockCatalog::new(), MockStore::new(), MockGateway::new());
    let form = "notify_type=sale-complete&notify_type=refund&transaction_id=tx-1";
    let (status, body) = send_request(callback(form), configure(api)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"invalid input body"}"#);
}
