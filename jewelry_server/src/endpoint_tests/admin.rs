use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use chrono::Duration;
use jewelry_engine::OrdersApi;
use serde_json::Value;

use super::{
    helpers::{admin_token, issue_token, sample_order, send_request},
    mocks::MockStore,
};
use crate::{
    auth::Role,
    routes::{OrderByIdRoute, OrdersRoute},
};

fn configure(store: MockStore) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(OrdersApi::new(store)))
            .service(OrdersRoute::<MockStore>::new())
            .service(OrderByIdRoute::<MockStore>::new());
    }
}

fn get(path: &str, token: Option<&str>) -> TestRequest {
    let req = TestRequest::get().uri(path);
    match token {
        Some(token) => req.insert_header(("Authorization", format!("Bearer {token}"))),
        None => req,
    }
}

#[actix_web::test]
async fn orders_without_token() {
    let _ = env_logger::try_init().ok();
    let (status, body) = send_request(get("/orders", None), configure(MockStore::new())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, r#"{"error":"Authentication Error. No access token was provided."}"#);
}

#[actix_web::test]
async fn orders_with_tampered_token() {
    let _ = env_logger::try_init().ok();
    let mut token = admin_token();
    token.replace_range(token.len() - 10..token.len() - 5, "AAAAA");
    let (status, body) = send_request(get("/orders", Some(&token)), configure(MockStore::new())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains("The access token is not valid"), "{body}");
}

#[actix_web::test]
async fn orders_with_expired_token() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(&[Role::Admin], Duration::hours(-2));
    let (status, _) = send_request(get("/orders", Some(&token)), configure(MockStore::new())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn orders_for_non_admin() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(&[], Duration::hours(1));
    let (status, body) = send_request(get("/orders", Some(&token)), configure(MockStore::new())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body.contains("Insufficient Permissions"), "{body}");
}

#[actix_web::test]
async fn list_orders_with_default_paging() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store
        .expect_fetch_orders()
        .withf(|offset, limit| *offset == 0 && *limit == 20)
        .times(1)
        .returning(|_, _| Ok((vec![sample_order(1), sample_order(2)], 25)));
    let (status, body) = send_request(get("/orders", Some(&admin_token())), configure(store)).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["total"], 25);
    assert_eq!(body["offset"], 0);
    assert_eq!(body["limit"], 20);
    assert_eq!(body["orders"].as_array().unwrap().len(), 2);
    assert_eq!(body["orders"][0]["transactions"][0]["status"], "Created");
    assert_eq!(body["orders"][1]["items"][0]["product_id"], 1);
}

#[actix_web::test]
async fn list_orders_with_explicit_paging() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store
        .expect_fetch_orders()
        .withf(|offset, limit| *offset == 40 && *limit == 5)
        .times(1)
        .returning(|_, _| Ok((vec![], 41)));
    let (status, body) = send_request(get("/orders?offset=40&limit=5", Some(&admin_token())), configure(store)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"orders":[],"total":41,"offset":40,"limit":5}"#);
}

#[actix_web::test]
async fn garbage_paging_falls_back_to_defaults() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store
        .expect_fetch_orders()
        .withf(|offset, limit| *offset == 0 && *limit == 20)
        .times(1)
        .returning(|_, _| Ok((vec![], 0)));
    let path = "/orders?offset=-3&limit=lots";
    let (status, body) = send_request(get(path, Some(&admin_token())), configure(store)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"orders":[],"total":0,"offset":0,"limit":20}"#);
}

#[actix_web::test]
async fn fetch_order_by_id() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store.expect_fetch_order().withf(|id| *id == 7).times(1).returning(|id| Ok(Some(sample_order(id))));
    let (status, body) = send_request(get("/orders/7", Some(&admin_token())), configure(store)).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["id"], 7);
    assert_eq!(body["total_cost"], 4000);
    assert_eq!(body["transaction_id"], "tx-7");
}

#[actix_web::test]
async fn missing_order() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store.expect_fetch_order().times(1).returning(|_| Ok(None));
    let (status, body) = send_request(get("/orders/42", Some(&admin_token())), configure(store)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("42"), "{body}");
}

#[actix_web::test]
async fn order_id_must_be_a_number() {
    let _ = env_logger::try_init().ok();
    let (status, _) = send_request(get("/orders/abc", Some(&admin_token())), configure(MockStore::new())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
