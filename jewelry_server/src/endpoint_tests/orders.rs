use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use jewelry_engine::{
    db_types::{Cents, PricedProduct},
    traits::PaymentProviderError,
    OrderFlowApi,
};
use serde_json::{json, Value};

use super::{
    helpers::{order_flow_api, send_request},
    mocks::{MockCatalog, MockGateway, MockStore},
};
use crate::routes::CreateOrderRoute;

fn configure(api: web::Data<OrderFlowApi<MockCatalog, MockStore>>) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.app_data(api).service(CreateOrderRoute::<MockCatalog, MockStore>::new());
    }
}

fn product(id: i64, price: i64) -> PricedProduct {
    PricedProduct { id, title: format!("Product {id}"), price: Cents::from(price), in_stock: true, images: vec![] }
}

fn order_body(items: Value) -> Value {
    json!({
        "items": items,
        "first_name": "Jane",
        "last_name": "Doe",
        "email": "jane@example.com",
        "phone": "+972501234567",
        "country": "Israel",
        "address": "1 Herzl St, Tel Aviv",
        "postal_code": "6100000"
    })
}

fn post_order(body: Value) -> TestRequest {
    TestRequest::post().uri("/order").set_json(body)
}

#[actix_web::test]
async fn place_order() {
    let _ = env_logger::try_init().ok();
    let mut catalog = MockCatalog::new();
    catalog
        .expect_fetch_priced_products()
        .withf(|ids| ids == [1, 2])
        .times(1)
        .returning(|_| Ok(vec![product(1, 1000), product(2, 2000)]));
    let mut store = MockStore::new();
    store
        .expect_create_order()
        .withf(|order, items, _| order.total_cost == Cents::from(4000) && items.len() == 2)
        .times(1)
        .returning(|_, _, _| Ok(7));
    let mut gateway = MockGateway::new();
    gateway
        .expect_generate_sale()
        .withf(|sale| sale.price == Cents::from(4000) && sale.product_name == "Order #7")
        .times(1)
        .returning(|_| Ok("https://pay.example.com/sale/abc".to_string()));
    let api = order_flow_api(catalog, store, gateway);

    let body = order_body(json!([{"product_id": 1, "quantity": 2}, {"product_id": 2, "quantity": 1}]));
    let (status, body) = send_request(post_order(body), configure(api)).await;
    assert_eq!(status, StatusCode::OK);
    let response: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(
        response["url"],
        "https://pay.example.com/sale/abc?first_name=Jane&last_name=Doe&email=jane%40example.com&zip_code=6100000&\
         phone=%2B972501234567"
    );
}

#[actix_web::test]
async fn order_without_items_is_rejected() {
    let _ = env_logger::try_init().ok();
    let api = order_flow_api(MockCatalog::new(), MockStore::new(), MockGateway::new());
    let (status, body) = send_request(post_order(order_body(json!([]))), configure(api)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"order should have at least 1 item"}"#);
}

#[actix_web::test]
async fn order_with_invalid_quantity_is_rejected() {
    let _ = env_logger::try_init().ok();
    let api = order_flow_api(MockCatalog::new(), MockStore::new(), MockGateway::new());
    let body = order_body(json!([{"product_id": 1, "quantity": 0}]));
    let (status, body) = send_request(post_order(body), configure(api)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"order item is invalid"}"#);
}

#[actix_web::test]
async fn malformed_json_is_rejected() {
    let _ = env_logger::try_init().ok();
    let api = order_flow_api(MockCatalog::new(), MockStore::new(), MockGateway::new());
    let req = TestRequest::post()
        .uri("/order")
        .insert_header(("content-type", "application/json"))
        .set_payload(r#"{"items": [{"product_id": 1, "quantity": "#);
    let (status, body) = send_request(req, configure(api)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"invalid input body"}"#);
}

#[actix_web::test]
async fn unavailable_products() {
    let _ = env_logger::try_init().ok();
    let mut catalog = MockCatalog::new();
    catalog.expect_fetch_priced_products().times(1).returning(|_| Ok(vec![]));
    let api = order_flow_api(catalog, MockStore::new(), MockGateway::new());
    let body = order_body(json!([{"product_id": 5, "quantity": 1}]));
    let (status, body) = send_request(post_order(body), configure(api)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.starts_with(r#"{"error":"#), "{body}");
}

#[actix_web::test]
async fn payment_provider_failure_keeps_order() {
    let _ = env_logger::try_init().ok();
    let mut catalog = MockCatalog::new();
    catalog.expect_fetch_priced_products().returning(|_| Ok(vec![product(1, 1000)]));
    let mut store = MockStore::new();
    store.expect_create_order().times(1).returning(|_, _, _| Ok(3));
    let mut gateway = MockGateway::new();
    gateway
        .expect_generate_sale()
        .times(1)
        .returning(|_| Err(PaymentProviderError::Unavailable("connection refused".into())));
    let api = order_flow_api(catalog, store, gateway);
    let body = order_body(json!([{"product_id": 1, "quantity": 1}]));
    let (status, body) = send_request(post_order(body), configure(api)).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body.contains("connection refused"), "{body}");
}
