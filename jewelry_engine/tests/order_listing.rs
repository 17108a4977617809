use chrono::Utc;
use jewelry_engine::{
    db_types::{Cents, NewOrder, OrderItem},
    order_objects::OrderListFilter,
    test_utils::{prepare_test_env, random_db_path, seed_product},
    OrderStore,
    OrdersApi,
    SqliteDatabase,
};
use sqlx::{migrate::MigrateDatabase, Sqlite};

async fn setup_with_orders(count: usize) -> SqliteDatabase {
    let url = random_db_path();
    prepare_test_env(&url).await;
    let db = SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating database");
    let ring = seed_product(&db, "Silver ring", 1000, true).await;
    for i in 0..count {
        let order = NewOrder {
            ordered_at: Utc::now(),
            first_name: format!("Customer {i}"),
            last_name: "Doe".into(),
            additional_name: None,
            email: format!("customer{i}@example.com"),
            phone: None,
            country: "IL".into(),
            address: "1 Herzl St".into(),
            postal_code: "61000".into(),
            total_cost: Cents::from(1000),
            currency: "USD".into(),
        };
        db.create_order(order, &[OrderItem::new(ring, 1)], &format!("tx-{i}")).await.unwrap();
    }
    db
}

async fn tear_down(mut db: SqliteDatabase) {
    let _ = db.close().await;
    Sqlite::drop_database(db.url()).await.unwrap();
}

#[tokio::test]
async fn first_page_uses_defaults() {
    let db = setup_with_orders(25).await;
    let api = OrdersApi::new(db.clone());
    let list = api.list_orders(OrderListFilter::default()).await.unwrap();
    assert_eq!(list.total, 25);
    assert_eq!(list.orders.len(), 20);
    assert_eq!((list.offset, list.limit), (0, 20));
    assert_eq!(list.orders[0].id, 1);
    assert!(list.orders.iter().all(|o| o.items.len() == 1 && o.transactions.len() == 1));
    tear_down(db).await;
}

#[tokio::test]
async fn explicit_pages() {
    let db = setup_with_orders(25).await;
    let api = OrdersApi::new(db.clone());
    let list = api.list_orders(OrderListFilter::new(20, 20)).await.unwrap();
    assert_eq!(list.total, 25);
    assert_eq!(list.orders.iter().map(|o| o.id).collect::<Vec<_>>(), vec![21, 22, 23, 24, 25]);
    let list = api.list_orders(OrderListFilter::new(5, 3)).await.unwrap();
    assert_eq!(list.orders.iter().map(|o| o.id).collect::<Vec<_>>(), vec![6, 7, 8]);
    tear_down(db).await;
}

#[tokio::test]
async fn bad_pagination_falls_back_to_defaults() {
    let db = setup_with_orders(25).await;
    let api = OrdersApi::new(db.clone());
    for filter in [
        OrderListFilter::new(-3, 0),
        OrderListFilter::new(0, -10),
        OrderListFilter { offset: Some("abc".into()), limit: Some("".into()) },
    ] {
        let list = api.list_orders(filter).await.unwrap();
        assert_eq!(list.orders.len(), 20);
        assert_eq!(list.orders[0].id, 1);
        assert_eq!(list.total, 25);
    }
    tear_down(db).await;
}

#[tokio::test]
async fn empty_store() {
    let db = setup_with_orders(0).await;
    let api = OrdersApi::new(db.clone());
    let list = api.list_orders(OrderListFilter::default()).await.unwrap();
    assert!(list.orders.is_empty());
    assert_eq!(list.total, 0);
    tear_down(db).await;
}
