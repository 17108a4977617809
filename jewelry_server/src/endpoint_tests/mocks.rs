use async_trait::async_trait;
use jewelry_engine::{
    db_types::{NewOrder, Order, OrderItem, PricedProduct, TransactionStatus},
    traits::{CatalogError, CatalogReader, NewSale, OrderStore, OrderStoreError, PaymentProvider, PaymentProviderError},
};
use mockall::mock;

mock! {
    pub Catalog {}
    impl CatalogReader for Catalog {
        async fn fetch_priced_products(&self, product_ids: &[i64]) -> Result<Vec<PricedProduct>, CatalogError>;
    }
}

mock! {
    pub Store {}
    impl OrderStore for Store {
        async fn create_order(&self, order: NewOrder, items: &[OrderItem], transaction_id: &str) -> Result<i64, OrderStoreError>;
        async fn append_transaction_history(&self, transaction_id: &str, card_mask: Option<String>, status: TransactionStatus) -> Result<(), OrderStoreError>;
        async fn fetch_order_id_for_transaction(&self, transaction_id: &str) -> Result<Option<i64>, OrderStoreError>;
        async fn fetch_orders(&self, offset: i64, limit: i64) -> Result<(Vec<Order>, i64), OrderStoreError>;
        async fn fetch_order(&self, id: i64) -> Result<Option<Order>, OrderStoreError>;
    }
}

mock! {
    pub Gateway {}
    #[async_trait]
    impl PaymentProvider for Gateway {
        async fn generate_sale(&self, sale: NewSale) -> Result<String, PaymentProviderError>;
    }
}
