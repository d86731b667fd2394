use async_trait::async_trait;

use super::domain::Product;
use crate::errors::ServiceError;

/// Durable keyed storage for products.
///
/// `replace` is optimistic: it fails with `ServiceError::Concurrency` when the
/// row changed between the store's read and its write, and with
/// `ServiceError::NotFound` when the row is gone.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Product>, ServiceError>;
    async fn get(&self, id: i32) -> Result<Option<Product>, ServiceError>;
    async fn exists(&self, id: i32) -> Result<bool, ServiceError>;
    async fn insert(&self, product: Product) -> Result<Product, ServiceError>;
    async fn replace(&self, id: i32, product: Product) -> Result<(), ServiceError>;
    /// Callers check existence first; a vanished row still reports `NotFound`.
    async fn remove(&self, id: i32) -> Result<(), ServiceError>;
}

/// In-memory repository for tests and database-less runs.
pub mod memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Mutex, MutexGuard};

    #[derive(Debug, Clone)]
    struct Row {
        product: Product,
        version: i32,
    }

    #[derive(Default)]
    pub struct MemoryProductRepository {
        rows: Mutex<HashMap<i32, Row>>, // key: product id
    }

    impl MemoryProductRepository {
        pub fn new() -> Self { Self::default() }

        /// Seed rows as-is, bypassing validation and id generation.
        pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
            let rows = products
                .into_iter()
                .map(|p| (p.id, Row { product: p, version: 0 }))
                .collect();
            Self { rows: Mutex::new(rows) }
        }

        fn rows(&self) -> MutexGuard<'_, HashMap<i32, Row>> {
            self.rows.lock().unwrap_or_else(|e| e.into_inner())
        }

        pub fn version_of(&self, id: i32) -> Option<i32> {
            self.rows().get(&id).map(|r| r.version)
        }

        /// Write `product` only if the stored row is still at `expected_version`.
        pub fn replace_at_version(&self, id: i32, expected_version: i32, product: Product) -> Result<(), ServiceError> {
            let mut rows = self.rows();
            let Some(row) = rows.get_mut(&id) else { return Err(ServiceError::NotFound(id)); };
            if row.version != expected_version {
                return Err(ServiceError::Concurrency(format!(
                    "product {id} was modified concurrently (expected version {expected_version}, found {})",
                    row.version
                )));
            }
            row.product = Product { id, ..product };
            row.version += 1;
            Ok(())
        }
    }

    #[async_trait]
    impl ProductRepository for MemoryProductRepository {
        async fn list(&self) -> Result<Vec<Product>, ServiceError> {
            Ok(self.rows().values().map(|r| r.product.clone()).collect())
        }

        async fn get(&self, id: i32) -> Result<Option<Product>, ServiceError> {
            Ok(self.rows().get(&id).map(|r| r.product.clone()))
        }

        async fn exists(&self, id: i32) -> Result<bool, ServiceError> {
            Ok(self.rows().contains_key(&id))
        }

        async fn insert(&self, product: Product) -> Result<Product, ServiceError> {
            let mut rows = self.rows();
            if rows.contains_key(&product.id) {
                return Err(ServiceError::Db(format!("duplicate key: product {}", product.id)));
            }
            rows.insert(product.id, Row { product: product.clone(), version: 0 });
            Ok(product)
        }

        async fn replace(&self, id: i32, product: Product) -> Result<(), ServiceError> {
            let version = self.version_of(id).ok_or(ServiceError::NotFound(id))?;
            self.replace_at_version(id, version, product)
        }

        async fn remove(&self, id: i32) -> Result<(), ServiceError> {
            match self.rows().remove(&id) {
                Some(_) => Ok(()),
                None => Err(ServiceError::NotFound(id)),
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn product(id: i32, stock: i32) -> Product {
            Product { id, name: "Widget".into(), description: None, price: "2.50".parse().unwrap(), stock_available: stock }
        }

        #[tokio::test]
        async fn stale_version_is_a_concurrency_fault() {
            let repo = MemoryProductRepository::with_products([product(100001, 5)]);
            let read_version = repo.version_of(100001).unwrap();

            // another writer gets in first
            repo.replace(100001, product(100001, 7)).await.unwrap();

            let err = repo.replace_at_version(100001, read_version, product(100001, 9)).unwrap_err();
            assert!(matches!(err, ServiceError::Concurrency(_)));
            assert_eq!(repo.get(100001).await.unwrap().unwrap().stock_available, 7);
        }

        #[tokio::test]
        async fn duplicate_insert_is_a_storage_fault() {
            let repo = MemoryProductRepository::new();
            repo.insert(product(100001, 1)).await.unwrap();
            let err = repo.insert(product(100001, 2)).await.unwrap_err();
            assert!(matches!(err, ServiceError::Db(_)));
        }

        #[tokio::test]
        async fn replace_and_remove_missing_rows() {
            let repo = MemoryProductRepository::new();
            assert!(matches!(repo.replace(5, product(5, 1)).await, Err(ServiceError::NotFound(5))));
            assert!(matches!(repo.remove(5).await, Err(ServiceError::NotFound(5))));
        }
    }
}
