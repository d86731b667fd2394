use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use tracing::debug;

use models::product::{self, Entity as ProductEntity};

use crate::errors::ServiceError;
use crate::product::domain::Product;
use crate::product::repository::ProductRepository;

pub struct SeaOrmProductRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmProductRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }

    /// Conditional full-record update: only rows still at `expected_version` are written.
    /// Returns the number of rows affected (0 or 1).
    pub async fn update_if_version(&self, id: i32, expected_version: i32, p: &Product) -> Result<u64, ServiceError> {
        let res = ProductEntity::update_many()
            .col_expr(product::Column::Name, Expr::value(p.name.clone()))
            .col_expr(product::Column::Description, Expr::value(p.description.clone()))
            .col_expr(product::Column::Price, Expr::value(p.price))
            .col_expr(product::Column::StockAvailable, Expr::value(p.stock_available))
            .col_expr(product::Column::Version, Expr::col(product::Column::Version).add(1))
            .filter(product::Column::Id.eq(id))
            .filter(product::Column::Version.eq(expected_version))
            .exec(&self.db)
            .await
            .map_err(ServiceError::db)?;
        Ok(res.rows_affected)
    }

    /// Write `p` if the row is still at `read_version`. When nothing was written the row
    /// is either gone (`NotFound`) or was bumped by another writer (`Concurrency`).
    pub async fn replace_at_version(&self, id: i32, read_version: i32, p: &Product) -> Result<(), ServiceError> {
        if self.update_if_version(id, read_version, p).await? == 1 {
            return Ok(());
        }
        if self.find_model(id).await?.is_none() {
            return Err(ServiceError::NotFound(id));
        }
        debug!(product_id = id, read_version, "optimistic update lost the race");
        Err(ServiceError::Concurrency(format!("product {id} was modified by another request")))
    }

    async fn find_model(&self, id: i32) -> Result<Option<product::Model>, ServiceError> {
        ProductEntity::find_by_id(id).one(&self.db).await.map_err(ServiceError::db)
    }
}

#[async_trait::async_trait]
impl ProductRepository for SeaOrmProductRepository {
    async fn list(&self) -> Result<Vec<Product>, ServiceError> {
        let rows = ProductEntity::find().all(&self.db).await.map_err(ServiceError::db)?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn get(&self, id: i32) -> Result<Option<Product>, ServiceError> {
        Ok(self.find_model(id).await?.map(Product::from))
    }

    async fn exists(&self, id: i32) -> Result<bool, ServiceError> {
        Ok(self.find_model(id).await?.is_some())
    }

    async fn insert(&self, p: Product) -> Result<Product, ServiceError> {
        let am = product::ActiveModel {
            id: Set(p.id),
            name: Set(p.name),
            description: Set(p.description),
            price: Set(p.price),
            stock_available: Set(p.stock_available),
            version: Set(0),
        };
        let created = am.insert(&self.db).await.map_err(ServiceError::db)?;
        Ok(created.into())
    }

    async fn replace(&self, id: i32, p: Product) -> Result<(), ServiceError> {
        let current = self.find_model(id).await?.ok_or(ServiceError::NotFound(id))?;
        self.replace_at_version(id, current.version, &p).await
    }

    async fn remove(&self, id: i32) -> Result<(), ServiceError> {
        let res = ProductEntity::delete_by_id(id).exec(&self.db).await.map_err(ServiceError::db)?;
        if res.rows_affected == 0 {
            return Err(ServiceError::NotFound(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    fn product(id: i32, name: &str, stock: i32) -> Product {
        Product { id, name: name.into(), description: Some("oak".into()), price: "12.5".parse().unwrap(), stock_available: stock }
    }

    #[tokio::test]
    async fn product_crud_repository() -> Result<(), anyhow::Error> {
        let repo = SeaOrmProductRepository::new(get_db().await?);

        let created = repo.insert(product(100001, "Table", 4)).await?;
        assert_eq!(created.id, 100001);
        assert!(repo.exists(100001).await?);
        assert!(!repo.exists(100002).await?);

        let found = repo.get(100001).await?.unwrap();
        assert_eq!(found, created);

        repo.replace(100001, product(100001, "Big Table", 9)).await?;
        let after = repo.get(100001).await?.unwrap();
        assert_eq!(after.name, "Big Table");
        assert_eq!(after.stock_available, 9);

        assert_eq!(repo.list().await?.len(), 1);

        repo.remove(100001).await?;
        assert!(repo.get(100001).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn stale_version_update_is_rejected() -> Result<(), anyhow::Error> {
        let repo = SeaOrmProductRepository::new(get_db().await?);
        repo.insert(product(200002, "Shelf", 3)).await?;

        // a concurrent writer bumps the version first
        repo.replace(200002, product(200002, "Shelf", 8)).await?;
        let written = repo.update_if_version(200002, 0, &product(200002, "Shelf", 1)).await?;
        assert_eq!(written, 0);
        assert_eq!(repo.get(200002).await?.unwrap().stock_available, 8);
        Ok(())
    }

    #[tokio::test]
    async fn lost_race_is_classified() -> Result<(), anyhow::Error> {
        let repo = SeaOrmProductRepository::new(get_db().await?);
        repo.insert(product(500005, "Stool", 2)).await?;

        // read at version 0, another writer bumps to 1
        repo.replace(500005, product(500005, "Stool", 6)).await?;
        let stale = repo.replace_at_version(500005, 0, &product(500005, "Stool", 1)).await;
        assert!(matches!(stale, Err(ServiceError::Concurrency(_))));
        assert_eq!(repo.get(500005).await?.unwrap().stock_available, 6);

        // read at version 1, another writer deletes the row
        repo.remove(500005).await?;
        let gone = repo.replace_at_version(500005, 1, &product(500005, "Stool", 1)).await;
        assert!(matches!(gone, Err(ServiceError::NotFound(500005))));
        Ok(())
    }

    #[tokio::test]
    async fn two_decimal_prices_round_trip() -> Result<(), anyhow::Error> {
        let repo = SeaOrmProductRepository::new(get_db().await?);
        let mut p = product(600006, "Mug", 3);
        p.price = "19.99".parse()?;
        repo.insert(p.clone()).await?;
        assert_eq!(repo.get(600006).await?.unwrap().price, p.price);
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_insert_and_missing_rows() -> Result<(), anyhow::Error> {
        let repo = SeaOrmProductRepository::new(get_db().await?);
        repo.insert(product(300003, "Lamp", 1)).await?;
        assert!(matches!(repo.insert(product(300003, "Lamp", 1)).await, Err(ServiceError::Db(_))));
        assert!(matches!(repo.replace(404404, product(404404, "Gone", 1)).await, Err(ServiceError::NotFound(404404))));
        assert!(matches!(repo.remove(404404).await, Err(ServiceError::NotFound(404404))));
        Ok(())
    }
}
