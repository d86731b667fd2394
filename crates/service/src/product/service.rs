use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use models::errors::ValidationErrors;

use super::domain::Product;
use super::id::IdGenerator;
use super::repository::ProductRepository;
use crate::errors::ServiceError;

/// Product business service independent of web framework.
///
/// Lifecycle per product: absent -> present (any number of updates and stock
/// adjustments) -> absent.
pub struct ProductService<R: ProductRepository + ?Sized> {
    repo: Arc<R>,
    ids: IdGenerator,
}

impl<R: ProductRepository + ?Sized> ProductService<R> {
    /// Service with an entropy-seeded id generator.
    pub fn new(repo: Arc<R>) -> Self { Self::with_ids(repo, IdGenerator::from_entropy()) }

    pub fn with_ids(repo: Arc<R>, ids: IdGenerator) -> Self { Self { repo, ids } }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Product>, ServiceError> {
        self.repo.list().await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<Product, ServiceError> {
        self.repo.get(id).await?.ok_or(ServiceError::NotFound(id))
    }

    /// Validate, assign a fresh six-digit id and persist.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::product::{Product, ProductService, id::IdGenerator, repository::memory::MemoryProductRepository};
    /// let svc = ProductService::with_ids(Arc::new(MemoryProductRepository::new()), IdGenerator::seeded(7));
    /// let candidate = Product { id: 0, name: "Desk".into(), description: None, price: "99.5".parse().unwrap(), stock_available: 3 };
    /// let created = tokio_test::block_on(svc.create(candidate)).unwrap();
    /// assert!((100_000..999_999).contains(&created.id));
    /// ```
    #[instrument(skip(self, candidate), fields(name = %candidate.name))]
    pub async fn create(&self, candidate: Product) -> Result<Product, ServiceError> {
        candidate.validate()?;
        let id = self.generate_unique_id().await?;
        let created = self.repo.insert(Product { id, ..candidate }).await?;
        info!(product_id = created.id, "product_created");
        Ok(created)
    }

    /// Full-record replace; `candidate.id` must equal `id`.
    #[instrument(skip(self, candidate), fields(body_id = candidate.id))]
    pub async fn update(&self, id: i32, candidate: Product) -> Result<(), ServiceError> {
        if candidate.id != id {
            return Err(ServiceError::IdMismatch { path: id, body: candidate.id });
        }
        candidate.validate()?;
        self.repo.replace(id, candidate).await?;
        info!(product_id = id, "product_updated");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        if self.repo.get(id).await?.is_none() {
            return Err(ServiceError::NotFound(id));
        }
        self.repo.remove(id).await?;
        info!(product_id = id, "product_deleted");
        Ok(())
    }

    /// Take `quantity` out of stock. The quantity's sign is not checked.
    #[instrument(skip(self))]
    pub async fn decrement_stock(&self, id: i32, quantity: i32) -> Result<(), ServiceError> {
        let mut product = self.get(id).await?;
        if product.stock_available < quantity {
            warn!(product_id = id, stock = product.stock_available, quantity, "insufficient stock");
            return Err(ServiceError::InsufficientStock);
        }
        product.stock_available = product
            .stock_available
            .checked_sub(quantity)
            .ok_or_else(|| quantity_out_of_range(quantity))?;
        let stock = product.stock_available;
        self.repo.replace(id, product).await?;
        info!(product_id = id, quantity, stock, "stock_decremented");
        Ok(())
    }

    /// Put `quantity` back into stock. No upper bound, no sign check.
    #[instrument(skip(self))]
    pub async fn add_to_stock(&self, id: i32, quantity: i32) -> Result<(), ServiceError> {
        let mut product = self.get(id).await?;
        product.stock_available = product
            .stock_available
            .checked_add(quantity)
            .ok_or_else(|| quantity_out_of_range(quantity))?;
        let stock = product.stock_available;
        self.repo.replace(id, product).await?;
        info!(product_id = id, quantity, stock, "stock_added");
        Ok(())
    }

    /// Draw candidates until the store reports one as free. No retry cap.
    async fn generate_unique_id(&self) -> Result<i32, ServiceError> {
        let mut attempts = 0u32;
        loop {
            let candidate = self.ids.next_candidate();
            attempts += 1;
            let taken = self
                .repo
                .exists(candidate)
                .await
                .map_err(|e| ServiceError::IdGeneration(e.to_string()))?;
            if !taken {
                debug!(candidate, attempts, "id assigned");
                return Ok(candidate);
            }
            debug!(candidate, attempts, "id collision, redrawing");
        }
    }
}

fn quantity_out_of_range(quantity: i32) -> ServiceError {
    ServiceError::Validation(ValidationErrors::single(
        "quantity",
        format!("Adjusting stock by {quantity} is out of range."),
    ))
}
