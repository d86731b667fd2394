use std::sync::Arc;

use configs::ProductsConfig;
use sea_orm::DatabaseConnection;
use service::product::{id::IdGenerator, repo::seaorm::SeaOrmProductRepository, ProductRepository, ProductService};

pub type DynProductService = ProductService<dyn ProductRepository>;

#[derive(Clone)]
pub struct ServerState {
    pub products: Arc<DynProductService>,
}

impl ServerState {
    /// Build the product service over any repository, seeding ids per config.
    pub fn new(repo: Arc<dyn ProductRepository>, cfg: &ProductsConfig) -> Self {
        let ids = match cfg.id_seed {
            Some(seed) => IdGenerator::seeded(seed),
            None => IdGenerator::from_entropy(),
        };
        Self { products: Arc::new(ProductService::with_ids(repo, ids)) }
    }

    pub fn from_db(db: DatabaseConnection, cfg: &ProductsConfig) -> Self {
        Self::new(Arc::new(SeaOrmProductRepository::new(db)), cfg)
    }
}
