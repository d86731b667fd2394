//! Product catalogue: domain type, id generation, persistence seam and business rules.

pub mod domain;
pub mod id;
pub mod repository;
pub mod repo;
pub mod service;

pub use domain::Product;
pub use repository::ProductRepository;
pub use service::ProductService;
