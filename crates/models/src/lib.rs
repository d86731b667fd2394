//! Persistence models: sea-orm entities, connection helpers and field validation.

pub mod errors;
pub mod db;
pub mod product;
