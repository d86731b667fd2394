//! Service layer for the product catalogue.
//! - Separates business rules (ids, stock, validation) from data access.
//! - Reuses entity definitions and field validation from the `models` crate.
//! - Storage is reached only through the `ProductRepository` trait.

pub mod errors;
pub mod product;
#[cfg(test)]
pub mod test_support;
