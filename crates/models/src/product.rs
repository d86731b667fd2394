use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::ValidationErrors;

pub const NAME_MAX_LEN: usize = 100;
pub const DESCRIPTION_MAX_LEN: usize = 500;
pub const MIN_INITIAL_STOCK: i32 = 1;
/// Digits after the decimal point the price column keeps.
pub const PRICE_SCALE: u32 = 2;
/// Exclusive upper bound for a price in a `DECIMAL(16, 2)` column.
pub const PRICE_LIMIT: i64 = 100_000_000_000_000;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub price: Decimal,
    pub stock_available: i32,
    #[serde(skip)]
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Validate every writable field at once, collecting all failures.
pub fn validate_fields(
    name: &str,
    description: Option<&str>,
    price: Decimal,
    stock_available: i32,
) -> Result<(), ValidationErrors> {
    let mut errs = ValidationErrors::new();
    check_name(name, &mut errs);
    check_description(description, &mut errs);
    check_price(price, &mut errs);
    check_stock(stock_available, &mut errs);
    errs.into_result()
}

fn check_name(name: &str, errs: &mut ValidationErrors) {
    if name.trim().is_empty() {
        errs.add("name", "The name field is required.");
        return;
    }
    if name.chars().count() > NAME_MAX_LEN {
        errs.add("name", format!("The name must be at most {NAME_MAX_LEN} characters."));
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c.is_whitespace()) {
        errs.add("name", "The name may only contain letters, digits and spaces.");
    }
}

fn check_description(description: Option<&str>, errs: &mut ValidationErrors) {
    if let Some(d) = description {
        if d.chars().count() > DESCRIPTION_MAX_LEN {
            errs.add("description", format!("The description must be at most {DESCRIPTION_MAX_LEN} characters."));
        }
    }
}

fn check_price(price: Decimal, errs: &mut ValidationErrors) {
    if price <= Decimal::ZERO {
        errs.add("price", "The price must be greater than 0.");
        return;
    }
    // the column would round extra digits away, possibly down to zero
    if price.normalize().scale() > PRICE_SCALE {
        errs.add("price", format!("The price may have at most {PRICE_SCALE} decimal places."));
    }
    if price >= Decimal::from(PRICE_LIMIT) {
        errs.add("price", format!("The price must be less than {PRICE_LIMIT}."));
    }
}

fn check_stock(stock_available: i32, errs: &mut ValidationErrors) {
    if stock_available < MIN_INITIAL_STOCK {
        errs.add("stockAvailable", format!("The stock available must be at least {MIN_INITIAL_STOCK}."));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn price(s: &str) -> Decimal { s.parse().unwrap() }

    fn run(check: impl FnOnce(&mut ValidationErrors)) -> Result<(), ValidationErrors> {
        let mut errs = ValidationErrors::new();
        check(&mut errs);
        errs.into_result()
    }

    #[test]
    fn accepts_valid_fields() {
        assert!(validate_fields("Desk Lamp 2", Some("warm light"), price("19.99"), 1).is_ok());
        assert!(validate_fields("Chair", None, price("0.01"), 250).is_ok());
    }

    #[test]
    fn name_rules() {
        assert!(run(|e| check_name("", e)).is_err());
        assert!(run(|e| check_name("   ", e)).is_err());
        assert!(run(|e| check_name(&"a".repeat(100), e)).is_ok());
        assert!(run(|e| check_name(&"a".repeat(101), e)).is_err());
        let errs = run(|e| check_name("Lamp-2000!", e)).unwrap_err();
        assert_eq!(errs.field("name").map(|m| m.len()), Some(1));
    }

    #[test]
    fn description_is_optional_but_bounded() {
        assert!(run(|e| check_description(None, e)).is_ok());
        assert!(run(|e| check_description(Some(""), e)).is_ok());
        assert!(run(|e| check_description(Some(&"d".repeat(500)), e)).is_ok());
        assert!(run(|e| check_description(Some(&"d".repeat(501)), e)).is_err());
    }

    #[test]
    fn price_must_be_positive() {
        assert!(run(|e| check_price(Decimal::ZERO, e)).is_err());
        assert!(run(|e| check_price(price("-3.50"), e)).is_err());
        assert!(run(|e| check_price(price("0.01"), e)).is_ok());
    }

    #[test]
    fn price_must_fit_the_column() {
        // would be stored as 0.00
        let errs = run(|e| check_price(price("0.004"), e)).unwrap_err();
        assert_eq!(errs.field("price").map(|m| m.len()), Some(1));
        assert!(run(|e| check_price(price("19.999"), e)).is_err());
        // trailing zeros do not count
        assert!(run(|e| check_price(price("12.5000"), e)).is_ok());
        assert!(run(|e| check_price(price("99999999999999.99"), e)).is_ok());
        assert!(run(|e| check_price(price("100000000000000"), e)).is_err());
    }

    #[test]
    fn zero_stock_is_rejected() {
        assert!(run(|e| check_stock(0, e)).is_err());
        assert!(run(|e| check_stock(-1, e)).is_err());
        assert!(run(|e| check_stock(1, e)).is_ok());
    }

    #[test]
    fn collects_errors_for_every_field() {
        let errs = validate_fields("bad*name", Some(&"x".repeat(600)), Decimal::ZERO, 0).unwrap_err();
        for field in ["description", "name", "price", "stockAvailable"] {
            assert!(errs.field(field).is_some(), "missing {field}");
        }
        assert!(errs.to_string().contains("price: The price must be greater than 0."));
    }
}
