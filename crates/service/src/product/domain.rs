use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use models::errors::ValidationErrors;

/// Product as exchanged with callers (JSON: `id, name, description, price, stockAvailable`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Assigned on create; any value sent with a create request is ignored.
    #[serde(default)]
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub stock_available: i32,
}

impl Product {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        models::product::validate_fields(&self.name, self.description.as_deref(), self.price, self.stock_available)
    }
}

impl From<models::product::Model> for Product {
    fn from(m: models::product::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            price: m.price,
            stock_available: m.stock_available,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_uses_camel_case_and_numeric_price() {
        let p = Product {
            id: 123456,
            name: "Lamp".into(),
            description: None,
            price: "12.5".parse().unwrap(),
            stock_available: 3,
        };
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v["stockAvailable"], 3);
        assert_eq!(v["price"], 12.5);
        assert!(v.get("stock_available").is_none());
    }

    #[test]
    fn create_body_may_omit_id_and_description() {
        let p: Product = serde_json::from_str(r#"{"name":"Lamp","price":9.75,"stockAvailable":2}"#).unwrap();
        assert_eq!(p.id, 0);
        assert_eq!(p.description, None);
        assert_eq!(p.price, "9.75".parse::<Decimal>().unwrap());
    }
}
