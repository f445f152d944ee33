use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::category::Category;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub category: Category,
    pub available: bool,
    #[serde(rename = "isMonthlySpecial")]
    pub monthly_special: bool,
}

/// Every writable field of a product, used for both create and full update.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub category_id: i64,
    pub available: bool,
    pub monthly_special: bool,
}

impl ProductDraft {
    /// Trims the name and collapses a blank image URL to `None`. On update a
    /// `None` image keeps the stored one.
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.image_url = self
            .image_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(image_url: Option<&str>) -> ProductDraft {
        ProductDraft {
            name: "  Margherita ".into(),
            description: None,
            price: Decimal::new(600, 2),
            image_url: image_url.map(str::to_string),
            category_id: 1,
            available: true,
            monthly_special: false,
        }
    }

    #[test]
    fn blank_image_url_is_dropped() {
        let d = draft(Some("   ")).normalized();
        assert_eq!(d.image_url, None);
        assert_eq!(d.name, "Margherita");
    }

    #[test]
    fn image_url_is_trimmed() {
        let d = draft(Some(" https://img/1.jpg ")).normalized();
        assert_eq!(d.image_url.as_deref(), Some("https://img/1.jpg"));
    }

    #[test]
    fn serializes_monthly_special_flag_under_its_wire_name() {
        let product = Product {
            id: 3,
            name: "Diavola".into(),
            description: Some("Salame piccante".into()),
            price: Decimal::new(750, 2),
            image_url: None,
            category: Category {
                id: 1,
                name: "Pizze Rosse".into(),
            },
            available: true,
            monthly_special: true,
        };
        let json = serde_json::to_value(product).unwrap();
        assert_eq!(json["isMonthlySpecial"], true);
        assert_eq!(json["price"], 7.5);
        assert_eq!(json["category"]["name"], "Pizze Rosse");
    }
}
