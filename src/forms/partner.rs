//! Vendor payloads and the supplier feed format.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::catalog::{CatalogImport, ImportGood};
use crate::domain::category::Category;
use crate::domain::product::ProductParameterValue;
use crate::forms::{parse_truthy_value, sanitize_inline_text};

#[derive(Debug, Error)]
pub enum PartnerFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("`{0}` is required")]
    Required(&'static str),
    #[error("`state` must be a boolean")]
    InvalidState,
}

/// `POST /partner/update/` body.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct PartnerUpdateForm {
    #[validate(url)]
    pub url: Option<String>,
}

impl PartnerUpdateForm {
    pub fn into_url(self) -> Result<String, PartnerFormError> {
        self.validate()?;
        self.url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .ok_or(PartnerFormError::Required("url"))
    }
}

/// `POST /partner/state/` body.
#[derive(Debug, Default, Deserialize)]
pub struct PartnerStateForm {
    #[serde(default)]
    pub state: Option<Value>,
}

impl PartnerStateForm {
    pub fn into_state(self) -> Result<bool, PartnerFormError> {
        match self.state {
            None | Some(Value::Null) => Err(PartnerFormError::Required("state")),
            Some(value) => parse_truthy_value(&value).ok_or(PartnerFormError::InvalidState),
        }
    }
}

/// Problems found in a downloaded feed.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The document is not YAML of the expected shape.
    #[error("malformed feed: {0}")]
    Malformed(#[from] serde_yaml::Error),
    /// The document parsed but its contents are unusable.
    #[error("{0}")]
    Invalid(String),
}

/// Scalar that suppliers write without quoting, e.g. `screen: 6.5` or `model: 1020`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FeedScalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for FeedScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedScalar::Bool(value) => write!(f, "{value}"),
            FeedScalar::Int(value) => write!(f, "{value}"),
            FeedScalar::Float(value) => write!(f, "{value}"),
            FeedScalar::Text(value) => f.write_str(value),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct FeedCategory {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct FeedGood {
    #[serde(default)]
    pub id: Option<i64>,
    pub category: i32,
    #[serde(default)]
    pub model: Option<FeedScalar>,
    pub name: String,
    pub price: i64,
    pub price_rrc: i64,
    pub quantity: i64,
    #[serde(default)]
    pub parameters: BTreeMap<String, FeedScalar>,
}

/// Supplier price list.
#[derive(Debug, Deserialize)]
pub struct CatalogFeed {
    pub shop: String,
    #[serde(default)]
    pub categories: Vec<FeedCategory>,
    #[serde(default)]
    pub goods: Vec<FeedGood>,
}

impl CatalogFeed {
    pub fn parse(body: &str) -> Result<Self, FeedError> {
        Ok(serde_yaml::from_str(body)?)
    }

    /// Check the feed and convert it into an import.
    ///
    /// Category references are resolved by the repository, which also knows
    /// about categories created by earlier imports.
    pub fn into_import(self, url: &str) -> Result<CatalogImport, FeedError> {
        let shop_name = sanitize_inline_text(&self.shop);
        if shop_name.is_empty() {
            return Err(FeedError::Invalid("shop: name is empty".to_string()));
        }

        let mut seen: HashMap<i32, String> = HashMap::new();
        let mut categories = Vec::with_capacity(self.categories.len());
        for (index, category) in self.categories.into_iter().enumerate() {
            let name = sanitize_inline_text(&category.name);
            if name.is_empty() {
                return Err(FeedError::Invalid(format!(
                    "categories[{index}]: name is empty"
                )));
            }
            match seen.get(&category.id) {
                Some(existing) if existing == &name => continue,
                Some(_) => {
                    return Err(FeedError::Invalid(format!(
                        "categories[{index}]: id {} is listed with different names",
                        category.id
                    )));
                }
                None => {
                    seen.insert(category.id, name.clone());
                    categories.push(Category {
                        id: category.id,
                        name,
                    });
                }
            }
        }

        let goods = self
            .goods
            .into_iter()
            .enumerate()
            .map(|(index, good)| convert_good(index, good))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CatalogImport {
            shop_name,
            url: url.to_string(),
            categories,
            goods,
        })
    }
}

fn convert_good(index: usize, good: FeedGood) -> Result<ImportGood, FeedError> {
    let invalid = |reason: &str| FeedError::Invalid(format!("goods[{index}]: {reason}"));

    let name = sanitize_inline_text(&good.name);
    if name.is_empty() {
        return Err(invalid("name is empty"));
    }
    let amount = |value: i64, field: &str| {
        i32::try_from(value)
            .ok()
            .filter(|value| *value >= 0)
            .ok_or_else(|| invalid(&format!("`{field}` must be a non-negative number")))
    };
    let external_id = good
        .id
        .map(|id| {
            i32::try_from(id)
                .ok()
                .filter(|id| *id > 0)
                .ok_or_else(|| invalid("`id` must be a positive number"))
        })
        .transpose()?;

    Ok(ImportGood {
        external_id,
        model: good
            .model
            .map(|model| model.to_string())
            .filter(|model| !model.trim().is_empty()),
        category_id: good.category,
        price: amount(good.price, "price")?,
        price_rrc: amount(good.price_rrc, "price_rrc")?,
        quantity: amount(good.quantity, "quantity")?,
        parameters: good
            .parameters
            .into_iter()
            .map(|(parameter, value)| ProductParameterValue {
                parameter: sanitize_inline_text(&parameter),
                value: value.to_string(),
            })
            .filter(|parameter| !parameter.parameter.is_empty())
            .collect(),
        name,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const FEED: &str = r#"
shop: Acme
categories:
  - id: 224
    name: Smartphones
  - id: 15
    name: Accessories
goods:
  - id: 4216292
    category: 224
    model: apple/iphone/xs-max
    name: Смартфон Apple iPhone XS Max 512GB (золотистый)
    price: 110000
    price_rrc: 116990
    quantity: 14
    parameters:
      "Диагональ (дюйм)": 6.5
      "Разрешение (пикс)": 2688x1242
      "Встроенная память (Гб)": 512
      "Цвет": золотистый
  - category: 15
    name: Чехол
    price: 500
    price_rrc: 700
    quantity: 0
"#;

    #[test]
    fn feed_is_converted_into_an_import() {
        let import = CatalogFeed::parse(FEED)
            .unwrap()
            .into_import("https://example.com/acme.yaml")
            .unwrap();

        assert_eq!(import.shop_name, "Acme");
        assert_eq!(import.categories.len(), 2);
        assert_eq!(import.goods.len(), 2);

        let phone = &import.goods[0];
        assert_eq!(phone.external_id, Some(4216292));
        assert_eq!(phone.model.as_deref(), Some("apple/iphone/xs-max"));
        assert_eq!(phone.category_id, 224);
        assert_eq!(phone.price, 110000);
        assert_eq!(phone.parameters.len(), 4);
        assert!(phone.parameters.contains(&ProductParameterValue {
            parameter: "Диагональ (дюйм)".to_string(),
            value: "6.5".to_string(),
        }));
        assert!(phone.parameters.contains(&ProductParameterValue {
            parameter: "Встроенная память (Гб)".to_string(),
            value: "512".to_string(),
        }));

        let case = &import.goods[1];
        assert_eq!(case.external_id, None);
        assert!(case.parameters.is_empty());
    }

    #[test]
    fn malformed_yaml_is_reported() {
        assert!(matches!(
            CatalogFeed::parse("shop: [unterminated"),
            Err(FeedError::Malformed(_))
        ));
        assert!(matches!(
            CatalogFeed::parse("categories: []"),
            Err(FeedError::Malformed(_))
        ));
    }

    #[test]
    fn negative_numbers_name_the_offending_good() {
        let feed = "shop: Acme\ngoods:\n  - category: 1\n    name: A\n    price: -1\n    price_rrc: 1\n    quantity: 1\n";
        let err = CatalogFeed::parse(feed)
            .unwrap()
            .into_import("https://example.com")
            .unwrap_err();
        assert_eq!(err.to_string(), "goods[0]: `price` must be a non-negative number");
    }

    #[test]
    fn conflicting_category_names_are_rejected() {
        let feed = "shop: Acme\ncategories:\n  - {id: 1, name: A}\n  - {id: 1, name: B}\n";
        let result = CatalogFeed::parse(feed).unwrap().into_import("https://example.com");
        assert!(matches!(result, Err(FeedError::Invalid(_))));
    }

    #[test]
    fn empty_shop_name_is_rejected() {
        let result = CatalogFeed::parse("shop: '  '")
            .unwrap()
            .into_import("https://example.com");
        assert!(matches!(result, Err(FeedError::Invalid(_))));
    }

    #[test]
    fn update_form_requires_a_valid_url() {
        assert!(matches!(
            PartnerUpdateForm::default().into_url(),
            Err(PartnerFormError::Required("url"))
        ));
        let form = PartnerUpdateForm {
            url: Some("not a url".to_string()),
        };
        assert!(matches!(
            form.into_url(),
            Err(PartnerFormError::Validation(_))
        ));
        let form = PartnerUpdateForm {
            url: Some("https://example.com/feed.yaml".to_string()),
        };
        assert_eq!(form.into_url().unwrap(), "https://example.com/feed.yaml");
    }

    #[test]
    fn state_form_uses_truthy_parsing() {
        let form = PartnerStateForm {
            state: Some(json!("on")),
        };
        assert!(form.into_state().unwrap());
        let form = PartnerStateForm {
            state: Some(json!("nope")),
        };
        assert!(matches!(
            form.into_state(),
            Err(PartnerFormError::InvalidState)
        ));
        assert!(matches!(
            PartnerStateForm::default().into_state(),
            Err(PartnerFormError::Required("state"))
        ));
    }
}
