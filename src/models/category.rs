//! Category domain type and its mapping from stored rows.

use crate::{
    entities::category,
    errors::{Error, Result},
};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

/// Trade direction a category applies to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum CategoryType {
    /// Goods bought in
    Import,
    /// Goods sold out
    Export,
    /// Both directions
    Both,
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Category ID
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Trade direction
    #[serde(rename = "type")]
    pub category_type: CategoryType,
}

impl TryFrom<category::Model> for Category {
    type Error = Error;

    fn try_from(row: category::Model) -> Result<Self> {
        let category_type = row
            .category_type
            .parse::<CategoryType>()
            .map_err(|_| Error::Mapping {
                table: "product_categories",
                message: format!("unknown category type '{}'", row.category_type),
            })?;

        Ok(Self {
            id: row.id,
            name: row.name,
            description: row.description,
            category_type,
        })
    }
}

/// Input for creating or updating a category.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    /// Display name, must not be blank
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Trade direction
    #[serde(rename = "type")]
    pub category_type: CategoryType,
}

impl CategoryInput {
    /// Checks required fields.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::field("name", "Category name cannot be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_category_type_round_trips_through_text() {
        assert_eq!("IMPORT".parse::<CategoryType>().unwrap(), CategoryType::Import);
        assert_eq!(CategoryType::Both.to_string(), "BOTH");
        assert!("import".parse::<CategoryType>().is_err());
    }

    #[test]
    fn test_unknown_category_type_is_a_mapping_error() {
        let row = category::Model {
            id: Uuid::new_v4(),
            name: "Odd".to_string(),
            description: None,
            category_type: "SIDEWAYS".to_string(),
        };

        let result = Category::try_from(row);
        assert!(matches!(
            result,
            Err(Error::Mapping {
                table: "product_categories",
                ..
            })
        ));
    }
}
