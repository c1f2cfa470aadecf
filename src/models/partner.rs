//! Partner domain type, input validation and row mapping.

use crate::{
    entities::partner,
    errors::{Error, FieldErrors, Result},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A business partner (customer or vendor).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Partner {
    /// Partner ID
    pub id: Uuid,
    /// Company or person name
    pub name: String,
    /// Contact person
    pub contact: Option<String>,
    /// Email address
    pub email: Option<String>,
    /// Phone number
    pub phone: Option<String>,
    /// Postal address
    pub address: Option<String>,
    /// Free-form notes
    pub notes: Option<String>,
}

impl From<partner::Model> for Partner {
    fn from(row: partner::Model) -> Self {
        Self {
            id: row.id,
            name: row.name,
            contact: row.contact,
            email: row.email,
            phone: row.phone,
            address: row.address,
            notes: row.notes,
        }
    }
}

/// Input for creating or updating a partner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerInput {
    /// Company or person name, must not be blank
    pub name: String,
    /// Contact person
    pub contact: Option<String>,
    /// Email address, checked for a basic `local@domain` shape
    pub email: Option<String>,
    /// Phone number
    pub phone: Option<String>,
    /// Postal address
    pub address: Option<String>,
    /// Free-form notes
    pub notes: Option<String>,
}

impl PartnerInput {
    /// Creates an input with only the required name set.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Checks required fields and the email shape, collecting every failure.
    pub fn validate(&self) -> Result<()> {
        let mut fields = FieldErrors::new();

        if self.name.trim().is_empty() {
            fields.insert("name".to_string(), "Partner name cannot be empty".to_string());
        }

        let email = self.email.as_deref().map(str::trim).unwrap_or_default();
        if !email.is_empty() && !is_plausible_email(email) {
            fields.insert("email".to_string(), format!("'{email}' is not a valid email"));
        }

        if fields.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation { fields })
        }
    }
}

fn is_plausible_email(email: &str) -> bool {
    email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'))
}

/// Trims an optional text field, turning blank values into `None`.
pub(crate) fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_name() {
        let input = PartnerInput::named("  ");
        let error = input.validate().err();
        let fields = error.as_ref().and_then(Error::field_errors);
        assert!(fields.is_some_and(|f| f.contains_key("name")));
    }

    #[test]
    fn test_validate_collects_all_fields() {
        let input = PartnerInput {
            email: Some("not-an-email".to_string()),
            ..PartnerInput::default()
        };
        let error = input.validate().err();
        let fields = error.as_ref().and_then(Error::field_errors);
        assert_eq!(fields.map(FieldErrors::len), Some(2));
    }

    #[test]
    fn test_validate_accepts_blank_email() {
        let input = PartnerInput {
            email: Some(String::new()),
            ..PartnerInput::named("Muster GmbH")
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_clean() {
        assert_eq!(clean(Some("  a ".to_string())), Some("a".to_string()));
        assert_eq!(clean(Some("   ".to_string())), None);
        assert_eq!(clean(None), None);
    }
}
