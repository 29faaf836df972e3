//! Customers as listed by the backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::CustomerId;

/// A customer record.
///
/// The email is kept as text: records created before validation was added
/// may not parse as an [`Email`](crate::types::Email).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Customer {
    /// First and last name joined, or the email when both are blank.
    #[must_use]
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let name = name.trim();
        if name.is_empty() {
            self.email.clone()
        } else {
            name.to_string()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        let customer: Customer = serde_json::from_str(
            r#"{"id": 1, "email": "ada@example.com", "first_name": "Ada", "last_name": ""}"#,
        )
        .unwrap();
        assert_eq!(customer.display_name(), "Ada");

        let anonymous: Customer =
            serde_json::from_str(r#"{"id": 2, "email": "x@example.com"}"#).unwrap();
        assert_eq!(anonymous.display_name(), "x@example.com");
    }
}
