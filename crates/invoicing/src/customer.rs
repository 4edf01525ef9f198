use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shopdesk_core::{CustomerId, Entity};

use crate::request::{BuyProductRequest, normalize_email};

/// A customer who has bought (or is about to buy) products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    /// Stored normalized (trimmed, lowercase); unique across customers.
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    /// Build a fresh customer from a purchase payload.
    pub fn from_request(id: CustomerId, request: &BuyProductRequest, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: request.name.trim().to_string(),
            email: request.normalized_email(),
            phone: trimmed(&request.phone),
            address: trimmed(&request.address),
            created_at: now,
            updated_at: now,
        }
    }

    /// Copy of this customer with the payload's contact details applied.
    pub fn with_details(&self, request: &BuyProductRequest, now: DateTime<Utc>) -> Self {
        Self {
            id: self.id,
            name: request.name.trim().to_string(),
            email: request.normalized_email(),
            phone: trimmed(&request.phone),
            address: trimmed(&request.address),
            created_at: self.created_at,
            updated_at: now,
        }
    }

    pub fn has_email(&self, email: &str) -> bool {
        self.email == normalize_email(email)
    }
}

impl Entity for Customer {
    type Id = CustomerId;

    fn id(&self) -> CustomerId {
        self.id
    }
}

fn trimmed(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
