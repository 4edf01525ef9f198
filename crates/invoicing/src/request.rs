use serde::{Deserialize, Serialize};

use shopdesk_core::{DomainError, DomainResult};

/// Which write path a purchase request arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestType {
    /// A new purchase.
    Post,
    /// A revision of an existing customer's purchase.
    Put,
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::Post => "POST",
            RequestType::Put => "PUT",
        }
    }
}

/// One product line of a purchase request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub product_name: String,
    pub quantity: u32,
    /// Price in smallest currency unit (e.g., cents).
    pub unit_price: u64,
}

/// Purchase payload: who is buying and what.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyProductRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub products: Vec<ProductRequest>,
}

impl BuyProductRequest {
    /// Check the payload's shape (customer fields and product lines).
    pub fn check(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if !is_plausible_email(&self.email) {
            return Err(DomainError::validation(format!(
                "email '{}' is not a valid address",
                self.email.trim()
            )));
        }
        if self.products.is_empty() {
            return Err(DomainError::validation("at least one product is required"));
        }
        for (idx, product) in self.products.iter().enumerate() {
            if product.product_name.trim().is_empty() {
                return Err(DomainError::validation(format!(
                    "product {} has an empty name",
                    idx + 1
                )));
            }
            if product.quantity == 0 {
                return Err(DomainError::validation(format!(
                    "product '{}' must have a quantity of at least 1",
                    product.product_name.trim()
                )));
            }
        }
        Ok(())
    }

    /// Email in the form used for lookups (trimmed, lowercase).
    pub fn normalized_email(&self) -> String {
        normalize_email(&self.email)
    }
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn is_plausible_email(email: &str) -> bool {
    let email = email.trim();
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace)
}
