use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shopdesk_core::{CustomerId, DomainError, DomainResult, Entity, InvoiceId};

use crate::request::ProductRequest;

/// Invoice status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Open,
    /// Lines were replaced by an update after issue.
    Revised,
}

/// Invoice line built from a purchase request product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLine {
    pub line_no: u32,
    pub product_name: String,
    pub quantity: u32,
    /// Price in smallest currency unit (e.g., cents).
    pub unit_price: u64,
    pub line_total: u64,
}

/// An invoice issued to a customer for one purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    id: InvoiceId,
    customer_id: CustomerId,
    status: InvoiceStatus,
    lines: Vec<InvoiceLine>,
    total_amount: u64,
    issued_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Invoice {
    /// Issue a new invoice for `customer_id` from the purchased products.
    pub fn issue(
        id: InvoiceId,
        customer_id: CustomerId,
        products: &[ProductRequest],
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let (lines, total_amount) = build_lines(products)?;
        Ok(Self {
            id,
            customer_id,
            status: InvoiceStatus::Open,
            lines,
            total_amount,
            issued_at: now,
            updated_at: now,
        })
    }

    /// Replace all lines, marking the invoice as revised.
    ///
    /// On error the invoice is left untouched.
    pub fn revise(&mut self, products: &[ProductRequest], now: DateTime<Utc>) -> DomainResult<()> {
        let (lines, total_amount) = build_lines(products)?;
        self.lines = lines;
        self.total_amount = total_amount;
        self.status = InvoiceStatus::Revised;
        self.updated_at = now;
        Ok(())
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn status(&self) -> InvoiceStatus {
        self.status
    }

    pub fn lines(&self) -> &[InvoiceLine] {
        &self.lines
    }

    pub fn total_amount(&self) -> u64 {
        self.total_amount
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl Entity for Invoice {
    type Id = InvoiceId;

    fn id(&self) -> InvoiceId {
        self.id
    }
}

fn build_lines(products: &[ProductRequest]) -> DomainResult<(Vec<InvoiceLine>, u64)> {
    if products.is_empty() {
        return Err(DomainError::validation("invoice must have at least one line"));
    }

    let mut lines = Vec::with_capacity(products.len());
    let mut total: u64 = 0;
    for (idx, p) in products.iter().enumerate() {
        let name = p.product_name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("product name cannot be empty"));
        }
        if p.quantity == 0 {
            return Err(DomainError::validation("quantity must be at least 1"));
        }

        let line_total = u64::from(p.quantity)
            .checked_mul(p.unit_price)
            .ok_or_else(|| DomainError::validation(format!("line total overflows for '{name}'")))?;
        total = total
            .checked_add(line_total)
            .ok_or_else(|| DomainError::validation("invoice total overflows"))?;

        lines.push(InvoiceLine {
            line_no: (idx as u32) + 1,
            product_name: name.to_string(),
            quantity: p.quantity,
            unit_price: p.unit_price,
            line_total,
        });
    }

    Ok((lines, total))
}
