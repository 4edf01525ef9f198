//! Customer resolution for purchase requests.

use chrono::Utc;

use shopdesk_core::{CustomerId, DomainError, DomainResult};

use crate::customer::Customer;
use crate::request::{BuyProductRequest, RequestType};
use crate::store::InvoiceBook;

/// Resolves the customer a purchase request acts on.
///
/// `existing_id` is the customer identifier taken from the route on update
/// requests; new purchases pass `None`.
pub trait CustomerValidator: Send + Sync {
    fn validate(
        &self,
        request_type: RequestType,
        request: &BuyProductRequest,
        existing_id: Option<CustomerId>,
    ) -> DomainResult<Customer>;
}

/// Validator backed by the customer directory in an [`InvoiceBook`].
#[derive(Clone)]
pub struct DirectoryCustomerValidator {
    book: InvoiceBook,
}

impl DirectoryCustomerValidator {
    pub fn new(book: InvoiceBook) -> Self {
        Self { book }
    }

    fn resolve_new(&self, request: &BuyProductRequest) -> Customer {
        match self.book.customer_by_email(&request.email) {
            Some(existing) => {
                tracing::debug!(customer_id = %existing.id, "purchase by returning customer");
                existing
            }
            None => Customer::from_request(CustomerId::new(), request, Utc::now()),
        }
    }

    fn resolve_existing(&self, id: CustomerId, request: &BuyProductRequest) -> DomainResult<Customer> {
        let current = self
            .book
            .customers()
            .get(&id)
            .ok_or_else(|| DomainError::not_found(format!("customer {id}")))?;

        if let Some(owner) = self.book.customer_by_email(&request.email) {
            if owner.id != id {
                return Err(DomainError::conflict(format!(
                    "email {} belongs to another customer",
                    owner.email
                )));
            }
        }

        Ok(current.with_details(request, Utc::now()))
    }
}

impl CustomerValidator for DirectoryCustomerValidator {
    fn validate(
        &self,
        request_type: RequestType,
        request: &BuyProductRequest,
        existing_id: Option<CustomerId>,
    ) -> DomainResult<Customer> {
        request.check()?;

        match (request_type, existing_id) {
            (RequestType::Post, None) => Ok(self.resolve_new(request)),
            (RequestType::Post, Some(_)) => Err(DomainError::validation(
                "a customer id cannot be supplied for a new purchase",
            )),
            (RequestType::Put, Some(id)) => self.resolve_existing(id, request),
            (RequestType::Put, None) => {
                Err(DomainError::validation("a customer id is required for updates"))
            }
        }
    }
}
