//! Purchase and lookup services behind the invoice endpoints.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use shopdesk_core::{CustomerId, DomainError, DomainResult, Entity, InvoiceId};

use crate::customer::Customer;
use crate::invoice::Invoice;
use crate::request::{BuyProductRequest, RequestType};
use crate::store::InvoiceBook;

/// Outcome of a purchase or purchase update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseReceipt {
    pub customer: Customer,
    pub invoice: Invoice,
}

/// A customer together with every invoice issued to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInvoices {
    pub customer: Customer,
    pub invoices: Vec<Invoice>,
}

/// Executes purchases for an already-resolved customer.
pub trait InvoiceService: Send + Sync {
    /// `id` is the route identifier on updates (`RequestType::Put`), `None` otherwise.
    fn buy_product(
        &self,
        customer: Customer,
        request: &BuyProductRequest,
        request_type: RequestType,
        id: Option<CustomerId>,
    ) -> DomainResult<PurchaseReceipt>;
}

/// Read side: customers and their invoices.
///
/// Lookups receive the caller's `Authorization` header value untouched.
pub trait CustomerService: Send + Sync {
    fn all_customer_invoices(&self) -> DomainResult<Vec<CustomerInvoices>>;

    fn customer_invoices_by_id(
        &self,
        customer_id: &str,
        authorization: &str,
    ) -> DomainResult<CustomerInvoices>;

    fn customer_invoices_by_email(
        &self,
        email: &str,
        authorization: &str,
    ) -> DomainResult<CustomerInvoices>;
}

#[derive(Clone)]
pub struct BookInvoiceService {
    book: InvoiceBook,
}

impl BookInvoiceService {
    pub fn new(book: InvoiceBook) -> Self {
        Self { book }
    }

    /// Issue a new invoice.
    ///
    /// The customer is re-resolved by email under the write lock: a purchase
    /// racing ahead may already have registered the same address, and a
    /// stored customer keeps its current details.
    fn purchase(&self, candidate: Customer, request: &BuyProductRequest) -> DomainResult<PurchaseReceipt> {
        self.book.exclusive(|book| {
            let (customer, is_new) = match book.customer_by_email(&candidate.email) {
                Some(stored) => (stored, false),
                None => (candidate, true),
            };
            let invoice = Invoice::issue(InvoiceId::new(), customer.id, &request.products, Utc::now())?;

            if is_new {
                book.customers().upsert(customer.clone());
            }
            book.invoices().upsert(invoice.clone());

            tracing::info!(
                customer_id = %customer.id,
                invoice_id = %invoice.id(),
                total_amount = invoice.total_amount(),
                new_customer = is_new,
                "invoice issued"
            );

            Ok(PurchaseReceipt { customer, invoice })
        })
    }

    fn revise(
        &self,
        customer: Customer,
        request: &BuyProductRequest,
        id: CustomerId,
    ) -> DomainResult<PurchaseReceipt> {
        if customer.id != id {
            return Err(DomainError::invariant("customer_id mismatch"));
        }

        self.book.exclusive(|book| {
            if book.customers().get(&id).is_none() {
                return Err(DomainError::not_found(format!("customer {id}")));
            }
            if let Some(owner) = book.customer_by_email(&customer.email) {
                if owner.id != id {
                    return Err(DomainError::conflict(format!(
                        "email {} belongs to another customer",
                        owner.email
                    )));
                }
            }

            let now = Utc::now();
            let invoice = match book.invoices_for(id).pop() {
                Some(mut latest) => {
                    latest.revise(&request.products, now)?;
                    latest
                }
                None => Invoice::issue(InvoiceId::new(), id, &request.products, now)?,
            };

            book.customers().upsert(customer.clone());
            book.invoices().upsert(invoice.clone());

            tracing::info!(
                customer_id = %customer.id,
                invoice_id = %invoice.id(),
                total_amount = invoice.total_amount(),
                status = ?invoice.status(),
                "invoice revised"
            );

            Ok(PurchaseReceipt { customer, invoice })
        })
    }
}

impl InvoiceService for BookInvoiceService {
    fn buy_product(
        &self,
        customer: Customer,
        request: &BuyProductRequest,
        request_type: RequestType,
        id: Option<CustomerId>,
    ) -> DomainResult<PurchaseReceipt> {
        match (request_type, id) {
            (RequestType::Post, _) => self.purchase(customer, request),
            (RequestType::Put, Some(id)) => self.revise(customer, request, id),
            (RequestType::Put, None) => {
                Err(DomainError::validation("a customer id is required for updates"))
            }
        }
    }
}

#[derive(Clone)]
pub struct BookCustomerService {
    book: InvoiceBook,
}

impl BookCustomerService {
    pub fn new(book: InvoiceBook) -> Self {
        Self { book }
    }

    fn with_invoices(&self, customer: Customer) -> CustomerInvoices {
        let invoices = self.book.invoices_for(customer.id);
        CustomerInvoices { customer, invoices }
    }
}

impl CustomerService for BookCustomerService {
    fn all_customer_invoices(&self) -> DomainResult<Vec<CustomerInvoices>> {
        let mut customers = self.book.customers().list();
        customers.sort_by_key(|c| (c.created_at, c.id));
        Ok(customers
            .into_iter()
            .map(|c| self.with_invoices(c))
            .collect())
    }

    fn customer_invoices_by_id(
        &self,
        customer_id: &str,
        authorization: &str,
    ) -> DomainResult<CustomerInvoices> {
        tracing::debug!(authorized = !authorization.trim().is_empty(), "customer lookup by id");

        let id: CustomerId = customer_id.parse()?;
        let customer = self
            .book
            .customers()
            .get(&id)
            .ok_or_else(|| DomainError::not_found(format!("customer {id}")))?;
        Ok(self.with_invoices(customer))
    }

    fn customer_invoices_by_email(
        &self,
        email: &str,
        authorization: &str,
    ) -> DomainResult<CustomerInvoices> {
        tracing::debug!(authorized = !authorization.trim().is_empty(), "customer lookup by email");

        let customer = self
            .book
            .customer_by_email(email)
            .ok_or_else(|| DomainError::not_found(format!("customer with email {}", email.trim())))?;
        Ok(self.with_invoices(customer))
    }
}
