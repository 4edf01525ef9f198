//! Collaborator wiring for the invoice endpoints.

use std::sync::Arc;

use shopdesk_invoicing::{
    BookCustomerService, BookInvoiceService, CustomerService, CustomerValidator,
    DirectoryCustomerValidator, InvoiceBook, InvoiceService,
};

use crate::app::envelope::{ResponseGenerator, StandardResponseGenerator};

/// Collaborators the handlers delegate to.
///
/// Every field is a trait object so tests and alternative backends can swap
/// any of them independently.
#[derive(Clone)]
pub struct AppServices {
    pub validator: Arc<dyn CustomerValidator>,
    pub invoices: Arc<dyn InvoiceService>,
    pub customers: Arc<dyn CustomerService>,
    pub responses: Arc<dyn ResponseGenerator>,
}

impl AppServices {
    /// Default collaborators sharing one in-memory invoice book.
    pub fn in_memory() -> Self {
        let book = InvoiceBook::in_memory();
        Self {
            validator: Arc::new(DirectoryCustomerValidator::new(book.clone())),
            invoices: Arc::new(BookInvoiceService::new(book.clone())),
            customers: Arc::new(BookCustomerService::new(book)),
            responses: Arc::new(StandardResponseGenerator),
        }
    }

    pub fn with_responses(mut self, responses: Arc<dyn ResponseGenerator>) -> Self {
        self.responses = responses;
        self
    }
}

pub fn build_services() -> AppServices {
    tracing::info!("using in-memory invoice book");
    AppServices::in_memory()
}
