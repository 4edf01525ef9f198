//! Invoicing domain module (customers, purchases, invoices).
//!
//! This crate holds the purchase rules and the collaborator seams the HTTP
//! layer calls into: a customer validator, an invoice service and a customer
//! service. Everything here is synchronous and free of HTTP concerns.

pub mod customer;
pub mod invoice;
pub mod request;
pub mod service;
pub mod store;
pub mod validator;

pub use customer::Customer;
pub use invoice::{Invoice, InvoiceLine, InvoiceStatus};
pub use request::{BuyProductRequest, ProductRequest, RequestType};
pub use service::{
    BookCustomerService, BookInvoiceService, CustomerInvoices, CustomerService, InvoiceService,
    PurchaseReceipt,
};
pub use store::{InMemoryStore, InvoiceBook, Store};
pub use validator::{CustomerValidator, DirectoryCustomerValidator};
