pub mod invoices;
pub mod system;
