//! `shopdesk-core`: shared domain primitives.
//!
//! Identifiers, the domain error model, and the `Entity` trait. No IO, no HTTP.

pub mod entity;
pub mod error;
pub mod id;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{CustomerId, InvoiceId};
