//! HTTP API: invoice purchase endpoints, response envelopes, and server wiring.

pub mod app;
pub mod config;
pub mod context;
