//! Sling Server - HTTP surface of the lock manager
//!
//! Exposes the six lock and service lifecycle operations as JSON POST
//! endpoints, plus `/health` and an optional Prometheus `/metrics` page.

pub mod api;
pub mod error;
pub mod metrics;
pub mod model;
pub mod startup;
