//! Application startup utilities module.

mod http;

pub use http::lock_server;
