//! Log traffic harness library.
//!
//! An HTTP service that emits synthetic log traffic at every severity,
//! simulated latency, and simulated failures, for exercising a downstream
//! log-aggregation pipeline.

pub mod config;
pub mod error;
pub mod harness;
pub mod http;
pub mod lifecycle;
pub mod observability;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::HarnessConfig;
pub use error::AppError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
