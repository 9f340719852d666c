//! hello-layer - a one-page web application served from AWS Lambda.
//!
//! The crate has two halves:
//! 1. An application with an immutable route table (`GET /` returns a greeting)
//! 2. An invocation adapter that turns API Gateway / ALB proxy events into
//!    requests for that application and renders its responses back
//!
//! # Example
//!
//! ```
//! use hello_layer::api::adapt;
//! use hello_layer::app::{GREETING, application};
//! use hello_layer::core::config::AppConfig;
//!
//! let event = serde_json::json!({
//!     "httpMethod": "GET",
//!     "path": "/",
//!     "headers": {},
//!     "body": null
//! });
//! let context = lambda_runtime::Context::default();
//!
//! let reply = adapt(application(), &AppConfig::default(), &event, &context).unwrap();
//! assert_eq!(reply["statusCode"], 200);
//! assert_eq!(reply["body"], GREETING);
//! ```

// Module declarations
pub mod api;
pub mod app;
pub mod core;
pub mod errors;

pub use errors::{AdapterError, HandlerError};

/// Configure structured logging with JSON format for AWS Lambda environments.
///
/// Output goes to stdout for `CloudWatch` Logs. The level comes from
/// `RUST_LOG` and defaults to `info`. Calling it more than once is harmless.
///
/// # Example
///
/// ```
/// hello_layer::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_target(true)
        .without_time();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
