//! Lambda entry point: loads config, adapts the event, and turns adapter
//! failures into invocation failures.

use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use tracing::{error, info};

use super::adapter::adapt;
use crate::app::application;
use crate::core::config::AppConfig;

pub use self::function_handler as handler;

/// Lambda handler for HTTP proxy events.
///
/// # Errors
///
/// Fails the invocation when configuration is invalid or the event is not a
/// usable HTTP event; every request-level outcome is an `Ok` response.
#[tracing::instrument(level = "info", skip(event))]
pub async fn function_handler(event: LambdaEvent<Value>) -> Result<Value, Error> {
    let config = AppConfig::from_env().map_err(|e| {
        error!("Config error: {}", e);
        Error::from(e)
    })?;

    #[cfg(feature = "debug-logs")]
    info!(request_id = %event.context.request_id, "Received event: {:?}", event.payload);

    #[cfg(not(feature = "debug-logs"))]
    info!(request_id = %event.context.request_id, "Received event");

    adapt(application(), &config, &event.payload, &event.context).map_err(|e| {
        error!(request_id = %event.context.request_id, "Failed to adapt event: {}", e);
        Error::from(e)
    })
}
