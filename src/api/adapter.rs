use lambda_runtime::Context;
use serde_json::{Value, json};
use tracing::{debug, info};

use super::event::parse_event;
use super::response::render_response;
use crate::app::Application;
use crate::core::config::AppConfig;
use crate::errors::AdapterError;

const WARMUP_SOURCE: &str = "serverless-plugin-warmup";

/// True for the keep-warm pings scheduled by `serverless-plugin-warmup`.
pub fn is_warmup_event(event: &Value) -> bool {
    event.get("source").and_then(Value::as_str) == Some(WARMUP_SOURCE)
}

/// Runs one event through `app` and returns the platform output record.
///
/// The context is passed through unread.
///
/// # Errors
///
/// Returns `MalformedEvent` if a request cannot be built from `event`.
/// Routing failures and handler failures are responses, not errors.
pub fn adapt(
    app: &Application,
    config: &AppConfig,
    event: &Value,
    _context: &Context,
) -> Result<Value, AdapterError> {
    if is_warmup_event(event) {
        debug!("Warm-up event, skipping dispatch");
        return Ok(json!({}));
    }

    let parsed = parse_event(event, config)?;
    let response = app.dispatch(&parsed.request);

    info!(
        method = %parsed.request.method,
        path = %parsed.request.path,
        status = response.status,
        "Request handled"
    );

    let reply = render_response(&response, parsed.format, config);
    Ok(serde_json::to_value(reply)?)
}
