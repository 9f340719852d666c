//! Exact-match route table and dispatch.
//!
//! Routes are registered on an [`ApplicationBuilder`] during startup and
//! frozen into an [`Application`], which exposes no way to mutate the table.
//! Dispatch converts every request-level failure into a response:
//! - no matching route: 404
//! - handler error or panic: 500

use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};

use tracing::{error, info, warn};

use crate::core::models::{Request, Response};
use crate::errors::HandlerError;

/// Route handler. Plain function pointers keep the table `Send + Sync`
/// without boxing.
pub type Handler = fn(&Request) -> Result<Response, HandlerError>;

const NOT_FOUND_BODY: &str = "<!doctype html>\n<html lang=en>\n<title>404 Not Found</title>\n\
<h1>Not Found</h1>\n<p>The requested URL was not found on the server.</p>\n";

const INTERNAL_ERROR_BODY: &str = "<!doctype html>\n<html lang=en>\n\
<title>500 Internal Server Error</title>\n<h1>Internal Server Error</h1>\n\
<p>The server encountered an internal error and was unable to complete your request.</p>\n";

#[derive(Debug, Default)]
pub struct ApplicationBuilder {
    routes: HashMap<(String, String), Handler>,
}

impl ApplicationBuilder {
    /// Binds `handler` to `method` and `path`. A later registration for the
    /// same pair replaces the earlier one.
    #[must_use]
    pub fn register(mut self, method: &str, path: &str, handler: Handler) -> Self {
        let key = (method.to_ascii_uppercase(), path.to_string());
        if self.routes.insert(key, handler).is_some() {
            warn!(method = %method, path = %path, "Route registered twice, keeping the last one");
        }
        self
    }

    #[must_use]
    pub fn build(self) -> Application {
        Application {
            routes: self.routes,
        }
    }
}

#[derive(Debug)]
pub struct Application {
    routes: HashMap<(String, String), Handler>,
}

impl Application {
    #[must_use]
    pub fn builder() -> ApplicationBuilder {
        ApplicationBuilder::default()
    }

    #[must_use]
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn dispatch(&self, request: &Request) -> Response {
        let key = (request.method.to_ascii_uppercase(), request.path.clone());
        let Some(handler) = self.routes.get(&key) else {
            info!(method = %request.method, path = %request.path, "No route matched");
            return Response::html(404, NOT_FOUND_BODY);
        };

        match catch_unwind(AssertUnwindSafe(|| handler(request))) {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                error!(method = %request.method, path = %request.path, "Handler error: {}", e);
                Response::html(500, INTERNAL_ERROR_BODY)
            }
            Err(_) => {
                error!(method = %request.method, path = %request.path, "Handler panicked");
                Response::html(500, INTERNAL_ERROR_BODY)
            }
        }
    }
}
