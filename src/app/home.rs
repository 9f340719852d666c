use crate::core::models::{Request, Response};
use crate::errors::HandlerError;

pub const GREETING: &str = "Hello from Flask + serverless-wsgi in a Lambda layer!";

/// `GET /`. Ignores the request entirely.
pub fn home(_request: &Request) -> Result<Response, HandlerError> {
    Ok(Response::html(200, GREETING))
}
