//! Event record -> [`Request`].
//!
//! Accepts the proxy event shapes Lambda delivers for HTTP traffic:
//! - API Gateway REST (payload 1.0), with or without `multiValueHeaders`
//! - Application Load Balancer target events
//! - API Gateway HTTP API / Function URL (payload 2.0)
//!
//! Every request field has a source or a default; only the method and path
//! are required.

use base64::{Engine as _, engine::general_purpose};
use serde_json::{Map, Value};

use crate::core::config::AppConfig;
use crate::core::models::{Headers, Request};
use crate::errors::AdapterError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventFormat {
    /// Payload 1.0 with single-valued `headers`.
    Rest,
    /// Payload 1.0 carrying `multiValueHeaders`; replies use the same shape.
    RestMultiValue,
    /// Payload 2.0 (`version: "2.0"` or `requestContext.http`).
    Http,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEvent {
    pub request: Request,
    pub format: EventFormat,
}

pub fn detect_format(event: &Value) -> EventFormat {
    let is_v2 = event.get("version").and_then(Value::as_str) == Some("2.0")
        || event.pointer("/requestContext/http").is_some();
    if is_v2 {
        EventFormat::Http
    } else if event.get("multiValueHeaders").is_some_and(Value::is_object) {
        EventFormat::RestMultiValue
    } else {
        EventFormat::Rest
    }
}

/// Builds the request for one invocation.
///
/// # Errors
///
/// `MalformedEvent` when the event is not an object, lacks a method or
/// path, or carries fields of the wrong type.
pub fn parse_event(event: &Value, config: &AppConfig) -> Result<ParsedEvent, AdapterError> {
    if !event.is_object() {
        return Err(AdapterError::MalformedEvent("event is not a JSON object".to_string()));
    }

    let format = detect_format(event);
    let (method, path) = match format {
        EventFormat::Http => (
            required_str(event, "/requestContext/http/method", "requestContext.http.method")?,
            required_str(event, "/rawPath", "rawPath")?,
        ),
        EventFormat::Rest | EventFormat::RestMultiValue => (
            required_str(event, "/httpMethod", "httpMethod")?,
            required_str(event, "/path", "path")?,
        ),
    };

    let mut headers = match format {
        EventFormat::RestMultiValue => multi_value_headers(event)?,
        EventFormat::Rest | EventFormat::Http => single_value_headers(event)?,
    };
    if format == EventFormat::Http {
        let cookies = string_array(event, "cookies")?;
        if !cookies.is_empty() {
            headers.insert("Cookie", cookies.join("; "));
        }
    }

    let request = Request {
        method: method.to_string(),
        path: strip_base_path(path, config.api_gateway_base_path.as_deref()),
        headers,
        query: query_params(event, format)?,
        body: body_bytes(event)?,
    };

    Ok(ParsedEvent { request, format })
}

fn required_str<'a>(event: &'a Value, pointer: &str, name: &str) -> Result<&'a str, AdapterError> {
    match event.pointer(pointer) {
        None | Some(Value::Null) => Err(AdapterError::MalformedEvent(format!("missing {}", name))),
        Some(Value::String(s)) if s.is_empty() => {
            Err(AdapterError::MalformedEvent(format!("empty {}", name)))
        }
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(_) => Err(AdapterError::MalformedEvent(format!(
            "{} is not a string",
            name
        ))),
    }
}

/// Optional object field; `null` and absence both read as an empty map.
fn optional_object<'a>(
    event: &'a Value,
    key: &str,
) -> Result<Option<&'a Map<String, Value>>, AdapterError> {
    match event.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(_) => Err(AdapterError::MalformedEvent(format!(
            "{} is not an object",
            key
        ))),
    }
}

fn string_array<'a>(event: &'a Value, key: &str) -> Result<Vec<&'a str>, AdapterError> {
    match event.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items.iter().filter_map(Value::as_str).collect()),
        Some(_) => Err(AdapterError::MalformedEvent(format!(
            "{} is not an array",
            key
        ))),
    }
}

fn single_value_headers(event: &Value) -> Result<Headers, AdapterError> {
    let mut headers = Headers::new();
    if let Some(map) = optional_object(event, "headers")? {
        for (name, value) in map {
            if let Some(v) = value.as_str() {
                headers.append(name.as_str(), v);
            }
        }
    }
    Ok(headers)
}

fn multi_value_headers(event: &Value) -> Result<Headers, AdapterError> {
    let mut headers = Headers::new();
    if let Some(map) = optional_object(event, "multiValueHeaders")? {
        for (name, values) in map {
            for v in values.as_array().into_iter().flatten().filter_map(Value::as_str) {
                headers.append(name.as_str(), v);
            }
        }
    }
    Ok(headers)
}

fn query_params(event: &Value, format: EventFormat) -> Result<Vec<(String, String)>, AdapterError> {
    // ALB forwards the query string exactly as the client sent it.
    let needs_decoding = event.pointer("/requestContext/elb").is_some();
    let decode = |s: &str| {
        if needs_decoding {
            decode_component(s)
        } else {
            s.to_string()
        }
    };

    if format == EventFormat::Http {
        if let Some(raw) = event.get("rawQueryString").and_then(Value::as_str) {
            return Ok(parse_query_string(raw));
        }
    }

    if let Some(map) = optional_object(event, "multiValueQueryStringParameters")? {
        let mut params = Vec::new();
        for (name, values) in map {
            for v in values.as_array().into_iter().flatten().filter_map(Value::as_str) {
                params.push((decode(name.as_str()), decode(v)));
            }
        }
        return Ok(params);
    }

    if let Some(map) = optional_object(event, "queryStringParameters")? {
        return Ok(map
            .iter()
            .filter_map(|(name, v)| v.as_str().map(|v| (decode(name.as_str()), decode(v))))
            .collect());
    }

    Ok(event
        .get("rawQueryString")
        .and_then(Value::as_str)
        .map(parse_query_string)
        .unwrap_or_default())
}

/// Splits and decodes an `a=1&b=2` query string. Keys without `=` get an
/// empty value.
pub fn parse_query_string(raw: &str) -> Vec<(String, String)> {
    raw.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (decode_component(k), decode_component(v)),
            None => (decode_component(pair), String::new()),
        })
        .collect()
}

fn decode_component(s: &str) -> String {
    let spaced = s.replace('+', " ");
    urlencoding::decode(&spaced).map_or_else(|_| spaced.clone(), |d| d.into_owned())
}

fn body_bytes(event: &Value) -> Result<Vec<u8>, AdapterError> {
    let body = match event.get("body") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::String(s)) => s,
        Some(_) => {
            return Err(AdapterError::MalformedEvent("body is not a string".to_string()));
        }
    };

    let is_base64 = event
        .get("isBase64Encoded")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    if is_base64 {
        Ok(general_purpose::STANDARD.decode(body)?)
    } else {
        Ok(body.as_bytes().to_vec())
    }
}

fn strip_base_path(path: &str, base: Option<&str>) -> String {
    let Some(base) = base else {
        return path.to_string();
    };
    let prefix = format!("/{}", base);
    match path.strip_prefix(&prefix) {
        Some("") => "/".to_string(),
        Some(rest) if rest.starts_with('/') => rest.to_string(),
        _ => path.to_string(),
    }
}
