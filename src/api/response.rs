//! [`Response`] -> platform output record.
//!
//! The reply mirrors the shape of the event that produced it, so a
//! `multiValueHeaders` event gets `multiValueHeaders` back and a payload 2.0
//! event gets its `Set-Cookie` values in `cookies`.

use std::collections::BTreeMap;

use base64::{Engine as _, engine::general_purpose};
use serde::Serialize;

use super::event::EventFormat;
use crate::core::config::AppConfig;
use crate::core::models::Response;

const TEXT_MIME_TYPES: &[&str] = &[
    "application/json",
    "application/javascript",
    "application/xml",
    "application/vnd.api+json",
    "image/svg+xml",
];

/// Output record for API Gateway and ALB proxy integrations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyResponse {
    pub status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multi_value_headers: Option<BTreeMap<String, Vec<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cookies: Option<Vec<String>>,
    pub body: String,
    pub is_base64_encoded: bool,
}

/// Whether a body with this `Content-Type` can travel as a plain string.
pub fn is_text_mime_type(content_type: &str, config: &AppConfig) -> bool {
    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    media_type.starts_with("text/")
        || media_type.ends_with("+json")
        || media_type.ends_with("+xml")
        || TEXT_MIME_TYPES.contains(&media_type.as_str())
        || config.text_mime_types.iter().any(|m| *m == media_type)
}

/// Returns the body string and whether it is base64 encoded.
///
/// Bodies without a content type, with a binary content type, or with bytes
/// that are not UTF-8 are base64 encoded. Empty bodies are always text.
pub fn encode_body(response: &Response, config: &AppConfig) -> (String, bool) {
    if response.body.is_empty() {
        return (String::new(), false);
    }

    let is_text = response
        .content_type()
        .is_some_and(|ct| is_text_mime_type(ct, config));
    if is_text {
        if let Ok(text) = std::str::from_utf8(&response.body) {
            return (text.to_string(), false);
        }
    }

    (general_purpose::STANDARD.encode(&response.body), true)
}

pub fn render_response(
    response: &Response,
    format: EventFormat,
    config: &AppConfig,
) -> ProxyResponse {
    let (body, is_base64_encoded) = encode_body(response, config);
    let mut out = ProxyResponse {
        status_code: response.status,
        headers: None,
        multi_value_headers: None,
        cookies: None,
        body,
        is_base64_encoded,
    };

    let grouped = response.headers.grouped();
    match format {
        EventFormat::RestMultiValue => {
            out.multi_value_headers = Some(
                grouped
                    .into_iter()
                    .map(|(name, values)| {
                        (name.to_string(), values.into_iter().map(str::to_string).collect())
                    })
                    .collect(),
            );
        }
        EventFormat::Rest => {
            out.headers = Some(single_value_headers(grouped));
        }
        EventFormat::Http => {
            let (cookies, rest): (Vec<_>, Vec<_>) = grouped
                .into_iter()
                .partition(|(name, _)| name.eq_ignore_ascii_case("set-cookie"));
            let cookies: Vec<String> = cookies
                .into_iter()
                .flat_map(|(_, v)| v)
                .map(str::to_string)
                .collect();
            out.headers = Some(joined_headers(rest));
            if !cookies.is_empty() {
                out.cookies = Some(cookies);
            }
        }
    }

    out
}

fn joined_headers(grouped: Vec<(&str, Vec<&str>)>) -> BTreeMap<String, String> {
    grouped
        .into_iter()
        .map(|(name, values)| (name.to_string(), values.join(", ")))
        .collect()
}

/// Single-value header map. Repeated `Set-Cookie` values cannot be
/// comma-joined, so each one goes out under a differently cased name.
fn single_value_headers(grouped: Vec<(&str, Vec<&str>)>) -> BTreeMap<String, String> {
    let (cookies, rest): (Vec<_>, Vec<_>) = grouped
        .into_iter()
        .partition(|(name, _)| name.eq_ignore_ascii_case("set-cookie"));

    let mut headers = joined_headers(rest);
    for (name, values) in cookies {
        let names = case_variants(name, values.len());
        let last = names.len() - 1;
        for (i, value) in values.iter().enumerate().take(last) {
            headers.insert(names[i].clone(), (*value).to_string());
        }
        // More values than casings: the overflow shares the last name
        headers.insert(names[last].clone(), values[last..].join(", "));
    }
    headers
}

/// Up to `count` distinct ASCII casings of `name`, starting with `name`
/// itself. Always returns at least one entry.
pub fn case_variants(name: &str, count: usize) -> Vec<String> {
    let letters = name.chars().filter(char::is_ascii_alphabetic).count().min(16);
    let mut out = vec![name.to_string()];
    let mut mask: u32 = 0;

    while out.len() < count && mask < (1 << letters) {
        let mut bit = 0;
        let variant: String = name
            .chars()
            .map(|c| {
                if !c.is_ascii_alphabetic() {
                    return c;
                }
                let upper = (mask >> bit) & 1 == 1;
                bit += 1;
                if upper {
                    c.to_ascii_uppercase()
                } else {
                    c.to_ascii_lowercase()
                }
            })
            .collect();
        if !out.contains(&variant) {
            out.push(variant);
        }
        mask += 1;
    }
    out
}
