use std::env;

use crate::errors::AdapterError;

/// Adapter settings. Every variable is optional; an empty environment
/// yields the identity mapping between events and requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Custom-domain base path removed from incoming paths, without slashes.
    pub api_gateway_base_path: Option<String>,
    /// Extra content types returned as text instead of base64.
    pub text_mime_types: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AdapterError> {
        Self::from_vars(
            env::var("API_GATEWAY_BASE_PATH").ok(),
            env::var("TEXT_MIME_TYPES").ok(),
        )
    }

    /// Builds a config from raw variable values, as `from_env` reads them.
    pub fn from_vars(
        base_path: Option<String>,
        text_mime_types: Option<String>,
    ) -> Result<Self, AdapterError> {
        let api_gateway_base_path = base_path
            .map(|p| p.trim_matches('/').to_string())
            .filter(|p| !p.is_empty());

        if let Some(p) = &api_gateway_base_path {
            if p.contains(char::is_whitespace) {
                return Err(AdapterError::Config(format!(
                    "API_GATEWAY_BASE_PATH: contains whitespace: {:?}",
                    p
                )));
            }
        }

        let mut mime_types = Vec::new();
        for raw in text_mime_types.iter().flat_map(|s| s.split(',')) {
            let m = raw.trim().to_ascii_lowercase();
            if m.is_empty() {
                continue;
            }
            if !m.contains('/') {
                return Err(AdapterError::Config(format!(
                    "TEXT_MIME_TYPES: {:?} is not a media type",
                    m
                )));
            }
            mime_types.push(m);
        }

        Ok(Self {
            api_gateway_base_path,
            text_mime_types: mime_types,
        })
    }
}
