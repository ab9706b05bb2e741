//! Client configuration.
//!
//! All fields are optional; `ClientConfig::default()` yields a client that
//! sends URLs exactly as given and adds no headers of its own. The struct
//! derives `Deserialize` so hosts can load it from whatever format they keep
//! settings in.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    /// Prefix for relative request URLs.
    pub base_url: Option<String>,
    /// Headers added to every request, before `Content-Type`.
    pub default_headers: Vec<(String, String)>,
}

impl ClientConfig {
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: Some(base_url.trim_end_matches('/').to_string()),
            ..Self::default()
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// Join `url` onto the base URL unless it is already absolute.
    pub fn resolve_url(&self, url: &str) -> String {
        match &self.base_url {
            Some(base) if !is_absolute(url) => {
                let base = base.trim_end_matches('/');
                if url.starts_with('/') {
                    format!("{base}{url}")
                } else {
                    format!("{base}/{url}")
                }
            }
            _ => url.to_string(),
        }
    }
}

fn is_absolute(url: &str) -> bool {
    url.split_once("://").is_some_and(|(scheme, _)| {
        !scheme.is_empty()
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}
