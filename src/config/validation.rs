//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the bind address parses as a socket address
//! - Check non-empty origin URLs are absolute http/https URLs
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Empty origin URLs are tolerated: requests resolving to one fail at
//!   the request boundary, not at startup
//! - Validation is a pure function over ProxyConfig

use std::net::SocketAddr;

use url::Url;

use crate::config::schema::ProxyConfig;

/// A single semantic problem found in a config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    InvalidBindAddress(String),
    InvalidOriginUrl {
        condition: &'static str,
        url: String,
        reason: String,
    },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::InvalidBindAddress(addr) => {
                write!(f, "invalid bind address '{}'", addr)
            }
            ValidationError::InvalidOriginUrl {
                condition,
                url,
                reason,
            } => write!(
                f,
                "invalid origin URL '{}' for condition {}: {}",
                url, condition, reason
            ),
        }
    }
}

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    let origins = [
        ("A", &config.origins.a_url),
        ("B", &config.origins.b_url),
        ("DEFAULT", &config.origins.default_url),
    ];
    for (condition, url) in origins {
        if url.is_empty() {
            continue;
        }
        match Url::parse(url) {
            Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https" => {}
            Ok(parsed) => errors.push(ValidationError::InvalidOriginUrl {
                condition,
                url: url.clone(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            }),
            Err(e) => errors.push(ValidationError::InvalidOriginUrl {
                condition,
                url: url.clone(),
                reason: e.to_string(),
            }),
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
