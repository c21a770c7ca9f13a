//! Provider error types
//!
//! Every adapter failure is categorized into this taxonomy before it
//! crosses the provider boundary; raw transport errors never escape.
//! Messages are sanitized and human-actionable - upstream error bodies
//! and credentials go to the debug log, not into the error.

use thiserror::Error;

/// Errors that can occur during provider operations
///
/// Each variant is tagged with the originating provider name so callers
/// can render backend-specific remediation guidance.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("[{provider}] {message}")]
    Credentials { provider: &'static str, message: String },

    #[error("[{provider}] Rate limit exceeded. Please wait a moment and try again.")]
    RateLimited { provider: &'static str },

    #[error("[{provider}] API error {status}: {message}")]
    Api {
        provider: &'static str,
        status: u16,
        message: String,
    },

    #[error("[{provider}] {message}")]
    Network { provider: &'static str, message: String },

    #[error("[{provider}] AI service returned an empty response. Please try again.")]
    EmptyResponse { provider: &'static str },

    #[error("[{provider}] {message}")]
    InvalidResponse { provider: &'static str, message: String },
}

impl ProviderError {
    /// Name of the provider the error originated from
    pub fn provider(&self) -> &'static str {
        match self {
            Self::Credentials { provider, .. }
            | Self::RateLimited { provider }
            | Self::Api { provider, .. }
            | Self::Network { provider, .. }
            | Self::EmptyResponse { provider }
            | Self::InvalidResponse { provider, .. } => provider,
        }
    }

    /// Missing or rejected credentials
    pub fn credentials(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Credentials {
            provider,
            message: message.into(),
        }
    }

    /// Upstream payload that could not be understood
    pub fn invalid_response(provider: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            provider,
            message: message.into(),
        }
    }

    /// Categorize a transport-level failure
    ///
    /// The raw reqwest error is logged by the caller; only a generic,
    /// actionable description is carried in the message.
    pub fn network(provider: &'static str, error: &reqwest::Error) -> Self {
        let message = if error.is_timeout() {
            "Request timed out. Try again with a simpler project description.".to_string()
        } else if error.is_connect() {
            "Network connection error. Check your internet connection and firewall settings.".to_string()
        } else {
            "Cannot reach the service. Check your internet connection or try again in a few moments.".to_string()
        };
        Self::Network { provider, message }
    }

    /// Categorize a non-success HTTP status
    ///
    /// Maps common statuses to remediation guidance; the response body is
    /// never included in the message.
    pub fn from_status(provider: &'static str, status: u16) -> Self {
        match status {
            401 | 403 => Self::Credentials {
                provider,
                message: format!("Authentication failed ({}). Please verify your configuration.", status),
            },
            429 => Self::RateLimited { provider },
            408 | 504 => Self::Api {
                provider,
                status,
                message: "Request timeout. Try again with a simpler project description.".to_string(),
            },
            500 | 502 | 503 => Self::Api {
                provider,
                status,
                message: "Service temporarily unavailable. Please try again in a few minutes.".to_string(),
            },
            _ => Self::Api {
                provider,
                status,
                message: "Request failed. Check your configuration and try again.".to_string(),
            },
        }
    }

    /// Check if this is a rate limit error
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }

    /// Check if this is an authentication/credentials error
    pub fn is_credentials(&self) -> bool {
        matches!(self, Self::Credentials { .. })
    }
}

/// Factory error: the configured provider type name is not in the registry
///
/// Carries the offending identifier exactly as configured (case preserved),
/// even though registry matching is case-insensitive.
#[derive(Debug, Error)]
#[error("Unsupported AI provider: \"{0}\"")]
pub struct UnsupportedProviderError(pub String);
