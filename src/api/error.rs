//! Error types exposed by the catalogue API layer.

use thiserror::Error;

/// Errors surfaced while encoding queries or communicating with the service.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// No access token was provided or stored.
    #[error("access token is required")]
    MissingToken,

    /// The configured base URL could not be parsed.
    #[error("service URL is invalid: {0}")]
    InvalidUrl(String),

    /// The requested resource name is not part of the catalogue.
    #[error("unknown resource: {name}")]
    UnknownResource {
        /// The resource name that could not be resolved.
        name: String,
    },

    /// Invalid pagination parameters.
    #[error("invalid pagination: {message}")]
    InvalidPagination {
        /// Description of the invalid parameter.
        message: String,
    },

    /// A sort token could not be parsed.
    #[error("invalid sort token: {token}")]
    InvalidSort {
        /// The offending token.
        token: String,
    },

    /// The service rejected the payload with a validation error (HTTP 422).
    ///
    /// The detail string has already been prettified for display: literal
    /// parentheses are stripped and `=` is replaced with a space.
    #[error("validation error: {detail}")]
    Validation {
        /// Prettified validation detail from the response body.
        detail: String,
    },

    /// The credentials or token were rejected (HTTP 401/403).
    #[error("authentication failed: {message}")]
    Authentication {
        /// Error detail returned with the 401/403 response.
        message: String,
    },

    /// The service returned a non-success status outside the taxonomy above.
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code of the response.
        status: u16,
        /// Response body detail describing the failure.
        message: String,
    },

    /// Networking failed while calling the service.
    #[error("network error talking to the catalogue service: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },

    /// Configuration could not be loaded or is incomplete.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },
}

/// Strips literal parentheses and replaces `=` with a space so raw service
/// validation details read cleanly in a terminal.
#[must_use]
pub fn prettify_error_detail(detail: &str) -> String {
    detail.replace(['(', ')'], "").replace('=', " ")
}

#[cfg(test)]
mod tests {
    use super::prettify_error_detail;

    #[test]
    fn prettify_strips_parentheses_and_equals() {
        let raw = "Key (title)=(Persona 5) already exists.";
        assert_eq!(
            prettify_error_detail(raw),
            "Key title Persona 5 already exists."
        );
    }

    #[test]
    fn prettify_leaves_plain_messages_untouched() {
        assert_eq!(prettify_error_detail("Game not found"), "Game not found");
    }
}
