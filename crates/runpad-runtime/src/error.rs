//! Error types for the runtime crate.

use thiserror::Error;

/// Errors that can occur talking to the remote execution service.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The service answered with a non-2xx status and no usable message.
    #[error("HTTP error {0}")]
    Status(reqwest::StatusCode),

    /// The request never completed (unreachable host, reset, timeout).
    #[error("{0}")]
    Transport(String),

    /// The response body was not the expected JSON.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(#[from] runpad_core::ConfigError),

    /// The lifecycle has been disposed.
    #[error("execution lifecycle disposed")]
    Disposed,

    /// `submit` was called outside a Tokio runtime.
    #[error("no async runtime available to run the request")]
    NoRuntime,
}

/// Result type for runtime operations.
pub type Result<T> = std::result::Result<T, RuntimeError>;

/// Renders an error and its source chain on one line.
pub(crate) fn describe(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RuntimeError::Status(reqwest::StatusCode::BAD_GATEWAY);
        assert_eq!(err.to_string(), "HTTP error 502 Bad Gateway");

        let err = RuntimeError::Transport("connection refused".into());
        assert_eq!(err.to_string(), "connection refused");

        let err = RuntimeError::MalformedResponse("expected value".into());
        assert_eq!(err.to_string(), "malformed response: expected value");
    }

    #[test]
    fn test_error_from_config() {
        let config_err = runpad_core::parse_api_url("nope").unwrap_err();
        let err: RuntimeError = config_err.into();
        assert!(matches!(err, RuntimeError::Config(_)));
    }

    #[test]
    fn test_describe_includes_sources() {
        let inner = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let outer = RuntimeError::Config(runpad_core::ConfigError::Io(inner));
        let text = describe(&outer);

        assert!(text.starts_with("configuration error"));
        assert!(text.contains("refused"));
    }
}
