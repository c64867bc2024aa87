use thiserror::Error;

#[derive(Error, Debug)]
pub enum CotermError {
    #[error("Dashboard API error (HTTP {status}): {message}")]
    Api {
        status: reqwest::StatusCode,
        message: String,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Interactive prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("{method} {url} failed after {retries} retries")]
    RetriesExhausted {
        method: &'static str,
        url: String,
        retries: u32,
    },

    #[error("Organization '{0}' not found for this API key")]
    OrganizationNotFound(String),

    #[error("Organization '{0}' uses per-device licensing; licenses must be added manually in the dashboard")]
    PerDeviceLicensing(String),
}

pub type Result<T> = std::result::Result<T, CotermError>;

/// Extract the first reported error message from a Dashboard error body.
///
/// Error responses carry the shape `{"errors": ["message", ...]}`. Falls
/// back to the raw body when it does not parse as that envelope.
pub fn first_error_message(body: &str) -> String {
    if let Ok(error_json) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(first) = error_json
            .get("errors")
            .and_then(|e| e.as_array())
            .and_then(|a| a.first())
            .and_then(|m| m.as_str())
        {
            return first.to_string();
        }
    }

    body.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_first_message_from_error_envelope() {
        let body = r#"{"errors": ["License with key Q2XX not found", "second"]}"#;
        assert_eq!(first_error_message(body), "License with key Q2XX not found");
    }

    #[test]
    fn falls_back_to_raw_body() {
        assert_eq!(first_error_message("gateway timeout"), "gateway timeout");
        assert_eq!(
            first_error_message(r#"{"message": "other shape"}"#),
            r#"{"message": "other shape"}"#
        );
    }

    #[test]
    fn empty_errors_array_falls_back() {
        let body = r#"{"errors": []}"#;
        assert_eq!(first_error_message(body), body);
    }
}
