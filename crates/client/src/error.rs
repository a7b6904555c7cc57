use serde::Deserialize;

/// Errors returned by [`ApiClient`](crate::ApiClient).
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (network, DNS, TLS, decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// A stored token was rejected. It has been cleared; log in again.
    #[error("Session expired, please log in again")]
    SessionExpired,

    /// The API answered with a non-2xx status.
    #[error("API error ({status}) {code}: {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },
}

/// The server's `{ "error", "code" }` body.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
    #[serde(default)]
    pub code: Option<String>,
}

impl ClientError {
    /// Build an [`ClientError::Api`] from a status and raw body. Bodies that
    /// are not the usual JSON shape are kept verbatim as the message.
    pub(crate) fn from_body(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => ClientError::Api {
                status,
                code: parsed.code.unwrap_or_else(|| "UNKNOWN".to_string()),
                message: parsed.error,
            },
            Err(_) => ClientError::Api {
                status,
                code: "UNKNOWN".to_string(),
                message: body.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parses_server_error_body() {
        let err = ClientError::from_body(409, r#"{"error":"User already exists","code":"CONFLICT"}"#);
        assert_matches!(
            err,
            ClientError::Api { status: 409, ref code, ref message }
                if code == "CONFLICT" && message == "User already exists"
        );
    }

    #[test]
    fn keeps_unstructured_body() {
        let err = ClientError::from_body(502, "Bad Gateway");
        assert_matches!(
            err,
            ClientError::Api { status: 502, ref code, ref message }
                if code == "UNKNOWN" && message == "Bad Gateway"
        );
    }
}
