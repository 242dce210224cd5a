use serde::Deserialize;

/// Errors surfaced by the client data layer.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server rejected the request (bad input, unknown type, conflict).
    #[error("{0}")]
    Validation(String),

    /// The target widget does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The request did not complete: network failure or a server-side error.
    #[error("Request failed: {0}")]
    Transient(String),

    /// The server answered with a body the client could not read.
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// An independent-mode reorder where some position writes failed.
    #[error("Reorder partially applied ({committed} saved, {failed} failed): {first}")]
    PartialReorder {
        committed: usize,
        failed: usize,
        first: Box<ClientError>,
    },
}

/// Error body produced by the API (`{ "error": ..., "code": ... }`).
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: String,
}

impl ClientError {
    /// Classify a non-2xx response.
    ///
    /// 400/409/422 are validation failures, 404 is not-found, everything
    /// else (5xx, 408, ...) is transient.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ApiErrorBody>(body)
            .map(|b| b.error)
            .unwrap_or_else(|_| format!("HTTP {status}"));

        match status {
            400 | 409 | 422 => ClientError::Validation(message),
            404 => ClientError::NotFound(message),
            _ => ClientError::Transient(message),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound(_))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Transient(err.to_string())
        }
    }
}
