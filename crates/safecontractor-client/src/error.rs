use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx response. The message is the service's `detail` field when it
    /// sent one, else "HTTP error! Status: <code>".
    #[error("{0}")]
    Remote(String),

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("contractor not found")]
    NotFound,
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}
