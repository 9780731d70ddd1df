use thiserror::Error;

/// Errors produced by the client and the webhook decoder.
#[derive(Debug, Error)]
pub enum Error {
    /// The API key given to [`crate::Client::new`] was empty.
    #[error("API key is empty")]
    EmptyApiKey,

    /// A required check token argument was empty. Raised before any
    /// request is sent.
    #[error("check token is empty")]
    EmptyToken,

    /// A webhook payload was not valid JSON, or a recognized event
    /// carried a structurally invalid body.
    #[error("malformed webhook payload: {0}")]
    MalformedPayload(#[source] serde_json::Error),

    /// The request could not be sent (DNS, connect, TLS, ...).
    #[error("can't send request to API: {0}")]
    Transport(#[source] reqwest::Error),

    /// The API answered with a status outside the 2xx range.
    #[error("API returned non-ok status code {0}")]
    Status(u16),

    /// The response body arrived but did not match the expected shape.
    #[error("can't decode API response: {0}")]
    Decode(#[source] serde_json::Error),
}

impl Error {
    /// HTTP status carried by [`Error::Status`], if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status(code) => Some(*code),
            _ => None,
        }
    }
}
