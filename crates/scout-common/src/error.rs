/// Error types shared across scout crates.
///
/// These cover failures of the external search/LLM provider. Application
/// errors are defined in the service crate and wrap `ProviderError` via
/// `#[from]`.
use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("search provider timed out")]
    Timeout,

    #[error("request failed: {0}")]
    Request(reqwest::Error),

    #[error("upstream returned error: status={status} message={message}")]
    Upstream { status: StatusCode, message: String },

    #[error("upstream reply missing choices[0].message.content")]
    MissingContent,
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        // Timeouts are surfaced distinctly from transport failures so the
        // caller can tell the two apart.
        if e.is_timeout() {
            ProviderError::Timeout
        } else {
            ProviderError::Request(e)
        }
    }
}
