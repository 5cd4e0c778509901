//! Text fetching over HTTP.
//!
//! The rest of the crate only depends on [`TextFetcher`]; the libcurl-backed
//! [`CurlFetcher`] is the production implementation and tests inject their own.

mod easy;
mod pool;

pub use easy::CurlFetcher;
pub use pool::{fetch_all, run_bounded};

/// Why a single GET did not produce usable text.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Curl reported an error (timeout, connection, DNS, bad URL, ...).
    #[error("transport: {0}")]
    Transport(#[from] ::curl::Error),
    /// HTTP response had a non-2xx status.
    #[error("HTTP {0}")]
    Status(u32),
    /// Body was not valid UTF-8 text.
    #[error("response body is not valid UTF-8")]
    Decode,
}

/// Capability to GET a URL and return its body as text.
pub trait TextFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_display() {
        assert_eq!(FetchError::Status(503).to_string(), "HTTP 503");
        assert_eq!(
            FetchError::Decode.to_string(),
            "response body is not valid UTF-8"
        );
    }
}
