//! libcurl-backed GET returning the body as text.

use std::time::Duration;

use super::{FetchError, TextFetcher};
use crate::config::HttpConfig;

const MAX_REDIRECTIONS: u32 = 10;

/// Blocking GET client. One curl easy handle per request, so a single
/// `CurlFetcher` can be shared by every worker of the fetch pool.
#[derive(Debug, Clone)]
pub struct CurlFetcher {
    connect_timeout: Duration,
    timeout: Duration,
    user_agent: Option<String>,
}

impl CurlFetcher {
    pub fn new(cfg: &HttpConfig) -> Self {
        Self {
            connect_timeout: cfg.connect_timeout(),
            timeout: cfg.timeout(),
            user_agent: cfg.user_agent.clone(),
        }
    }
}

impl Default for CurlFetcher {
    fn default() -> Self {
        Self::new(&HttpConfig::default())
    }
}

impl TextFetcher for CurlFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let mut body: Vec<u8> = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.max_redirections(MAX_REDIRECTIONS)?;
        // Empty string = accept every encoding libcurl was built with; bodies arrive decoded.
        easy.accept_encoding("")?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(self.timeout)?;
        if let Some(ua) = &self.user_agent {
            easy.useragent(ua)?;
        }

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let code = easy.response_code()?;
        if !(200..300).contains(&code) {
            return Err(FetchError::Status(code));
        }

        String::from_utf8(body).map_err(|_| FetchError::Decode)
    }
}
