//! libcurl-backed `Fetch` (blocking, one Easy handle per request).

use std::time::Duration;

use super::{is_success, Fetch, Page};
use crate::config::HttpConfig;
use crate::error::FetchError;

const MAX_REDIRECTS: u32 = 10;

/// Blocking HTTP client built on the `curl` crate.
///
/// Runs in the current thread; call from `spawn_blocking` if used from async code.
#[derive(Debug, Clone)]
pub struct CurlFetcher {
    http: HttpConfig,
}

impl CurlFetcher {
    pub fn new(http: HttpConfig) -> Self {
        Self { http }
    }

    fn easy(&self, url: &str) -> Result<curl::easy::Easy, curl::Error> {
        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.max_redirections(MAX_REDIRECTS)?;
        // Body of a >= 400 response is never delivered to the write callback.
        easy.fail_on_error(true)?;
        easy.useragent(&self.http.user_agent)?;
        easy.connect_timeout(Duration::from_secs(self.http.connect_timeout_secs))?;
        easy.timeout(Duration::from_secs(self.http.timeout_secs))?;
        easy.low_speed_limit(self.http.low_speed_limit_bytes)?;
        easy.low_speed_time(Duration::from_secs(self.http.low_speed_time_secs))?;
        easy.buffer_size(self.http.chunk_size)?;
        Ok(easy)
    }

    /// Run a GET, passing body bytes to `on_chunk`. Returns the finished handle
    /// so callers can read the effective URL.
    fn perform(
        &self,
        url: &str,
        on_chunk: &mut dyn FnMut(&[u8]),
    ) -> Result<curl::easy::Easy, FetchError> {
        let transport = |e: curl::Error| FetchError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        };

        let mut easy = self.easy(url).map_err(transport)?;
        let performed;
        {
            let mut transfer = easy.transfer();
            transfer
                .write_function(|data| {
                    on_chunk(data);
                    Ok(data.len())
                })
                .map_err(transport)?;
            performed = transfer.perform();
        }

        let code = easy.response_code().unwrap_or(0);
        if let Err(e) = performed {
            if e.is_http_returned_error() && code != 0 {
                return Err(FetchError::Status {
                    url: url.to_string(),
                    status: code,
                });
            }
            return Err(transport(e));
        }
        if !is_success(code) {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: code,
            });
        }
        tracing::debug!(url, status = code, "GET complete");
        Ok(easy)
    }
}

impl Fetch for CurlFetcher {
    fn text(&self, url: &str) -> Result<Page, FetchError> {
        let mut body: Vec<u8> = Vec::new();
        let easy = self.perform(url, &mut |data| body.extend_from_slice(data))?;
        let effective = easy
            .effective_url()
            .ok()
            .flatten()
            .unwrap_or(url)
            .to_string();
        Ok(Page {
            url: effective,
            body: String::from_utf8_lossy(&body).into_owned(),
        })
    }

    fn stream(&self, url: &str, on_chunk: &mut dyn FnMut(&[u8])) -> Result<u64, FetchError> {
        let mut delivered = 0u64;
        self.perform(url, &mut |data| {
            delivered += data.len() as u64;
            on_chunk(data);
        })?;
        Ok(delivered)
    }
}
