//! HTTP GET capability used by extractors (page text) and the verifier (streamed bytes).
//!
//! Any final status outside 2xx is reported as `FetchError::Status`; error
//! pages are never returned as content.

mod cache;
mod transport;
#[cfg(test)]
pub(crate) mod fixture;

pub use self::cache::CachedFetch;
pub use self::transport::CurlFetcher;

use crate::error::FetchError;

/// A fetched text page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Effective URL after redirects.
    pub url: String,
    pub body: String,
}

pub trait Fetch {
    /// GET `url` and return the whole body as text.
    fn text(&self, url: &str) -> Result<Page, FetchError>;

    /// GET `url` and hand the body to `on_chunk` as it arrives.
    /// Returns the number of body bytes delivered.
    fn stream(&self, url: &str, on_chunk: &mut dyn FnMut(&[u8])) -> Result<u64, FetchError>;
}

impl<F: Fetch + ?Sized> Fetch for &F {
    fn text(&self, url: &str) -> Result<Page, FetchError> {
        (**self).text(url)
    }

    fn stream(&self, url: &str, on_chunk: &mut dyn FnMut(&[u8])) -> Result<u64, FetchError> {
        (**self).stream(url, on_chunk)
    }
}

/// True for HTTP 2xx.
pub(crate) fn is_success(code: u32) -> bool {
    (200..300).contains(&code)
}
