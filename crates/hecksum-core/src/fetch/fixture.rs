//! In-memory `Fetch` for unit tests: serves recorded vendor pages by URL.

use std::cell::RefCell;
use std::collections::HashMap;

use super::{Fetch, Page};
use crate::error::FetchError;

/// Bodies are streamed in chunks this small so hashing is exercised incrementally.
const STREAM_CHUNK: usize = 3;

#[derive(Debug, Clone)]
enum Route {
    Body(Vec<u8>),
    Status(u32),
    Redirect(String),
}

#[derive(Debug, Default)]
pub(crate) struct FixtureFetch {
    routes: HashMap<String, Route>,
    hits: RefCell<HashMap<String, usize>>,
}

impl FixtureFetch {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn page(self, url: &str, body: &str) -> Self {
        self.bytes(url, body.as_bytes())
    }

    pub(crate) fn bytes(mut self, url: &str, body: &[u8]) -> Self {
        self.routes.insert(url.to_string(), Route::Body(body.to_vec()));
        self
    }

    pub(crate) fn status(mut self, url: &str, status: u32) -> Self {
        self.routes.insert(url.to_string(), Route::Status(status));
        self
    }

    /// `url` answers with a redirect to `to`, which must itself be routed.
    pub(crate) fn redirect(mut self, url: &str, to: &str) -> Self {
        self.routes
            .insert(url.to_string(), Route::Redirect(to.to_string()));
        self
    }

    /// Number of requests made for `url` (redirect hops count for the hop URL only).
    pub(crate) fn requests(&self, url: &str) -> usize {
        self.hits.borrow().get(url).copied().unwrap_or(0)
    }

    fn resolve(&self, url: &str) -> Result<(String, Vec<u8>), FetchError> {
        *self.hits.borrow_mut().entry(url.to_string()).or_default() += 1;
        let mut current = url.to_string();
        for _ in 0..10 {
            match self.routes.get(&current) {
                Some(Route::Body(body)) => return Ok((current, body.clone())),
                Some(Route::Status(status)) => {
                    return Err(FetchError::Status {
                        url: url.to_string(),
                        status: *status,
                    })
                }
                Some(Route::Redirect(to)) => current = to.clone(),
                None => {
                    return Err(FetchError::Transport {
                        url: url.to_string(),
                        message: "could not resolve host".to_string(),
                    })
                }
            }
        }
        Err(FetchError::Transport {
            url: url.to_string(),
            message: "too many redirects".to_string(),
        })
    }
}

impl Fetch for FixtureFetch {
    fn text(&self, url: &str) -> Result<Page, FetchError> {
        let (effective, body) = self.resolve(url)?;
        Ok(Page {
            url: effective,
            body: String::from_utf8_lossy(&body).into_owned(),
        })
    }

    fn stream(&self, url: &str, on_chunk: &mut dyn FnMut(&[u8])) -> Result<u64, FetchError> {
        let (_, body) = self.resolve(url)?;
        for chunk in body.chunks(STREAM_CHUNK) {
            on_chunk(chunk);
        }
        Ok(body.len() as u64)
    }
}
