//! Per-run memoization of text pages.
//!
//! Multi-variant extractors read the same constants page or manifest once per
//! variant; wrapping the fetcher keeps that to one request per URL.

use std::cell::RefCell;
use std::collections::HashMap;

use super::{Fetch, Page};
use crate::error::FetchError;

/// Caches successful `text` responses by requested URL. Failures and streams are not cached.
pub struct CachedFetch<F> {
    inner: F,
    pages: RefCell<HashMap<String, Page>>,
}

impl<F: Fetch> CachedFetch<F> {
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            pages: RefCell::new(HashMap::new()),
        }
    }

    pub fn cached_pages(&self) -> usize {
        self.pages.borrow().len()
    }
}

impl<F: Fetch> Fetch for CachedFetch<F> {
    fn text(&self, url: &str) -> Result<Page, FetchError> {
        if let Some(page) = self.pages.borrow().get(url) {
            tracing::trace!(url, "page cache hit");
            return Ok(page.clone());
        }
        let page = self.inner.text(url)?;
        self.pages
            .borrow_mut()
            .insert(url.to_string(), page.clone());
        Ok(page)
    }

    fn stream(&self, url: &str, on_chunk: &mut dyn FnMut(&[u8])) -> Result<u64, FetchError> {
        self.inner.stream(url, on_chunk)
    }
}
