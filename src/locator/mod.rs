//! Crawl locators: validated (URL, depth) pairs
//!
//! A [`Locator`] is the unit of work that flows through the frontier. It is
//! built once, either as the seed at depth 0 or as the child of a fetched page
//! at the parent's depth plus one, and never changes afterwards.

mod resolve;

pub use resolve::{resolve_reference, Resolution};

use crate::{LocatorError, LocatorResult};
use std::fmt;
use url::Url;

/// The only scheme prefix the crawler accepts
pub const URL_PREFIX: &str = "http://";

/// Hard ceiling on locator depth, independent of any crawl's depth budget
pub const MAX_DEPTH: u32 = 100;

/// A validated URL paired with the depth at which it was discovered
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator {
    url: Url,
    depth: u32,
}

impl Locator {
    /// Builds a locator, validating both the URL and the depth
    ///
    /// # Errors
    ///
    /// * `DepthOutOfRange` - depth is above [`MAX_DEPTH`]
    /// * `InvalidScheme` - the string does not start with `http://`
    /// * `Parse` / `MissingHost` - the string is not a usable URL
    ///
    /// # Example
    ///
    /// ```
    /// use depth_crawl::Locator;
    ///
    /// let loc = Locator::new("http://example.org/docs/index.html", 2).unwrap();
    /// assert_eq!(loc.depth(), 2);
    /// assert!(Locator::new("https://example.org/", 0).is_err());
    /// ```
    pub fn new(url: &str, depth: u32) -> LocatorResult<Self> {
        if depth > MAX_DEPTH {
            return Err(LocatorError::DepthOutOfRange {
                depth,
                max: MAX_DEPTH,
            });
        }

        if !has_http_prefix(url) {
            return Err(LocatorError::InvalidScheme(url.to_string()));
        }

        let parsed = Url::parse(url).map_err(|e| LocatorError::Parse {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        match parsed.host_str() {
            Some(host) if !host.is_empty() => {}
            _ => return Err(LocatorError::MissingHost(url.to_string())),
        }

        Ok(Self { url: parsed, depth })
    }

    /// Builds the depth-0 locator a crawl starts from
    pub fn seed(url: &str) -> LocatorResult<Self> {
        Self::new(url, 0)
    }

    /// Builds a locator for a link found on this page, one level deeper
    pub fn child(&self, url: &str) -> LocatorResult<Self> {
        Self::new(url, self.depth.saturating_add(1))
    }

    /// The parsed URL
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The URL as a string slice
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// Depth at which this locator was discovered (the seed is 0)
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Host name of the URL
    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    /// Path component of the URL
    pub fn path(&self) -> &str {
        self.url.path()
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ {}, {} ]", self.url, self.depth)
    }
}

/// Checks the literal `http://` prefix, ignoring ASCII case
pub fn has_http_prefix(url: &str) -> bool {
    url.get(..URL_PREFIX.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(URL_PREFIX))
}
