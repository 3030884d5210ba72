//! Link extraction from fetched pages
//!
//! Extraction turns a response body into absolute `http://` URL strings. The
//! worker turns those strings into child locators; anything that cannot be
//! resolved is skipped here without affecting the other links on the page.

use crate::locator::{resolve_reference, Locator, Resolution};
use scraper::{Html, Selector};

/// Produces candidate links from a fetched page
pub trait LinkExtractor: Send + Sync {
    /// Returns absolute URLs found in `body`, resolved against `origin`
    fn extract_links(&self, body: &str, origin: &Locator) -> Vec<String>;
}

/// Extracts the `href` of every `<a>` element
///
/// Only `http://` targets survive; `https://` and other schemes are dropped,
/// as are references that cannot be resolved against the origin.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnchorExtractor;

impl LinkExtractor for AnchorExtractor {
    fn extract_links(&self, body: &str, origin: &Locator) -> Vec<String> {
        let Ok(selector) = Selector::parse("a[href]") else {
            return Vec::new();
        };

        let document = Html::parse_document(body);
        let mut links = Vec::new();

        for element in document.select(&selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };

            match resolve_reference(origin.url(), href) {
                Resolution::Resolved(url) => links.push(url.to_string()),
                Resolution::SkippedProtocol(reference) => {
                    tracing::trace!(origin = %origin.url(), %reference, "Skipping https link");
                }
                Resolution::UnsupportedScheme(reference) => {
                    tracing::trace!(origin = %origin.url(), %reference, "Skipping unsupported scheme");
                }
                Resolution::Unresolvable(reference) => {
                    tracing::debug!(origin = %origin.url(), %reference, "Skipping unresolvable link");
                }
            }
        }

        links
    }
}
