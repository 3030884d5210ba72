use super::has_http_prefix;
use url::Url;

const HTTPS_PREFIX: &str = "https://";
const PARENT_REF: &str = "../";

/// Outcome of resolving one extracted reference against its page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// An absolute `http://` URL with any fragment removed
    Resolved(Url),

    /// An `https://` target; out of protocol scope, never crawled
    SkippedProtocol(String),

    /// Any other explicit scheme (`mailto:`, `javascript:`, `ftp:` ...)
    UnsupportedScheme(String),

    /// Empty, fragment-only, or climbing above the site root
    Unresolvable(String),
}

impl Resolution {
    /// Returns the resolved URL, if any
    pub fn into_url(self) -> Option<Url> {
        match self {
            Self::Resolved(url) => Some(url),
            _ => None,
        }
    }
}

/// Resolves an `href` value found on `origin`
///
/// # Resolution Rules
///
/// | Reference | Result |
/// |-----------|--------|
/// | `http://host/x#frag` | passed through, fragment stripped |
/// | `https://host/x` | dropped as [`Resolution::SkippedProtocol`] |
/// | `mailto:`, `javascript:` ... | dropped as [`Resolution::UnsupportedScheme`] |
/// | `../x` | one directory up per `../` |
/// | `x.html` | replaces the last path segment of `origin` |
/// | `/x` | root-relative on the origin host |
///
/// # Examples
///
/// ```
/// use depth_crawl::locator::{resolve_reference, Resolution};
/// use url::Url;
///
/// let origin = Url::parse("http://x.org/a/b/page.html").unwrap();
/// let up = resolve_reference(&origin, "../c.html").into_url().unwrap();
/// assert_eq!(up.as_str(), "http://x.org/a/c.html");
///
/// assert!(matches!(
///     resolve_reference(&origin, "https://y.org/z"),
///     Resolution::SkippedProtocol(_)
/// ));
/// ```
pub fn resolve_reference(origin: &Url, reference: &str) -> Resolution {
    let reference = reference.trim();

    if reference.is_empty() || reference.starts_with('#') {
        return Resolution::Unresolvable(reference.to_string());
    }

    if reference
        .get(..HTTPS_PREFIX.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(HTTPS_PREFIX))
    {
        return Resolution::SkippedProtocol(reference.to_string());
    }

    if has_http_prefix(reference) {
        return match Url::parse(reference) {
            Ok(url) => Resolution::Resolved(without_fragment(url)),
            Err(_) => Resolution::Unresolvable(reference.to_string()),
        };
    }

    // Parses on its own only when it carries a scheme
    if Url::parse(reference).is_ok() {
        return Resolution::UnsupportedScheme(reference.to_string());
    }

    if parent_climbs(reference) > directory_depth(origin) {
        return Resolution::Unresolvable(reference.to_string());
    }

    match origin.join(reference) {
        Ok(url) if url.scheme() == "http" => Resolution::Resolved(without_fragment(url)),
        Ok(_) => Resolution::UnsupportedScheme(reference.to_string()),
        Err(_) => Resolution::Unresolvable(reference.to_string()),
    }
}

fn without_fragment(mut url: Url) -> Url {
    url.set_fragment(None);
    url
}

/// Number of leading `../` segments
fn parent_climbs(reference: &str) -> usize {
    let mut rest = reference;
    let mut count = 0;
    while let Some(stripped) = rest.strip_prefix(PARENT_REF) {
        rest = stripped;
        count += 1;
    }
    count
}

/// Number of directories between the site root and the origin's last segment
fn directory_depth(origin: &Url) -> usize {
    origin
        .path_segments()
        .map(|segments| segments.count().saturating_sub(1))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Url {
        Url::parse("http://x.org/a/b/page.html").unwrap()
    }

    fn resolved(reference: &str) -> String {
        resolve_reference(&origin(), reference)
            .into_url()
            .map(|url| url.to_string())
            .unwrap_or_default()
    }

    #[test]
    fn test_parent_relative() {
        assert_eq!(resolved("../c.html"), "http://x.org/a/c.html");
    }

    #[test]
    fn test_double_parent_relative() {
        assert_eq!(resolved("../../c.html"), "http://x.org/c.html");
    }

    #[test]
    fn test_parent_above_root_is_unresolvable() {
        assert!(matches!(
            resolve_reference(&origin(), "../../../c.html"),
            Resolution::Unresolvable(_)
        ));
    }

    #[test]
    fn test_same_directory() {
        assert_eq!(resolved("d.html"), "http://x.org/a/b/d.html");
    }

    #[test]
    fn test_directory_origin_keeps_directory() {
        let origin = Url::parse("http://x.org/a/b/").unwrap();
        let url = resolve_reference(&origin, "d.html").into_url().unwrap();
        assert_eq!(url.as_str(), "http://x.org/a/b/d.html");
    }

    #[test]
    fn test_root_relative() {
        assert_eq!(resolved("/top.html"), "http://x.org/top.html");
    }

    #[test]
    fn test_absolute_http_strips_fragment() {
        assert_eq!(
            resolved("http://y.org/docs/intro.html#part-2"),
            "http://y.org/docs/intro.html"
        );
    }

    #[test]
    fn test_relative_strips_fragment() {
        assert_eq!(resolved("d.html#top"), "http://x.org/a/b/d.html");
    }

    #[test]
    fn test_https_dropped() {
        assert_eq!(
            resolve_reference(&origin(), "https://y.org/z"),
            Resolution::SkippedProtocol("https://y.org/z".to_string())
        );
    }

    #[test]
    fn test_other_schemes_dropped() {
        for reference in ["mailto:someone@x.org", "javascript:void(0)", "ftp://x.org/f"] {
            assert!(matches!(
                resolve_reference(&origin(), reference),
                Resolution::UnsupportedScheme(_)
            ));
        }
    }

    #[test]
    fn test_empty_and_fragment_only_skipped() {
        assert!(matches!(
            resolve_reference(&origin(), "   "),
            Resolution::Unresolvable(_)
        ));
        assert!(matches!(
            resolve_reference(&origin(), "#section"),
            Resolution::Unresolvable(_)
        ));
    }

    #[test]
    fn test_resolution_is_repeatable() {
        assert_eq!(
            resolve_reference(&origin(), "../c.html"),
            resolve_reference(&origin(), "../c.html")
        );
    }
}
