use crate::{UrlError, UrlResult};
use url::{ParseError, Url};

/// Schemes the crawler knows how to fetch
const SUPPORTED_SCHEMES: &[&str] = &["http", "https"];

/// Resolves a raw link string into an absolute, normalized URL
///
/// # Resolution Steps
///
/// 1. Parse `raw` as an absolute URL; an absolute link wins over the parent
/// 2. Otherwise treat it as a relative reference against `parent`:
///    - `//host/path` inherits the parent's scheme
///    - `/path` inherits the parent's scheme and host
///    - `./path`, `../path` and bare segments are joined against the parent's
///      path, with `.` and `..` segments collapsed
/// 3. Normalize the result (see [`normalize_url`])
///
/// # Arguments
///
/// * `parent` - The absolute URL of the page the link was found on, if any
/// * `raw` - The link string as it appeared in the page
///
/// # Returns
///
/// * `Ok(Url)` - Absolute, normalized URL
/// * `Err(UrlError)` - The link is malformed, relative without a parent, or
///   not an http(s) address
///
/// # Examples
///
/// ```
/// use site_mapper::url::resolve_url;
/// use url::Url;
///
/// let parent = Url::parse("http://a.com/x/y").unwrap();
/// assert_eq!(resolve_url(Some(&parent), "./z").unwrap().as_str(), "http://a.com/x/z");
/// assert_eq!(resolve_url(Some(&parent), "/z").unwrap().as_str(), "http://a.com/z");
/// assert_eq!(resolve_url(None, "http://b.com").unwrap().as_str(), "http://b.com/");
/// ```
pub fn resolve_url(parent: Option<&Url>, raw: &str) -> UrlResult<Url> {
    let raw = raw.trim();

    let url = match Url::parse(raw) {
        Ok(url) => url,
        Err(ParseError::RelativeUrlWithoutBase) => match parent {
            Some(parent) => parent.join(raw)?,
            None => return Err(UrlError::RelativeWithoutBase(raw.to_string())),
        },
        Err(e) => return Err(e.into()),
    };

    normalize_url(url)
}

/// Normalizes an absolute URL into its site map identity
///
/// # Normalization Steps
///
/// Parsing already lowercases the scheme and host, strips default ports and
/// collapses dot segments. On top of that:
///
/// 1. Reject schemes other than http and https
/// 2. Reject URLs without a host
/// 3. Remove the fragment (everything after #)
/// 4. Empty query (a bare `?`) is removed
/// 5. Empty path becomes /
///
/// Non-empty query strings and trailing slashes are kept as they are.
pub fn normalize_url(mut url: Url) -> UrlResult<Url> {
    if !SUPPORTED_SCHEMES.contains(&url.scheme()) {
        return Err(UrlError::UnsupportedScheme(url.scheme().to_string()));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost(url.to_string()));
    }

    url.set_fragment(None);

    if url.query() == Some("") {
        url.set_query(None);
    }

    if url.path().is_empty() {
        url.set_path("/");
    }

    Ok(url)
}
