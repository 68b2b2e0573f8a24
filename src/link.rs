use std::borrow::Borrow;
use std::fmt;

use url::Url;

/// A normalized absolute url of a page within the crawled site.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageRef(String);

impl PageRef {
    /// An absolute url with an empty path gets the root path `/`, so
    /// `https://host` and `https://host/` are the same page.
    pub fn new<T: Into<String>>(url: T) -> Self {
        let mut url = url.into();
        if let Some(idx) = url.find("://") {
            let authority = idx + 3;
            let path = url[authority..].find(|c: char| c == '/' || c == '?' || c == '#');
            match path {
                Some(end) if url[authority + end..].starts_with('/') => {}
                Some(end) => url.insert(authority + end, '/'),
                None => url.push('/'),
            }
        }
        PageRef(url)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for PageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PageRef {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for PageRef {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PageRef {
    fn from(s: &str) -> Self {
        PageRef::new(s)
    }
}

/// Resolves the `href` of anchors against the base domain of the crawl.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkResolver {
    base: String,
}

impl LinkResolver {
    pub fn new<T: Into<String>>(base: T) -> Self {
        Self { base: base.into() }
    }

    /// The resolver for the site of `url`, its base is `scheme://host[:port]`.
    pub fn for_url(url: &Url) -> Self {
        let mut base = format!("{}://{}", url.scheme(), url.host_str().unwrap_or_default());
        if let Some(port) = url.port() {
            base.push_str(&format!(":{}", port));
        }
        Self { base }
    }

    /// The base domain every crawled page has to contain.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Resolve a (possibly missing) `href`.
    ///
    /// Site relative paths are appended to the base, every other value is kept
    /// as is. Scheme relative references (`//host/path`) borrow the scheme of
    /// the base, if it has one. A missing `href` resolves to the base itself.
    /// Fragments are dropped.
    pub fn resolve(&self, href: Option<&str>) -> PageRef {
        let href = match href {
            Some(href) => href.trim(),
            None => return PageRef::new(self.base.clone()),
        };

        let resolved = if href.starts_with("//") {
            match self.scheme() {
                Some(scheme) => format!("{}:{}", scheme, href),
                None => href.to_string(),
            }
        } else if href.starts_with('/') {
            format!("{}{}", self.base, href)
        } else {
            href.to_string()
        };

        PageRef::new(strip_fragment(&resolved))
    }

    /// Whether the link stays inside the crawled site.
    pub fn contains(&self, link: &str) -> bool {
        link.contains(self.base.as_str())
    }

    fn scheme(&self) -> Option<&str> {
        self.base.find("://").map(|idx| &self.base[..idx])
    }
}

fn strip_fragment(link: &str) -> &str {
    match link.find('#') {
        Some(idx) => &link[..idx],
        None => link,
    }
}

/// The name of a site without scheme, `www.` prefix and top-level domain.
///
/// `https://www.theguardian.com/uk` is identified by `theguardian`.
pub fn site_identifier(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    let host = host.strip_prefix("www.").unwrap_or(host);
    match host.rfind('.') {
        Some(idx) if url.domain().is_some() => host[..idx].to_string(),
        _ => host.to_string(),
    }
}
