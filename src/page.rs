use std::time::Duration;

use log::{debug, warn};
use reqwest::header::{HeaderMap, USER_AGENT};
use reqwest::{Client, StatusCode};
use select::document::Document;
use select::node::Node;
use select::predicate::{Class, Name};

use anyhow::{Context, Result};

use crate::config::Config;
use crate::error::SpotlightError;
use crate::link::PageRef;

/// Markup served for pages that could not be fetched.
const EMPTY_DOCUMENT: &str = "<!-- -->";

/// A fetched and parsed html page.
#[derive(Debug)]
pub struct Page {
    doc: Document,
}

impl Page {
    /// A page without any content.
    pub fn empty() -> Self {
        Page::from_html(EMPTY_DOCUMENT)
    }

    pub fn from_html(html: &str) -> Self {
        Self {
            doc: Document::from(html),
        }
    }

    /// All `<a>` tags.
    pub fn anchors(&self) -> impl Iterator<Item = Node<'_>> {
        self.doc.find(Name("a"))
    }

    /// All `<p>` tags.
    pub fn paragraphs(&self) -> impl Iterator<Item = Node<'_>> {
        self.doc.find(Name("p"))
    }

    /// All tags that carry `class` among their classes.
    pub fn with_class<'a>(&'a self, class: &'a str) -> impl Iterator<Item = Node<'a>> + 'a {
        self.doc.find(Class(class))
    }
}

impl From<Document> for Page {
    fn from(doc: Document) -> Self {
        Self { doc }
    }
}

/// Retrieves pages.
///
/// Implementations never fail: anything that goes wrong while fetching a page
/// yields [`Page::empty`].
#[allow(async_fn_in_trait)]
pub trait Fetch {
    async fn fetch(&self, url: &PageRef) -> Page;
}

/// Fetches pages over http(s).
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    /// The [`reqwest::Client`] that drives requests.
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_settings(config.browser_user_agent(), config.request_timeout())
    }

    pub fn with_settings(user_agent: &str, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::with_capacity(1);
        headers.insert(
            USER_AGENT,
            user_agent
                .parse()
                .context("Failed to parse user agent header.")?,
        );

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client })
    }

    async fn get_document(&self, url: &PageRef) -> std::result::Result<Page, SpotlightError> {
        let resp = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|error| SpotlightError::HttpRequestFailure { error })?;

        if resp.status() != StatusCode::OK {
            return Err(SpotlightError::NoHttpSuccess {
                status: resp.status(),
            });
        }

        let body = resp
            .bytes()
            .await
            .map_err(|error| SpotlightError::HttpRequestFailure { error })?;

        match Document::from_read(&*body) {
            Ok(doc) => Ok(Page::from(doc)),
            Err(_) => Err(SpotlightError::ReadDocument { body }),
        }
    }
}

impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &PageRef) -> Page {
        match self.get_document(url).await {
            Ok(page) => {
                debug!("Fetched {}", url);
                page
            }
            Err(err) => {
                warn!("{} for {}, continuing with an empty page", err, url);
                Page::empty()
            }
        }
    }
}
