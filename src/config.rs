use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::selection::ClassSet;

/// The class table compiled into the binary.
const BUILTIN_SITES: &str = include_str!("../resources/sites.json");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Number of topics to fit.
    topic_count: usize,
    /// Number of sampling iterations of the topic model.
    iterations: usize,
    /// Seed of the topic model.
    seed: u64,
    /// Number of words listed per topic.
    top_words: usize,
    /// Number of most frequent words of the language to ignore.
    frequency_cutoff: usize,
    /// Lemmas need more chars than this.
    min_lemma_len: usize,
    /// The user-agent used for requests.
    browser_user_agent: String,
    /// Timeout for requests.
    request_timeout: Duration,
}

impl Config {
    /// Default timeout for requests.
    pub const DEFAULT_REQ_TIMEOUT_SEC: u64 = 7;

    /// Default user agent.
    #[inline]
    pub(crate) fn user_agent() -> String {
        format!("spotlight/{}", env!("CARGO_PKG_VERSION"))
    }

    /// Convenience method to create a [`ConfigBuilder`]
    #[inline]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    pub fn topic_count(&self) -> usize {
        self.topic_count
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn top_words(&self) -> usize {
        self.top_words
    }

    pub fn frequency_cutoff(&self) -> usize {
        self.frequency_cutoff
    }

    pub fn min_lemma_len(&self) -> usize {
        self.min_lemma_len
    }

    pub fn browser_user_agent(&self) -> &str {
        &self.browser_user_agent
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::builder().build()
    }
}

#[derive(Debug, Default)]
pub struct ConfigBuilder {
    topic_count: Option<usize>,
    iterations: Option<usize>,
    seed: Option<u64>,
    top_words: Option<usize>,
    frequency_cutoff: Option<usize>,
    min_lemma_len: Option<usize>,
    browser_user_agent: Option<String>,
    request_timeout: Option<Duration>,
}

impl ConfigBuilder {
    pub fn topic_count(mut self, topic_count: usize) -> Self {
        self.topic_count = Some(topic_count);
        self
    }

    pub fn iterations(mut self, iterations: usize) -> Self {
        self.iterations = Some(iterations);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn top_words(mut self, top_words: usize) -> Self {
        self.top_words = Some(top_words);
        self
    }

    pub fn frequency_cutoff(mut self, frequency_cutoff: usize) -> Self {
        self.frequency_cutoff = Some(frequency_cutoff);
        self
    }

    pub fn min_lemma_len(mut self, min_lemma_len: usize) -> Self {
        self.min_lemma_len = Some(min_lemma_len);
        self
    }

    pub fn browser_user_agent<T: ToString>(mut self, browser_user_agent: T) -> Self {
        self.browser_user_agent = Some(browser_user_agent.to_string());
        self
    }

    pub fn request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = Some(request_timeout);
        self
    }

    pub fn build(self) -> Config {
        Config {
            topic_count: self.topic_count.unwrap_or(10),
            iterations: self.iterations.unwrap_or(155),
            seed: self.seed.unwrap_or(1),
            top_words: self.top_words.unwrap_or(7),
            frequency_cutoff: self.frequency_cutoff.unwrap_or(150),
            min_lemma_len: self.min_lemma_len.unwrap_or(3),
            browser_user_agent: self.browser_user_agent.unwrap_or_else(Config::user_agent),
            request_timeout: self
                .request_timeout
                .unwrap_or_else(|| Duration::from_secs(Config::DEFAULT_REQ_TIMEOUT_SEC)),
        }
    }
}

/// The css classes to look for, per site.
///
/// Sites are identified by their host without `www.` and top-level domain,
/// see [`crate::link::site_identifier`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteProfiles {
    #[serde(default)]
    sites: BTreeMap<String, ClassSet>,
}

impl SiteProfiles {
    /// The profiles of the sites spotlight was tuned for.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_SITES).context("Failed to parse the builtin site profiles.")
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path<T: AsRef<Path>>(path: T) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read site profiles from {:?}", path))?;
        Self::from_json(&json).with_context(|| format!("Invalid site profiles in {:?}", path))
    }

    pub fn insert<T: Into<String>>(&mut self, site: T, classes: ClassSet) {
        self.sites.insert(site.into(), classes);
    }

    pub fn get(&self, site: &str) -> Option<&ClassSet> {
        self.sites.get(site)
    }

    pub fn sites(&self) -> impl Iterator<Item = &str> {
        self.sites.keys().map(String::as_str)
    }

    /// The classes of `site`, or the union of all profiles if the site is
    /// unknown.
    pub fn class_set(&self, site: &str) -> ClassSet {
        if let Some(classes) = self.get(site) {
            return classes.clone();
        }
        warn!(
            "No site profile for `{}`, using the classes of all {} known sites",
            site,
            self.sites.len()
        );
        self.sites
            .values()
            .fold(ClassSet::default(), |mut all, classes| {
                all.merge(classes);
                all
            })
    }
}
