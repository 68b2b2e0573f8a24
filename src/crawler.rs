use std::fmt;
use std::path::PathBuf;

use anyhow::{anyhow, ensure, Context, Result};
use chrono::{DateTime, Local};
use log::{debug, info};
use url::Url;

use crate::config::{Config, SiteProfiles};
use crate::corpus::{fit_and_report, TopicModel, TopicParams, TopicReport};
use crate::error::SpotlightError;
use crate::frontier::Frontier;
use crate::language::Language;
use crate::lda::GibbsLda;
use crate::lemma::{Lemmatizer, LexiconTagger};
use crate::link::{site_identifier, LinkResolver, PageRef};
use crate::page::{Fetch, HttpFetcher};
use crate::selection::{ClassSet, RelaxationMode, SelectionPolicy};
use crate::storage::ReportStore;
use crate::text::TextCollector;
use crate::vocabulary::VocabularyBuilder;

/// Lifecycle of a [`Crawler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlState {
    Ready,
    Crawling,
    Reporting,
    Done,
    Failed,
}

/// The outcome of a finished crawl.
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Where the crawl started.
    pub url: Url,
    /// Number of visited pages.
    pub visited: usize,
    pub topics: TopicReport,
    pub finished_at: DateTime<Local>,
}

impl fmt::Display for CrawlReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(
            f,
            "[{}] crawled {} pages on {}",
            self.finished_at.format("%Y-%m-%d %H:%M:%S"),
            self.visited,
            self.url
        )?;
        writeln!(f, "{}", self.topics)
    }
}

/// Crawls one site and fits topics to the text of its pages.
pub struct Crawler<F = HttpFetcher, L = LexiconTagger, M = GibbsLda> {
    url: Url,
    fetcher: F,
    topic_model: M,
    policy: SelectionPolicy,
    frontier: Frontier,
    vocabulary: VocabularyBuilder<L>,
    config: Config,
    state: CrawlState,
}

impl Crawler {
    /// Convenience method for creating a new [`CrawlerBuilder`]
    ///
    /// Same as calling [`CrawlerBuilder::new`]
    #[inline]
    pub fn builder<T: AsRef<str>>(url: T) -> Result<CrawlerBuilder> {
        CrawlerBuilder::new(url)
    }
}

impl<F: Fetch, L: Lemmatizer, M: TopicModel> Crawler<F, L, M> {
    /// Visit pages until the frontier is exhausted.
    pub async fn crawl(&mut self) -> Result<()> {
        ensure!(
            self.state == CrawlState::Ready,
            "Crawl of {} already started",
            self.url
        );
        self.state = CrawlState::Crawling;

        while let Some(page) = self.frontier.next() {
            self.visit(&page).await;
            self.frontier.mark_visited(page);
        }

        info!(
            "Crawled {} pages on {}, {} unique words in {} articles",
            self.frontier.visited_count(),
            self.url,
            self.vocabulary.vocabulary().len(),
            self.vocabulary.articles().len()
        );
        Ok(())
    }

    async fn visit(&mut self, page: &PageRef) {
        let progress = format!(
            "{}/{}",
            self.frontier.visited_count(),
            self.frontier.budget()
        );
        let doc = self.fetcher.fetch(page).await;

        info!("{} Extracting text from {}", progress, page);
        let text = TextCollector::new(&self.policy).collect(&doc);
        let lemmas = self.vocabulary.normalize(&text);
        debug!("{} lemmas on {}", lemmas.len(), page);
        self.vocabulary.fold(lemmas);

        info!("{} Extracting links from {}", progress, page);
        for link in self.policy.select_links(&doc, self.frontier.resolver()) {
            self.frontier.enqueue(link);
        }
    }

    /// Fit the topic model to everything collected so far.
    ///
    /// Fails with [`SpotlightError::EmptyCorpus`] if no page produced any
    /// usable text.
    pub fn report(&mut self) -> Result<CrawlReport> {
        ensure!(
            self.state == CrawlState::Crawling,
            "Nothing crawled yet on {}",
            self.url
        );
        self.state = CrawlState::Reporting;

        let vocabulary = self.vocabulary.vocabulary().snapshot();
        let params = TopicParams::from_config(&self.config);
        match fit_and_report(
            self.vocabulary.articles(),
            &vocabulary,
            &self.topic_model,
            &params,
        ) {
            Ok(topics) => Ok(CrawlReport {
                url: self.url.clone(),
                visited: self.frontier.visited_count(),
                topics,
                finished_at: Local::now(),
            }),
            Err(err) => {
                self.state = CrawlState::Failed;
                Err(err.into())
            }
        }
    }

    /// Crawl, report and append the report to the site's file in `store`.
    pub async fn run(&mut self, store: &ReportStore) -> Result<(CrawlReport, PathBuf)> {
        self.crawl().await?;
        let report = self.report()?;
        match store.append(&report).await {
            Ok(path) => {
                self.state = CrawlState::Done;
                Ok((report, path))
            }
            Err(err) => {
                self.state = CrawlState::Failed;
                Err(err)
            }
        }
    }

    pub fn state(&self) -> CrawlState {
        self.state
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    pub fn vocabulary(&self) -> &VocabularyBuilder<L> {
        &self.vocabulary
    }

    pub fn policy(&self) -> &SelectionPolicy {
        &self.policy
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

#[derive(Debug)]
pub struct CrawlerBuilder {
    url: Url,
    budget: Option<usize>,
    language: Option<String>,
    relaxation: Option<RelaxationMode>,
    profiles: Option<SiteProfiles>,
    classes: Option<ClassSet>,
    config: Option<Config>,
}

impl CrawlerBuilder {
    pub fn new<T: AsRef<str>>(url: T) -> Result<Self> {
        let url = url.as_ref();
        let mut url = Url::parse(url).map_err(|source| SpotlightError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;
        if url.cannot_be_a_base() || url.host_str().is_none() {
            return Err(anyhow!("url {:?} can not be a base url", url.as_str()));
        }
        url.set_fragment(None);

        Ok(Self {
            url,
            budget: None,
            language: None,
            relaxation: None,
            profiles: None,
            classes: None,
            config: None,
        })
    }

    /// Maximum number of pages to visit.
    pub fn budget(mut self, budget: usize) -> Self {
        self.budget = Some(budget);
        self
    }

    /// The language code of the site, `en` or `sv`.
    pub fn language<T: ToString>(mut self, code: T) -> Self {
        self.language = Some(code.to_string());
        self
    }

    pub fn relaxation(mut self, relaxation: RelaxationMode) -> Self {
        self.relaxation = Some(relaxation);
        self
    }

    /// The class table to look the site up in, the builtin one by default.
    pub fn site_profiles(mut self, profiles: SiteProfiles) -> Self {
        self.profiles = Some(profiles);
        self
    }

    /// Use these classes instead of looking the site up.
    pub fn classes(mut self, classes: ClassSet) -> Self {
        self.classes = Some(classes);
        self
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    pub fn build_with<F, L, M>(
        self,
        fetcher: F,
        lemmatizer: L,
        topic_model: M,
    ) -> Result<Crawler<F, L, M>>
    where
        F: Fetch,
        L: Lemmatizer,
        M: TopicModel,
    {
        let language: Language = self.language.as_deref().unwrap_or("en").parse()?;

        let budget = self
            .budget
            .context("Number of pages to crawl must be set.")?;
        ensure!(budget > 0, "Number of pages to crawl must be positive.");

        let classes = match self.classes {
            Some(classes) => classes,
            None => {
                let profiles = match self.profiles {
                    Some(profiles) => profiles,
                    None => SiteProfiles::builtin()?,
                };
                profiles.class_set(&site_identifier(&self.url))
            }
        };
        let relaxation = self.relaxation.unwrap_or_default();
        debug!(
            "Crawling {} in {}, {} with {:?}",
            self.url,
            language.full_name(),
            relaxation,
            classes
        );

        let config = self.config.unwrap_or_default();
        let mut frontier = Frontier::new(LinkResolver::for_url(&self.url), budget);
        frontier.enqueue(PageRef::new(self.url.as_str()));

        Ok(Crawler {
            vocabulary: VocabularyBuilder::new(lemmatizer, language, &config),
            policy: SelectionPolicy::new(classes, relaxation),
            url: self.url,
            fetcher,
            topic_model,
            frontier,
            config,
            state: CrawlState::Ready,
        })
    }

    /// Build a crawler that fetches over http, tags with the bundled lexicons
    /// and fits topics with [`GibbsLda`].
    pub fn build(self) -> Result<Crawler> {
        let config = self.config.clone().unwrap_or_default();
        let fetcher = HttpFetcher::new(&config)?;
        self.build_with(fetcher, LexiconTagger, GibbsLda::default())
    }
}
