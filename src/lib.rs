//! Crawls a website for article text and surfaces the topics discussed in it.
//!
//! Starting from one url, pages of the same site are visited breadth first.
//! Which links are followed and which paragraphs count as text is decided by
//! the css classes configured for the site, see [`SiteProfiles`] and
//! [`RelaxationMode`]. The text of every page is reduced to lemmas, and once the
//! crawl is done a topic model is fitted to the resulting corpus.
//!
//! ```no_run
//! # async fn run() -> anyhow::Result<()> {
//! use spotlight::{Crawler, RelaxationMode, ReportStore};
//!
//! let mut crawler = Crawler::builder("https://www.theguardian.com/uk/commentisfree")?
//!     .budget(50)
//!     .language("en")
//!     .relaxation(RelaxationMode::SloppyText)
//!     .build()?;
//! let (report, _) = crawler.run(&ReportStore::new(".")).await?;
//! println!("{}", report.topics);
//! # Ok(())
//! # }
//! ```

pub use config::{Config, ConfigBuilder, SiteProfiles};
pub use corpus::{fit_and_report, DocumentTermMatrix, TopicModel, TopicParams, TopicReport};
pub use crawler::{CrawlReport, CrawlState, Crawler, CrawlerBuilder};
pub use error::SpotlightError;
pub use frontier::Frontier;
pub use language::Language;
pub use lda::GibbsLda;
pub use lemma::{Lemmatizer, LexiconTagger, PartOfSpeech, TaggedToken};
pub use link::{LinkResolver, PageRef};
pub use page::{Fetch, HttpFetcher, Page};
pub use selection::{ClassSet, RelaxationMode, SelectionPolicy};
pub use storage::ReportStore;
pub use text::TextCollector;
pub use vocabulary::{Vocabulary, VocabularyBuilder};

pub mod config;
pub mod corpus;
pub mod crawler;
mod error;
pub mod frequency;
pub mod frontier;
pub mod language;
pub mod lda;
pub mod lemma;
pub mod link;
pub mod page;
pub mod selection;
pub mod storage;
pub mod text;
pub mod vocabulary;

/// Rexported to implement custom fetchers.
pub use select;
