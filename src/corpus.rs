use std::cmp::Ordering;
use std::fmt;

use fnv::FnvHashMap;
use log::info;

use crate::config::Config;
use crate::error::SpotlightError;
use crate::text::words;

/// Per-topic weights over the vocabulary, one row per topic.
pub type TopicWeights = Vec<Vec<f64>>;

/// Occurrence counts of vocabulary terms per document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentTermMatrix {
    rows: usize,
    cols: usize,
    counts: Vec<u32>,
}

impl DocumentTermMatrix {
    /// Count the literal, whitespace delimited occurrences of every term of
    /// `vocabulary` in every document.
    ///
    /// Fails with [`SpotlightError::EmptyCorpus`] if there is nothing to count.
    pub fn build<D, T>(documents: &[D], vocabulary: &[T]) -> Result<Self, SpotlightError>
    where
        D: AsRef<str>,
        T: AsRef<str>,
    {
        if documents.is_empty() || vocabulary.is_empty() {
            return Err(SpotlightError::EmptyCorpus);
        }

        let columns: FnvHashMap<&str, usize> = vocabulary
            .iter()
            .enumerate()
            .map(|(idx, term)| (term.as_ref(), idx))
            .collect();

        let cols = vocabulary.len();
        let mut counts = vec![0u32; documents.len() * cols];
        for (row, doc) in documents.iter().enumerate() {
            for word in words(doc.as_ref()) {
                if let Some(col) = columns.get(word) {
                    counts[row * cols + col] += 1;
                }
            }
        }

        Ok(Self {
            rows: documents.len(),
            cols,
            counts,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> u32 {
        self.counts[row * self.cols + col]
    }

    pub fn row(&self, row: usize) -> &[u32] {
        &self.counts[row * self.cols..(row + 1) * self.cols]
    }

    pub fn row_sum(&self, row: usize) -> u64 {
        self.row(row).iter().map(|c| u64::from(*c)).sum()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|c| u64::from(*c)).sum()
    }
}

/// Settings of one topic model fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopicParams {
    pub topic_count: usize,
    pub iterations: usize,
    pub seed: u64,
    /// Number of words listed per topic in the report.
    pub top_words: usize,
}

impl TopicParams {
    pub fn from_config(config: &Config) -> Self {
        Self {
            topic_count: config.topic_count(),
            iterations: config.iterations(),
            seed: config.seed(),
            top_words: config.top_words(),
        }
    }
}

impl Default for TopicParams {
    fn default() -> Self {
        TopicParams::from_config(&Config::default())
    }
}

/// Fits topics to a document-term matrix.
pub trait TopicModel {
    /// Returns `params.topic_count` rows of non-negative weights, one per
    /// column of the matrix.
    fn fit(&self, matrix: &DocumentTermMatrix, params: &TopicParams) -> TopicWeights;
}

/// The highest weighted words of every topic.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicReport {
    pub topics: Vec<Vec<String>>,
}

impl TopicReport {
    /// Pick the `top` highest weighted terms per topic, highest first. Equal
    /// weights keep vocabulary order.
    pub fn from_weights(weights: &[Vec<f64>], vocabulary: &[String], top: usize) -> Self {
        let topics = weights
            .iter()
            .map(|dist| {
                let mut idx: Vec<usize> = (0..dist.len().min(vocabulary.len())).collect();
                idx.sort_by(|a, b| dist[*b].partial_cmp(&dist[*a]).unwrap_or(Ordering::Equal));
                idx.into_iter()
                    .take(top)
                    .map(|i| vocabulary[i].clone())
                    .collect()
            })
            .collect();
        Self { topics }
    }
}

impl fmt::Display for TopicReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TOPICS:")?;
        for (i, words) in self.topics.iter().enumerate() {
            write!(f, "\nTopic {}: {}", i, words.join(" "))?;
        }
        Ok(())
    }
}

/// Build the matrix of the corpus, fit the topic model and list the top words
/// of each topic.
pub fn fit_and_report<M: TopicModel + ?Sized>(
    articles: &[String],
    vocabulary: &[String],
    model: &M,
    params: &TopicParams,
) -> Result<TopicReport, SpotlightError> {
    info!("Analyzing text...");
    let matrix = DocumentTermMatrix::build(articles, vocabulary)?;
    let weights = model.fit(&matrix, params);
    Ok(TopicReport::from_weights(&weights, vocabulary, params.top_words))
}
