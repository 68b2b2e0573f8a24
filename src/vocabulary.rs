use fnv::FnvHashSet;

use crate::config::Config;
use crate::frequency::FrequencyList;
use crate::language::Language;
use crate::lemma::Lemmatizer;

/// Characters that never appear in a usable lemma.
pub const DISALLOWED_CHARS: [char; 3] = ['%', '"', '.'];

/// The unique lemmas of the whole crawl.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    words: FnvHashSet<String>,
}

impl Vocabulary {
    pub fn insert(&mut self, word: String) -> bool {
        self.words.insert(word)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// A fixed, sorted sequence of all words.
    pub fn snapshot(&self) -> Vec<String> {
        let mut words: Vec<_> = self.words.iter().cloned().collect();
        words.sort();
        words
    }
}

/// Reduces page text to lemmas and accumulates the corpus.
#[derive(Debug)]
pub struct VocabularyBuilder<L> {
    lemmatizer: L,
    language: Language,
    /// The most frequent words of the language, never part of the vocabulary.
    frequent: FnvHashSet<String>,
    min_lemma_len: usize,
    vocabulary: Vocabulary,
    /// One space joined lemma sequence per page that produced any.
    articles: Vec<String>,
}

impl<L: Lemmatizer> VocabularyBuilder<L> {
    pub fn new(lemmatizer: L, language: Language, config: &Config) -> Self {
        Self::with_frequency_list(
            lemmatizer,
            language.frequency_list(),
            config.frequency_cutoff(),
            config.min_lemma_len(),
        )
    }

    pub fn with_frequency_list(
        lemmatizer: L,
        frequency: &FrequencyList,
        cutoff: usize,
        min_lemma_len: usize,
    ) -> Self {
        Self {
            lemmatizer,
            language: frequency.language,
            frequent: frequency.top(cutoff),
            min_lemma_len,
            vocabulary: Vocabulary::default(),
            articles: Vec::new(),
        }
    }

    /// The lemmas of `text` worth keeping, in order of first occurrence.
    pub fn normalize(&self, text: &str) -> Vec<String> {
        let mut lemmas: Vec<String> = Vec::new();
        for token in self.lemmatizer.lemmatize(text, self.language) {
            if !token.pos.is_closed_class()
                && token.lemma.chars().count() > self.min_lemma_len
                && !self.frequent.contains(&token.lemma)
                && !token.lemma.contains(&DISALLOWED_CHARS[..])
                && !lemmas.contains(&token.lemma)
            {
                lemmas.push(token.lemma);
            }
        }
        lemmas
    }

    /// Add the lemmas of one page to the corpus.
    pub fn fold(&mut self, lemmas: Vec<String>) {
        if lemmas.is_empty() {
            return;
        }
        let article = lemmas.join(" ");
        for lemma in lemmas {
            self.vocabulary.insert(lemma);
        }
        self.articles.push(article);
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn articles(&self) -> &[String] {
        &self.articles
    }
}
