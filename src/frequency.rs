use fnv::FnvHashSet;
use lazy_static::lazy_static;

use crate::language::Language;

macro_rules! frequency_lists {
    ($($name:ident $lang:tt $file:literal,)*) => {
        lazy_static! {
            $(
                pub(crate) static ref $name: FrequencyList =
                    FrequencyList::parse(Language::$lang, include_str!($file));
            )*
        }
    };
}

frequency_lists!(
    ENGLISH_FREQUENCY English "../resources/frequency/frequency-en.csv",
    SWEDISH_FREQUENCY Swedish "../resources/frequency/frequency-sv.tsv",
);

/// Words of a language ordered from most to least frequent.
#[derive(Debug, Clone)]
pub struct FrequencyList {
    pub language: Language,
    words: Vec<String>,
}

impl FrequencyList {
    pub fn new<I, T>(language: Language, words: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            language,
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a bundled list.
    ///
    /// The english list is whitespace separated `rank word`, the swedish one
    /// is tab separated with the word in the first column.
    pub fn parse(language: Language, content: &str) -> Self {
        let words = content
            .lines()
            .filter_map(|line| match language {
                Language::English => line.split_whitespace().nth(1),
                Language::Swedish => line.split('\t').next().map(str::trim),
            })
            .filter(|word| !word.is_empty())
            .map(str::to_lowercase)
            .collect::<Vec<_>>();
        Self { language, words }
    }

    /// The `n` most frequent words.
    pub fn top(&self, n: usize) -> FnvHashSet<String> {
        self.words.iter().take(n).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
