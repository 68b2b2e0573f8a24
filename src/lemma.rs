use std::str::FromStr;

use fnv::FnvHashMap;
use lazy_static::lazy_static;
use regex::Regex;

use crate::language::Language;

pub const PUNCTUATION: &str = r###",."'!?&-/:;()#$%*+<=>@[\]^_`{|}~«»“”‘’–—…"###;

lazy_static! {
    static ref RE_TOKEN: Regex = Regex::new(r"\w+(?:['’-]\w+)*|[^\w\s]").unwrap();

    static ref ENGLISH_CLOSED_CLASS: FnvHashMap<String, PartOfSpeech> =
        read_lexicon(include_str!("../resources/lexicon/closed-en.tsv"));

    static ref SWEDISH_CLOSED_CLASS: FnvHashMap<String, PartOfSpeech> =
        read_lexicon(include_str!("../resources/lexicon/closed-sv.tsv"));
}

/// Universal part-of-speech tags, see <https://universaldependencies.org/u/pos/>.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartOfSpeech {
    Adj,
    Adp,
    Adv,
    Aux,
    Cconj,
    Det,
    Intj,
    Noun,
    Num,
    Part,
    Pron,
    Propn,
    Punct,
    Sconj,
    Sym,
    Verb,
    X,
}

impl PartOfSpeech {
    /// Whether the tag belongs to the closed word classes, which never carry a
    /// topic.
    pub fn is_closed_class(&self) -> bool {
        matches!(
            self,
            PartOfSpeech::Punct
                | PartOfSpeech::Sym
                | PartOfSpeech::Adp
                | PartOfSpeech::Aux
                | PartOfSpeech::Cconj
                | PartOfSpeech::Det
                | PartOfSpeech::Num
                | PartOfSpeech::Part
                | PartOfSpeech::Pron
                | PartOfSpeech::Sconj
        )
    }

    pub fn tag(&self) -> &'static str {
        match self {
            PartOfSpeech::Adj => "ADJ",
            PartOfSpeech::Adp => "ADP",
            PartOfSpeech::Adv => "ADV",
            PartOfSpeech::Aux => "AUX",
            PartOfSpeech::Cconj => "CCONJ",
            PartOfSpeech::Det => "DET",
            PartOfSpeech::Intj => "INTJ",
            PartOfSpeech::Noun => "NOUN",
            PartOfSpeech::Num => "NUM",
            PartOfSpeech::Part => "PART",
            PartOfSpeech::Pron => "PRON",
            PartOfSpeech::Propn => "PROPN",
            PartOfSpeech::Punct => "PUNCT",
            PartOfSpeech::Sconj => "SCONJ",
            PartOfSpeech::Sym => "SYM",
            PartOfSpeech::Verb => "VERB",
            PartOfSpeech::X => "X",
        }
    }
}

impl FromStr for PartOfSpeech {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ADJ" => Ok(PartOfSpeech::Adj),
            "ADP" => Ok(PartOfSpeech::Adp),
            "ADV" => Ok(PartOfSpeech::Adv),
            "AUX" => Ok(PartOfSpeech::Aux),
            "CCONJ" => Ok(PartOfSpeech::Cconj),
            "DET" => Ok(PartOfSpeech::Det),
            "INTJ" => Ok(PartOfSpeech::Intj),
            "NOUN" => Ok(PartOfSpeech::Noun),
            "NUM" => Ok(PartOfSpeech::Num),
            "PART" => Ok(PartOfSpeech::Part),
            "PRON" => Ok(PartOfSpeech::Pron),
            "PROPN" => Ok(PartOfSpeech::Propn),
            "PUNCT" => Ok(PartOfSpeech::Punct),
            "SCONJ" => Ok(PartOfSpeech::Sconj),
            "SYM" => Ok(PartOfSpeech::Sym),
            "VERB" => Ok(PartOfSpeech::Verb),
            "X" => Ok(PartOfSpeech::X),
            s => Err(s.to_string()),
        }
    }
}

/// A lemma and the grammatical class of the word it was derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedToken {
    pub lemma: String,
    pub pos: PartOfSpeech,
}

impl TaggedToken {
    pub fn new<T: Into<String>>(lemma: T, pos: PartOfSpeech) -> Self {
        Self {
            lemma: lemma.into(),
            pos,
        }
    }
}

/// Turns running text into lemmas tagged with their part of speech.
///
/// Only called with languages that passed validation.
pub trait Lemmatizer {
    fn lemmatize(&self, text: &str, language: Language) -> Vec<TaggedToken>;
}

impl<L: Lemmatizer + ?Sized> Lemmatizer for &L {
    fn lemmatize(&self, text: &str, language: Language) -> Vec<TaggedToken> {
        (**self).lemmatize(text, language)
    }
}

/// A lexicon based tagger.
///
/// Closed-class words are looked up in the bundled lexicon of the language,
/// numbers, punctuation and symbols are recognized by their characters and
/// every other word is tagged [`PartOfSpeech::X`]. The lemma is the
/// lowercased word.
#[derive(Debug, Clone, Default)]
pub struct LexiconTagger;

impl LexiconTagger {
    fn closed_class(language: Language) -> &'static FnvHashMap<String, PartOfSpeech> {
        match language {
            Language::English => &ENGLISH_CLOSED_CLASS,
            Language::Swedish => &SWEDISH_CLOSED_CLASS,
        }
    }

    fn tag(token: &str, lexicon: &FnvHashMap<String, PartOfSpeech>) -> TaggedToken {
        let lemma = token.to_lowercase();
        let pos = if let Some(pos) = lexicon.get(&lemma) {
            *pos
        } else if lemma.chars().all(char::is_numeric) {
            PartOfSpeech::Num
        } else if lemma.chars().all(is_punctuation) {
            PartOfSpeech::Punct
        } else if lemma.chars().all(|c| !c.is_alphanumeric()) {
            PartOfSpeech::Sym
        } else {
            PartOfSpeech::X
        };
        TaggedToken { lemma, pos }
    }
}

impl Lemmatizer for LexiconTagger {
    fn lemmatize(&self, text: &str, language: Language) -> Vec<TaggedToken> {
        let lexicon = LexiconTagger::closed_class(language);
        RE_TOKEN
            .find_iter(text)
            .map(|m| LexiconTagger::tag(m.as_str(), lexicon))
            .collect()
    }
}

/// Whether the char is a punctuation.
pub fn is_punctuation(c: char) -> bool {
    PUNCTUATION.contains(c)
}

fn read_lexicon(content: &str) -> FnvHashMap<String, PartOfSpeech> {
    content
        .lines()
        .filter_map(|line| {
            let mut columns = line.split('\t');
            let word = columns.next()?.trim();
            let pos = columns.next()?.parse().ok()?;
            Some((word.to_lowercase(), pos))
        })
        .collect()
}
