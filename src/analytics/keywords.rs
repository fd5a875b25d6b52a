//! Keyword extraction from short texts such as headlines
//!
//! Extraction uses an optional [`NlpPipeline`] (noun chunks plus named
//! entities). Without one, it falls back to whitespace tokenization with a
//! small stopword list.

use std::collections::HashMap;
use std::fmt;

use crate::utils::normalize_whitespace;

/// Stopwords dropped by the fallback tokenizer
const FALLBACK_STOPWORDS: &[&str] = &[
    "the", "a", "an", "and", "in", "on", "at", "to", "for", "of", "with", "by",
];

/// Named entity labels kept as keywords
const KEYWORD_ENTITY_LABELS: &[&str] = &["PERSON", "ORG", "GPE", "EVENT"];

/// Single token inside a noun chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub is_stop: bool,
}

impl Token {
    pub fn new(text: impl Into<String>, is_stop: bool) -> Self {
        Self {
            text: text.into(),
            is_stop,
        }
    }
}

/// Noun phrase found by an NLP pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NounChunk {
    pub text: String,
    pub tokens: Vec<Token>,
}

impl NounChunk {
    /// Whether every token in the chunk is a stopword
    pub fn is_all_stopwords(&self) -> bool {
        self.tokens.iter().all(|t| t.is_stop)
    }
}

/// Named entity span with its type label (PERSON, ORG, ...)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySpan {
    pub text: String,
    pub label: String,
}

/// Tokenizer / entity recognizer used for keyword extraction
pub trait NlpPipeline: Send + Sync {
    /// Noun-phrase chunks with per-token stopword flags
    fn noun_chunks(&self, text: &str) -> Vec<NounChunk>;

    /// Named entity spans
    fn named_entities(&self, text: &str) -> Vec<EntitySpan>;
}

/// Count items and rank them by frequency
///
/// Equal counts keep first-seen order.
pub fn rank_by_count<I>(items: I, top_n: usize) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = String>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();

    for item in items {
        match index.get(&item) {
            Some(&pos) => counts[pos].1 += 1,
            None => {
                index.insert(item.clone(), counts.len());
                counts.push((item, 1));
            }
        }
    }

    // sort_by is stable
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(top_n);
    counts
}

/// Headline keyword extractor
#[derive(Default)]
pub struct KeywordExtractor {
    nlp: Option<Box<dyn NlpPipeline>>,
}

impl KeywordExtractor {
    /// Create an extractor that uses the stopword fallback
    #[must_use]
    pub fn new() -> Self {
        Self { nlp: None }
    }

    /// Create an extractor backed by an NLP pipeline
    #[must_use]
    pub fn with_nlp(nlp: Box<dyn NlpPipeline>) -> Self {
        Self { nlp: Some(nlp) }
    }

    /// Whether an NLP pipeline is attached
    #[must_use]
    pub fn has_nlp(&self) -> bool {
        self.nlp.is_some()
    }

    /// Extract the `top_n` most frequent keywords from `headlines`
    pub fn extract_keywords<S: AsRef<str>>(&self, headlines: &[S], top_n: usize) -> Vec<(String, usize)> {
        if headlines.is_empty() {
            return Vec::new();
        }

        let keywords = match &self.nlp {
            Some(nlp) => Self::nlp_keywords(nlp.as_ref(), headlines),
            None => Self::fallback_keywords(headlines),
        };

        rank_by_count(keywords, top_n)
    }

    fn nlp_keywords<S: AsRef<str>>(nlp: &dyn NlpPipeline, headlines: &[S]) -> Vec<String> {
        let text = headlines
            .iter()
            .map(|h| h.as_ref())
            .collect::<Vec<_>>()
            .join(" ");

        let chunks = nlp
            .noun_chunks(&text)
            .into_iter()
            .filter(|chunk| !chunk.is_all_stopwords())
            .map(|chunk| normalize_whitespace(&chunk.text).to_lowercase());

        let entities = nlp
            .named_entities(&text)
            .into_iter()
            .filter(|span| KEYWORD_ENTITY_LABELS.contains(&span.label.as_str()))
            .map(|span| normalize_whitespace(&span.text).to_lowercase());

        chunks.chain(entities).filter(|k| !k.is_empty()).collect()
    }

    fn fallback_keywords<S: AsRef<str>>(headlines: &[S]) -> Vec<String> {
        headlines
            .iter()
            .flat_map(|h| h.as_ref().split_whitespace())
            .map(str::to_lowercase)
            .filter(|word| word.chars().count() > 2 && !FALLBACK_STOPWORDS.contains(&word.as_str()))
            .collect()
    }
}

impl fmt::Debug for KeywordExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeywordExtractor")
            .field("nlp", &self.nlp.is_some())
            .finish()
    }
}
