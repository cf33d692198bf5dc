//! Linguistic tagging
//!
//! [`Tagger`] is the provider contract the token session drives.
//! [`BasicTagger`] is the built-in provider: Unicode segmentation, `whatlang`
//! language detection and a closed-class English lexicon.

use doc_model::{Language, TagScheme, TokenUnit};
use std::ops::Range;
use unicode_segmentation::UnicodeSegmentation;

/// A non-whitespace span of the input text and its tag under the requested scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedSpan {
    pub range: Range<usize>,
    pub tag: Option<String>,
}

pub trait Tagger {
    /// Schemes the provider can tag for this unit and language.
    fn available_schemes(&self, unit: TokenUnit, language: &Language) -> Vec<TagScheme>;

    /// Dominant language of `text`, `None` when it cannot be determined.
    fn dominant_language(&self, text: &str) -> Option<Language>;

    /// Segments `text` by `unit`, omitting whitespace, and tags each span.
    fn enumerate(
        &self,
        text: &str,
        unit: TokenUnit,
        scheme: TagScheme,
        language: &Language,
    ) -> Vec<TaggedSpan>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct BasicTagger;

impl BasicTagger {
    pub fn new() -> Self {
        Self
    }
}

impl Tagger for BasicTagger {
    fn available_schemes(&self, unit: TokenUnit, language: &Language) -> Vec<TagScheme> {
        let mut schemes = vec![TagScheme::TokenType];
        if unit == TokenUnit::Word && language.is_english() {
            schemes.push(TagScheme::LexicalClass);
        }
        schemes.push(TagScheme::Language);
        schemes
    }

    fn dominant_language(&self, text: &str) -> Option<Language> {
        if text.trim().is_empty() {
            return None;
        }

        let info = whatlang::detect(text)?;
        info.is_reliable().then(|| Language::new(info.lang().code()))
    }

    fn enumerate(
        &self,
        text: &str,
        unit: TokenUnit,
        scheme: TagScheme,
        language: &Language,
    ) -> Vec<TaggedSpan> {
        let supported = self.available_schemes(unit, language).contains(&scheme);

        segments(text, unit)
            .into_iter()
            .map(|range| {
                let tag = supported
                    .then(|| tag_for(&text[range.clone()], unit, scheme, language))
                    .flatten();
                TaggedSpan { range, tag }
            })
            .collect()
    }
}

fn segments(text: &str, unit: TokenUnit) -> Vec<Range<usize>> {
    let pieces: Vec<(usize, &str)> = match unit {
        TokenUnit::Word => text.split_word_bound_indices().collect(),
        TokenUnit::Sentence => text.split_sentence_bound_indices().collect(),
        TokenUnit::Paragraph => {
            let mut offset = 0;
            text.split_inclusive('\n')
                .map(|line| {
                    let start = offset;
                    offset += line.len();
                    (start, line)
                })
                .collect()
        }
    };

    pieces.into_iter().filter_map(|(start, piece)| trimmed_range(start, piece)).collect()
}

fn trimmed_range(start: usize, piece: &str) -> Option<Range<usize>> {
    let trimmed = piece.trim();
    if trimmed.is_empty() {
        return None;
    }

    let leading = piece.len() - piece.trim_start().len();
    let begin = start + leading;
    Some(begin..begin + trimmed.len())
}

fn tag_for(span: &str, unit: TokenUnit, scheme: TagScheme, language: &Language) -> Option<String> {
    match scheme {
        TagScheme::TokenType if unit == TokenUnit::Word => Some(token_type(span).to_owned()),
        TagScheme::LexicalClass => Some(lexical_class(span).to_owned()),
        TagScheme::Language => Some(language.code().to_owned()),
        _ => None,
    }
}

fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation() || matches!(c, '\u{2018}'..='\u{201F}' | '\u{2010}'..='\u{2015}' | '\u{2026}' | '\u{00AB}' | '\u{00BB}')
}

fn token_type(span: &str) -> &'static str {
    if span.chars().any(char::is_alphanumeric) {
        "Word"
    } else if span.chars().all(is_punctuation) {
        "Punctuation"
    } else {
        "OtherWord"
    }
}

const DETERMINERS: &[&str] = &[
    "a", "an", "the", "this", "that", "these", "those", "each", "every", "some", "any", "no",
    "all", "both", "either", "neither", "my", "your", "his", "her", "its", "our", "their",
];

const PRONOUNS: &[&str] = &[
    "i", "you", "he", "she", "it", "we", "they", "me", "him", "us", "them", "myself", "yourself",
    "himself", "herself", "itself", "ourselves", "themselves", "who", "whom", "whose", "what",
    "which",
];

const PREPOSITIONS: &[&str] = &[
    "of", "in", "on", "at", "by", "for", "with", "from", "to", "into", "over", "under", "about",
    "between", "through", "after", "before", "during", "without", "within", "against", "among",
    "across", "upon", "via",
];

const CONJUNCTIONS: &[&str] = &[
    "and", "or", "but", "nor", "so", "yet", "because", "although", "if", "while", "whereas",
    "unless", "since",
];

fn lexical_class(span: &str) -> &'static str {
    if !span.chars().any(char::is_alphanumeric) {
        return punctuation_class(span);
    }

    if is_number(span) {
        return "Number";
    }

    let lower = span.to_lowercase();
    let word = lower.as_str();
    if DETERMINERS.contains(&word) {
        "Determiner"
    } else if PRONOUNS.contains(&word) {
        "Pronoun"
    } else if PREPOSITIONS.contains(&word) {
        "Preposition"
    } else if CONJUNCTIONS.contains(&word) {
        "Conjunction"
    } else {
        "OtherWord"
    }
}

fn is_number(span: &str) -> bool {
    span.chars().any(|c| c.is_ascii_digit())
        && span.chars().all(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-' | '+' | '%'))
}

fn punctuation_class(span: &str) -> &'static str {
    match span.chars().next() {
        Some('.' | '!' | '?') => "SentenceTerminator",
        Some('(' | '[' | '{') => "OpenParenthesis",
        Some(')' | ']' | '}') => "CloseParenthesis",
        Some('"' | '\u{201C}' | '\u{2018}' | '\u{00AB}') => "OpenQuote",
        Some('\u{201D}' | '\u{2019}' | '\u{00BB}') => "CloseQuote",
        Some('-' | '\u{2013}' | '\u{2014}') => "Dash",
        _ => "OtherPunctuation",
    }
}
