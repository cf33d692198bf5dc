use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseModelError {
    #[error("unknown token unit `{0}` (expected word, sentence or paragraph)")]
    TokenUnit(String),
    #[error("unknown tag scheme `{0}`")]
    TagScheme(String),
}

/// Segmentation granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenUnit {
    #[default]
    Word,
    Sentence,
    Paragraph,
}

impl TokenUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Word => "word",
            Self::Sentence => "sentence",
            Self::Paragraph => "paragraph",
        }
    }
}

impl fmt::Display for TokenUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenUnit {
    type Err = ParseModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "word" => Ok(Self::Word),
            "sentence" => Ok(Self::Sentence),
            "paragraph" => Ok(Self::Paragraph),
            _ => Err(ParseModelError::TokenUnit(value.to_owned())),
        }
    }
}

/// Classification scheme used to label tagged spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TagScheme {
    #[default]
    TokenType,
    LexicalClass,
    NameType,
    NameTypeOrLexicalClass,
    Lemma,
    Language,
    Script,
}

impl TagScheme {
    /// Schemes worth offering to the user, in presentation order.
    pub const INTERESTING: [TagScheme; 4] =
        [Self::TokenType, Self::LexicalClass, Self::NameType, Self::NameTypeOrLexicalClass];

    pub fn raw_name(self) -> &'static str {
        match self {
            Self::TokenType => "TokenType",
            Self::LexicalClass => "LexicalClass",
            Self::NameType => "NameType",
            Self::NameTypeOrLexicalClass => "NameTypeOrLexicalClass",
            Self::Lemma => "Lemma",
            Self::Language => "Language",
            Self::Script => "Script",
        }
    }

    pub fn is_interesting(self) -> bool {
        Self::INTERESTING.contains(&self)
    }
}

impl fmt::Display for TagScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.raw_name())
    }
}

impl FromStr for TagScheme {
    type Err = ParseModelError;

    /// Accepts the raw name (`LexicalClass`) or its kebab-case form (`lexical-class`).
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized: String = value
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();

        [
            Self::TokenType,
            Self::LexicalClass,
            Self::NameType,
            Self::NameTypeOrLexicalClass,
            Self::Lemma,
            Self::Language,
            Self::Script,
        ]
        .into_iter()
        .find(|scheme| scheme.raw_name().to_ascii_lowercase() == normalized)
        .ok_or_else(|| ParseModelError::TagScheme(value.to_owned()))
    }
}

/// ISO 639-3 language code, e.g. `eng`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Language(String);

impl Language {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_ascii_lowercase())
    }

    pub fn english() -> Self {
        Self::new("eng")
    }

    pub fn code(&self) -> &str {
        &self.0
    }

    pub fn is_english(&self) -> bool {
        self.0 == "eng"
    }
}

impl Default for Language {
    fn default() -> Self {
        Self::english()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One tagged span from a tokenization pass. Ids restart at 0 on every pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub id: u32,
    pub text: String,
    #[serde(rename = "type")]
    pub tag: String,
}

/// The viewer's current text selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub text: String,
    pub page_index: Option<u32>,
}

impl Selection {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), page_index: None }
    }

    pub fn on_page(mut self, page_index: u32) -> Self {
        self.page_index = Some(page_index);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_scheme_parses_raw_and_kebab_names() {
        assert_eq!("LexicalClass".parse::<TagScheme>(), Ok(TagScheme::LexicalClass));
        assert_eq!("name-type-or-lexical-class".parse(), Ok(TagScheme::NameTypeOrLexicalClass));
        assert_eq!("token_type".parse(), Ok(TagScheme::TokenType));
        assert!("sentiment".parse::<TagScheme>().is_err());
    }

    #[test]
    fn token_unit_round_trips_through_display() {
        for unit in [TokenUnit::Word, TokenUnit::Sentence, TokenUnit::Paragraph] {
            assert_eq!(unit.to_string().parse::<TokenUnit>(), Ok(unit));
        }
        assert!(matches!("line".parse::<TokenUnit>(), Err(ParseModelError::TokenUnit(_))));
    }

    #[test]
    fn only_the_four_allow_listed_schemes_are_interesting() {
        assert!(TagScheme::NameType.is_interesting());
        assert!(!TagScheme::Language.is_interesting());
        assert!(!TagScheme::Lemma.is_interesting());
    }

    #[test]
    fn token_serializes_tag_as_type() {
        let token = Token { id: 0, text: "fox".to_owned(), tag: "Word".to_owned() };
        let json = serde_json::to_value(&token).expect("token should serialize");

        assert_eq!(json["type"], "Word");
        assert!(json.get("tag").is_none());
    }
}
