//! Plain data shared by the ingest pipeline, the token session and front ends.

mod attribute;
mod token;

pub use attribute::{flatten_attributes, AttributeEntry, AttributeValue};
pub use token::{Language, ParseModelError, Selection, TagScheme, Token, TokenUnit};

use serde::{Deserialize, Serialize};
use std::fmt;

/// User-curated summary of a document. Never validated, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extract {
    pub title: String,
    pub authors: String,
    pub author_keywords: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtractField {
    Title,
    Authors,
    AuthorKeywords,
    Abstract,
}

impl ExtractField {
    pub const ALL: [ExtractField; 4] =
        [Self::Title, Self::Authors, Self::AuthorKeywords, Self::Abstract];

    pub fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Authors => "Authors",
            Self::AuthorKeywords => "Author Keywords",
            Self::Abstract => "Abstract",
        }
    }
}

impl fmt::Display for ExtractField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Extract {
    pub fn field(&self, field: ExtractField) -> &str {
        match field {
            ExtractField::Title => &self.title,
            ExtractField::Authors => &self.authors,
            ExtractField::AuthorKeywords => &self.author_keywords,
            ExtractField::Abstract => &self.abstract_text,
        }
    }

    pub fn field_mut(&mut self, field: ExtractField) -> &mut String {
        match field {
            ExtractField::Title => &mut self.title,
            ExtractField::Authors => &mut self.authors,
            ExtractField::AuthorKeywords => &mut self.author_keywords,
            ExtractField::Abstract => &mut self.abstract_text,
        }
    }

    pub fn is_empty(&self) -> bool {
        ExtractField::ALL.iter().all(|field| self.field(*field).is_empty())
    }
}
