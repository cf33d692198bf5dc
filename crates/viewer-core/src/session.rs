//! Token session
//!
//! Keeps the page text, the tagger output and the viewer selection of one
//! open document consistent with each other. Every operation degrades to an
//! empty or default value instead of failing, so the session always has a
//! renderable state.

use crate::config::SessionConfig;
use crate::selection::{SelectionFeed, SelectionMirror, Subscription};
use crate::tagger::{BasicTagger, Tagger};
use doc_model::{Language, Selection, TagScheme, Token, TokenUnit};
use pdf_engine::PdfDocument;
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

/// Tag used for spans the tagger left unlabelled.
pub const NO_TYPE: &str = "no type";

/// The page a session is showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedPage {
    pub index: u32,
    pub page_count: u32,
    pub text: String,
    pub language: Language,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Loaded,
}

#[derive(Debug)]
pub struct TokenSession<T = BasicTagger> {
    tagger: T,
    fallback_language: Language,
    token_unit: TokenUnit,
    scheme: TagScheme,
    page: Option<LoadedPage>,
    available_schemes: Vec<TagScheme>,
    tokens: Vec<Token>,
    selected: BTreeSet<u32>,
    selection: Rc<RefCell<SelectionMirror>>,
    subscription: Option<Subscription>,
}

impl TokenSession<BasicTagger> {
    pub fn new(config: SessionConfig) -> Self {
        Self::with_tagger(BasicTagger::new(), config)
    }
}

impl<T: Tagger> TokenSession<T> {
    pub fn with_tagger(tagger: T, config: SessionConfig) -> Self {
        Self {
            tagger,
            fallback_language: config.fallback_language,
            token_unit: config.token_unit,
            scheme: config.scheme,
            page: None,
            available_schemes: Vec::new(),
            tokens: Vec::new(),
            selected: BTreeSet::new(),
            selection: Rc::default(),
            subscription: None,
        }
    }

    pub fn state(&self) -> SessionState {
        if self.page.is_some() {
            SessionState::Loaded
        } else {
            SessionState::Idle
        }
    }

    pub fn page(&self) -> Option<&LoadedPage> {
        self.page.as_ref()
    }

    pub fn token_unit(&self) -> TokenUnit {
        self.token_unit
    }

    pub fn scheme(&self) -> TagScheme {
        self.scheme
    }

    /// Interesting schemes the tagger supports for the current unit and language.
    pub fn available_schemes(&self) -> &[TagScheme] {
        &self.available_schemes
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Loads `page_index` of `doc` and retokenizes.
    ///
    /// A missing page or a page without extractable text loads as empty text.
    pub fn load_page(&mut self, doc: &dyn PdfDocument, page_index: u32) {
        let text = doc.page_text(page_index).unwrap_or_default();
        let language = self
            .tagger
            .dominant_language(&text)
            .unwrap_or_else(|| self.fallback_language.clone());

        tracing::debug!(page_index, language = %language, chars = text.len(), "page loaded");
        self.page = Some(LoadedPage {
            index: page_index,
            page_count: doc.page_count(),
            text,
            language,
        });
        self.refresh_schemes();
        self.tokenize();
    }

    /// Moves to the following page. Returns `false` on the last page.
    pub fn next_page(&mut self, doc: &dyn PdfDocument) -> bool {
        let page_count = doc.page_count();
        let next = match &self.page {
            Some(page) if page.index + 1 < page_count => page.index + 1,
            Some(_) => return false,
            None if page_count > 0 => 0,
            None => return false,
        };

        self.load_page(doc, next);
        true
    }

    /// Moves to the preceding page. Returns `false` on the first page.
    pub fn previous_page(&mut self, doc: &dyn PdfDocument) -> bool {
        let Some(index) = self.page.as_ref().map(|page| page.index) else {
            return false;
        };
        if index == 0 {
            return false;
        }

        let previous = index.min(doc.page_count()).saturating_sub(1);
        self.load_page(doc, previous);
        true
    }

    pub fn set_token_unit(&mut self, unit: TokenUnit) {
        self.token_unit = unit;
        self.refresh_schemes();
        self.tokenize();
    }

    /// Falls back to the first available scheme if `scheme` is not available.
    pub fn set_scheme(&mut self, scheme: TagScheme) {
        self.scheme = scheme;
        self.refresh_schemes();
        self.tokenize();
    }

    fn refresh_schemes(&mut self) {
        let Some(page) = &self.page else {
            self.available_schemes.clear();
            return;
        };

        let supported = self.tagger.available_schemes(self.token_unit, &page.language);
        self.available_schemes = TagScheme::INTERESTING
            .into_iter()
            .filter(|scheme| supported.contains(scheme))
            .collect();

        if !self.available_schemes.contains(&self.scheme) {
            let fallback = self.available_schemes.first().copied().unwrap_or_default();
            tracing::debug!(from = %self.scheme, to = %fallback, "scheme unavailable");
            self.scheme = fallback;
        }
    }

    /// Replaces the token list with a fresh tagger pass over the page.
    ///
    /// Ids restart at 0 and the picked-token set is cleared.
    pub fn tokenize(&mut self) {
        self.selected.clear();
        self.tokens.clear();

        let Some(page) = &self.page else {
            return;
        };

        let spans = self.tagger.enumerate(&page.text, self.token_unit, self.scheme, &page.language);
        self.tokens = spans
            .into_iter()
            .filter_map(|span| {
                let text = page.text.get(span.range)?;
                (!text.trim().is_empty()).then(|| (text.to_owned(), span.tag))
            })
            .zip(0..)
            .map(|((text, tag), id)| Token {
                id,
                text,
                tag: tag.unwrap_or_else(|| NO_TYPE.to_owned()),
            })
            .collect();

        tracing::debug!(
            unit = %self.token_unit,
            scheme = %self.scheme,
            tokens = self.tokens.len(),
            "page tokenized"
        );
    }

    /// Mirrors `feed` until the session is dropped or [`detach`](Self::detach)ed.
    ///
    /// Attaching again replaces the previous subscription.
    pub fn attach(&mut self, feed: &SelectionFeed) {
        let mirror = Rc::clone(&self.selection);
        mirror.borrow_mut().apply(feed.current().as_ref());

        self.subscription = Some(feed.subscribe(move |selection| {
            mirror.borrow_mut().apply(selection);
        }));
    }

    pub fn detach(&mut self) {
        self.subscription = None;
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// Stores `selection` unless it has the same text as the stored one.
    /// Returns whether anything changed.
    pub fn selection_changed(&mut self, selection: Option<Selection>) -> bool {
        self.selection.borrow_mut().apply(selection.as_ref())
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection.borrow().current().cloned()
    }

    pub fn selection_revision(&self) -> u64 {
        self.selection.borrow().revision()
    }

    /// Flips `id` in the picked set. Returns whether it is now picked.
    pub fn toggle_token(&mut self, id: u32) -> bool {
        if self.selected.remove(&id) {
            false
        } else {
            self.selected.insert(id)
        }
    }

    pub fn select_tokens(&mut self, ids: impl IntoIterator<Item = u32>) {
        self.selected.extend(ids);
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    pub fn is_selected(&self, id: u32) -> bool {
        self.selected.contains(&id)
    }

    /// Joins the picked tokens in id order and clears the picked set.
    pub fn materialize_selection(&mut self) -> String {
        let ids = std::mem::take(&mut self.selected);
        join_tokens(&self.tokens, ids)
    }
}

/// Joins the texts of `ids` in ascending id order with single spaces.
///
/// Unknown ids are skipped.
pub fn join_tokens(tokens: &[Token], ids: impl IntoIterator<Item = u32>) -> String {
    let ids: BTreeSet<u32> = ids.into_iter().collect();

    ids.into_iter()
        .filter_map(|id| {
            let token = tokens
                .get(id as usize)
                .filter(|token| token.id == id)
                .or_else(|| tokens.iter().find(|token| token.id == id));
            if token.is_none() {
                tracing::warn!(id, "unknown token id");
            }
            token.map(|token| token.text.as_str())
        })
        .collect::<Vec<_>>()
        .join(" ")
}
