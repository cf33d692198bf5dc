//! Viewer-side logic for an open document: linguistic tagging of the
//! current page, the viewer selection feed and the token session that ties
//! them together.

pub mod config;
pub mod selection;
pub mod session;
pub mod tagger;

pub use config::{ConfigError, SessionConfig};
pub use selection::{SelectionFeed, SelectionMirror, Subscription};
pub use session::{join_tokens, LoadedPage, SessionState, TokenSession, NO_TYPE};
pub use tagger::{BasicTagger, TaggedSpan, Tagger};
