//! Viewer selection notifications
//!
//! [`SelectionFeed`] is the publishing side of the viewer's selection. Each
//! listener is registered through [`SelectionFeed::subscribe`] and stays
//! registered exactly as long as the returned [`Subscription`] lives.

use doc_model::Selection;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt;
use std::rc::{Rc, Weak};

type Listener = Box<dyn FnMut(Option<&Selection>)>;

#[derive(Default)]
struct FeedInner {
    current: Option<Selection>,
    next_id: u64,
    listeners: BTreeMap<u64, Listener>,
    dispatching: bool,
    cancelled: BTreeSet<u64>,
    pending: VecDeque<Option<Selection>>,
}

/// Single-threaded selection-change broadcaster.
#[derive(Clone, Default)]
pub struct SelectionFeed {
    inner: Rc<RefCell<FeedInner>>,
}

impl fmt::Debug for SelectionFeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("SelectionFeed")
            .field("current", &inner.current)
            .field("listeners", &inner.listeners.len())
            .finish()
    }
}

impl SelectionFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Selection> {
        self.inner.borrow().current.clone()
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    /// Registers `listener` for every subsequent [`publish`](Self::publish).
    #[must_use = "dropping the subscription unregisters the listener"]
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: FnMut(Option<&Selection>) + 'static,
    {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.listeners.insert(id, Box::new(listener));

        Subscription { id, feed: Rc::downgrade(&self.inner) }
    }

    /// Stores `selection` as current and notifies every listener.
    ///
    /// Listeners may read the feed, subscribe, cancel or publish while being
    /// notified. A publish made during delivery is queued and delivered to
    /// every listener once the current round finishes, so listeners see
    /// selections in publish order. Listeners added during delivery first
    /// hear the next round.
    pub fn publish(&self, selection: Option<Selection>) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.dispatching {
                inner.pending.push_back(selection);
                return;
            }
            inner.dispatching = true;
        }

        let mut next = Some(selection);
        while let Some(selection) = next {
            self.deliver(&selection);
            next = self.inner.borrow_mut().pending.pop_front();
        }

        self.inner.borrow_mut().dispatching = false;
    }

    fn deliver(&self, selection: &Option<Selection>) {
        let mut listeners = {
            let mut inner = self.inner.borrow_mut();
            inner.current = selection.clone();
            std::mem::take(&mut inner.listeners)
        };

        tracing::trace!(listeners = listeners.len(), "selection published");
        for (id, listener) in listeners.iter_mut() {
            if self.inner.borrow().cancelled.contains(id) {
                continue;
            }
            listener(selection.as_ref());
        }

        let mut inner = self.inner.borrow_mut();
        let cancelled = std::mem::take(&mut inner.cancelled);
        listeners.retain(|id, _| !cancelled.contains(id));
        listeners.append(&mut inner.listeners);
        inner.listeners = listeners;
    }
}

/// Keeps a listener registered. Dropping it unregisters the listener.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    feed: Weak<RefCell<FeedInner>>,
}

impl Subscription {
    pub fn cancel(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(inner) = self.feed.upgrade() else {
            return;
        };
        let mut inner = inner.borrow_mut();
        if inner.listeners.remove(&self.id).is_none() && inner.dispatching {
            inner.cancelled.insert(self.id);
        }
    }
}

/// Local copy of the viewer selection.
///
/// Writes are gated on the selection text so repeated notifications for the
/// same text do not count as a change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionMirror {
    current: Option<Selection>,
    revision: u64,
}

impl SelectionMirror {
    pub fn current(&self) -> Option<&Selection> {
        self.current.as_ref()
    }

    /// Bumped on every accepted change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Returns whether the mirror changed.
    pub fn apply(&mut self, next: Option<&Selection>) -> bool {
        let current_text = self.current.as_ref().map(|selection| selection.text.as_str());
        let next_text = next.map(|selection| selection.text.as_str());
        if current_text == next_text {
            return false;
        }

        self.current = next.cloned();
        self.revision += 1;
        true
    }
}
