//! Layout change notifications.
//!
//! Every mutation of a diff entry's layout produces a [`LayoutChange`]
//! describing which sub-regions of the entry were affected, so the hosting
//! view can reposition only what moved. Changes are both returned to the
//! caller and delivered synchronously to subscribed listeners within the
//! same turn -- there is no queue and no cross-thread dispatch.

use smallvec::SmallVec;

/// Sub-region of a diff entry affected by a layout mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutChangeSource {
    /// The outer width of the entry (or its horizontal margins).
    OuterWidth,
    /// The source editor's height.
    EditorHeight,
    /// The metadata editor region (height or fold state).
    MetadataEditor,
    /// The output metadata/status editor region.
    OutputEditor,
    /// The rendered output view region (heights or fold state).
    OutputView,
}

/// Structured descriptor of one layout mutation.
///
/// A single entry-level operation can touch several regions (an output
/// resize updates both the output view and the entry total), so sources are
/// a small set rather than a single value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutChange {
    sources: SmallVec<[LayoutChangeSource; 2]>,
    total_height: u64,
}

impl LayoutChange {
    /// A change touching no region; emitted nowhere, returned from no-op
    /// mutations so callers still see the current total.
    pub fn none(total_height: u64) -> Self {
        Self {
            sources: SmallVec::new(),
            total_height,
        }
    }

    pub fn new(source: LayoutChangeSource, total_height: u64) -> Self {
        let mut sources = SmallVec::new();
        sources.push(source);
        Self {
            sources,
            total_height,
        }
    }

    /// Fold another change into this one, deduplicating sources and keeping
    /// the later total.
    pub fn merge(&mut self, other: &LayoutChange) {
        for &source in &other.sources {
            if !self.sources.contains(&source) {
                self.sources.push(source);
            }
        }
        self.total_height = other.total_height;
    }

    /// True when the mutation affected nothing.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn affects(&self, source: LayoutChangeSource) -> bool {
        self.sources.contains(&source)
    }

    pub fn sources(&self) -> &[LayoutChangeSource] {
        &self.sources
    }

    /// Total entry height after the mutation.
    pub fn total_height(&self) -> u64 {
        self.total_height
    }
}

/// Identifies one subscription on a [`LayoutChangeEmitter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&LayoutChange)>;

/// Synchronous listener registry for layout changes.
///
/// Listeners run in registration order, on the caller's stack, before the
/// mutating call returns. The view-model is single-threaded by contract, so
/// listeners need not be `Send`.
#[derive(Default)]
pub struct LayoutChangeEmitter {
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl LayoutChangeEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener; returns an id usable with
    /// [`unsubscribe`](Self::unsubscribe).
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&LayoutChange) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if the id was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Deliver `change` to every listener, synchronously.
    ///
    /// Empty changes are skipped: a no-op mutation notifies nobody.
    pub fn emit(&mut self, change: &LayoutChange) {
        if change.is_empty() {
            return;
        }
        tracing::trace!(sources = ?change.sources(), total = change.total_height(), "layout change");
        for (_, listener) in &mut self.listeners {
            listener(change);
        }
    }
}

impl std::fmt::Debug for LayoutChangeEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutChangeEmitter")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
