use crate::storage::page::PageId;
use std::fmt::Debug;

/// Eviction policy over the pages resident in a [`BufferPool`](super::BufferPool).
pub trait Replacer: Send + Sync + Debug {
    /// Start tracking a page that just became resident.
    fn insert(&mut self, page_id: PageId);

    /// Record a hit on a resident page. Tracking an already tracked page
    /// never adds a second entry.
    fn touch(&mut self, page_id: PageId);

    /// Select a page to evict and stop tracking it. Returns None if nothing
    /// is tracked.
    fn evict(&mut self) -> Option<PageId>;

    /// Take back a page returned by `evict` whose eviction did not go
    /// through, so that it is selected again next.
    fn restore(&mut self, page_id: PageId);

    /// Get the number of tracked pages.
    fn size(&self) -> usize;
}
