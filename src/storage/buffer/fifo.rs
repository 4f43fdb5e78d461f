use super::replacer::Replacer;
use crate::storage::page::PageId;
use std::collections::{HashSet, VecDeque};

/// Evicts pages in the order they became resident, ignoring hits.
#[derive(Debug, Default)]
pub struct FifoReplacer {
    /// Oldest resident page at front
    queue: VecDeque<PageId>,
    members: HashSet<PageId>,
}

impl FifoReplacer {
    pub fn new(capacity: usize) -> Self {
        Self {
            queue: VecDeque::with_capacity(capacity),
            members: HashSet::with_capacity(capacity),
        }
    }
}

impl Replacer for FifoReplacer {
    fn insert(&mut self, page_id: PageId) {
        if self.members.insert(page_id) {
            self.queue.push_back(page_id);
        }
    }

    fn touch(&mut self, _page_id: PageId) {}

    fn evict(&mut self) -> Option<PageId> {
        let page_id = self.queue.pop_front()?;
        self.members.remove(&page_id);
        Some(page_id)
    }

    fn restore(&mut self, page_id: PageId) {
        if self.members.insert(page_id) {
            self.queue.push_front(page_id);
        }
    }

    fn size(&self) -> usize {
        self.queue.len()
    }
}
