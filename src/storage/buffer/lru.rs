use super::replacer::Replacer;
use crate::storage::page::PageId;
use std::collections::VecDeque;

#[derive(Debug, Default)]
pub struct LruReplacer {
    /// Least recently used page at front
    lru_list: VecDeque<PageId>,
}

impl LruReplacer {
    pub fn new(capacity: usize) -> Self {
        Self {
            lru_list: VecDeque::with_capacity(capacity),
        }
    }

    fn position(&self, page_id: PageId) -> Option<usize> {
        self.lru_list.iter().position(|&id| id == page_id)
    }
}

impl Replacer for LruReplacer {
    fn insert(&mut self, page_id: PageId) {
        self.touch(page_id);
    }

    fn touch(&mut self, page_id: PageId) {
        if let Some(idx) = self.position(page_id) {
            self.lru_list.remove(idx);
        }
        self.lru_list.push_back(page_id);
    }

    fn evict(&mut self) -> Option<PageId> {
        self.lru_list.pop_front()
    }

    fn restore(&mut self, page_id: PageId) {
        if let Some(idx) = self.position(page_id) {
            self.lru_list.remove(idx);
        }
        self.lru_list.push_front(page_id);
    }

    fn size(&self) -> usize {
        self.lru_list.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_lru_operations() {
        let mut replacer = LruReplacer::new(3);

        assert_eq!(replacer.size(), 0);
        assert_eq!(replacer.evict(), None);

        replacer.insert(PageId(1));
        replacer.insert(PageId(2));
        replacer.insert(PageId(3));
        assert_eq!(replacer.size(), 3);

        assert_eq!(replacer.evict(), Some(PageId(1)));
        assert_eq!(replacer.evict(), Some(PageId(2)));
        assert_eq!(replacer.evict(), Some(PageId(3)));
        assert_eq!(replacer.evict(), None);
    }

    #[test]
    fn test_touch_moves_to_back() {
        let mut replacer = LruReplacer::new(3);

        replacer.insert(PageId(1));
        replacer.insert(PageId(2));
        replacer.insert(PageId(3));
        replacer.touch(PageId(1));

        assert_eq!(replacer.size(), 3);
        assert_eq!(replacer.evict(), Some(PageId(2)));
        assert_eq!(replacer.evict(), Some(PageId(3)));
        assert_eq!(replacer.evict(), Some(PageId(1)));
    }

    #[test]
    fn test_restore_goes_to_front() {
        let mut replacer = LruReplacer::new(3);

        replacer.insert(PageId(1));
        replacer.insert(PageId(2));
        assert_eq!(replacer.evict(), Some(PageId(1)));

        replacer.restore(PageId(1));
        assert_eq!(replacer.size(), 2);
        assert_eq!(replacer.evict(), Some(PageId(1)));
        assert_eq!(replacer.evict(), Some(PageId(2)));
    }
}
