pub mod fifo;
pub mod lru;
pub mod replacer;

use crate::storage::error::StorageResult;
use crate::storage::{PageId, PageManager, SlottedPage, PAGE_SIZE};
use log::{debug, trace};
use replacer::Replacer;
use std::collections::HashMap;
use std::num::NonZeroUsize;

struct CacheEntry {
    data: Box<[u8; PAGE_SIZE]>,
    is_dirty: bool,
}

/// Write-back page cache in front of a [`PageManager`].
///
/// Callers get owned copies of pages and hand them back through
/// [`BufferPool::write`]; nothing they do to a copy is visible until then.
/// Dirty pages reach the file when they are evicted or flushed.
pub struct BufferPool {
    page_manager: PageManager,
    replacer: Box<dyn Replacer>,
    entries: HashMap<PageId, CacheEntry>,
    capacity: NonZeroUsize,
}

impl BufferPool {
    pub fn new(
        page_manager: PageManager,
        replacer: Box<dyn Replacer>,
        capacity: NonZeroUsize,
    ) -> Self {
        Self {
            page_manager,
            replacer,
            entries: HashMap::with_capacity(capacity.get()),
            capacity,
        }
    }

    /// Fetch a copy of a page, loading it from disk on a miss.
    pub fn read(&mut self, page_id: PageId) -> StorageResult<SlottedPage> {
        if let Some(entry) = self.entries.get(&page_id) {
            trace!("Cache hit for page {}", page_id);
            let page = SlottedPage::from_bytes(&entry.data[..])?;
            self.replacer.touch(page_id);
            return Ok(page);
        }

        trace!("Cache miss for page {}", page_id);
        let mut data = Box::new([0u8; PAGE_SIZE]);
        self.page_manager.read_page(page_id, &mut data[..])?;
        let page = SlottedPage::from_bytes(&data[..])?;

        self.insert(
            page_id,
            CacheEntry {
                data,
                is_dirty: false,
            },
        )?;

        Ok(page)
    }

    /// Store a page's current bytes as the dirty cached copy.
    ///
    /// Writing a page that is already resident refreshes it in place and does
    /// not count against capacity a second time.
    pub fn write(&mut self, page_id: PageId, page: &SlottedPage) -> StorageResult<()> {
        if let Some(entry) = self.entries.get_mut(&page_id) {
            *entry.data = *page.as_bytes();
            entry.is_dirty = true;
            self.replacer.touch(page_id);
            return Ok(());
        }

        self.insert(
            page_id,
            CacheEntry {
                data: Box::new(*page.as_bytes()),
                is_dirty: true,
            },
        )
    }

    /// Cache a brand-new page under the next page id and return that id.
    ///
    /// Room is made before the id is allocated, so a failed eviction leaves
    /// the page count unchanged.
    pub fn write_new(&mut self, page: &SlottedPage) -> StorageResult<PageId> {
        self.make_room()?;

        let page_id = self.page_manager.allocate_page();
        debug!("Allocated page {}", page_id);
        self.insert(
            page_id,
            CacheEntry {
                data: Box::new(*page.as_bytes()),
                is_dirty: true,
            },
        )?;

        Ok(page_id)
    }

    pub fn flush_page(&mut self, page_id: PageId) -> StorageResult<()> {
        if let Some(entry) = self.entries.get_mut(&page_id) {
            if entry.is_dirty {
                self.page_manager.write_page(page_id, &entry.data[..])?;
                entry.is_dirty = false;
            }
        }
        Ok(())
    }

    /// Write every dirty page back, lowest page id first.
    pub fn flush_all(&mut self) -> StorageResult<()> {
        let mut dirty: Vec<PageId> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_dirty)
            .map(|(&page_id, _)| page_id)
            .collect();
        dirty.sort_unstable();

        for &page_id in &dirty {
            self.flush_page(page_id)?;
        }

        debug!("Flushed {} dirty pages", dirty.len());
        Ok(())
    }

    pub fn is_resident(&self, page_id: PageId) -> bool {
        self.entries.contains_key(&page_id)
    }

    /// Dirty flag of a resident page, None if the page is not cached.
    pub fn is_dirty(&self, page_id: PageId) -> Option<bool> {
        self.entries.get(&page_id).map(|entry| entry.is_dirty)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    pub fn page_count(&self) -> u32 {
        self.page_manager.num_pages()
    }

    /// Give back the page manager. Dirty pages that were not flushed are dropped.
    pub fn into_page_manager(self) -> PageManager {
        self.page_manager
    }

    fn insert(&mut self, page_id: PageId, entry: CacheEntry) -> StorageResult<()> {
        self.make_room()?;

        self.entries.insert(page_id, entry);
        self.replacer.insert(page_id);
        debug_assert_eq!(self.replacer.size(), self.entries.len());
        Ok(())
    }

    fn make_room(&mut self) -> StorageResult<()> {
        if self.entries.len() >= self.capacity.get() {
            self.evict()?;
        }
        Ok(())
    }

    fn evict(&mut self) -> StorageResult<()> {
        let Some(victim) = self.replacer.evict() else {
            return Ok(());
        };

        if let Some(entry) = self.entries.get(&victim) {
            if entry.is_dirty {
                if let Err(e) = self.page_manager.write_page(victim, &entry.data[..]) {
                    // Keep the page resident and first in line.
                    self.replacer.restore(victim);
                    return Err(e);
                }
            }
            debug!("Evicted page {} (dirty: {})", victim, entry.is_dirty);
        }

        self.entries.remove(&victim);
        Ok(())
    }
}
