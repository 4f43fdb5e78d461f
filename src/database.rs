use crate::access::Record;
use crate::config::DatabaseConfig;
use crate::storage::{BufferPool, PageId, PageManager, SlottedPage, StorageError, StorageResult};
use log::info;
use parking_lot::Mutex;
use std::sync::Arc;

/// A record found by a scan, together with the page copy it was read from.
struct Located {
    page_id: PageId,
    slot_id: u32,
    page: SlottedPage,
    record: Record,
}

/// Key-value store over the buffer pool.
///
/// Lookups scan every page from the oldest to the newest and every slot in
/// order, so the first record with a matching key wins. `put` updates that
/// record in place when one exists and appends otherwise.
pub struct Database {
    buffer_pool: BufferPool,
}

impl Database {
    /// Open or create the database described by `config`
    pub fn open(config: &DatabaseConfig) -> StorageResult<Self> {
        let page_manager = PageManager::open(&config.path)?;
        let replacer = config.replacer.build(config.cache_capacity);
        let buffer_pool = BufferPool::new(page_manager, replacer, config.cache_capacity);

        info!(
            "Database ready: {} pages, cache of {} pages ({:?})",
            buffer_pool.page_count(),
            buffer_pool.capacity(),
            config.replacer
        );

        Ok(Self::new(buffer_pool))
    }

    pub fn new(buffer_pool: BufferPool) -> Self {
        Self { buffer_pool }
    }

    pub fn get(&mut self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.find(key)?.map(|found| found.record.value))
    }

    /// Insert or update `key`.
    ///
    /// An update must fit in the slot the key already occupies; otherwise
    /// [`StorageError::RecordGrew`] is returned and the stored value is kept.
    pub fn put(&mut self, key: &str, value: &str) -> StorageResult<()> {
        let bytes = Record::new(key, value).encode()?;

        if let Some(mut found) = self.find(key)? {
            write_record(&mut found.page, found.slot_id, &bytes, key)?;
            return self.buffer_pool.write(found.page_id, &found.page);
        }

        let max = SlottedPage::max_payload_size();
        if bytes.len() > max {
            return Err(StorageError::RecordTooLarge {
                size: bytes.len(),
                max,
            });
        }

        if let Some(last_page_id) = self.page_count().checked_sub(1).map(PageId) {
            let mut page = self.buffer_pool.read(last_page_id)?;
            if let Some(slot_id) = page.allocate(bytes.len()) {
                write_record(&mut page, slot_id, &bytes, key)?;
                return self.buffer_pool.write(last_page_id, &page);
            }
        }

        let mut page = SlottedPage::new();
        let slot_id = page
            .allocate(bytes.len())
            .ok_or(StorageError::RecordTooLarge {
                size: bytes.len(),
                max,
            })?;
        write_record(&mut page, slot_id, &bytes, key)?;
        self.buffer_pool.write_new(&page)?;
        Ok(())
    }

    /// Every stored record in page and slot order.
    pub fn records(&mut self) -> StorageResult<Vec<Record>> {
        let mut records = Vec::new();
        for page_id in (0..self.page_count()).map(PageId) {
            let page = self.buffer_pool.read(page_id)?;
            for data in (0..page.num_slots()).filter_map(|slot_id| page.read_data(slot_id)) {
                records.push(Record::decode(data)?);
            }
        }
        Ok(records)
    }

    pub fn page_count(&self) -> u32 {
        self.buffer_pool.page_count()
    }

    pub fn buffer_pool(&self) -> &BufferPool {
        &self.buffer_pool
    }

    /// Write all dirty cached pages to disk.
    pub fn flush(&mut self) -> StorageResult<()> {
        self.buffer_pool.flush_all()
    }

    /// Flush and release the backing file.
    pub fn close(mut self) -> StorageResult<()> {
        self.flush()?;
        self.buffer_pool.into_page_manager().close()
    }

    fn find(&mut self, key: &str) -> StorageResult<Option<Located>> {
        for page_id in (0..self.page_count()).map(PageId) {
            let page = self.buffer_pool.read(page_id)?;
            for slot_id in 0..page.num_slots() {
                let Some(data) = page.read_data(slot_id) else {
                    continue;
                };
                let record = Record::decode(data)?;
                if record.key == key {
                    return Ok(Some(Located {
                        page_id,
                        slot_id,
                        page,
                        record,
                    }));
                }
            }
        }
        Ok(None)
    }
}

fn write_record(
    page: &mut SlottedPage,
    slot_id: u32,
    bytes: &[u8],
    key: &str,
) -> StorageResult<()> {
    if page.write_data(slot_id, bytes) {
        return Ok(());
    }

    Err(StorageError::RecordGrew {
        key: key.to_string(),
        required: bytes.len(),
        available: page.read_slot(slot_id).map_or(0, |slot| slot.size as usize),
    })
}

/// Thread-safe handle that runs each operation under one lock, so a `put`
/// never interleaves with another caller's scan.
#[derive(Clone)]
pub struct SharedDatabase {
    inner: Arc<Mutex<Database>>,
}

impl SharedDatabase {
    pub fn new(database: Database) -> Self {
        Self {
            inner: Arc::new(Mutex::new(database)),
        }
    }

    pub fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.inner.lock().get(key)
    }

    pub fn put(&self, key: &str, value: &str) -> StorageResult<()> {
        self.inner.lock().put(key, value)
    }

    pub fn flush(&self) -> StorageResult<()> {
        self.inner.lock().flush()
    }

    /// Run several operations as one critical section.
    pub fn with<R>(&self, f: impl FnOnce(&mut Database) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Take the database back once this is the last handle.
    pub fn into_inner(self) -> Option<Database> {
        Arc::try_unwrap(self.inner).ok().map(Mutex::into_inner)
    }
}
