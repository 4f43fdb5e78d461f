use crate::storage::error::{StorageError, StorageResult};
use crate::storage::page::PageId;
use log::{info, warn};
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::Path;

pub const PAGE_SIZE: usize = 4096;

/// Raw page I/O against a single backing file.
///
/// The page count lives in memory: it starts at `file_len / PAGE_SIZE` and is
/// bumped by [`PageManager::allocate_page`]. A freshly allocated page only
/// exists on disk once it is first written.
pub struct PageManager {
    file: File,
    num_pages: u32,
}

impl PageManager {
    /// Open the backing file, creating it if it does not exist.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        let file_size = file.metadata()?.len();
        if file_size % PAGE_SIZE as u64 != 0 {
            warn!(
                "{:?} is {} bytes, not a multiple of {}; ignoring trailing bytes",
                path, file_size, PAGE_SIZE
            );
        }
        let num_pages = (file_size / PAGE_SIZE as u64) as u32;
        info!("Opened {:?} with {} pages", path, num_pages);

        Ok(Self { file, num_pages })
    }

    pub fn read_page(&mut self, page_id: PageId, buf: &mut [u8]) -> StorageResult<()> {
        if buf.len() != PAGE_SIZE {
            return Err(StorageError::InvalidPageSize {
                expected: PAGE_SIZE,
                actual: buf.len(),
            });
        }

        self.file.seek(SeekFrom::Start(Self::page_offset(page_id)))?;

        let mut filled = 0;
        while filled < PAGE_SIZE {
            match self.file.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        if filled != PAGE_SIZE {
            return Err(StorageError::ShortRead {
                page_id,
                expected: PAGE_SIZE,
                actual: filled,
            });
        }

        Ok(())
    }

    /// Write one page and sync it before returning.
    pub fn write_page(&mut self, page_id: PageId, data: &[u8]) -> StorageResult<()> {
        if data.len() != PAGE_SIZE {
            return Err(StorageError::InvalidPageSize {
                expected: PAGE_SIZE,
                actual: data.len(),
            });
        }

        self.file.seek(SeekFrom::Start(Self::page_offset(page_id)))?;
        self.file.write_all(data)?;
        self.file.sync_all()?;

        Ok(())
    }

    pub fn num_pages(&self) -> u32 {
        self.num_pages
    }

    /// Hand out the next page id. The file is not touched.
    pub fn allocate_page(&mut self) -> PageId {
        let page_id = PageId(self.num_pages);
        self.num_pages += 1;
        page_id
    }

    /// Sync and release the file handle.
    pub fn close(self) -> StorageResult<()> {
        self.file.sync_all()?;
        info!("Closed backing file with {} pages", self.num_pages);
        Ok(())
    }

    fn page_offset(page_id: PageId) -> u64 {
        page_id.0 as u64 * PAGE_SIZE as u64
    }
}
