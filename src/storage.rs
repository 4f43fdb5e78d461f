//! Storage layer implementation for pagekv.
//!
//! This module makes a plain byte file behave like a page-addressable store.
//! Key components:
//!
//! - **PageManager**: Reads and writes fixed-size (4KB) pages, the unit of I/O
//! - **SlottedPage**: Slot directory plus variable-length payloads inside one page
//! - **BufferPool**: Capacity-bounded write-back cache of pages with FIFO eviction
//!
//! Writes land in the buffer pool first and reach the file on eviction or on
//! an explicit flush.

pub mod buffer;
pub mod disk;
pub mod error;
pub mod page;

pub use buffer::BufferPool;
pub use disk::{PageManager, PAGE_SIZE};
pub use error::{StorageError, StorageResult};
pub use page::{PageId, SlottedPage};
