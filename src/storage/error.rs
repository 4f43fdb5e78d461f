//! Storage layer error types.

use crate::storage::page::PageId;
use thiserror::Error;

/// Errors that can occur in the storage layer.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Short read on page {page_id}: expected {expected} bytes, got {actual}")]
    ShortRead {
        page_id: PageId,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid page size: expected {expected}, got {actual}")]
    InvalidPageSize { expected: usize, actual: usize },

    #[error("Corrupted page: {0}")]
    CorruptedPage(String),

    #[error("Failed to decode record: {0}")]
    Decode(String),

    #[error("Record too large: {size} bytes exceeds page capacity of {max} bytes")]
    RecordTooLarge { size: usize, max: usize },

    #[error("Record for key '{key}' grew beyond its slot: needs {required} bytes, slot holds {available}")]
    RecordGrew {
        key: String,
        required: usize,
        available: usize,
    },
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
