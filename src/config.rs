//! Settings for opening a [`Database`](crate::database::Database).

use crate::storage::buffer::fifo::FifoReplacer;
use crate::storage::buffer::lru::LruReplacer;
use crate::storage::buffer::replacer::Replacer;
use clap::ValueEnum;
use std::num::NonZeroUsize;
use std::path::PathBuf;

pub const DEFAULT_PATH: &str = "./kv.db";
pub const DEFAULT_CACHE_CAPACITY: usize = 10;

/// Eviction policy used by the buffer pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReplacerKind {
    /// Evict the page that became resident first
    #[default]
    Fifo,
    /// Evict the page that was used least recently
    Lru,
}

impl ReplacerKind {
    pub fn build(self, capacity: NonZeroUsize) -> Box<dyn Replacer> {
        match self {
            ReplacerKind::Fifo => Box::new(FifoReplacer::new(capacity.get())),
            ReplacerKind::Lru => Box::new(LruReplacer::new(capacity.get())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Backing file, created if missing
    pub path: PathBuf,
    /// Buffer pool size in pages
    pub cache_capacity: NonZeroUsize,
    pub replacer: ReplacerKind,
}

impl DatabaseConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_cache_capacity(mut self, cache_capacity: NonZeroUsize) -> Self {
        self.cache_capacity = cache_capacity;
        self
    }

    pub fn with_replacer(mut self, replacer: ReplacerKind) -> Self {
        self.replacer = replacer;
        self
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_PATH),
            cache_capacity: NonZeroUsize::new(DEFAULT_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN),
            replacer: ReplacerKind::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DatabaseConfig::default();

        assert_eq!(config.path, PathBuf::from(DEFAULT_PATH));
        assert_eq!(config.cache_capacity.get(), DEFAULT_CACHE_CAPACITY);
        assert_eq!(config.replacer, ReplacerKind::Fifo);
    }

    #[test]
    fn test_builder() {
        let config = DatabaseConfig::new("/tmp/other.db")
            .with_cache_capacity(NonZeroUsize::new(3).unwrap())
            .with_replacer(ReplacerKind::Lru);

        assert_eq!(config.path, PathBuf::from("/tmp/other.db"));
        assert_eq!(config.cache_capacity.get(), 3);
        assert_eq!(config.replacer, ReplacerKind::Lru);
    }

    #[test]
    fn test_replacer_kind_from_str() {
        assert_eq!(
            ReplacerKind::from_str("fifo", true),
            Ok(ReplacerKind::Fifo)
        );
        assert_eq!(ReplacerKind::from_str("LRU", true), Ok(ReplacerKind::Lru));
        assert!(ReplacerKind::from_str("clock", true).is_err());
    }

    #[test]
    fn test_build_replacer() {
        let capacity = NonZeroUsize::new(4).unwrap();
        for kind in [ReplacerKind::Fifo, ReplacerKind::Lru] {
            let replacer = kind.build(capacity);
            assert_eq!(replacer.size(), 0);
        }
    }
}
