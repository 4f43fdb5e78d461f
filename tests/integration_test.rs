use anyhow::Result;
use pagekv::config::{DatabaseConfig, ReplacerKind};
use pagekv::database::{Database, SharedDatabase};
use pagekv::storage::{PageId, PageManager, SlottedPage, PAGE_SIZE};
use std::num::NonZeroUsize;
use std::path::Path;
use std::thread;
use tempfile::tempdir;

fn config(path: &Path, cache_capacity: usize) -> DatabaseConfig {
    DatabaseConfig::new(path).with_cache_capacity(NonZeroUsize::new(cache_capacity).unwrap())
}

#[test]
fn test_scenario_single_key() -> Result<()> {
    let dir = tempdir()?;
    let mut db = Database::open(&config(&dir.path().join("kv.db"), 10))?;

    db.put("a", "1")?;
    assert_eq!(db.get("a")?, Some("1".to_string()));
    assert_eq!(db.get("b")?, None);

    db.put("a", "2")?;
    assert_eq!(db.get("a")?, Some("2".to_string()));

    let count = db.records()?.iter().filter(|r| r.key == "a").count();
    assert_eq!(count, 1);

    Ok(())
}

#[test]
fn test_durability_after_flush() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("kv.db");

    let keys: Vec<(String, String)> = (0..150)
        .map(|i| (format!("user:{}", i), format!("value number {}", i)))
        .collect();

    {
        let mut db = Database::open(&config(&path, 3))?;
        for (key, value) in &keys {
            db.put(key, value)?;
        }
        db.flush()?;
        assert!(db.page_count() > 1);
    }

    assert_eq!(std::fs::metadata(&path)?.len() % PAGE_SIZE as u64, 0);

    let mut db = Database::open(&config(&path, 3))?;
    for (key, value) in &keys {
        assert_eq!(db.get(key)?.as_deref(), Some(value.as_str()));
    }

    Ok(())
}

#[test]
fn test_unflushed_writes_stay_in_cache() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("kv.db");

    {
        let mut db = Database::open(&config(&path, 10))?;
        db.put("a", "1")?;
        assert_eq!(db.buffer_pool().is_dirty(PageId(0)), Some(true));
        // Dropped without flush.
    }

    let mut db = Database::open(&config(&path, 10))?;
    assert_eq!(db.page_count(), 0);
    assert_eq!(db.get("a")?, None);

    Ok(())
}

#[test]
fn test_eviction_is_durable() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("kv.db");
    let mut db = Database::open(&config(&path, 1))?;

    // Fill the first page, then force a second one so page 0 is evicted.
    let value = "x".repeat(1000);
    let mut i = 0;
    while db.page_count() < 2 {
        db.put(&format!("k{}", i), &value)?;
        i += 1;
    }

    assert!(!db.buffer_pool().is_resident(PageId(0)));
    assert!(db.buffer_pool().is_resident(PageId(1)));

    let mut page_manager = PageManager::open(&path)?;
    let mut buf = vec![0u8; PAGE_SIZE];
    page_manager.read_page(PageId(0), &mut buf)?;
    let page = SlottedPage::from_bytes(&buf)?;
    assert_eq!(page.num_slots(), i - 1);

    Ok(())
}

#[test]
fn test_lru_database() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("kv.db");

    {
        let mut db = Database::open(&config(&path, 2).with_replacer(ReplacerKind::Lru))?;
        for i in 0..100 {
            db.put(&format!("key{}", i), &"v".repeat(80))?;
        }
        db.close()?;
    }

    let mut db = Database::open(&config(&path, 2))?;
    for i in 0..100 {
        assert_eq!(db.get(&format!("key{}", i))?, Some("v".repeat(80)));
    }

    Ok(())
}

#[test]
fn test_shared_database_across_threads() -> Result<()> {
    let dir = tempdir()?;
    let db = Database::open(&config(&dir.path().join("kv.db"), 4))?;
    let shared = SharedDatabase::new(db);

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let shared = shared.clone();
            thread::spawn(move || -> pagekv::storage::StorageResult<()> {
                for i in 0..25 {
                    shared.put(&format!("t{}-{}", t, i), &format!("{}", i))?;
                }
                Ok(())
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("writer thread panicked")?;
    }

    for t in 0..4 {
        for i in 0..25 {
            assert_eq!(
                shared.get(&format!("t{}-{}", t, i))?,
                Some(format!("{}", i))
            );
        }
    }

    let mut db = shared.into_inner().expect("no other handles remain");
    assert_eq!(db.records()?.len(), 100);

    Ok(())
}
