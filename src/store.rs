// src/store.rs
//! JSON-file record store.
//!
//! The whole store is one pretty-printed JSON array, read fully and rewritten
//! fully on every run. Writes go through a sibling temp file and a rename so a
//! crash mid-write leaves the previous store intact.
//!
//! No locking: at most one pipeline stage is expected to run at a time.

use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::record::NewsRecord;

/// Outcome of reading the store file. Callers pick the recovery policy.
#[derive(Debug)]
pub enum StoreLoad {
    /// File does not exist.
    Missing,
    /// File exists but is not a JSON array of records.
    Corrupt(String),
    Loaded(Vec<NewsRecord>),
}

/// Read the store. Only filesystem errors other than "not found" are `Err`.
pub fn read_store(path: &Path) -> Result<StoreLoad> {
    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(StoreLoad::Missing),
        Err(e) => {
            return Err(e).with_context(|| format!("reading store {}", path.display()));
        }
    };
    match serde_json::from_slice::<Vec<NewsRecord>>(&bytes) {
        Ok(records) => Ok(StoreLoad::Loaded(records)),
        Err(e) => Ok(StoreLoad::Corrupt(e.to_string())),
    }
}

/// Ingestion policy: a missing or corrupt store starts empty.
pub fn load_or_empty(path: &Path) -> Result<Vec<NewsRecord>> {
    match read_store(path)? {
        StoreLoad::Loaded(v) => Ok(v),
        StoreLoad::Missing => Ok(Vec::new()),
        StoreLoad::Corrupt(err) => {
            tracing::warn!(
                path = %path.display(),
                error = %err,
                "existing store unreadable; starting from empty (previous records will be overwritten)"
            );
            Ok(Vec::new())
        }
    }
}

/// Persist the full store, creating parent directories as needed.
pub fn save_store(path: &Path, records: &[NewsRecord]) -> Result<()> {
    let mut json = serde_json::to_string_pretty(records).context("serializing store")?;
    json.push('\n');
    write_atomic(path, json.as_bytes())
        .with_context(|| format!("writing store {}", path.display()))
}

/// Write `bytes` to `path` via `<path>.tmp` + rename.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let tmp = tmp_path(path);
    {
        let mut f = fs::File::create(&tmp)?;
        f.write_all(bytes)?;
        f.sync_all()?;
    }
    fs::rename(&tmp, path)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "store".into());
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(link: &str) -> NewsRecord {
        NewsRecord {
            title: "西葛西駅前でイベント".into(),
            link: link.into(),
            ..Default::default()
        }
    }

    #[test]
    fn missing_then_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("data").join("news.json");
        assert!(matches!(read_store(&p).unwrap(), StoreLoad::Missing));

        save_store(&p, &[rec("L1"), rec("L2")]).unwrap();
        match read_store(&p).unwrap() {
            StoreLoad::Loaded(v) => {
                assert_eq!(v.len(), 2);
                assert_eq!(v[1].link, "L2");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(!tmp_path(&p).exists());
    }

    #[test]
    fn non_ascii_is_written_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("news.json");
        save_store(&p, &[rec("L1")]).unwrap();
        let raw = fs::read_to_string(&p).unwrap();
        assert!(raw.contains("西葛西駅前"));
        assert!(raw.contains("\n  {"));
    }

    #[test]
    fn corrupt_store_is_reported_and_ingest_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("news.json");
        fs::write(&p, "{ not json").unwrap();
        assert!(matches!(read_store(&p).unwrap(), StoreLoad::Corrupt(_)));
        assert!(load_or_empty(&p).unwrap().is_empty());
    }
}
