use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use anyhow::{Context, Result};
use moka::future::Cache;
use once_cell::sync::Lazy;

use crate::attendance::loader::{self, ColumnMap, LoadError};
use crate::model::attendance::AttendanceRecord;

type CacheKey = (String, Option<SystemTime>);

/// Parsed attendance files, keyed by path + mtime so an updated export is
/// picked up on the next request without a restart.
static RECORD_CACHE: Lazy<Cache<CacheKey, Arc<Vec<AttendanceRecord>>>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(8)
        .time_to_live(Duration::from_secs(3600))
        .build()
});

fn cache_key(path: &Path) -> CacheKey {
    let mtime = std::fs::metadata(path).and_then(|m| m.modified()).ok();
    (path.display().to_string(), mtime)
}

/// Loads the attendance export through the cache.
pub async fn load_cached(
    path: &Path,
    columns: &ColumnMap,
) -> Result<Arc<Vec<AttendanceRecord>>, LoadError> {
    let key = cache_key(path);
    if let Some(hit) = RECORD_CACHE.get(&key).await {
        return Ok(hit);
    }

    let records = Arc::new(loader::load_records(path, columns)?);
    RECORD_CACHE.insert(key, records.clone()).await;
    Ok(records)
}

/// Pre-parses the export at startup so the first dashboard request is warm.
pub async fn warmup(path: &Path, columns: &ColumnMap) -> Result<usize> {
    let records = load_cached(path, columns)
        .await
        .with_context(|| format!("warmup of {} failed", path.display()))?;

    tracing::info!(
        rows = records.len(),
        file = %path.display(),
        "Attendance cache warmup complete"
    );
    Ok(records.len())
}
