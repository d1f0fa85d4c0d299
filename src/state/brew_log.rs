//! Brew counter and the append-only event log backing it

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::atomic::{AtomicU64, Ordering},
};

use chrono::{DateTime, Local};
use tokio::{fs::OpenOptions, io::AsyncWriteExt, sync::Mutex};
use tracing::{info, warn};

/// One brew, as stored in the log: `<timestamp>, <epoch seconds>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrewEvent {
    pub timestamp: String,
    pub epoch_seconds: i64,
}

impl BrewEvent {
    pub fn at(time: DateTime<Local>) -> Self {
        Self {
            timestamp: time.format("%Y-%m-%d %H:%M:%S%.3f %z").to_string(),
            epoch_seconds: time.timestamp(),
        }
    }

    pub fn now() -> Self {
        Self::at(Local::now())
    }

    pub fn to_record(&self) -> String {
        format!("{}, {}\n", self.timestamp, self.epoch_seconds)
    }
}

/// In-memory brew counter seeded from, and appended to, a CSV log.
///
/// Counting is immediate; the append happens later, off the request path.
/// Appending is best effort: a failed write is logged and counted but the
/// brew stays counted in memory.
#[derive(Debug)]
pub struct BrewLog {
    path: PathBuf,
    count: AtomicU64,
    failed_writes: AtomicU64,
    /// Serializes appends so records never interleave
    append_lock: Mutex<()>,
}

impl BrewLog {
    /// Open the log at `path`, seeding the counter from its existing records
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let count = load_count(&path);
        info!("Brew log {} holds {} records", path.display(), count);
        Self {
            path,
            count: AtomicU64::new(count),
            failed_writes: AtomicU64::new(0),
            append_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Count one brew and return the new count with the event to persist
    pub fn count_brew(&self) -> (u64, BrewEvent) {
        let event = BrewEvent::now();
        let count = self.count.fetch_add(1, Ordering::SeqCst) + 1;
        info!("Brew #{} counted at {}", count, event.timestamp);
        (count, event)
    }

    /// Append `event` to the log, recording a failure instead of returning it
    pub async fn append(&self, event: &BrewEvent) {
        let _guard = self.append_lock.lock().await;
        if let Err(e) = append_record(&self.path, event).await {
            self.failed_writes.fetch_add(1, Ordering::Relaxed);
            warn!("Failed to append brew event to {}: {}", self.path.display(), e);
        }
    }

    /// Count one brew and persist it; returns the new count
    pub async fn record_brew(&self) -> u64 {
        let (count, event) = self.count_brew();
        self.append(&event).await;
        count
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::SeqCst)
    }

    /// Appends that were lost since startup
    pub fn failed_writes(&self) -> u64 {
        self.failed_writes.load(Ordering::Relaxed)
    }

    /// Raw log contents for export
    pub async fn read_raw(&self) -> io::Result<Vec<u8>> {
        tokio::fs::read(&self.path).await
    }
}

async fn append_record(path: &Path, event: &BrewEvent) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path).await?;
    file.write_all(event.to_record().as_bytes()).await?;
    file.flush().await
}

/// Number of records in the log at `path`; a missing log holds none.
///
/// Only read once at startup, before the server accepts requests.
pub fn load_count(path: &Path) -> u64 {
    match fs::read(path) {
        Ok(bytes) => bytes.iter().filter(|b| **b == b'\n').count() as u64,
        Err(e) if e.kind() == io::ErrorKind::NotFound => 0,
        Err(e) => {
            warn!("Failed to read brew log {}: {}", path.display(), e);
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[tokio::test]
    async fn missing_log_counts_zero() {
        let dir = TempDir::new().unwrap();
        let log = BrewLog::open(dir.path().join("data.csv"));
        assert_eq!(log.count(), 0);
        assert!(log.read_raw().await.is_err());
    }

    #[test]
    fn counter_is_seeded_from_existing_records() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.csv");
        let records: String = (0..7).map(|i| format!("day {}, {}\n", i, 1_600_000_000 + i)).collect();
        fs::write(&path, records).unwrap();

        assert_eq!(load_count(&path), 7);
        assert_eq!(load_count(&path), 7);
        assert_eq!(BrewLog::open(&path).count(), 7);
    }

    #[tokio::test]
    async fn record_brew_appends_one_line() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.csv");
        let log = BrewLog::open(&path);

        assert_eq!(log.record_brew().await, 1);
        assert_eq!(log.record_brew().await, 2);

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        let epoch: i64 = lines[0].rsplit(", ").next().unwrap().parse().unwrap();
        assert!(epoch > 0);
        assert_eq!(load_count(&path), 2);
        assert_eq!(log.read_raw().await.unwrap(), contents.into_bytes());
    }

    #[tokio::test]
    async fn counting_does_not_touch_the_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.csv");
        let log = BrewLog::open(&path);

        let (count, event) = log.count_brew();
        assert_eq!(count, 1);
        assert_eq!(log.count(), 1);
        assert!(!path.exists());

        log.append(&event).await;
        assert_eq!(fs::read_to_string(&path).unwrap(), event.to_record());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_appends_keep_whole_records() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.csv");
        let log = std::sync::Arc::new(BrewLog::open(&path));

        let handles: Vec<_> = (0..20)
            .map(|_| {
                let log = std::sync::Arc::clone(&log);
                tokio::spawn(async move { log.record_brew().await })
            })
            .collect();
        let mut counts = Vec::new();
        for handle in handles {
            counts.push(handle.await.unwrap());
        }
        counts.sort_unstable();

        assert_eq!(counts, (1..=20).collect::<Vec<u64>>());
        assert_eq!(load_count(&path), 20);
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.lines().all(|line| line.split(", ").count() == 2));
    }

    #[tokio::test]
    async fn unwritable_log_still_counts() {
        let dir = TempDir::new().unwrap();
        let log = BrewLog::open(dir.path().join("missing-dir").join("data.csv"));

        assert_eq!(log.record_brew().await, 1);
        assert_eq!(log.count(), 1);
        assert_eq!(log.failed_writes(), 1);
    }

    #[test]
    fn record_format_is_timestamp_then_epoch() {
        let time = Local.timestamp_opt(1_700_000_000, 0).unwrap();
        let event = BrewEvent::at(time);
        assert_eq!(event.epoch_seconds, 1_700_000_000);
        assert!(event.to_record().ends_with(", 1700000000\n"));
        assert!(!event.timestamp.contains(','));
    }
}
