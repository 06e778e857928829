//! Dashboard stats cache and its refresh scheduler.
//!
//! Replaces the original interval-polling loop with a cancellable scheduled
//! task: at most one refresh runs at a time, and every refresh takes a
//! monotonically increasing sequence number before querying so a slow
//! result can never clobber a fresher snapshot. Interval changes cancel and
//! restart the task; teardown aborts it. In-flight database work is not
//! cancelled, only superseded.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use tokio::task::JoinHandle;

use pulse_types::{DashboardStats, ScheduleStatus};

use crate::analytics;
use crate::db::repositories::TweetRepository;
use crate::db::Database;

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(300);

struct Snapshot {
    seq: u64,
    stats: DashboardStats,
}

/// Latest stats snapshot, guarded by the sequence number it was computed
/// under.
#[derive(Clone, Default)]
pub struct StatsCache {
    inner: Arc<RwLock<Option<Snapshot>>>,
}

impl StatsCache {
    /// Install a snapshot unless a fresher one already landed. Returns
    /// whether the snapshot was stored.
    pub fn store_if_fresh(&self, seq: u64, stats: DashboardStats) -> bool {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        match guard.as_ref() {
            Some(current) if current.seq >= seq => false,
            _ => {
                *guard = Some(Snapshot { seq, stats });
                true
            }
        }
    }

    pub fn latest(&self) -> Option<DashboardStats> {
        let guard = self.inner.read().unwrap_or_else(|e| e.into_inner());
        guard.as_ref().map(|s| s.stats.clone())
    }
}

pub struct RefreshScheduler {
    db: Database,
    cache: StatsCache,
    seq: AtomicU64,
    in_flight: AtomicBool,
    enabled: AtomicBool,
    interval_secs: AtomicU64,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl RefreshScheduler {
    pub fn new(db: Database) -> Arc<Self> {
        Arc::new(Self {
            db,
            cache: StatsCache::default(),
            seq: AtomicU64::new(0),
            in_flight: AtomicBool::new(false),
            enabled: AtomicBool::new(false),
            interval_secs: AtomicU64::new(DEFAULT_INTERVAL.as_secs()),
            task: Mutex::new(None),
        })
    }

    pub fn cache(&self) -> &StatsCache {
        &self.cache
    }

    /// Run one refresh unless another is already in flight. Returns the
    /// fresh stats, or `None` when the refresh was skipped.
    pub fn refresh_now(&self) -> Result<Option<DashboardStats>> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            tracing::debug!("Refresh already in flight, skipping");
            return Ok(None);
        }

        let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.compute();
        self.in_flight.store(false, Ordering::SeqCst);

        let stats = result?;
        if self.cache.store_if_fresh(seq, stats.clone()) {
            tracing::debug!(seq, "Stored dashboard stats snapshot");
        } else {
            tracing::warn!(seq, "Discarded stale stats snapshot");
        }
        Ok(Some(stats))
    }

    fn compute(&self) -> Result<DashboardStats> {
        let repo = TweetRepository::new(self.db.pool.clone());
        let labels = repo.all_sentiments()?;
        Ok(DashboardStats {
            total_tweets: repo.total_count()?,
            unique_users: repo.unique_user_count()?,
            average_sentiment: analytics::average_sentiment(&labels),
            fact_checked: repo.fact_checked_count()?,
            refreshed_at: Utc::now(),
        })
    }

    /// Enable automatic refreshes at the given interval, cancelling any
    /// previously scheduled task first.
    pub fn start(self: &Arc<Self>, interval: Duration) {
        self.stop();
        self.enabled.store(true, Ordering::SeqCst);
        self.interval_secs.store(interval.as_secs(), Ordering::SeqCst);

        let scheduler = Arc::clone(self);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // Consume the immediate first tick; startup already refreshed.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if let Err(e) = scheduler.refresh_now() {
                    tracing::error!("Scheduled stats refresh failed: {}", e);
                }
            }
        });

        let mut guard = self.task.lock().unwrap_or_else(|e| e.into_inner());
        *guard = Some(handle);
    }

    /// Cancel the scheduled task, if any. Idempotent.
    pub fn stop(&self) {
        self.enabled.store(false, Ordering::SeqCst);
        let mut guard = self.task.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(handle) = guard.take() {
            handle.abort();
        }
    }

    pub fn status(&self) -> ScheduleStatus {
        ScheduleStatus {
            enabled: self.enabled.load(Ordering::SeqCst),
            interval_secs: self.interval_secs.load(Ordering::SeqCst),
        }
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        let mut guard = self.task.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(handle) = guard.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(total: i64) -> DashboardStats {
        DashboardStats {
            total_tweets: total,
            unique_users: 0,
            average_sentiment: 0.0,
            fact_checked: 0,
            refreshed_at: Utc::now(),
        }
    }

    fn test_db() -> Database {
        let db = Database::in_memory().expect("Failed to create database");
        db.initialize().expect("Failed to initialize schema");
        db.seed_demo_data().expect("Failed to seed demo data");
        db
    }

    #[test]
    fn cache_rejects_stale_sequence() {
        let cache = StatsCache::default();
        assert!(cache.store_if_fresh(2, stats(20)));
        assert!(!cache.store_if_fresh(1, stats(10)));
        assert_eq!(cache.latest().unwrap().total_tweets, 20);
    }

    #[test]
    fn cache_accepts_newer_sequence() {
        let cache = StatsCache::default();
        assert!(cache.store_if_fresh(1, stats(10)));
        assert!(cache.store_if_fresh(2, stats(20)));
        assert_eq!(cache.latest().unwrap().total_tweets, 20);
    }

    #[test]
    fn refresh_now_populates_cache() {
        let scheduler = RefreshScheduler::new(test_db());
        let stats = scheduler
            .refresh_now()
            .expect("refresh failed")
            .expect("refresh skipped");
        assert_eq!(stats.total_tweets, 5);
        assert_eq!(scheduler.cache().latest().unwrap().total_tweets, 5);
    }

    #[test]
    fn refresh_is_skipped_while_one_is_in_flight() {
        let scheduler = RefreshScheduler::new(test_db());
        scheduler.in_flight.store(true, Ordering::SeqCst);
        let result = scheduler.refresh_now().expect("refresh failed");
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn start_and_stop_toggle_status() {
        let scheduler = RefreshScheduler::new(test_db());
        assert!(!scheduler.status().enabled);

        scheduler.start(Duration::from_secs(60));
        let status = scheduler.status();
        assert!(status.enabled);
        assert_eq!(status.interval_secs, 60);

        scheduler.stop();
        assert!(!scheduler.status().enabled);
    }

    #[tokio::test]
    async fn interval_change_replaces_the_task() {
        let scheduler = RefreshScheduler::new(test_db());
        scheduler.start(Duration::from_secs(60));
        scheduler.start(Duration::from_secs(600));
        assert_eq!(scheduler.status().interval_secs, 600);
        scheduler.stop();
    }
}
