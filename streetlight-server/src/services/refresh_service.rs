use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use streetlight_api::models::{
    RefreshFailure, SnapshotResponse, SnapshotState, StreetlightRecord,
};
use time::OffsetDateTime;
use tokio::sync::{Mutex, Notify, watch};
use tokio::task::JoinHandle;

use crate::configs::Refresh;
use crate::errors::StoreError;
use crate::services::SnapshotService;

/// The device collection as of one successful refresh cycle.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub records: Arc<Vec<StreetlightRecord>>,
    pub fetched_at: OffsetDateTime,
}

impl Snapshot {
    pub fn find(&self, id: &str) -> Option<&StreetlightRecord> {
        self.records.iter().find(|record| record.id == id)
    }
}

/// What the view layer renders: the latest good snapshot plus the outcome
/// of the most recent cycle.
#[derive(Debug, Clone, Default)]
pub struct FleetView {
    pub snapshot: Option<Arc<Snapshot>>,
    pub last_error: Option<RefreshFailure>,
    pub cycle: u64,
}

impl FleetView {
    pub fn state(&self) -> SnapshotState {
        match &self.snapshot {
            None => SnapshotState::Pending,
            Some(snapshot) if snapshot.records.is_empty() => SnapshotState::Empty,
            Some(_) => SnapshotState::Ready,
        }
    }

    pub fn to_response(&self) -> SnapshotResponse {
        SnapshotResponse {
            state: self.state(),
            records: self
                .snapshot
                .as_ref()
                .map(|snapshot| snapshot.records.as_ref().clone())
                .unwrap_or_default(),
            fetched_at: self.snapshot.as_ref().map(|snapshot| snapshot.fetched_at),
            last_error: self.last_error.clone(),
        }
    }
}

/// Timer-driven fetch loop publishing immutable snapshots.
///
/// Cycles never overlap: the periodic loop and forced refreshes share one
/// lock. A failed cycle keeps the previous snapshot and records the error.
pub struct RefreshService {
    snapshot_service: Arc<SnapshotService>,
    view: watch::Sender<FleetView>,
    interval: AtomicU64,
    wakeup: Notify,
    cycle_lock: Mutex<()>,
}

impl RefreshService {
    pub fn new(snapshot_service: Arc<SnapshotService>, interval: Duration) -> Self {
        let (view, _) = watch::channel(FleetView::default());

        Self {
            snapshot_service,
            view,
            interval: AtomicU64::new(Refresh::clamp_interval(interval.as_secs())),
            wakeup: Notify::new(),
            cycle_lock: Mutex::new(()),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<FleetView> {
        self.view.subscribe()
    }

    pub fn current(&self) -> FleetView {
        self.view.borrow().clone()
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval.load(Ordering::Relaxed))
    }

    /// Changes the period of the loop, clamped to the accepted range, and
    /// restarts the wait with the new period.
    pub fn set_interval(&self, seconds: u64) -> Duration {
        let seconds = Refresh::clamp_interval(seconds);
        self.interval.store(seconds, Ordering::Relaxed);
        self.wakeup.notify_one();

        tracing::info!("refresh interval set to {}s", seconds);

        Duration::from_secs(seconds)
    }

    pub fn snapshot_service(&self) -> &Arc<SnapshotService> {
        &self.snapshot_service
    }

    /// Runs one cycle now, reading the store even when the cache is warm.
    pub async fn force_refresh(&self) -> Result<Arc<Snapshot>, StoreError> {
        self.cycle(true).await
    }

    pub async fn run_cycle(&self) -> Result<Arc<Snapshot>, StoreError> {
        self.cycle(false).await
    }

    async fn cycle(&self, forced: bool) -> Result<Arc<Snapshot>, StoreError> {
        let _guard = self.cycle_lock.lock().await;

        let fetched = if forced {
            self.snapshot_service.fetch_fresh().await
        } else {
            self.snapshot_service.fetch_all().await
        };

        match fetched {
            Ok(records) => {
                let snapshot = Arc::new(Snapshot {
                    records,
                    fetched_at: OffsetDateTime::now_utc(),
                });

                tracing::debug!("published snapshot of {} streetlights", snapshot.records.len());

                self.view.send_modify(|view| {
                    view.snapshot = Some(snapshot.clone());
                    view.last_error = None;
                    view.cycle += 1;
                });

                Ok(snapshot)
            }
            Err(e) => {
                tracing::warn!("refresh failed, keeping previous snapshot: {}", e);

                self.view.send_modify(|view| {
                    view.last_error = Some(RefreshFailure {
                        message: e.to_string(),
                        at: OffsetDateTime::now_utc(),
                    });
                    view.cycle += 1;
                });

                Err(e)
            }
        }
    }

    pub fn start(self: &Arc<Self>) -> JoinHandle<()> {
        let service = Arc::clone(self);

        tokio::spawn(async move {
            tracing::info!("refresh loop started ({}s interval)", service.interval().as_secs());

            loop {
                let _ = service.run_cycle().await;

                // An interval change restarts the wait without fetching.
                loop {
                    tokio::select! {
                        _ = tokio::time::sleep(service.interval()) => break,
                        _ = service.wakeup.notified() => continue,
                    }
                }
            }
        })
    }
}
