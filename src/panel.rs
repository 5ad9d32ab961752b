// src/panel.rs
//
// Per-panel snapshot plumbing. Several chart panels fetch independently and
// unordered; the one guarantee is that a panel serves the most recently
// *resolved* computation for its current filter set. Each computation is
// tagged with a generation so a stale, slower fetch for an older filter set
// can never overwrite a newer snapshot.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::charts::ChartData;
use crate::models::{CampaignSplit, OverviewKpi};

/// Matches the upstream request-level staleness window.
pub const PANEL_TTL: Duration = Duration::from_secs(60);

/// Free-text search inputs settle for this long before recomputation.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

struct Slot<T> {
    generation: u64,
    key: String,
    stored_at: Option<Instant>,
    value: Option<T>,
}

pub struct PanelCache<T> {
    slot: Mutex<Slot<T>>,
    begun: AtomicU64,
    ttl: Duration,
}

impl<T: Clone> PanelCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            slot: Mutex::new(Slot { generation: 0, key: String::new(), stored_at: None, value: None }),
            begun: AtomicU64::new(0),
            ttl,
        }
    }

    /// Tags a recomputation. Call before fetching; hand the generation back
    /// to [`publish`](Self::publish) once the data resolves.
    pub fn begin(&self) -> u64 {
        self.begun.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Snapshot for `key` if one was published within the TTL.
    pub fn fresh(&self, key: &str) -> Option<T> {
        let slot = self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if slot.key == key && slot.stored_at.is_some_and(|at| at.elapsed() < self.ttl) {
            slot.value.clone()
        } else {
            None
        }
    }

    /// Stores a resolved snapshot. Returns false (and stores nothing) when a
    /// newer generation already published; the stale fetch loses.
    pub fn publish(&self, generation: u64, key: &str, value: T) -> bool {
        let mut slot = self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if generation < slot.generation {
            return false;
        }
        slot.generation = generation;
        slot.key = key.to_string();
        slot.stored_at = Some(Instant::now());
        slot.value = Some(value);
        true
    }
}

/// One cache per dashboard panel, shared behind the app state.
pub struct Panels {
    pub overview: PanelCache<OverviewKpi>,
    pub daily: PanelCache<ChartData>,
    pub weekday: PanelCache<ChartData>,
    pub labels: PanelCache<ChartData>,
    pub campaigns: PanelCache<ChartData>,
    pub split: PanelCache<Vec<CampaignSplit>>,
}

impl Panels {
    pub fn new() -> Self {
        Self {
            overview: PanelCache::new(PANEL_TTL),
            daily: PanelCache::new(PANEL_TTL),
            weekday: PanelCache::new(PANEL_TTL),
            labels: PanelCache::new(PANEL_TTL),
            campaigns: PanelCache::new(PANEL_TTL),
            split: PanelCache::new(PANEL_TTL),
        }
    }
}

impl Default for Panels {
    fn default() -> Self {
        Self::new()
    }
}

/// Collapses bursts of triggers: only the last trigger inside the window
/// reports ready. Models the search-input contract: recomputation fires
/// once typing settles, not per keystroke.
pub struct Debouncer {
    delay: Duration,
    sequence: AtomicU64,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, sequence: AtomicU64::new(0) }
    }

    /// Waits out the window; true when no newer trigger superseded this one.
    pub async fn settle(&self) -> bool {
        let ticket = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.delay).await;
        ticket == self.sequence.load(Ordering::SeqCst)
    }
}
