//! Live projection holder for a view that refreshes on a timer.
//!
//! The view owns the timer and calls [`LiveTheory::refresh`] on every tick
//! (1 Hz in the dashboard). A fresh read goes through [`LiveTheory::observe`],
//! which swaps the snapshot wholesale and re-projects at once. Dropping the
//! holder stops everything; there is no background work to cancel.

use std::sync::Arc;

use crate::kingdom::KingdomSnapshot;
use crate::kingdom::theory::{ProjectedTheory, project};

/// Current snapshot plus its latest projection.
#[derive(Debug, Clone)]
pub struct LiveTheory {
    snapshot: Arc<KingdomSnapshot>,
    theory: ProjectedTheory,
    generation: u64,
    projected_at: u64,
}

impl LiveTheory {
    /// Start from a first snapshot, projected to `now`.
    #[must_use]
    pub fn new(snapshot: KingdomSnapshot, now: u64) -> Self {
        let theory = project(&snapshot, now);
        Self {
            snapshot: Arc::new(snapshot),
            theory,
            generation: 0,
            projected_at: now,
        }
    }

    /// Replace the snapshot with a newer read and re-project immediately.
    ///
    /// The previous projection is discarded, not merged.
    pub fn observe(&mut self, snapshot: KingdomSnapshot, now: u64) -> ProjectedTheory {
        self.snapshot = Arc::new(snapshot);
        self.generation += 1;
        log::debug!("snapshot generation {} observed", self.generation);
        self.refresh(now)
    }

    /// Re-project the current snapshot to `now`.
    pub fn refresh(&mut self, now: u64) -> ProjectedTheory {
        self.theory = project(&self.snapshot, now);
        self.projected_at = now;
        self.theory
    }

    /// Current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> &KingdomSnapshot {
        &self.snapshot
    }

    /// Shared handle to the current snapshot.
    ///
    /// A reader holding the handle keeps seeing the snapshot it took even if
    /// a newer one is observed meanwhile.
    #[must_use]
    pub fn snapshot_handle(&self) -> Arc<KingdomSnapshot> {
        Arc::clone(&self.snapshot)
    }

    /// Latest projection.
    #[must_use]
    pub const fn theory(&self) -> ProjectedTheory {
        self.theory
    }

    /// Clock value the latest projection was computed for.
    #[must_use]
    pub const fn projected_at(&self) -> u64 {
        self.projected_at
    }

    /// Number of snapshots observed after the first.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a projection taken at `generation` still belongs to the
    /// current snapshot.
    #[must_use]
    pub const fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }
}
