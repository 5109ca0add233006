//! Deferred encounter actions
//!
//! Staggered bullets and chained attacks are queued here instead of being
//! fired from detached timers. Every entry carries the generation of the
//! boss that queued it; entries from an earlier boss are dropped when they
//! come due.

use crate::game::state::Bullet;
use crate::game::systems::attacks::AttackPattern;

/// What to do when an entry comes due
#[derive(Debug, Clone)]
pub enum DeferredKind {
    /// Fire a pattern from the boss's position at that moment
    Attack(AttackPattern),
    /// Release a pre-built bullet
    SpawnBullet(Bullet),
}

#[derive(Debug, Clone)]
pub struct DeferredAction {
    /// Encounter clock time (ms) at which the action runs
    pub due_ms: f64,
    pub generation: u64,
    pub kind: DeferredKind,
}

/// Encounter-owned queue of pending actions
#[derive(Debug, Default)]
pub struct DeferredQueue {
    pending: Vec<DeferredAction>,
}

impl DeferredQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due_ms: f64, generation: u64, kind: DeferredKind) {
        self.pending.push(DeferredAction { due_ms, generation, kind });
    }

    /// Remove and return every action due at `now` that belongs to
    /// `generation`, in due order. Due actions from other generations are
    /// discarded.
    pub fn drain_due(&mut self, now: f64, generation: u64) -> Vec<DeferredKind> {
        let mut due = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].due_ms <= now {
                due.push(self.pending.swap_remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms));
        due.into_iter()
            .filter(|action| action.generation == generation)
            .map(|action| action.kind)
            .collect()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
