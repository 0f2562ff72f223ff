//! Deadline scheduler for one-shot and periodic timers
//!
//! Replaces ad-hoc per-event callbacks with a single queue polled once per
//! tick against the [`Clock`](super::clock::Clock). Entries carry entity
//! ids, never references: whoever handles a due timer must re-validate
//! that the target still exists (a bomb may have been collected before
//! its fuse fires). Ids are never reused, so an id doubles as a liveness
//! token.

use super::entities::EntityId;

/// What a due timer means to the combat resolver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Bomb fuse elapsed; explode if the bomb is still planted
    BombFuse { bomb: EntityId },
    /// Pickup lifetime elapsed; remove if still uncollected
    PickupExpiry { pickup: EntityId },
    /// Periodic ammo pickup spawner; re-arms itself when handled
    PickupSpawn,
}

#[derive(Debug, Clone)]
struct Timer {
    deadline_ms: f64,
    kind: TimerKind,
}

/// Pending timers, drained in deadline order each tick
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    timers: Vec<Timer>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a timer to fire at the given clock time
    pub fn schedule(&mut self, deadline_ms: f64, kind: TimerKind) {
        self.timers.push(Timer { deadline_ms, kind });
    }

    /// Remove and return every timer whose deadline has passed
    ///
    /// Returned in deadline order (insertion order breaks ties) so firing
    /// is deterministic regardless of scheduling order.
    pub fn pop_due(&mut self, now_ms: f64) -> Vec<TimerKind> {
        if !self.timers.iter().any(|t| t.deadline_ms <= now_ms) {
            return Vec::new();
        }

        let mut due: Vec<(f64, usize, TimerKind)> = Vec::new();
        let mut index = 0;
        self.timers.retain(|t| {
            let fire = t.deadline_ms <= now_ms;
            if fire {
                due.push((t.deadline_ms, index, t.kind));
            }
            index += 1;
            !fire
        });
        due.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        due.into_iter().map(|(_, _, kind)| kind).collect()
    }

    /// Number of armed timers
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_after_deadline() {
        let mut sched = Scheduler::new();
        sched.schedule(3000.0, TimerKind::BombFuse { bomb: EntityId(1) });

        assert!(sched.pop_due(2999.0).is_empty());

        let due = sched.pop_due(3000.0);
        assert_eq!(due, vec![TimerKind::BombFuse { bomb: EntityId(1) }]);

        // One-shot: gone after firing
        assert!(sched.pop_due(10_000.0).is_empty());
        assert!(sched.is_empty());
    }

    #[test]
    fn test_deadline_order() {
        let mut sched = Scheduler::new();
        sched.schedule(500.0, TimerKind::PickupExpiry { pickup: EntityId(9) });
        sched.schedule(100.0, TimerKind::PickupSpawn);
        sched.schedule(300.0, TimerKind::BombFuse { bomb: EntityId(2) });

        let due = sched.pop_due(1000.0);
        assert_eq!(
            due,
            vec![
                TimerKind::PickupSpawn,
                TimerKind::BombFuse { bomb: EntityId(2) },
                TimerKind::PickupExpiry { pickup: EntityId(9) },
            ]
        );
    }

    #[test]
    fn test_undue_timers_survive() {
        let mut sched = Scheduler::new();
        sched.schedule(100.0, TimerKind::PickupSpawn);
        sched.schedule(5000.0, TimerKind::BombFuse { bomb: EntityId(3) });

        assert_eq!(sched.pop_due(200.0).len(), 1);
        assert_eq!(sched.len(), 1);
    }
}
