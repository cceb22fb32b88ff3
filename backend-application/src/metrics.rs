use std::sync::atomic::{AtomicU64, Ordering};

use backend_domain::BattleOutcome;

#[derive(Debug, Default)]
pub struct Metrics {
    battles: AtomicU64,
    ties: AtomicU64,
    gold_transferred: AtomicU64,
    settle_conflicts: AtomicU64,
    settle_failures: AtomicU64,
    history_append_failures: AtomicU64,
}

impl Metrics {
    pub fn record_battle(&self, outcome: &BattleOutcome) {
        self.battles.fetch_add(1, Ordering::Relaxed);
        if outcome.is_tie() {
            self.ties.fetch_add(1, Ordering::Relaxed);
        }
        self.gold_transferred
            .fetch_add(outcome.gold_transferred, Ordering::Relaxed);
    }

    pub fn record_settle_conflict(&self) {
        self.settle_conflicts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_settle_failure(&self) {
        self.settle_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_history_append_failure(&self) {
        self.history_append_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn battles(&self) -> u64 {
        self.battles.load(Ordering::Relaxed)
    }

    pub fn settle_conflicts(&self) -> u64 {
        self.settle_conflicts.load(Ordering::Relaxed)
    }

    pub fn history_append_failures(&self) -> u64 {
        self.history_append_failures.load(Ordering::Relaxed)
    }

    pub fn render_prometheus(&self) -> String {
        let battles = self.battles.load(Ordering::Relaxed);
        let ties = self.ties.load(Ordering::Relaxed);
        let gold = self.gold_transferred.load(Ordering::Relaxed);
        let conflicts = self.settle_conflicts.load(Ordering::Relaxed);
        let failures = self.settle_failures.load(Ordering::Relaxed);
        let append_failures = self.history_append_failures.load(Ordering::Relaxed);

        format!(
            "# TYPE arena_battles_total counter\n\
arena_battles_total {}\n\
# TYPE arena_battle_ties_total counter\n\
arena_battle_ties_total {}\n\
# TYPE arena_gold_transferred_total counter\n\
arena_gold_transferred_total {}\n\
# TYPE arena_settle_conflicts_total counter\n\
arena_settle_conflicts_total {}\n\
# TYPE arena_settle_failures_total counter\n\
arena_settle_failures_total {}\n\
# TYPE arena_history_append_failures_total counter\n\
arena_history_append_failures_total {}\n",
            battles, ties, gold, conflicts, failures, append_failures
        )
    }
}
