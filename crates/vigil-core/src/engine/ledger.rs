//! XP accounting.
//!
//! Focus earns XP on a fixed interval, alerts cost a flat penalty, and
//! levels consume XP as they are crossed. All balances are unsigned. A
//! penalty can never drive XP below zero, it deducts what is available
//! and reports the actual amount.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Reward and level-curve knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XpConfig {
    /// XP granted per completed focus interval.
    #[serde(default = "default_focus_reward")]
    pub focus_reward: u64,
    /// Length of one focus interval, in milliseconds.
    #[serde(default = "default_focus_interval_ms")]
    pub focus_interval_ms: u64,
    /// XP deducted when an alert fires.
    #[serde(default = "default_distraction_penalty")]
    pub distraction_penalty: u64,
    /// XP required to leave level 1.
    #[serde(default = "default_level_base")]
    pub level_base: u64,
    /// Extra XP required per level after the first.
    #[serde(default = "default_level_step")]
    pub level_step: u64,
}

fn default_focus_reward() -> u64 {
    1
}
fn default_focus_interval_ms() -> u64 {
    1000
}
fn default_distraction_penalty() -> u64 {
    5
}
fn default_level_base() -> u64 {
    100
}
fn default_level_step() -> u64 {
    20
}

impl Default for XpConfig {
    fn default() -> Self {
        Self {
            focus_reward: default_focus_reward(),
            focus_interval_ms: default_focus_interval_ms(),
            distraction_penalty: default_distraction_penalty(),
            level_base: default_level_base(),
            level_step: default_level_step(),
        }
    }
}

/// Tracks XP, level, and the continuous-focus anchor.
///
/// XP is progress within the current level. Crossing a level consumes
/// the requirement, so the balance always reads as "XP toward next".
#[derive(Debug)]
pub struct XpLedger {
    config: XpConfig,
    xp: u64,
    level: u32,
    focus_anchor: Option<Instant>,
}

impl XpLedger {
    pub fn new(config: XpConfig) -> Self {
        Self::restore(config, 0, 1)
    }

    /// Resume from persisted progress.
    pub fn restore(config: XpConfig, xp: u64, level: u32) -> Self {
        Self {
            config,
            xp,
            level: level.max(1),
            focus_anchor: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn xp(&self) -> u64 {
        self.xp
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// XP needed to finish the given level.
    pub fn required_for_level(&self, level: u32) -> u64 {
        self.config.level_base + u64::from(level.saturating_sub(1)) * self.config.level_step
    }

    /// XP still missing before the next level.
    pub fn xp_to_next(&self) -> u64 {
        self.required_for_level(self.level).saturating_sub(self.xp)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Credit focus time up to `now`. Returns the XP granted.
    ///
    /// The first focused tick only plants the anchor; credit starts with
    /// the first full interval after it. The anchor advances by whole
    /// intervals so partial time is never lost between calls.
    pub fn accrue_focus(&mut self, now: Instant) -> u64 {
        let Some(anchor) = self.focus_anchor else {
            self.focus_anchor = Some(now);
            return 0;
        };
        if self.config.focus_interval_ms == 0 {
            return 0;
        }
        let elapsed = now.duration_since(anchor);
        let intervals = (elapsed.as_millis() / u128::from(self.config.focus_interval_ms)) as u64;
        if intervals == 0 {
            return 0;
        }
        let credit = intervals * self.config.focus_reward;
        self.focus_anchor =
            Some(anchor + Duration::from_millis(intervals * self.config.focus_interval_ms));
        self.xp += credit;
        credit
    }

    /// Drop the focus anchor. The next focused tick re-plants it.
    pub fn break_focus(&mut self) {
        self.focus_anchor = None;
    }

    /// Deduct the alert penalty, flooring at zero. Returns the amount
    /// actually deducted.
    pub fn penalize(&mut self) -> u64 {
        let actual = self.xp.min(self.config.distraction_penalty);
        self.xp -= actual;
        actual
    }

    /// Credit a lump sum, such as a session reward.
    pub fn award(&mut self, amount: u64) {
        self.xp += amount;
    }

    /// Consume any completed level requirements. Returns each level
    /// reached, in order, which may be several after a large award.
    pub fn settle_levels(&mut self) -> Vec<u32> {
        let mut reached = Vec::new();
        loop {
            let required = self.required_for_level(self.level);
            if self.xp < required {
                break;
            }
            self.xp -= required;
            self.level += 1;
            reached.push(self.level);
        }
        reached
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn make_ledger() -> XpLedger {
        XpLedger::new(XpConfig::default())
    }

    #[test]
    fn first_focus_tick_only_anchors() {
        let mut ledger = make_ledger();
        assert_eq!(ledger.accrue_focus(Instant::now()), 0);
        assert_eq!(ledger.xp(), 0);
    }

    #[test]
    fn focus_credits_one_xp_per_second() {
        let mut ledger = make_ledger();
        let base = Instant::now();

        ledger.accrue_focus(base);
        assert_eq!(ledger.accrue_focus(base + Duration::from_secs(1)), 1);
        // 2.5 s later: two whole intervals, the half second carries over.
        assert_eq!(
            ledger.accrue_focus(base + Duration::from_millis(3500)),
            2
        );
        assert_eq!(ledger.accrue_focus(base + Duration::from_secs(4)), 1);
        assert_eq!(ledger.xp(), 4);
    }

    #[test]
    fn break_discards_partial_progress() {
        let mut ledger = make_ledger();
        let base = Instant::now();

        ledger.accrue_focus(base);
        ledger.accrue_focus(base + Duration::from_secs(1));
        ledger.break_focus();
        // Ten seconds pass unfocused; the next tick only re-anchors.
        assert_eq!(ledger.accrue_focus(base + Duration::from_secs(11)), 0);
        assert_eq!(ledger.accrue_focus(base + Duration::from_secs(12)), 1);
        assert_eq!(ledger.xp(), 2);
    }

    #[test]
    fn penalty_floors_at_zero() {
        let mut ledger = make_ledger();
        ledger.award(3);

        assert_eq!(ledger.penalize(), 3);
        assert_eq!(ledger.xp(), 0);
        assert_eq!(ledger.penalize(), 0);
        assert_eq!(ledger.xp(), 0);
    }

    #[test]
    fn test_level_boundary_is_exclusive() {
        let mut ledger = XpLedger::restore(XpConfig::default(), 95, 1);

        ledger.award(1);
        assert!(ledger.settle_levels().is_empty());
        assert_eq!(ledger.xp(), 96);
        assert_eq!(ledger.level(), 1);

        // An alert right at the boundary pulls the balance back down.
        assert_eq!(ledger.penalize(), 5);
        assert_eq!(ledger.xp(), 91);
    }

    #[test]
    fn test_large_award_crosses_multiple_levels() {
        let mut ledger = make_ledger();

        ledger.award(300);
        // 300 - 100 (level 1) - 120 (level 2) = 80 into level 3.
        assert_eq!(ledger.settle_levels(), vec![2, 3]);
        assert_eq!(ledger.level(), 3);
        assert_eq!(ledger.xp(), 80);
        assert_eq!(ledger.xp_to_next(), 60);
    }

    #[test]
    fn requirement_grows_linearly() {
        let ledger = make_ledger();
        assert_eq!(ledger.required_for_level(1), 100);
        assert_eq!(ledger.required_for_level(2), 120);
        assert_eq!(ledger.required_for_level(5), 180);
    }

    proptest! {
        #[test]
        fn settled_balance_stays_below_requirement(awards in proptest::collection::vec(0u64..500, 1..20)) {
            let mut ledger = make_ledger();
            let mut last_level = ledger.level();
            for amount in awards {
                ledger.award(amount);
                ledger.settle_levels();
                prop_assert!(ledger.xp() < ledger.required_for_level(ledger.level()));
                prop_assert!(ledger.level() >= last_level);
                last_level = ledger.level();
            }
        }

        #[test]
        fn penalties_deduct_exactly_what_they_report(start in 0u64..40, hits in 1usize..10) {
            let mut ledger = make_ledger();
            ledger.award(start);
            let mut remaining = start;
            for _ in 0..hits {
                let actual = ledger.penalize();
                prop_assert!(actual <= 5);
                prop_assert_eq!(actual, remaining.min(5));
                remaining -= actual;
                prop_assert_eq!(ledger.xp(), remaining);
            }
        }
    }
}
