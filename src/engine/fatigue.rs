//! Relative systemic-cost model. Scores a prescription and accumulates
//! per-day and per-week totals split by body region.

use crate::engine::tables::base_fatigue_score;
use crate::models::Region;

/// Fatigue cost of one prescribed exercise:
/// `base * (sets*reps / 10) * (rpe / 10)`.
pub fn fatigue_for_exercise(exercise_name: &str, sets: u32, reps: u32, rpe: f64) -> f64 {
    base_fatigue_score(exercise_name) * (sets as f64 * reps as f64 / 10.0) * (rpe / 10.0)
}

/// Accumulated cost. Invariant: `overall == lower + upper` at all times;
/// contributions are additive and never negative.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FatigueTotals {
    pub lower: f64,
    pub upper: f64,
    pub overall: f64,
}

impl FatigueTotals {
    pub fn add(&mut self, region: Region, cost: f64) {
        match region {
            Region::Lower => self.lower += cost,
            Region::Upper => self.upper += cost,
        }
        self.overall += cost;
    }

    /// Totals as they would look after adding `cost`, without mutating.
    /// Used for hypothetical cap checks during scheduling.
    pub fn plus(&self, region: Region, cost: f64) -> FatigueTotals {
        let mut next = *self;
        next.add(region, cost);
        next
    }
}

/// Fatigue state for one week's scheduling run. Owned by a single scheduler
/// instance; never shared across weeks or users.
#[derive(Debug, Clone)]
pub struct WeekFatigue {
    pub days: Vec<FatigueTotals>,
    pub week: FatigueTotals,
}

impl WeekFatigue {
    pub fn new(days: usize) -> Self {
        Self {
            days: vec![FatigueTotals::default(); days],
            week: FatigueTotals::default(),
        }
    }

    pub fn apply(&mut self, day: usize, region: Region, cost: f64) {
        self.days[day].add(region, cost);
        self.week.add(region, cost);
    }
}
