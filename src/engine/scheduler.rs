//! Greedy slot scheduler: places a week's required (slot, lift) work items
//! onto training days under hard exclusion rules and daily fatigue caps,
//! minimizing a soft penalty. Single pass, no backtracking; identical
//! inputs always produce identical assignments.

use serde::Serialize;
use tracing::warn;

use crate::engine::fatigue::{fatigue_for_exercise, FatigueTotals, WeekFatigue};
use crate::engine::tables::{
    block_for_week, caps_for, competition_name, find_primary, find_secondary, find_tertiary,
    secondary_variation, slot_targets, tertiary_variation, Block, ProficiencyCaps, SlotType,
    CYCLE_WEEKS,
};
use crate::error::CoachError;
use crate::models::{BaseLift, Proficiency, Region, Weakness};

/// One unit of required work for a week, before day assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlotItem {
    pub slot: SlotType,
    pub lift: BaseLift,
}

/// Completed assignment for one week. `relaxed` marks weeks where at least
/// one item needed the relaxation fallback.
#[derive(Debug, Clone)]
pub struct WeekSchedule {
    pub days: Vec<Vec<SlotItem>>,
    pub fatigue: WeekFatigue,
    pub relaxed: bool,
}

/// Scheduler scoped to a single week's run; all accumulator state lives in
/// the `schedule` call, nothing is shared across weeks or users.
pub struct Scheduler<'a> {
    week: u32,
    block: Block,
    days: u32,
    proficiency: Proficiency,
    caps: &'a ProficiencyCaps,
    weaknesses: &'a [Weakness],
}

/// Primaries lead, in a block-dependent lift order: bench first in Volume
/// blocks, squat first otherwise.
fn lift_order(block: Block) -> [BaseLift; 3] {
    match block {
        Block::Volume => [BaseLift::Bench, BaseLift::Squat, BaseLift::Deadlift],
        Block::Strength | Block::Peak => [BaseLift::Squat, BaseLift::Deadlift, BaseLift::Bench],
    }
}

fn day_has(day: &[SlotItem], slot: SlotType, lift: BaseLift) -> bool {
    day.iter().any(|item| item.slot == slot && item.lift == lift)
}

fn excess(value: f64, cap: f64) -> f64 {
    (value - cap).max(0.0)
}

impl<'a> Scheduler<'a> {
    pub fn new(
        week: u32,
        days: u32,
        proficiency: Proficiency,
        weaknesses: &'a [Weakness],
    ) -> Self {
        Self::with_caps(week, days, proficiency, caps_for(proficiency), weaknesses)
    }

    /// Like `new`, with explicit caps. Exists for cap tuning and tests.
    pub fn with_caps(
        week: u32,
        days: u32,
        proficiency: Proficiency,
        caps: &'a ProficiencyCaps,
        weaknesses: &'a [Weakness],
    ) -> Self {
        Self {
            week,
            block: block_for_week(week, CYCLE_WEEKS),
            days,
            proficiency,
            caps,
            weaknesses,
        }
    }

    pub fn block(&self) -> Block {
        self.block
    }

    /// Required SlotItems for this week, in placement order: primaries,
    /// then secondaries, then tertiaries, each in the block's lift order.
    /// Peak weeks carry primary work only.
    pub fn required_items(&self) -> Result<Vec<SlotItem>, CoachError> {
        let targets = slot_targets(self.days, self.proficiency);
        let order = lift_order(self.block);
        let mut items = Vec::new();

        for lift in order {
            for _ in 0..targets.for_lift(lift).primary {
                items.push(SlotItem {
                    slot: SlotType::Primary,
                    lift,
                });
            }
        }
        if self.block != Block::Peak {
            for lift in order {
                let scheme = find_secondary(self.week, lift)?;
                if scheme.sets > 0 {
                    for _ in 0..targets.for_lift(lift).secondary {
                        items.push(SlotItem {
                            slot: SlotType::Secondary,
                            lift,
                        });
                    }
                }
            }
            for lift in order {
                let scheme = find_tertiary(self.week, lift)?;
                if scheme.sets > 0 {
                    for _ in 0..targets.for_lift(lift).tertiary {
                        items.push(SlotItem {
                            slot: SlotType::Tertiary,
                            lift,
                        });
                    }
                }
            }
        }

        Ok(items)
    }

    /// Concrete exercise an item resolves to; drives its fatigue score.
    pub fn exercise_name(&self, item: SlotItem) -> &'static str {
        match item.slot {
            SlotType::Primary => competition_name(item.lift),
            SlotType::Secondary => secondary_variation(self.block, item.lift, self.weaknesses),
            SlotType::Tertiary => tertiary_variation(item.lift),
        }
    }

    /// Fatigue cost of one item, top and backoff work included.
    fn item_cost(&self, item: SlotItem) -> Result<f64, CoachError> {
        let name = self.exercise_name(item);
        let cost = match item.slot {
            SlotType::Primary => {
                let scheme = find_primary(self.week, item.lift)?;
                let top = fatigue_for_exercise(name, scheme.top.sets, scheme.top.reps, scheme.top.rpe);
                let backoff = scheme
                    .backoff
                    .map(|b| fatigue_for_exercise(name, b.sets, b.reps, b.rpe))
                    .unwrap_or(0.0);
                top + backoff
            }
            SlotType::Secondary => {
                let scheme = find_secondary(self.week, item.lift)?;
                fatigue_for_exercise(name, scheme.sets, scheme.reps, scheme.rpe)
            }
            SlotType::Tertiary => {
                let scheme = find_tertiary(self.week, item.lift)?;
                fatigue_for_exercise(name, scheme.sets, scheme.reps, scheme.rpe)
            }
        };
        Ok(cost)
    }

    /// Assign every item to exactly one day. Items are never revisited once
    /// placed; each day's items come back ordered primary -> tertiary.
    pub fn schedule(&self, items: &[SlotItem]) -> Result<WeekSchedule, CoachError> {
        let day_count = self.days as usize;
        let mut placed: Vec<Vec<SlotItem>> = vec![Vec::new(); day_count];
        let mut fatigue = WeekFatigue::new(day_count);
        let mut relaxed = false;

        for &item in items {
            let cost = self.item_cost(item)?;
            let region = item.lift.region();

            let mut best: Option<(usize, f64)> = None;
            for day in 0..day_count {
                if self.hard_forbidden(&placed[day], &fatigue.days[day], item, region, cost) {
                    continue;
                }
                let score = self.soft_score(day, &placed[day], &fatigue, item, region, cost);
                if best.map_or(true, |(_, b)| score < b) {
                    best = Some((day, score));
                }
            }

            let day = match best {
                Some((day, _)) => day,
                None => {
                    relaxed = true;
                    self.relaxed_day(&placed, &fatigue, item, region, cost)
                        .unwrap_or_else(|| {
                            warn!(
                                week = self.week,
                                slot = %item.slot,
                                lift = %item.lift,
                                "no day admits slot item even after relaxation; forcing day 0"
                            );
                            0
                        })
                }
            };

            placed[day].push(item);
            fatigue.apply(day, region, cost);
        }

        for day in &mut placed {
            day.sort_by_key(|item| item.slot);
        }

        Ok(WeekSchedule {
            days: placed,
            fatigue,
            relaxed,
        })
    }

    fn day_slot_cap(&self) -> usize {
        if self.days >= 5 {
            2
        } else {
            3
        }
    }

    fn hard_forbidden(
        &self,
        day: &[SlotItem],
        day_totals: &FatigueTotals,
        item: SlotItem,
        region: Region,
        cost: f64,
    ) -> bool {
        if day.len() >= self.day_slot_cap() {
            return true;
        }
        if self.squat_deadlift_primary_conflict(day, item) {
            return true;
        }
        if self.block != Block::Volume && self.cross_primary_conflict(day, item) {
            return true;
        }
        if self.days >= 4 && self.same_lift_stacking(day, item) {
            return true;
        }
        self.exceeds_daily_caps(day_totals, region, cost)
    }

    /// Squat primary and deadlift primary never share a day, in any block.
    fn squat_deadlift_primary_conflict(&self, day: &[SlotItem], item: SlotItem) -> bool {
        if item.slot != SlotType::Primary {
            return false;
        }
        match item.lift {
            BaseLift::Squat => day_has(day, SlotType::Primary, BaseLift::Deadlift),
            BaseLift::Deadlift => day_has(day, SlotType::Primary, BaseLift::Squat),
            BaseLift::Bench => false,
        }
    }

    /// In Strength/Peak blocks a day hosting a squat primary takes no
    /// deadlift secondary/tertiary work, and symmetrically for the
    /// deadlift primary against squat assistance.
    fn cross_primary_conflict(&self, day: &[SlotItem], item: SlotItem) -> bool {
        let other = match item.lift {
            BaseLift::Squat => BaseLift::Deadlift,
            BaseLift::Deadlift => BaseLift::Squat,
            BaseLift::Bench => return false,
        };
        if item.slot == SlotType::Primary {
            day.iter()
                .any(|i| i.lift == other && i.slot != SlotType::Primary)
        } else {
            day_has(day, SlotType::Primary, other)
        }
    }

    /// At 4+ days the same lift never appears twice on one day, except
    /// bench may double up when at most one occurrence is a primary.
    fn same_lift_stacking(&self, day: &[SlotItem], item: SlotItem) -> bool {
        let existing = day.iter().filter(|i| i.lift == item.lift).count();
        if existing == 0 {
            return false;
        }
        if item.lift != BaseLift::Bench {
            return true;
        }
        if existing + 1 > 2 {
            return true;
        }
        let primaries = day
            .iter()
            .filter(|i| i.lift == BaseLift::Bench && i.slot == SlotType::Primary)
            .count()
            + usize::from(item.slot == SlotType::Primary);
        primaries > 1
    }

    fn exceeds_daily_caps(&self, day_totals: &FatigueTotals, region: Region, cost: f64) -> bool {
        let next = day_totals.plus(region, cost);
        next.lower > self.caps.lower_daily_max
            || next.upper > self.caps.upper_daily_max
            || next.overall > self.caps.overall_daily_max
    }

    fn soft_score(
        &self,
        day_idx: usize,
        day: &[SlotItem],
        fatigue: &WeekFatigue,
        item: SlotItem,
        region: Region,
        cost: f64,
    ) -> f64 {
        let week_after = fatigue.week.plus(region, cost);
        let weekly_excess = excess(week_after.lower, self.caps.lower_weekly_max)
            + excess(week_after.upper, self.caps.upper_weekly_max)
            + excess(week_after.overall, self.caps.overall_weekly_max);

        let mut score = 2.0 * weekly_excess
            + fatigue.days[day_idx].overall
            + 0.5 * day.len() as f64;

        if self.block != Block::Volume && self.squat_deadlift_pairing(day, item.lift) {
            score += 0.75;
        }
        if item.slot == SlotType::Primary {
            score += 0.15 * day_idx as f64;
        }
        score
    }

    /// Squat and deadlift on the same day is penalized (not forbidden)
    /// outside Volume blocks even where the hard rules allow it.
    fn squat_deadlift_pairing(&self, day: &[SlotItem], lift: BaseLift) -> bool {
        let other = match lift {
            BaseLift::Squat => BaseLift::Deadlift,
            BaseLift::Deadlift => BaseLift::Squat,
            BaseLift::Bench => return false,
        };
        day.iter().any(|i| i.lift == other)
    }

    /// Relaxed pass: only the squat/deadlift primary exclusion and the
    /// daily caps still apply.
    fn relaxed_day(
        &self,
        placed: &[Vec<SlotItem>],
        fatigue: &WeekFatigue,
        item: SlotItem,
        region: Region,
        cost: f64,
    ) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (day_idx, day) in placed.iter().enumerate() {
            if self.squat_deadlift_primary_conflict(day, item)
                || self.exceeds_daily_caps(&fatigue.days[day_idx], region, cost)
            {
                continue;
            }
            let score = self.soft_score(day_idx, day, fatigue, item, region, cost);
            if best.map_or(true, |(_, b)| score < b) {
                best = Some((day_idx, score));
            }
        }
        best.map(|(day, _)| day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn caps_ok(schedule: &WeekSchedule, caps: &ProficiencyCaps) -> bool {
        schedule.fatigue.days.iter().all(|d| {
            d.lower <= caps.lower_daily_max + 1e-9
                && d.upper <= caps.upper_daily_max + 1e-9
                && d.overall <= caps.overall_daily_max + 1e-9
        })
    }

    fn no_sq_dl_primary_share(schedule: &WeekSchedule) -> bool {
        schedule.days.iter().all(|day| {
            !(day_has(day, SlotType::Primary, BaseLift::Squat)
                && day_has(day, SlotType::Primary, BaseLift::Deadlift))
        })
    }

    #[test]
    fn four_day_beginner_week_one() {
        let scheduler = Scheduler::new(1, 4, Proficiency::Beginner, &[]);
        let items = scheduler.required_items().unwrap();
        // squat p+s, bench p+s+t, deadlift p
        assert_eq!(items.len(), 6);

        let schedule = scheduler.schedule(&items).unwrap();
        let placed: usize = schedule.days.iter().map(Vec::len).sum();
        assert_eq!(placed, items.len());
        assert!(schedule.days.iter().all(|day| day.len() <= 3));
        assert!(no_sq_dl_primary_share(&schedule));
        assert!(caps_ok(&schedule, caps_for(Proficiency::Beginner)));
        assert!(!schedule.relaxed);
    }

    #[test]
    fn three_day_week_allows_lift_stacking() {
        let scheduler = Scheduler::new(1, 3, Proficiency::Beginner, &[]);
        let items = scheduler.required_items().unwrap();
        let schedule = scheduler.schedule(&items).unwrap();
        let placed: usize = schedule.days.iter().map(Vec::len).sum();
        assert_eq!(placed, items.len());
        assert!(no_sq_dl_primary_share(&schedule));
    }

    #[test]
    fn scheduling_is_deterministic() {
        let scheduler = Scheduler::new(3, 5, Proficiency::Advanced, &[]);
        let items = scheduler.required_items().unwrap();
        let first = scheduler.schedule(&items).unwrap();
        let second = scheduler.schedule(&items).unwrap();
        assert_eq!(first.days, second.days);
    }

    #[test]
    fn days_are_ordered_primary_to_tertiary() {
        let scheduler = Scheduler::new(2, 5, Proficiency::Beginner, &[]);
        let items = scheduler.required_items().unwrap();
        let schedule = scheduler.schedule(&items).unwrap();
        for day in &schedule.days {
            let slots: Vec<SlotType> = day.iter().map(|i| i.slot).collect();
            let mut sorted = slots.clone();
            sorted.sort();
            assert_eq!(slots, sorted);
        }
    }

    #[test]
    fn peak_weeks_schedule_primaries_only() {
        let scheduler = Scheduler::new(9, 4, Proficiency::Advanced, &[]);
        let items = scheduler.required_items().unwrap();
        assert!(items.iter().all(|i| i.slot == SlotType::Primary));
        assert_eq!(items.len(), 3);
    }

    #[test]
    fn strength_block_keeps_deadlift_assistance_off_squat_primary_days() {
        for days in 4..=6 {
            let scheduler = Scheduler::new(5, days, Proficiency::Advanced, &[]);
            let items = scheduler.required_items().unwrap();
            let schedule = scheduler.schedule(&items).unwrap();
            assert!(!schedule.relaxed);
            for day in &schedule.days {
                if day_has(day, SlotType::Primary, BaseLift::Squat) {
                    assert!(!day
                        .iter()
                        .any(|i| i.lift == BaseLift::Deadlift && i.slot != SlotType::Primary));
                }
                if day_has(day, SlotType::Primary, BaseLift::Deadlift) {
                    assert!(!day
                        .iter()
                        .any(|i| i.lift == BaseLift::Squat && i.slot != SlotType::Primary));
                }
            }
        }
    }

    #[test]
    fn bench_may_double_up_with_at_most_one_primary() {
        for week in 1..=8u32 {
            let scheduler = Scheduler::new(week, 5, Proficiency::Beginner, &[]);
            let items = scheduler.required_items().unwrap();
            let schedule = scheduler.schedule(&items).unwrap();
            for day in &schedule.days {
                let bench_primaries = day
                    .iter()
                    .filter(|i| i.lift == BaseLift::Bench && i.slot == SlotType::Primary)
                    .count();
                assert!(bench_primaries <= 1, "week {week}: {day:?}");
            }
        }
    }

    #[test]
    fn week_fatigue_matches_sum_of_item_costs() {
        let scheduler = Scheduler::new(1, 4, Proficiency::Beginner, &[]);
        let items = scheduler.required_items().unwrap();
        let schedule = scheduler.schedule(&items).unwrap();
        let day_sum: f64 = schedule.fatigue.days.iter().map(|d| d.overall).sum();
        assert!((schedule.fatigue.week.overall - day_sum).abs() < 1e-9);
        assert!(
            (schedule.fatigue.week.overall
                - (schedule.fatigue.week.lower + schedule.fatigue.week.upper))
                .abs()
                < 1e-9
        );
    }

    #[test]
    fn impossible_caps_trigger_relaxed_fallback() {
        let tiny = ProficiencyCaps {
            lower_daily_max: 0.1,
            upper_daily_max: 0.1,
            overall_daily_max: 0.1,
            lower_weekly_max: 0.1,
            upper_weekly_max: 0.1,
            overall_weekly_max: 0.1,
        };
        let scheduler = Scheduler::with_caps(1, 3, Proficiency::Beginner, &tiny, &[]);
        let items = scheduler.required_items().unwrap();
        let schedule = scheduler.schedule(&items).unwrap();
        assert!(schedule.relaxed);
        // best-effort placement still assigns everything
        let placed: usize = schedule.days.iter().map(Vec::len).sum();
        assert_eq!(placed, items.len());
    }
}
