//! End-to-end scheduling sweeps across every supported frequency,
//! experience level and training week.

use lift_coach::engine::scheduler::{Scheduler, SlotItem, WeekSchedule};
use lift_coach::engine::tables::{block_for_week, caps_for, Block, SlotType, CYCLE_WEEKS};
use lift_coach::models::{BaseLift, Proficiency};

const PROFICIENCIES: [Proficiency; 2] = [Proficiency::Beginner, Proficiency::Advanced];

fn run_week(week: u32, days: u32, proficiency: Proficiency) -> (Vec<SlotItem>, WeekSchedule) {
    let scheduler = Scheduler::new(week, days, proficiency, &[]);
    let items = scheduler.required_items().unwrap();
    let schedule = scheduler.schedule(&items).unwrap();
    (items, schedule)
}

fn day_has(day: &[SlotItem], slot: SlotType, lift: BaseLift) -> bool {
    day.iter().any(|i| i.slot == slot && i.lift == lift)
}

#[test]
fn every_item_is_placed_at_all_frequencies() {
    for proficiency in PROFICIENCIES {
        for days in 3..=6u32 {
            for week in 1..=CYCLE_WEEKS {
                let (items, schedule) = run_week(week, days, proficiency);
                let placed: usize = schedule.days.iter().map(Vec::len).sum();
                assert_eq!(
                    placed,
                    items.len(),
                    "{proficiency:?} {days} days week {week}: lost items"
                );
                assert_eq!(schedule.days.len(), days as usize);
            }
        }
    }
}

#[test]
fn four_to_six_day_weeks_never_need_relaxation() {
    for proficiency in PROFICIENCIES {
        for days in 4..=6u32 {
            for week in 1..=CYCLE_WEEKS {
                let (_, schedule) = run_week(week, days, proficiency);
                assert!(
                    !schedule.relaxed,
                    "{proficiency:?} {days} days week {week}: relaxed fallback used"
                );

                let caps = caps_for(proficiency);
                for (day_idx, totals) in schedule.fatigue.days.iter().enumerate() {
                    assert!(
                        totals.lower <= caps.lower_daily_max + 1e-9
                            && totals.upper <= caps.upper_daily_max + 1e-9
                            && totals.overall <= caps.overall_daily_max + 1e-9,
                        "{proficiency:?} {days} days week {week} day {day_idx}: cap exceeded"
                    );
                }
            }
        }
    }
}

#[test]
fn day_slot_caps_hold_everywhere() {
    for proficiency in PROFICIENCIES {
        for days in 3..=6u32 {
            let cap = if days >= 5 { 2 } else { 3 };
            for week in 1..=CYCLE_WEEKS {
                let (_, schedule) = run_week(week, days, proficiency);
                if schedule.relaxed {
                    continue;
                }
                for day in &schedule.days {
                    assert!(day.len() <= cap, "{proficiency:?} {days} days week {week}");
                }
            }
        }
    }
}

#[test]
fn squat_and_deadlift_primaries_never_share_a_day() {
    for proficiency in PROFICIENCIES {
        for days in 3..=6u32 {
            for week in 1..=CYCLE_WEEKS {
                let (_, schedule) = run_week(week, days, proficiency);
                if schedule.relaxed {
                    continue;
                }
                for day in &schedule.days {
                    assert!(
                        !(day_has(day, SlotType::Primary, BaseLift::Squat)
                            && day_has(day, SlotType::Primary, BaseLift::Deadlift)),
                        "{proficiency:?} {days} days week {week}: {day:?}"
                    );
                }
            }
        }
    }
}

#[test]
fn same_lift_never_stacks_at_four_plus_days() {
    for proficiency in PROFICIENCIES {
        for days in 4..=6u32 {
            for week in 1..=CYCLE_WEEKS {
                let (_, schedule) = run_week(week, days, proficiency);
                for day in &schedule.days {
                    for lift in [BaseLift::Squat, BaseLift::Deadlift] {
                        let count = day.iter().filter(|i| i.lift == lift).count();
                        assert!(count <= 1, "{proficiency:?} {days} days week {week}: {day:?}");
                    }
                    let bench_primaries = day
                        .iter()
                        .filter(|i| i.lift == BaseLift::Bench && i.slot == SlotType::Primary)
                        .count();
                    assert!(bench_primaries <= 1);
                }
            }
        }
    }
}

#[test]
fn strength_and_peak_weeks_keep_opposing_assistance_off_primary_days() {
    for proficiency in PROFICIENCIES {
        for days in 4..=6u32 {
            for week in 1..=CYCLE_WEEKS {
                if block_for_week(week, CYCLE_WEEKS) == Block::Volume {
                    continue;
                }
                let (_, schedule) = run_week(week, days, proficiency);
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
    }
}

#[test]
fn peak_weeks_carry_primary_work_only() {
    for proficiency in PROFICIENCIES {
        for days in 3..=6u32 {
            for week in 9..=CYCLE_WEEKS {
                let scheduler = Scheduler::new(week, days, proficiency, &[]);
                let items = scheduler.required_items().unwrap();
                assert!(items.iter().all(|i| i.slot == SlotType::Primary));
                let expected = if days >= 5 { 4 } else { 3 };
                assert_eq!(items.len(), expected);
            }
        }
    }
}

#[test]
fn weekly_fatigue_is_the_sum_of_day_fatigue() {
    for proficiency in PROFICIENCIES {
        for days in 3..=6u32 {
            for week in 1..=CYCLE_WEEKS {
                let (_, schedule) = run_week(week, days, proficiency);
                let day_sum: f64 = schedule.fatigue.days.iter().map(|d| d.overall).sum();
                assert!((schedule.fatigue.week.overall - day_sum).abs() < 1e-9);
                assert!(
                    (schedule.fatigue.week.overall
                        - (schedule.fatigue.week.lower + schedule.fatigue.week.upper))
                        .abs()
                        < 1e-9
                );
            }
        }
    }
}

#[test]
fn beginner_three_day_weeks_fit_without_relaxation() {
    for week in 1..=CYCLE_WEEKS {
        let (_, schedule) = run_week(week, 3, Proficiency::Beginner);
        assert!(!schedule.relaxed, "week {week}");
    }
}

#[test]
fn identical_inputs_give_identical_schedules() {
    for proficiency in PROFICIENCIES {
        for days in 3..=6u32 {
            for week in 1..=CYCLE_WEEKS {
                let (_, first) = run_week(week, days, proficiency);
                let (_, second) = run_week(week, days, proficiency);
                assert_eq!(first.days, second.days);
            }
        }
    }
}
