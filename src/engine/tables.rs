//! Static strength-programming tables: block boundaries, week-by-week
//! prescriptions, slot-count targets, fatigue caps and exercise-variation
//! selection. Table-as-code on purpose; rows are data, not rules.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoachError;
use crate::models::{BaseLift, Proficiency, Weakness};

/// Canonical mesocycle length in training weeks (deloads excluded).
pub const CYCLE_WEEKS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Block {
    Volume,
    Strength,
    Peak,
}

/// Block for a given week. Canonical 10-week cycle: 1-4 Volume, 5-8
/// Strength, 9-10 Peak; other lengths use the same 40/40/20 proportions.
pub fn block_for_week(week: u32, total_weeks: u32) -> Block {
    let volume_end = total_weeks * 2 / 5;
    let strength_end = total_weeks * 4 / 5;
    if week <= volume_end {
        Block::Volume
    } else if week <= strength_end {
        Block::Strength
    } else {
        Block::Peak
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotType {
    Primary,
    Secondary,
    Tertiary,
}

impl fmt::Display for SlotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SlotType::Primary => "primary",
            SlotType::Secondary => "secondary",
            SlotType::Tertiary => "tertiary",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SetScheme {
    pub sets: u32,
    pub reps: u32,
    pub rpe: f64,
}

const fn s(sets: u32, reps: u32, rpe: f64) -> SetScheme {
    SetScheme { sets, reps, rpe }
}

/// Primary-slot prescription: a top scheme plus an optional backoff scheme
/// at reduced intensity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PrimaryScheme {
    pub top: SetScheme,
    pub backoff: Option<SetScheme>,
}

struct PrimaryRow {
    week: u32,
    lift: BaseLift,
    scheme: PrimaryScheme,
}

struct AssistanceRow {
    week: u32,
    lift: BaseLift,
    scheme: SetScheme,
}

const fn p(week: u32, lift: BaseLift, top: SetScheme, backoff: Option<SetScheme>) -> PrimaryRow {
    PrimaryRow {
        week,
        lift,
        scheme: PrimaryScheme { top, backoff },
    }
}

const fn a(week: u32, lift: BaseLift, scheme: SetScheme) -> AssistanceRow {
    AssistanceRow { week, lift, scheme }
}

use BaseLift::{Bench, Deadlift, Squat};

#[rustfmt::skip]
static PRIMARY_ROWS: &[PrimaryRow] = &[
    // Volume: straight sets, RPE ramps 6 -> 7 and resets on week 4.
    p(1,  Squat,    s(4, 6, 6.0), None),
    p(1,  Bench,    s(4, 6, 6.0), None),
    p(1,  Deadlift, s(4, 6, 6.0), None),
    p(2,  Squat,    s(4, 6, 6.5), None),
    p(2,  Bench,    s(4, 6, 6.5), None),
    p(2,  Deadlift, s(4, 6, 6.5), None),
    p(3,  Squat,    s(4, 5, 7.0), None),
    p(3,  Bench,    s(4, 5, 7.0), None),
    p(3,  Deadlift, s(4, 5, 7.0), None),
    p(4,  Squat,    s(4, 5, 6.5), None),
    p(4,  Bench,    s(4, 5, 6.5), None),
    p(4,  Deadlift, s(4, 5, 6.5), None),
    // Strength: one top set, backoffs half a point lighter.
    p(5,  Squat,    s(1, 4, 7.0), Some(s(3, 4, 6.5))),
    p(5,  Bench,    s(1, 4, 7.0), Some(s(3, 4, 6.5))),
    p(5,  Deadlift, s(1, 4, 7.0), Some(s(3, 4, 6.5))),
    p(6,  Squat,    s(1, 3, 8.0), Some(s(3, 3, 7.5))),
    p(6,  Bench,    s(1, 3, 8.0), Some(s(3, 3, 7.5))),
    p(6,  Deadlift, s(1, 3, 8.0), Some(s(3, 3, 7.5))),
    p(7,  Squat,    s(1, 2, 8.5), Some(s(3, 2, 8.0))),
    p(7,  Bench,    s(1, 2, 8.5), Some(s(3, 2, 8.0))),
    p(7,  Deadlift, s(1, 2, 8.5), Some(s(3, 2, 8.0))),
    p(8,  Squat,    s(1, 2, 8.0), Some(s(3, 2, 7.5))),
    p(8,  Bench,    s(1, 2, 8.0), Some(s(3, 2, 7.5))),
    p(8,  Deadlift, s(1, 2, 8.0), Some(s(3, 2, 7.5))),
    // Peak: heavy singles, minimal backoff volume.
    p(9,  Squat,    s(1, 1, 8.5), Some(s(2, 2, 7.5))),
    p(9,  Bench,    s(1, 1, 8.5), Some(s(2, 2, 7.5))),
    p(9,  Deadlift, s(1, 1, 8.5), Some(s(2, 2, 7.5))),
    p(10, Squat,    s(1, 1, 9.0), Some(s(1, 2, 7.0))),
    p(10, Bench,    s(1, 1, 9.0), Some(s(1, 2, 7.0))),
    p(10, Deadlift, s(1, 1, 9.0), Some(s(1, 2, 7.0))),
];

#[rustfmt::skip]
static SECONDARY_ROWS: &[AssistanceRow] = &[
    a(1, Squat, s(4, 8, 6.0)), a(1, Bench, s(4, 8, 6.0)), a(1, Deadlift, s(4, 8, 6.0)),
    a(2, Squat, s(4, 8, 6.0)), a(2, Bench, s(4, 8, 6.0)), a(2, Deadlift, s(4, 8, 6.0)),
    a(3, Squat, s(4, 8, 6.0)), a(3, Bench, s(4, 8, 6.0)), a(3, Deadlift, s(4, 8, 6.0)),
    a(4, Squat, s(4, 8, 6.0)), a(4, Bench, s(4, 8, 6.0)), a(4, Deadlift, s(4, 8, 6.0)),
    a(5, Squat, s(3, 5, 7.0)), a(5, Bench, s(3, 5, 7.0)), a(5, Deadlift, s(3, 5, 7.0)),
    a(6, Squat, s(3, 5, 7.0)), a(6, Bench, s(3, 5, 7.0)), a(6, Deadlift, s(3, 5, 7.0)),
    a(7, Squat, s(3, 5, 7.0)), a(7, Bench, s(3, 5, 7.0)), a(7, Deadlift, s(3, 5, 7.0)),
    a(8, Squat, s(3, 5, 7.0)), a(8, Bench, s(3, 5, 7.0)), a(8, Deadlift, s(3, 5, 7.0)),
];

#[rustfmt::skip]
static TERTIARY_ROWS: &[AssistanceRow] = &[
    a(1, Squat, s(3, 10, 6.0)), a(1, Bench, s(3, 10, 6.0)), a(1, Deadlift, s(3, 10, 6.0)),
    a(2, Squat, s(3, 10, 6.0)), a(2, Bench, s(3, 10, 6.0)), a(2, Deadlift, s(3, 10, 6.0)),
    a(3, Squat, s(3, 10, 6.0)), a(3, Bench, s(3, 10, 6.0)), a(3, Deadlift, s(3, 10, 6.0)),
    a(4, Squat, s(3, 10, 6.0)), a(4, Bench, s(3, 10, 6.0)), a(4, Deadlift, s(3, 10, 6.0)),
    a(5, Squat, s(2, 6, 6.0)),  a(5, Bench, s(2, 6, 6.0)),  a(5, Deadlift, s(2, 6, 6.0)),
    a(6, Squat, s(2, 6, 6.0)),  a(6, Bench, s(2, 6, 6.0)),  a(6, Deadlift, s(2, 6, 6.0)),
    a(7, Squat, s(2, 6, 6.0)),  a(7, Bench, s(2, 6, 6.0)),  a(7, Deadlift, s(2, 6, 6.0)),
    a(8, Squat, s(2, 6, 6.0)),  a(8, Bench, s(2, 6, 6.0)),  a(8, Deadlift, s(2, 6, 6.0)),
];

/// Primary prescription for `(week, lift)`. A gap inside the supported week
/// range is a table defect, not a user error.
pub fn find_primary(week: u32, lift: BaseLift) -> Result<PrimaryScheme, CoachError> {
    PRIMARY_ROWS
        .iter()
        .find(|row| row.week == week && row.lift == lift)
        .map(|row| row.scheme)
        .ok_or(CoachError::PrescriptionGap {
            week,
            lift,
            slot: SlotType::Primary,
        })
}

/// Secondary prescription. Rows exist for Volume/Strength weeks only; Peak
/// weeks carry no secondary slot work.
pub fn find_secondary(week: u32, lift: BaseLift) -> Result<SetScheme, CoachError> {
    SECONDARY_ROWS
        .iter()
        .find(|row| row.week == week && row.lift == lift)
        .map(|row| row.scheme)
        .ok_or(CoachError::PrescriptionGap {
            week,
            lift,
            slot: SlotType::Secondary,
        })
}

pub fn find_tertiary(week: u32, lift: BaseLift) -> Result<SetScheme, CoachError> {
    TERTIARY_ROWS
        .iter()
        .find(|row| row.week == week && row.lift == lift)
        .map(|row| row.scheme)
        .ok_or(CoachError::PrescriptionGap {
            week,
            lift,
            slot: SlotType::Tertiary,
        })
}

/// Daily caps are hard scheduler constraints; weekly caps are soft.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProficiencyCaps {
    pub lower_daily_max: f64,
    pub upper_daily_max: f64,
    pub overall_daily_max: f64,
    pub lower_weekly_max: f64,
    pub upper_weekly_max: f64,
    pub overall_weekly_max: f64,
}

static BEGINNER_CAPS: ProficiencyCaps = ProficiencyCaps {
    lower_daily_max: 3.0,
    upper_daily_max: 3.0,
    overall_daily_max: 4.5,
    lower_weekly_max: 9.0,
    upper_weekly_max: 9.5,
    overall_weekly_max: 16.0,
};

static ADVANCED_CAPS: ProficiencyCaps = ProficiencyCaps {
    lower_daily_max: 3.75,
    upper_daily_max: 3.5,
    overall_daily_max: 5.0,
    lower_weekly_max: 12.0,
    upper_weekly_max: 13.0,
    overall_weekly_max: 21.0,
};

pub fn caps_for(proficiency: Proficiency) -> &'static ProficiencyCaps {
    match proficiency {
        Proficiency::Beginner => &BEGINNER_CAPS,
        Proficiency::Advanced => &ADVANCED_CAPS,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiftTargets {
    pub primary: u32,
    pub secondary: u32,
    pub tertiary: u32,
}

/// How many slot items of each kind a week must schedule, per lift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotTargets {
    pub squat: LiftTargets,
    pub bench: LiftTargets,
    pub deadlift: LiftTargets,
}

impl SlotTargets {
    pub fn for_lift(&self, lift: BaseLift) -> LiftTargets {
        match lift {
            BaseLift::Squat => self.squat,
            BaseLift::Bench => self.bench,
            BaseLift::Deadlift => self.deadlift,
        }
    }
}

/// Slot-count targets keyed by weekly frequency and proficiency. Bench
/// presses recover fast enough to earn a second primary at 5+ days.
pub fn slot_targets(days: u32, proficiency: Proficiency) -> SlotTargets {
    let bench_primary = if days >= 5 { 2 } else { 1 };
    SlotTargets {
        squat: LiftTargets {
            primary: 1,
            secondary: 1,
            tertiary: u32::from(days >= 5),
        },
        bench: LiftTargets {
            primary: bench_primary,
            secondary: 1,
            tertiary: u32::from(days >= 4),
        },
        deadlift: LiftTargets {
            primary: 1,
            secondary: u32::from(proficiency == Proficiency::Advanced),
            tertiary: 0,
        },
    }
}

pub fn competition_name(lift: BaseLift) -> &'static str {
    match lift {
        BaseLift::Squat => "Competition Squat",
        BaseLift::Bench => "Competition Bench",
        BaseLift::Deadlift => "Competition Deadlift",
    }
}

/// Deterministic secondary-variation choice, optionally steered by the
/// user's weakness tags.
pub fn secondary_variation(block: Block, lift: BaseLift, weaknesses: &[Weakness]) -> &'static str {
    match lift {
        BaseLift::Bench => {
            if weaknesses.contains(&Weakness::BenchOffChest) {
                "Paused Bench"
            } else if weaknesses.contains(&Weakness::BenchLockout) {
                "Pin Press"
            } else {
                "Close Grip Bench"
            }
        }
        BaseLift::Squat => {
            if weaknesses.contains(&Weakness::SquatHole) {
                "Paused Squat"
            } else {
                "Pin Squat (Mid)"
            }
        }
        BaseLift::Deadlift => {
            if block == Block::Volume {
                "Deficit Deadlift"
            } else if weaknesses.contains(&Weakness::DeadliftOffFloor) {
                "Paused Deadlift"
            } else {
                "RDL"
            }
        }
    }
}

pub fn tertiary_variation(lift: BaseLift) -> &'static str {
    match lift {
        BaseLift::Squat => "Tempo Squat",
        BaseLift::Bench => "Tempo Bench",
        BaseLift::Deadlift => "Hip Thrust",
    }
}

/// Systemic cost multiplier per exercise. Competition lifts score highest,
/// tempo and isolation work lowest; unlisted accessory work defaults low.
pub fn base_fatigue_score(exercise_name: &str) -> f64 {
    match exercise_name {
        "Competition Squat" => 1.5,
        "Competition Bench" => 1.5,
        "Competition Deadlift" => 1.7,
        "Paused Squat" => 1.0,
        "Pin Squat (Mid)" => 1.1,
        "Tempo Squat" => 0.7,
        "Paused Bench" => 0.9,
        "Close Grip Bench" => 0.9,
        "Pin Press" => 1.0,
        "Tempo Bench" => 0.7,
        "RDL" => 1.0,
        "Paused Deadlift" => 1.1,
        "Deficit Deadlift" => 1.1,
        "Hip Thrust" => 0.7,
        _ => 0.8,
    }
}
