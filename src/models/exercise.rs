use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::CoachError;

/// One of the three competition lifts tracked by lift-specific formulas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaseLift {
    Squat,
    Bench,
    Deadlift,
}

impl BaseLift {
    pub const ALL: [BaseLift; 3] = [BaseLift::Squat, BaseLift::Bench, BaseLift::Deadlift];

    pub fn as_str(self) -> &'static str {
        match self {
            BaseLift::Squat => "squat",
            BaseLift::Bench => "bench",
            BaseLift::Deadlift => "deadlift",
        }
    }

    /// Fixed, exhaustive body-region partition: bench is upper-body work,
    /// squat and deadlift are lower-body work.
    pub fn region(self) -> Region {
        match self {
            BaseLift::Bench => Region::Upper,
            BaseLift::Squat | BaseLift::Deadlift => Region::Lower,
        }
    }
}

impl fmt::Display for BaseLift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BaseLift {
    type Err = CoachError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "squat" => Ok(BaseLift::Squat),
            "bench" => Ok(BaseLift::Bench),
            "deadlift" => Ok(BaseLift::Deadlift),
            other => Err(CoachError::Validation(format!(
                "unknown base lift: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Lower,
    Upper,
}

/// How logged sets for an exercise feed the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackingMode {
    E1rm,
    Volume,
    None,
}

impl FromStr for TrackingMode {
    type Err = CoachError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "e1rm" => Ok(TrackingMode::E1rm),
            "volume" => Ok(TrackingMode::Volume),
            "none" => Ok(TrackingMode::None),
            other => Err(CoachError::Validation(format!(
                "unknown tracking mode: {other}"
            ))),
        }
    }
}

/// Technique-weakness tags that steer secondary-variation selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weakness {
    BenchOffChest,
    BenchLockout,
    SquatHole,
    DeadliftOffFloor,
    DeadliftLockout,
}

/// Raw exercise catalog row as stored. `base_lift` and `tracking_mode` are
/// text columns; `Exercise::try_from` validates them at the boundary.
#[derive(Debug, Clone, FromRow)]
pub struct ExerciseRow {
    pub id: Uuid,
    pub name: String,
    pub base_lift: String,
    pub is_main_lift: bool,
    pub tracking_mode: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Exercise {
    pub id: Uuid,
    pub name: String,
    pub base_lift: BaseLift,
    pub is_main_lift: bool,
    pub tracking_mode: TrackingMode,
}

impl TryFrom<ExerciseRow> for Exercise {
    type Error = CoachError;

    fn try_from(row: ExerciseRow) -> Result<Self, Self::Error> {
        Ok(Exercise {
            id: row.id,
            name: row.name,
            base_lift: row.base_lift.parse()?,
            is_main_lift: row.is_main_lift,
            tracking_mode: row.tracking_mode.parse()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_lift_round_trips_through_str() {
        for lift in BaseLift::ALL {
            assert_eq!(lift.as_str().parse::<BaseLift>().unwrap(), lift);
        }
    }

    #[test]
    fn region_partition_is_exhaustive() {
        assert_eq!(BaseLift::Bench.region(), Region::Upper);
        assert_eq!(BaseLift::Squat.region(), Region::Lower);
        assert_eq!(BaseLift::Deadlift.region(), Region::Lower);
    }

    #[test]
    fn malformed_catalog_row_is_rejected() {
        let row = ExerciseRow {
            id: Uuid::new_v4(),
            name: "Competition Squat".to_string(),
            base_lift: "front_squat".to_string(),
            is_main_lift: true,
            tracking_mode: "e1rm".to_string(),
        };
        assert!(Exercise::try_from(row).is_err());
    }
}
