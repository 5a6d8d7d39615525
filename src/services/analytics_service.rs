//! Progress analytics over the active plan. Planned and performed e1RM
//! series per competition lift, keyed by plan-week sequence number so the
//! timeline stays monotone across deload insertions.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::engine::load_model::estimate_one_rep_max_no_rpe;
use crate::error::CoachError;
use crate::models::{BaseLift, PlanWeek};

/// Best value per competition lift for one plan week. `None` means no
/// qualifying row that week.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq)]
pub struct LiftSeries {
    pub squat: Option<f64>,
    pub bench: Option<f64>,
    pub deadlift: Option<f64>,
}

impl LiftSeries {
    fn update_max(&mut self, lift: BaseLift, value: f64) {
        let slot = match lift {
            BaseLift::Squat => &mut self.squat,
            BaseLift::Bench => &mut self.bench,
            BaseLift::Deadlift => &mut self.deadlift,
        };
        *slot = Some(slot.map_or(value, |current| current.max(value)));
    }
}

#[derive(Debug, Serialize)]
pub struct TimelinePoint {
    pub sequence_number: i32,
    pub week_number: i32,
    pub is_deload: bool,
    pub planned: LiftSeries,
    pub actual: LiftSeries,
}

#[derive(Debug, Serialize)]
pub struct ProgressTimeline {
    pub plan_id: Uuid,
    pub points: Vec<TimelinePoint>,
}

#[derive(FromRow)]
struct PlannedRow {
    sequence_number: i32,
    base_lift: String,
    target_reps: i32,
    planned_weight: f64,
}

#[derive(FromRow)]
struct PerformedRow {
    sequence_number: i32,
    base_lift: String,
    weight: f64,
    reps: i32,
}

#[derive(Clone)]
pub struct AnalyticsService {
    db: PgPool,
}

impl AnalyticsService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Planned vs performed e1RM per lift across the active plan. Both
    /// series use the RPE-free estimate so they stay comparable: planned
    /// from prescription weight and target reps, performed from logged
    /// weight and reps. Within a week the best (highest) value wins.
    pub async fn progress_timeline(
        &self,
        user_id: Uuid,
    ) -> Result<ProgressTimeline, CoachError> {
        let plan_id: Uuid = sqlx::query_scalar(
            "SELECT id FROM plans WHERE user_id = $1 AND is_active = TRUE",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| CoachError::NotFound("active plan".to_string()))?;

        let weeks: Vec<PlanWeek> = sqlx::query_as(
            "SELECT id, plan_id, week_number, sequence_number, is_deload
             FROM plan_weeks WHERE plan_id = $1 ORDER BY sequence_number",
        )
        .bind(plan_id)
        .fetch_all(&self.db)
        .await?;

        let planned: Vec<PlannedRow> = sqlx::query_as(
            "SELECT pw.sequence_number, e.base_lift, we.target_reps, we.planned_weight
             FROM workout_exercises we
             JOIN exercises e ON e.id = we.exercise_id
             JOIN workouts w ON w.id = we.workout_id
             JOIN plan_weeks pw ON pw.id = w.week_id
             WHERE pw.plan_id = $1
               AND e.is_main_lift = TRUE
               AND e.tracking_mode = 'e1rm'
               AND we.planned_weight IS NOT NULL",
        )
        .bind(plan_id)
        .fetch_all(&self.db)
        .await?;

        let performed: Vec<PerformedRow> = sqlx::query_as(
            "SELECT pw.sequence_number, e.base_lift, sl.weight, sl.reps
             FROM set_logs sl
             JOIN workout_exercises we ON we.id = sl.workout_exercise_id
             JOIN exercises e ON e.id = we.exercise_id
             JOIN workouts w ON w.id = we.workout_id
             JOIN plan_weeks pw ON pw.id = w.week_id
             WHERE pw.plan_id = $1
               AND e.is_main_lift = TRUE
               AND e.tracking_mode = 'e1rm'",
        )
        .bind(plan_id)
        .fetch_all(&self.db)
        .await?;

        let mut planned_by_week: BTreeMap<i32, LiftSeries> = BTreeMap::new();
        for row in planned {
            let lift = BaseLift::from_str(&row.base_lift)?;
            if let Some(e1rm) = estimate_one_rep_max_no_rpe(
                row.planned_weight,
                row.target_reps as f64,
                lift,
            ) {
                planned_by_week
                    .entry(row.sequence_number)
                    .or_default()
                    .update_max(lift, e1rm);
            }
        }

        let mut performed_by_week: BTreeMap<i32, LiftSeries> = BTreeMap::new();
        for row in performed {
            let lift = BaseLift::from_str(&row.base_lift)?;
            if let Some(e1rm) =
                estimate_one_rep_max_no_rpe(row.weight, row.reps as f64, lift)
            {
                performed_by_week
                    .entry(row.sequence_number)
                    .or_default()
                    .update_max(lift, e1rm);
            }
        }

        let points = weeks
            .into_iter()
            .map(|week| TimelinePoint {
                sequence_number: week.sequence_number,
                week_number: week.week_number,
                is_deload: week.is_deload,
                planned: planned_by_week
                    .get(&week.sequence_number)
                    .copied()
                    .unwrap_or_default(),
                actual: performed_by_week
                    .get(&week.sequence_number)
                    .copied()
                    .unwrap_or_default(),
            })
            .collect();

        Ok(ProgressTimeline { plan_id, points })
    }
}
