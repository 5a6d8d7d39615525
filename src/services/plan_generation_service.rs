//! Plan assembly and persistence. The assembler builds a complete
//! in-memory blueprint first (validation and catalog checks run before any
//! write), then persists the whole subtree in one transaction. A new active
//! plan deactivates the previous one; nothing is deleted.

use std::collections::{BTreeSet, HashMap};
use std::str::FromStr;

use chrono::Weekday;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::engine::load_model::required_weight;
use crate::engine::scheduler::Scheduler;
use crate::engine::tables::{
    competition_name, find_primary, find_secondary, find_tertiary, secondary_variation,
    tertiary_variation, SetScheme, SlotType, CYCLE_WEEKS,
};
use crate::error::CoachError;
use crate::models::{
    ActivePlanResponse, BaseLift, Exercise, ExerciseRow, GeneratePlanRequest,
    GeneratePlanResponse, OneRepMaxes, Plan, PlanWeek, PlanWeekView, Weakness, Workout,
    WorkoutExerciseDetail, WorkoutView,
};

const PLAN_NAME: &str = "Performance Block";
/// More than two weakness tags dilutes the variation selection; extra tags
/// are ignored.
const MAX_WEAKNESSES: usize = 2;

#[derive(Debug, Clone)]
pub struct PlanBlueprint {
    pub name: String,
    /// Training days in week order, as validated from the request.
    pub days: Vec<Weekday>,
    pub weeks: Vec<WeekBlueprint>,
}

#[derive(Debug, Clone)]
pub struct WeekBlueprint {
    pub week_number: u32,
    pub sequence_number: u32,
    pub is_deload: bool,
    pub relaxed: bool,
    pub workouts: Vec<WorkoutBlueprint>,
}

#[derive(Debug, Clone)]
pub struct WorkoutBlueprint {
    pub day_number: u32,
    pub name: String,
    pub exercises: Vec<ExerciseBlueprint>,
}

#[derive(Debug, Clone)]
pub struct ExerciseBlueprint {
    pub exercise_name: &'static str,
    pub lift: BaseLift,
    pub sets: u32,
    pub reps: u32,
    pub rpe: Option<f64>,
    pub percentage: Option<f64>,
    pub planned_weight: Option<f64>,
}

fn weekday_label(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

/// Parse and validate the request's weekday tokens and 1RMs. Runs before
/// any side effect; errors surface verbatim to the caller.
pub(crate) fn validate_request(request: &GeneratePlanRequest) -> Result<Vec<Weekday>, CoachError> {
    let mut days = Vec::with_capacity(request.days_of_week.len());
    for token in &request.days_of_week {
        let day = Weekday::from_str(token).map_err(|_| {
            CoachError::Validation(format!("invalid weekday token: {token}"))
        })?;
        if days.contains(&day) {
            return Err(CoachError::Validation(format!(
                "duplicate training day: {token}"
            )));
        }
        days.push(day);
    }
    if days.len() < 3 || days.len() > 6 {
        return Err(CoachError::Validation(
            "training days must be between 3 and 6".to_string(),
        ));
    }
    days.sort_by_key(|d| d.num_days_from_monday());

    let rms = &request.one_rms;
    for (lift, value) in [
        (BaseLift::Squat, rms.squat),
        (BaseLift::Bench, rms.bench),
        (BaseLift::Deadlift, rms.deadlift),
    ] {
        if !value.is_finite() || value <= 0.0 {
            return Err(CoachError::Validation(format!(
                "1RM for {lift} must be a positive number"
            )));
        }
    }

    Ok(days)
}

fn exercise_row(
    name: &'static str,
    lift: BaseLift,
    scheme: SetScheme,
    one_rms: &OneRepMaxes,
) -> ExerciseBlueprint {
    ExerciseBlueprint {
        exercise_name: name,
        lift,
        sets: scheme.sets,
        reps: scheme.reps,
        rpe: Some(scheme.rpe),
        percentage: None,
        planned_weight: required_weight(
            one_rms.for_lift(lift),
            scheme.reps as f64,
            scheme.rpe,
            lift,
        ),
    }
}

/// Fixed recovery-week template: one light competition lift per day in
/// rotation plus the next lift's tertiary variation. Not run through the
/// scheduler.
fn deload_week(sequence: u32, days: &[Weekday], one_rms: &OneRepMaxes) -> WeekBlueprint {
    let lifts = BaseLift::ALL;
    let workouts = days
        .iter()
        .enumerate()
        .map(|(i, day)| {
            let lift = lifts[i % 3];
            let next = lifts[(i + 1) % 3];
            WorkoutBlueprint {
                day_number: (i + 1) as u32,
                name: format!("Day {} ({}) • Deload", i + 1, weekday_label(*day)),
                exercises: vec![
                    exercise_row(competition_name(lift), lift, SetScheme { sets: 2, reps: 5, rpe: 6.0 }, one_rms),
                    exercise_row(tertiary_variation(next), next, SetScheme { sets: 2, reps: 8, rpe: 6.0 }, one_rms),
                ],
            }
        })
        .collect();

    WeekBlueprint {
        week_number: sequence,
        sequence_number: sequence,
        is_deload: true,
        relaxed: false,
        workouts,
    }
}

/// Walk weeks 1..N, schedule each, and expand scheduled slots into concrete
/// exercise rows with planned weights. Pure; persistence happens later.
pub(crate) fn build_plan_blueprint(
    request: &GeneratePlanRequest,
) -> Result<PlanBlueprint, CoachError> {
    let days = validate_request(request)?;
    let day_count = days.len() as u32;
    let mut weaknesses: Vec<Weakness> = request.weaknesses.clone();
    weaknesses.truncate(MAX_WEAKNESSES);

    let mut weeks = Vec::new();
    let mut sequence = 1u32;

    for base_week in 1..=CYCLE_WEEKS {
        let scheduler = Scheduler::new(base_week, day_count, request.proficiency, &weaknesses);
        let block = scheduler.block();
        let items = scheduler.required_items()?;
        let schedule = scheduler.schedule(&items)?;
        if schedule.relaxed {
            warn!(week = base_week, "slot placement needed relaxed rules");
        }

        let mut workouts = Vec::new();
        for (day_idx, day_items) in schedule.days.iter().enumerate() {
            let mut exercises = Vec::new();
            for item in day_items {
                match item.slot {
                    SlotType::Primary => {
                        let scheme = find_primary(base_week, item.lift)?;
                        let name = competition_name(item.lift);
                        exercises.push(exercise_row(name, item.lift, scheme.top, &request.one_rms));
                        if let Some(backoff) = scheme.backoff {
                            exercises.push(exercise_row(name, item.lift, backoff, &request.one_rms));
                        }
                    }
                    SlotType::Secondary => {
                        let scheme = find_secondary(base_week, item.lift)?;
                        let name = secondary_variation(block, item.lift, &weaknesses);
                        exercises.push(exercise_row(name, item.lift, scheme, &request.one_rms));
                    }
                    SlotType::Tertiary => {
                        let scheme = find_tertiary(base_week, item.lift)?;
                        let name = tertiary_variation(item.lift);
                        exercises.push(exercise_row(name, item.lift, scheme, &request.one_rms));
                    }
                }
            }
            // days the scheduler left empty (Peak weeks at high frequency)
            // are rest days, not workouts
            if exercises.is_empty() {
                continue;
            }
            workouts.push(WorkoutBlueprint {
                day_number: (day_idx + 1) as u32,
                name: format!("Day {} ({})", day_idx + 1, weekday_label(days[day_idx])),
                exercises,
            });
        }

        weeks.push(WeekBlueprint {
            week_number: sequence,
            sequence_number: sequence,
            is_deload: false,
            relaxed: schedule.relaxed,
            workouts,
        });
        sequence += 1;

        if base_week == 8 && request.deload_after_week8 {
            weeks.push(deload_week(sequence, &days, &request.one_rms));
            sequence += 1;
        }
        if base_week == 10 && request.deload_after_week10 {
            weeks.push(deload_week(sequence, &days, &request.one_rms));
            sequence += 1;
        }
    }

    Ok(PlanBlueprint {
        name: PLAN_NAME.to_string(),
        days,
        weeks,
    })
}

/// Exercise pairs the blueprint prescribes that the catalog lacks, formatted
/// for the error message. Every missing pair is reported in one pass so the
/// operator can seed them all at once.
fn missing_from_catalog(
    blueprint: &PlanBlueprint,
    catalog: &HashMap<(String, BaseLift), Uuid>,
) -> Vec<String> {
    let mut required: BTreeSet<(&'static str, BaseLift)> = BTreeSet::new();
    for week in &blueprint.weeks {
        for workout in &week.workouts {
            for exercise in &workout.exercises {
                required.insert((exercise.exercise_name, exercise.lift));
            }
        }
    }

    required
        .iter()
        .filter(|(name, lift)| !catalog.contains_key(&(name.to_string(), *lift)))
        .map(|(name, lift)| format!("{name} ({lift})"))
        .collect()
}

#[derive(Clone)]
pub struct PlanGenerationService {
    db: PgPool,
}

impl PlanGenerationService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// One generation run: validate, build the blueprint, verify the
    /// exercise catalog, then persist everything atomically.
    pub async fn generate_plan(
        &self,
        request: GeneratePlanRequest,
    ) -> Result<GeneratePlanResponse, CoachError> {
        let blueprint = build_plan_blueprint(&request)?;
        let catalog = self.resolve_catalog(&blueprint).await?;
        let normalized_days: Vec<String> = blueprint
            .days
            .iter()
            .map(|d| weekday_label(*d).to_string())
            .collect();

        let mut tx = self.db.begin().await?;

        sqlx::query("UPDATE plans SET is_active = FALSE WHERE user_id = $1 AND is_active = TRUE")
            .bind(request.user_id)
            .execute(&mut *tx)
            .await?;

        let plan_id: Uuid = sqlx::query_scalar(
            "INSERT INTO plans (user_id, name, duration_weeks, is_active)
             VALUES ($1, $2, $3, TRUE) RETURNING id",
        )
        .bind(request.user_id)
        .bind(&blueprint.name)
        .bind(blueprint.weeks.len() as i32)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO plan_generation_inputs
                 (plan_id, days_of_week, proficiency, maxes, weaknesses,
                  deload_after_week8, deload_after_week10)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(plan_id)
        .bind(&normalized_days)
        .bind(request.proficiency.as_str())
        .bind(serde_json::to_value(request.one_rms)?)
        .bind(serde_json::to_value(&request.weaknesses)?)
        .bind(request.deload_after_week8)
        .bind(request.deload_after_week10)
        .execute(&mut *tx)
        .await?;

        for week in &blueprint.weeks {
            let week_id: Uuid = sqlx::query_scalar(
                "INSERT INTO plan_weeks (plan_id, week_number, sequence_number, is_deload)
                 VALUES ($1, $2, $3, $4) RETURNING id",
            )
            .bind(plan_id)
            .bind(week.week_number as i32)
            .bind(week.sequence_number as i32)
            .bind(week.is_deload)
            .fetch_one(&mut *tx)
            .await?;

            for workout in &week.workouts {
                let workout_id: Uuid = sqlx::query_scalar(
                    "INSERT INTO workouts (week_id, day_number, name)
                     VALUES ($1, $2, $3) RETURNING id",
                )
                .bind(week_id)
                .bind(workout.day_number as i32)
                .bind(&workout.name)
                .fetch_one(&mut *tx)
                .await?;

                for (position, exercise) in workout.exercises.iter().enumerate() {
                    let exercise_id = catalog
                        .get(&(exercise.exercise_name.to_string(), exercise.lift))
                        .copied()
                        .ok_or_else(|| {
                            CoachError::MissingExercises(vec![format!(
                                "{} ({})",
                                exercise.exercise_name, exercise.lift
                            )])
                        })?;

                    sqlx::query(
                        "INSERT INTO workout_exercises
                             (workout_id, exercise_id, position, target_sets, target_reps,
                              target_rpe, target_percentage, planned_weight)
                         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
                    )
                    .bind(workout_id)
                    .bind(exercise_id)
                    .bind(position as i32)
                    .bind(exercise.sets as i32)
                    .bind(exercise.reps as i32)
                    .bind(exercise.rpe)
                    .bind(exercise.percentage)
                    .bind(exercise.planned_weight)
                    .execute(&mut *tx)
                    .await?;
                }
            }
        }

        tx.commit().await?;

        let relaxed_weeks: Vec<u32> = blueprint
            .weeks
            .iter()
            .filter(|w| w.relaxed)
            .map(|w| w.sequence_number)
            .collect();

        info!(
            user_id = %request.user_id,
            %plan_id,
            weeks = blueprint.weeks.len(),
            "generated training plan"
        );

        Ok(GeneratePlanResponse {
            plan_id,
            name: blueprint.name,
            total_weeks: blueprint.weeks.len() as u32,
            relaxed_weeks,
        })
    }

    /// Resolve every exercise the blueprint references against the catalog.
    /// Runs before any write; reports every missing pair at once so the
    /// operator can seed them in one pass.
    async fn resolve_catalog(
        &self,
        blueprint: &PlanBlueprint,
    ) -> Result<HashMap<(String, BaseLift), Uuid>, CoachError> {
        let rows: Vec<ExerciseRow> = sqlx::query_as(
            "SELECT id, name, base_lift, is_main_lift, tracking_mode FROM exercises",
        )
        .fetch_all(&self.db)
        .await?;

        let mut by_key = HashMap::new();
        for row in rows {
            let exercise = Exercise::try_from(row)?;
            by_key.insert((exercise.name.clone(), exercise.base_lift), exercise.id);
        }

        let missing = missing_from_catalog(blueprint, &by_key);
        if !missing.is_empty() {
            return Err(CoachError::MissingExercises(missing));
        }

        Ok(by_key)
    }

    /// The user's active plan with its full week/workout/exercise tree.
    pub async fn get_active_plan(&self, user_id: Uuid) -> Result<ActivePlanResponse, CoachError> {
        let plan: Plan = sqlx::query_as(
            "SELECT id, user_id, name, duration_weeks, is_active, created_at
             FROM plans WHERE user_id = $1 AND is_active = TRUE",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| CoachError::NotFound("active plan".to_string()))?;

        let weeks: Vec<PlanWeek> = sqlx::query_as(
            "SELECT id, plan_id, week_number, sequence_number, is_deload
             FROM plan_weeks WHERE plan_id = $1 ORDER BY sequence_number",
        )
        .bind(plan.id)
        .fetch_all(&self.db)
        .await?;

        let workouts: Vec<Workout> = sqlx::query_as(
            "SELECT w.id, w.week_id, w.day_number, w.name
             FROM workouts w
             JOIN plan_weeks pw ON pw.id = w.week_id
             WHERE pw.plan_id = $1
             ORDER BY w.day_number",
        )
        .bind(plan.id)
        .fetch_all(&self.db)
        .await?;

        let details: Vec<WorkoutExerciseDetail> = sqlx::query_as(
            "SELECT we.id, we.workout_id, e.name AS exercise_name, e.base_lift,
                    e.is_main_lift, we.target_sets, we.target_reps, we.target_rpe,
                    we.target_percentage, we.planned_weight
             FROM workout_exercises we
             JOIN exercises e ON e.id = we.exercise_id
             JOIN workouts w ON w.id = we.workout_id
             JOIN plan_weeks pw ON pw.id = w.week_id
             WHERE pw.plan_id = $1
             ORDER BY we.position",
        )
        .bind(plan.id)
        .fetch_all(&self.db)
        .await?;

        let mut exercises_by_workout: HashMap<Uuid, Vec<WorkoutExerciseDetail>> = HashMap::new();
        for detail in details {
            exercises_by_workout
                .entry(detail.workout_id)
                .or_default()
                .push(detail);
        }

        let mut workouts_by_week: HashMap<Uuid, Vec<WorkoutView>> = HashMap::new();
        for workout in workouts {
            let exercises = exercises_by_workout.remove(&workout.id).unwrap_or_default();
            workouts_by_week
                .entry(workout.week_id)
                .or_default()
                .push(WorkoutView { workout, exercises });
        }

        let week_views = weeks
            .into_iter()
            .map(|week| PlanWeekView {
                workouts: workouts_by_week.remove(&week.id).unwrap_or_default(),
                week,
            })
            .collect();

        Ok(ActivePlanResponse {
            plan,
            weeks: week_views,
        })
    }
}
