//! Bulk training-plan construction from parsed document data. The plan and
//! all sub-resources are persisted as one transaction: if any insert fails
//! nothing is kept.

use chrono::{DateTime, Duration, Utc};
use model::entities::{nutrition_plan, planned_goal, planned_workout, training_plan};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set, TransactionTrait};
use tracing::{info, instrument};

use crate::ai::ParsedPlan;
use crate::error::ApiError;

/// End date of a plan: start plus its duration in weeks.
pub fn plan_end_date(start_date: DateTime<Utc>, duration_weeks: i32) -> DateTime<Utc> {
    start_date + Duration::weeks(i64::from(duration_weeks))
}

/// Scheduled date of a workout positioned by 1-based week and weekday:
/// `start + (week-1)*7 + (day_of_week-1)` days.
pub fn workout_scheduled_date(
    start_date: DateTime<Utc>,
    week: i32,
    day_of_week: i32,
) -> DateTime<Utc> {
    start_date + Duration::days(i64::from(week - 1) * 7 + i64::from(day_of_week - 1))
}

/// Persist a parsed plan for an athlete. The caller is responsible for
/// authorization and for validating the parsed data first.
#[instrument(skip(db, parsed))]
pub async fn build_plan_from_parsed(
    db: &DatabaseConnection,
    trainer_id: i32,
    athlete_id: i32,
    start_date: DateTime<Utc>,
    parsed: &ParsedPlan,
) -> Result<training_plan::Model, ApiError> {
    let txn = db.begin().await?;
    let now = Utc::now();

    let plan = training_plan::ActiveModel {
        trainer_id: Set(trainer_id),
        athlete_id: Set(athlete_id),
        title: Set(parsed.title.clone()),
        description: Set(parsed.description.clone()),
        start_date: Set(Some(start_date)),
        end_date: Set(Some(plan_end_date(start_date, parsed.duration_weeks))),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    for workout in &parsed.workouts {
        let exercises = match &workout.exercises {
            Some(value) => Some(serde_json::to_string(value).map_err(|e| {
                ApiError::Internal(format!("Failed to encode exercises: {e}"))
            })?),
            None => None,
        };

        planned_workout::ActiveModel {
            training_plan_id: Set(plan.id),
            title: Set(workout.title.clone()),
            workout_type: Set(workout
                .workout_type
                .clone()
                .unwrap_or_else(|| "workout".to_string())),
            scheduled_date: Set(workout_scheduled_date(
                start_date,
                workout.week,
                workout.day_of_week,
            )),
            duration_minutes: Set(workout.duration_minutes),
            description: Set(workout.description.clone()),
            intensity: Set(workout.intensity.clone()),
            exercises: Set(exercises),
            is_completed: Set(false),
            completed_at: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    for goal in &parsed.goals {
        planned_goal::ActiveModel {
            training_plan_id: Set(plan.id),
            title: Set(goal.title.clone()),
            goal_type: Set(goal
                .goal_type
                .clone()
                .unwrap_or_else(|| "performance".to_string())),
            description: Set(None),
            target_value: Set(goal.target_value),
            current_value: Set(None),
            unit: Set(goal.unit.clone()),
            target_date: Set(None),
            is_achieved: Set(false),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    for guidance in &parsed.nutrition_guidance {
        nutrition_plan::ActiveModel {
            training_plan_id: Set(plan.id),
            day_of_week: Set(None),
            meal_type: Set(guidance.category.clone()),
            description: Set(Some(guidance.recommendation.clone())),
            calories: Set(None),
            protein_grams: Set(None),
            carbs_grams: Set(None),
            fat_grams: Set(None),
            notes: Set(guidance.details.clone()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;

    info!(
        "Built plan {} for athlete {} with {} workouts, {} goals, {} nutrition entries",
        plan.id,
        athlete_id,
        parsed.workouts.len(),
        parsed.goals.len(),
        parsed.nutrition_guidance.len()
    );
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_plan_end_date() {
        let start = Utc.with_ymd_and_hms(2025, 6, 2, 0, 0, 0).unwrap();
        let end = plan_end_date(start, 8);
        assert_eq!(end, Utc.with_ymd_and_hms(2025, 7, 28, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_workout_scheduled_date_first_day() {
        let start = Utc.with_ymd_and_hms(2025, 6, 2, 0, 0, 0).unwrap();
        // Week 1, day 1 lands on the start date itself
        assert_eq!(workout_scheduled_date(start, 1, 1), start);
    }

    #[test]
    fn test_workout_scheduled_date_offsets() {
        let start = Utc.with_ymd_and_hms(2025, 6, 2, 0, 0, 0).unwrap();
        // Week 1, day 3 -> two days in
        assert_eq!(
            workout_scheduled_date(start, 1, 3),
            Utc.with_ymd_and_hms(2025, 6, 4, 0, 0, 0).unwrap()
        );
        // Week 3, day 1 -> fourteen days in
        assert_eq!(
            workout_scheduled_date(start, 3, 1),
            Utc.with_ymd_and_hms(2025, 6, 16, 0, 0, 0).unwrap()
        );
        // Week 2, day 7 -> thirteen days in
        assert_eq!(
            workout_scheduled_date(start, 2, 7),
            Utc.with_ymd_and_hms(2025, 6, 15, 0, 0, 0).unwrap()
        );
    }
}
