//! Central authorization policy. Every role check and visibility decision
//! lives here; handlers never compare roles inline.

use model::entities::{prelude::*, trainer_assignment, training_plan, user, user::UserRole};
use sea_orm::{ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter};
use tracing::debug;

use crate::error::ApiError;

/// The set of subject user ids a caller may read data for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// Admin: no filtering applied.
    Unrestricted,
    /// Explicit inclusion set: self plus, for trainers, assigned athletes.
    Ids(Vec<i32>),
}

impl Access {
    pub fn allows(&self, user_id: i32) -> bool {
        match self {
            Self::Unrestricted => true,
            Self::Ids(ids) => ids.contains(&user_id),
        }
    }
}

/// Compute the accessible-id set for a caller.
///
/// Admins are unrestricted. Trainers see themselves plus the athletes of
/// their active assignments. Athletes see only themselves.
pub async fn accessible_user_ids<C: ConnectionTrait>(
    db: &C,
    caller: &user::Model,
) -> Result<Access, ApiError> {
    match caller.role {
        UserRole::Admin => Ok(Access::Unrestricted),
        UserRole::Trainer => {
            let assignments = TrainerAssignment::find()
                .filter(trainer_assignment::Column::TrainerId.eq(caller.id))
                .filter(trainer_assignment::Column::IsActive.eq(true))
                .all(db)
                .await?;

            let mut ids: Vec<i32> = vec![caller.id];
            ids.extend(assignments.iter().map(|a| a.athlete_id));
            debug!("Trainer {} can access {} users", caller.id, ids.len());
            Ok(Access::Ids(ids))
        }
        UserRole::Athlete => Ok(Access::Ids(vec![caller.id])),
    }
}

/// View access to a training plan: admin, the plan's trainer, or the plan's
/// athlete. Callers without view access get 404, never 403 — existence is
/// not revealed.
pub fn can_view_plan(plan: &training_plan::Model, caller: &user::Model) -> bool {
    caller.role == UserRole::Admin || plan.trainer_id == caller.id || plan.athlete_id == caller.id
}

/// Edit access to a training plan and its sub-resources: admin or the
/// plan's trainer.
pub fn can_edit_plan(plan: &training_plan::Model, caller: &user::Model) -> bool {
    caller.role == UserRole::Admin || plan.trainer_id == caller.id
}

/// The athlete narrow-update exception: the plan's athlete may update
/// completion/progress fields on sub-resources without edit access.
pub fn is_plan_athlete(plan: &training_plan::Model, caller: &user::Model) -> bool {
    caller.role == UserRole::Athlete && plan.athlete_id == caller.id
}

/// Guard for trainer-only endpoints (admins pass).
pub fn require_trainer(caller: &user::Model) -> Result<(), ApiError> {
    match caller.role {
        UserRole::Trainer | UserRole::Admin => Ok(()),
        UserRole::Athlete => Err(ApiError::Forbidden(
            "Only trainers can access this resource".to_string(),
        )),
    }
}

/// Guard for the admin surface.
pub fn require_admin(caller: &user::Model) -> Result<(), ApiError> {
    if caller.role == UserRole::Admin {
        Ok(())
    } else {
        Err(ApiError::Forbidden("Admin access required".to_string()))
    }
}

/// Whether an active assignment exists with this exact trainer/athlete
/// orientation.
pub async fn has_active_assignment<C: ConnectionTrait>(
    db: &C,
    trainer_id: i32,
    athlete_id: i32,
) -> Result<bool, ApiError> {
    let existing = TrainerAssignment::find()
        .filter(trainer_assignment::Column::TrainerId.eq(trainer_id))
        .filter(trainer_assignment::Column::AthleteId.eq(athlete_id))
        .filter(trainer_assignment::Column::IsActive.eq(true))
        .one(db)
        .await?;
    Ok(existing.is_some())
}

/// Whether an active assignment links the two users in either direction.
/// This is the messaging gate.
pub async fn are_linked<C: ConnectionTrait>(
    db: &C,
    user_a: i32,
    user_b: i32,
) -> Result<bool, ApiError> {
    let existing = TrainerAssignment::find()
        .filter(trainer_assignment::Column::IsActive.eq(true))
        .filter(
            Condition::any()
                .add(
                    Condition::all()
                        .add(trainer_assignment::Column::TrainerId.eq(user_a))
                        .add(trainer_assignment::Column::AthleteId.eq(user_b)),
                )
                .add(
                    Condition::all()
                        .add(trainer_assignment::Column::TrainerId.eq(user_b))
                        .add(trainer_assignment::Column::AthleteId.eq(user_a)),
                ),
        )
        .one(db)
        .await?;
    Ok(existing.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn make_user(id: i32, role: UserRole) -> user::Model {
        user::Model {
            id,
            email: format!("user{id}@example.com"),
            hashed_password: "$argon2id$test".to_string(),
            full_name: None,
            role,
            is_active: true,
            is_locked: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn make_plan(trainer_id: i32, athlete_id: i32) -> training_plan::Model {
        training_plan::Model {
            id: 1,
            trainer_id,
            athlete_id,
            title: "Plan".to_string(),
            description: None,
            start_date: None,
            end_date: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_plan_view_access() {
        let plan = make_plan(1, 2);
        assert!(can_view_plan(&plan, &make_user(1, UserRole::Trainer)));
        assert!(can_view_plan(&plan, &make_user(2, UserRole::Athlete)));
        assert!(can_view_plan(&plan, &make_user(99, UserRole::Admin)));
        assert!(!can_view_plan(&plan, &make_user(3, UserRole::Athlete)));
        assert!(!can_view_plan(&plan, &make_user(3, UserRole::Trainer)));
    }

    #[test]
    fn test_plan_edit_access() {
        let plan = make_plan(1, 2);
        assert!(can_edit_plan(&plan, &make_user(1, UserRole::Trainer)));
        assert!(can_edit_plan(&plan, &make_user(99, UserRole::Admin)));
        // The plan's athlete can view but not edit
        assert!(!can_edit_plan(&plan, &make_user(2, UserRole::Athlete)));
        assert!(!can_edit_plan(&plan, &make_user(3, UserRole::Trainer)));
    }

    #[test]
    fn test_plan_athlete_exception() {
        let plan = make_plan(1, 2);
        assert!(is_plan_athlete(&plan, &make_user(2, UserRole::Athlete)));
        assert!(!is_plan_athlete(&plan, &make_user(3, UserRole::Athlete)));
        // A trainer who happens to be the athlete id does not qualify
        assert!(!is_plan_athlete(&plan, &make_user(2, UserRole::Trainer)));
    }

    #[test]
    fn test_role_guards() {
        assert!(require_trainer(&make_user(1, UserRole::Trainer)).is_ok());
        assert!(require_trainer(&make_user(1, UserRole::Admin)).is_ok());
        assert!(require_trainer(&make_user(1, UserRole::Athlete)).is_err());

        assert!(require_admin(&make_user(1, UserRole::Admin)).is_ok());
        assert!(require_admin(&make_user(1, UserRole::Trainer)).is_err());
        assert!(require_admin(&make_user(1, UserRole::Athlete)).is_err());
    }

    #[test]
    fn test_access_allows() {
        assert!(Access::Unrestricted.allows(42));
        assert!(Access::Ids(vec![1, 2, 3]).allows(2));
        assert!(!Access::Ids(vec![1, 2, 3]).allows(4));
    }
}
