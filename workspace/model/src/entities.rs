//! This file serves as the root for all SeaORM entity modules.
//! The data models cover identity (users, invite tokens), the
//! trainer-athlete relationship ledger, training plans and their
//! sub-resources, user-owned activity logs, external provider
//! integrations, and direct messages.

pub mod activity;
pub mod goal;
pub mod integration;
pub mod invite_token;
pub mod message;
pub mod nutrition_log;
pub mod nutrition_plan;
pub mod planned_goal;
pub mod planned_workout;
pub mod ride;
pub mod trainer_assignment;
pub mod trainer_request;
pub mod training_document;
pub mod training_plan;
pub mod user;
pub mod workout;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::activity::Entity as Activity;
    pub use super::goal::Entity as Goal;
    pub use super::integration::Entity as Integration;
    pub use super::invite_token::Entity as InviteToken;
    pub use super::message::Entity as Message;
    pub use super::nutrition_log::Entity as NutritionLog;
    pub use super::nutrition_plan::Entity as NutritionPlan;
    pub use super::planned_goal::Entity as PlannedGoal;
    pub use super::planned_workout::Entity as PlannedWorkout;
    pub use super::ride::Entity as Ride;
    pub use super::trainer_assignment::Entity as TrainerAssignment;
    pub use super::trainer_request::Entity as TrainerRequest;
    pub use super::training_document::Entity as TrainingDocument;
    pub use super::training_plan::Entity as TrainingPlan;
    pub use super::user::Entity as User;
    pub use super::workout::Entity as Workout;
}

#[cfg(test)]
mod test {
    use chrono::{Duration, Utc};
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{
        ActiveModelTrait, ColumnTrait, ConnectionTrait, Database, DatabaseConnection, DbErr,
        EntityTrait, QueryFilter, Set,
    };

    use super::*;
    use prelude::*;

    async fn setup_db() -> Result<DatabaseConnection, DbErr> {
        // Connect to the SQLite database
        let db = Database::connect("sqlite::memory:").await?;

        // Enable foreign keys
        db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;

        // Run migrations to create the schema
        Migrator::up(&db, None).await?;

        Ok(db)
    }

    async fn insert_user(
        db: &DatabaseConnection,
        email: &str,
        role: user::UserRole,
    ) -> Result<user::Model, DbErr> {
        user::ActiveModel {
            email: Set(email.to_string()),
            hashed_password: Set("$argon2id$test".to_string()),
            full_name: Set(Some("Test User".to_string())),
            role: Set(role),
            is_active: Set(true),
            is_locked: Set(false),
            created_at: Set(Utc::now()),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    #[tokio::test]
    async fn test_user_roles_round_trip() -> Result<(), DbErr> {
        let db = setup_db().await?;

        insert_user(&db, "athlete@example.com", user::UserRole::Athlete).await?;
        insert_user(&db, "trainer@example.com", user::UserRole::Trainer).await?;
        insert_user(&db, "admin@example.com", user::UserRole::Admin).await?;

        let admins = User::find()
            .filter(user::Column::Role.eq(user::UserRole::Admin))
            .all(&db)
            .await?;
        assert_eq!(admins.len(), 1);
        assert_eq!(admins[0].email, "admin@example.com");

        let found = User::find()
            .filter(user::Column::Email.eq("trainer@example.com"))
            .one(&db)
            .await?
            .expect("trainer should exist");
        assert_eq!(found.role, user::UserRole::Trainer);
        assert!(found.is_active);
        assert!(!found.is_locked);

        Ok(())
    }

    #[tokio::test]
    async fn test_training_plan_with_children() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let trainer = insert_user(&db, "coach@example.com", user::UserRole::Trainer).await?;
        let athlete = insert_user(&db, "rider@example.com", user::UserRole::Athlete).await?;

        let plan = training_plan::ActiveModel {
            trainer_id: Set(trainer.id),
            athlete_id: Set(athlete.id),
            title: Set("Base Phase".to_string()),
            description: Set(None),
            start_date: Set(Some(Utc::now())),
            end_date: Set(Some(Utc::now() + Duration::weeks(8))),
            is_active: Set(true),
            created_at: Set(Utc::now()),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        planned_workout::ActiveModel {
            training_plan_id: Set(plan.id),
            title: Set("Endurance ride".to_string()),
            workout_type: Set("cycling".to_string()),
            scheduled_date: Set(Utc::now()),
            duration_minutes: Set(Some(90)),
            is_completed: Set(false),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        planned_goal::ActiveModel {
            training_plan_id: Set(plan.id),
            title: Set("FTP 250W".to_string()),
            goal_type: Set("power".to_string()),
            target_value: Set(Some(250.0)),
            is_achieved: Set(false),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let workouts = PlannedWorkout::find()
            .filter(planned_workout::Column::TrainingPlanId.eq(plan.id))
            .all(&db)
            .await?;
        assert_eq!(workouts.len(), 1);

        // Deleting the plan cascades to its children at the FK level
        TrainingPlan::delete_by_id(plan.id).exec(&db).await?;
        let orphans = PlannedGoal::find()
            .filter(planned_goal::Column::TrainingPlanId.eq(plan.id))
            .all(&db)
            .await?;
        assert!(orphans.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_invite_token_validity() -> Result<(), DbErr> {
        let db = setup_db().await?;
        let admin = insert_user(&db, "admin@example.com", user::UserRole::Admin).await?;
        let now = Utc::now();

        let fresh = invite_token::ActiveModel {
            token: Set("fresh-token".to_string()),
            email: Set(None),
            role: Set(user::UserRole::Trainer),
            created_by_id: Set(admin.id),
            created_at: Set(now),
            expires_at: Set(now + Duration::days(7)),
            used_at: Set(None),
            used_by_id: Set(None),
            is_active: Set(true),
            ..Default::default()
        }
        .insert(&db)
        .await?;
        assert!(fresh.is_valid(now));

        let expired = invite_token::ActiveModel {
            token: Set("expired-token".to_string()),
            email: Set(None),
            role: Set(user::UserRole::Athlete),
            created_by_id: Set(admin.id),
            created_at: Set(now - Duration::days(10)),
            expires_at: Set(now - Duration::days(3)),
            used_at: Set(None),
            used_by_id: Set(None),
            is_active: Set(true),
            ..Default::default()
        }
        .insert(&db)
        .await?;
        assert!(expired.is_expired(now));
        assert!(!expired.is_valid(now));

        let used = invite_token::ActiveModel {
            token: Set("used-token".to_string()),
            email: Set(None),
            role: Set(user::UserRole::Athlete),
            created_by_id: Set(admin.id),
            created_at: Set(now),
            expires_at: Set(now + Duration::days(7)),
            used_at: Set(Some(now)),
            used_by_id: Set(Some(admin.id)),
            is_active: Set(true),
            ..Default::default()
        }
        .insert(&db)
        .await?;
        assert!(!used.is_valid(now));

        Ok(())
    }

    #[tokio::test]
    async fn test_activity_external_id_lookup() -> Result<(), DbErr> {
        let db = setup_db().await?;
        let athlete = insert_user(&db, "rider@example.com", user::UserRole::Athlete).await?;

        activity::ActiveModel {
            user_id: Set(athlete.id),
            source: Set("strava".to_string()),
            external_id: Set(Some("12345".to_string())),
            activity_type: Set("cycling".to_string()),
            name: Set("Morning Ride".to_string()),
            activity_date: Set(Utc::now()),
            distance_km: Set(Some(42.0)),
            created_at: Set(Utc::now()),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let found = Activity::find()
            .filter(activity::Column::UserId.eq(athlete.id))
            .filter(activity::Column::Source.eq("strava"))
            .filter(activity::Column::ExternalId.eq("12345"))
            .one(&db)
            .await?;
        assert!(found.is_some());

        Ok(())
    }
}
