use sea_orm::entity::prelude::*;

/// A structured training plan authored by one trainer for one athlete.
/// Planned workouts, goals, nutrition entries and documents belong to the
/// plan and are destroyed with it.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "training_plans")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub trainer_id: i32,
    pub athlete_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub start_date: Option<DateTimeUtc>,
    pub end_date: Option<DateTimeUtc>,
    /// Distinguishes the current plan from historical ones.
    #[sea_orm(default_value = "true")]
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::TrainerId",
        to = "super::user::Column::Id"
    )]
    Trainer,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AthleteId",
        to = "super::user::Column::Id"
    )]
    Athlete,
    #[sea_orm(has_many = "super::planned_workout::Entity")]
    PlannedWorkout,
    #[sea_orm(has_many = "super::planned_goal::Entity")]
    PlannedGoal,
    #[sea_orm(has_many = "super::nutrition_plan::Entity")]
    NutritionPlan,
    #[sea_orm(has_many = "super::training_document::Entity")]
    TrainingDocument,
}

impl Related<super::planned_workout::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlannedWorkout.def()
    }
}

impl Related<super::planned_goal::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlannedGoal.def()
    }
}

impl Related<super::nutrition_plan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::NutritionPlan.def()
    }
}

impl Related<super::training_document::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TrainingDocument.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
