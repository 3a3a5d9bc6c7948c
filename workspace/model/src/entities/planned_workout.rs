use sea_orm::entity::prelude::*;

/// A scheduled workout inside a training plan. Athletes may only toggle
/// completion; everything else is trainer-editable.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "planned_workouts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub training_plan_id: i32,
    pub title: String,
    pub workout_type: String,
    pub scheduled_date: DateTimeUtc,
    pub duration_minutes: Option<i32>,
    pub description: Option<String>,
    /// low, medium, high
    pub intensity: Option<String>,
    /// JSON-encoded exercise list as returned by the document parser.
    pub exercises: Option<String>,
    #[sea_orm(default_value = "false")]
    pub is_completed: bool,
    pub completed_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::training_plan::Entity",
        from = "Column::TrainingPlanId",
        to = "super::training_plan::Column::Id"
    )]
    TrainingPlan,
}

impl Related<super::training_plan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TrainingPlan.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
