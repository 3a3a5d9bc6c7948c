use sea_orm::entity::prelude::*;

/// A target attached to a training plan. Athletes may update progress
/// (`current_value`, `is_achieved`); the definition is trainer-editable.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "planned_goals")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub training_plan_id: i32,
    pub title: String,
    pub goal_type: String,
    pub description: Option<String>,
    pub target_value: Option<f64>,
    pub current_value: Option<f64>,
    pub unit: Option<String>,
    pub target_date: Option<DateTimeUtc>,
    #[sea_orm(default_value = "false")]
    pub is_achieved: bool,
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
