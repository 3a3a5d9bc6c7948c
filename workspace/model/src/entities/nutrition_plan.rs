use sea_orm::entity::prelude::*;

/// Nutrition guidance row belonging to a training plan.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "nutrition_plans")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub training_plan_id: i32,
    /// monday, tuesday, ... when the guidance targets a specific day.
    pub day_of_week: Option<String>,
    /// breakfast, lunch, dinner, snack
    pub meal_type: Option<String>,
    pub description: Option<String>,
    pub calories: Option<f64>,
    pub protein_grams: Option<f64>,
    pub carbs_grams: Option<f64>,
    pub fat_grams: Option<f64>,
    pub notes: Option<String>,
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
