use sea_orm::entity::prelude::*;

/// An uploaded document attached to a training plan. `filename` is the
/// original upload name; `file_path` points at the randomly named stored
/// copy.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "training_documents")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub training_plan_id: i32,
    pub filename: String,
    pub file_path: String,
    /// Lower-cased extension, e.g. ".pdf".
    pub file_type: Option<String>,
    pub uploaded_at: DateTimeUtc,
    pub description: Option<String>,
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
