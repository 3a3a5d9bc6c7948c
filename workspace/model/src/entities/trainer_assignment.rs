use sea_orm::entity::prelude::*;

/// Active coaching link between a trainer and an athlete. Historical rows
/// are kept with `is_active = false`; at most one active row per pair.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "trainer_assignments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub trainer_id: i32,
    pub athlete_id: i32,
    pub assigned_at: DateTimeUtc,
    #[sea_orm(default_value = "true")]
    pub is_active: bool,
    /// Trainer notes about the athlete.
    pub notes: Option<String>,
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
}

impl ActiveModelBehavior for ActiveModel {}
