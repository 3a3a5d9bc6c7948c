use sea_orm::entity::prelude::*;

/// Lifecycle of a coaching request. Pending is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum RequestStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl RequestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

/// An athlete's request to be coached by a trainer. At most one pending
/// request per (athlete, trainer) pair; approval creates an assignment.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "trainer_requests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub athlete_id: i32,
    pub trainer_id: i32,
    pub status: RequestStatus,
    /// Optional message from the athlete.
    pub message: Option<String>,
    pub created_at: DateTimeUtc,
    pub responded_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AthleteId",
        to = "super::user::Column::Id"
    )]
    Athlete,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::TrainerId",
        to = "super::user::Column::Id"
    )]
    Trainer,
}

impl ActiveModelBehavior for ActiveModel {}
