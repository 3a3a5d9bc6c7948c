use sea_orm::entity::prelude::*;

/// OAuth connection to an external activity provider. One row per
/// (user, provider); disconnecting deletes the row but keeps imported
/// activities.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "integrations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    /// "strava", "garmin", ...
    pub provider: String,
    #[sea_orm(column_type = "Text")]
    pub access_token: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub refresh_token: Option<String>,
    /// None means the token never expires (or the provider did not say).
    pub token_expires_at: Option<DateTimeUtc>,
    /// Provider-side athlete id.
    pub athlete_id: Option<String>,
    pub connected_at: DateTimeUtc,
    pub last_sync: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
