use sea_orm::entity::prelude::*;

/// Denormalized activity record imported from an external provider (or
/// entered manually). Sync idempotence rests on the
/// (user_id, source, external_id) triple: an import is skipped when a row
/// with the same triple already exists.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "activities")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    /// "strava", "manual", ...
    pub source: String,
    /// Id in the source system; null for manual entries.
    pub external_id: Option<String>,
    pub activity_type: String,
    pub name: String,
    pub activity_date: DateTimeUtc,
    pub duration_minutes: Option<f64>,
    pub distance_km: Option<f64>,
    pub elevation_m: Option<f64>,
    pub calories: Option<i32>,
    pub heart_rate_avg: Option<i32>,
    pub heart_rate_max: Option<i32>,
    pub power_avg: Option<i32>,
    pub power_max: Option<i32>,
    pub cadence_avg: Option<i32>,
    pub speed_avg_kmh: Option<f64>,
    pub speed_max_kmh: Option<f64>,
    /// Raw provider payload, kept for future re-processing.
    pub data_json: Option<Json>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
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
