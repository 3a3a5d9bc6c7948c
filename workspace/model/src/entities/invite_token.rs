use super::user::UserRole;
use sea_orm::entity::prelude::*;

/// Single-use registration credential. A valid token is active, unexpired
/// and unused; redeeming it fixes the role of the registered account.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "invite_tokens")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub token: String,
    /// Optional pre-set email; registration with a different address fails.
    pub email: Option<String>,
    pub role: UserRole,
    pub created_by_id: i32,
    pub created_at: DateTimeUtc,
    pub expires_at: DateTimeUtc,
    pub used_at: Option<DateTimeUtc>,
    pub used_by_id: Option<i32>,
    #[sea_orm(default_value = "true")]
    pub is_active: bool,
}

impl Model {
    pub fn is_expired(&self, now: DateTimeUtc) -> bool {
        now > self.expires_at
    }

    pub fn is_valid(&self, now: DateTimeUtc) -> bool {
        self.is_active && !self.is_expired(now) && self.used_at.is_none()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedById",
        to = "super::user::Column::Id"
    )]
    CreatedBy,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UsedById",
        to = "super::user::Column::Id"
    )]
    UsedBy,
}

impl ActiveModelBehavior for ActiveModel {}
