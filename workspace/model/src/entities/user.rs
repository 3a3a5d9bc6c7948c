use sea_orm::entity::prelude::*;

/// Role assigned to every account. Authorization decisions are made on this
/// closed set, never on free-form strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum UserRole {
    #[sea_orm(string_value = "athlete")]
    Athlete,
    #[sea_orm(string_value = "trainer")]
    Trainer,
    #[sea_orm(string_value = "admin")]
    Admin,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Athlete => "athlete",
            Self::Trainer => "trainer",
            Self::Admin => "admin",
        }
    }
}

/// Represents a user of the system: athlete, trainer, or admin.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub email: String,
    pub hashed_password: String,
    pub full_name: Option<String>,
    pub role: UserRole,
    /// Inactive users are excluded from trainer search and admin counting.
    #[sea_orm(default_value = "true")]
    pub is_active: bool,
    /// Locked users cannot authenticate, even with correct credentials.
    #[sea_orm(default_value = "false")]
    pub is_locked: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::ride::Entity")]
    Ride,
    #[sea_orm(has_many = "super::workout::Entity")]
    Workout,
    #[sea_orm(has_many = "super::goal::Entity")]
    Goal,
    #[sea_orm(has_many = "super::nutrition_log::Entity")]
    NutritionLog,
    #[sea_orm(has_many = "super::integration::Entity")]
    Integration,
    #[sea_orm(has_many = "super::activity::Entity")]
    Activity,
}

impl Related<super::ride::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ride.def()
    }
}

impl Related<super::workout::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Workout.def()
    }
}

impl Related<super::goal::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Goal.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
