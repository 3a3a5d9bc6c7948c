use anyhow::{bail, Result};
use chrono::Utc;
use model::entities::{prelude::*, user, user::UserRole};
use sea_orm::{ActiveModelTrait, ColumnTrait, Database, EntityTrait, QueryFilter, Set};
use tracing::{debug, info, trace};

use crate::auth::hash_password;

/// Seed an admin account. Refuses to reuse an existing email.
pub async fn create_admin(
    database_url: &str,
    email: &str,
    password: &str,
    full_name: Option<String>,
) -> Result<()> {
    trace!("Entering create_admin function");
    info!("Creating admin account for {}", email);

    let db = Database::connect(database_url).await?;

    let existing = User::find()
        .filter(user::Column::Email.eq(email))
        .one(&db)
        .await?;
    if existing.is_some() {
        bail!("A user with email {email} already exists");
    }

    let hashed_password =
        hash_password(password).map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    let now = Utc::now();
    let admin = user::ActiveModel {
        email: Set(email.to_string()),
        hashed_password: Set(hashed_password),
        full_name: Set(full_name),
        role: Set(UserRole::Admin),
        is_active: Set(true),
        is_locked: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    debug!("Admin row inserted with id {}", admin.id);
    info!("Admin account {} created successfully", admin.email);
    Ok(())
}
