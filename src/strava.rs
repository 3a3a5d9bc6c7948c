//! Strava sync engine: OAuth token lifecycle plus idempotent import of
//! external activities. Provider failures are surfaced to the caller as-is;
//! there is no retry logic at this level.

use chrono::{DateTime, TimeZone, Utc};
use model::entities::{activity, integration, prelude::*};
use reqwest::Client;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, QueryFilter, Set,
};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::config::AppConfig;
use crate::error::ApiError;

pub const STRAVA_AUTH_URL: &str = "https://www.strava.com/oauth/authorize";
pub const STRAVA_TOKEN_URL: &str = "https://www.strava.com/oauth/token";
pub const STRAVA_API_URL: &str = "https://www.strava.com/api/v3";

/// Provider name stored on integrations and imported activities.
pub const PROVIDER: &str = "strava";

/// Page size used when fetching activities.
pub const SYNC_PAGE_SIZE: u32 = 100;

/// Strava token endpoint response (both code exchange and refresh).
#[derive(Debug, Deserialize)]
pub struct TokenExchangeResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Unix timestamp of token expiry.
    pub expires_at: i64,
    pub athlete: Option<AthleteSummary>,
}

#[derive(Debug, Deserialize)]
pub struct AthleteSummary {
    pub id: u64,
}

impl TokenExchangeResponse {
    pub fn expires_at_utc(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.expires_at, 0)
            .single()
            .unwrap_or_else(Utc::now)
    }
}

/// The subset of a Strava activity payload the importer reads. The full
/// payload is kept verbatim in `data_json`.
#[derive(Debug, Deserialize)]
pub struct StravaActivity {
    pub id: u64,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub activity_type: Option<String>,
    pub start_date: String,
    pub moving_time: Option<f64>,
    pub distance: Option<f64>,
    pub total_elevation_gain: Option<f64>,
    pub calories: Option<f64>,
    pub average_heartrate: Option<f64>,
    pub max_heartrate: Option<f64>,
    pub average_watts: Option<f64>,
    pub max_watts: Option<f64>,
    pub average_cadence: Option<f64>,
    pub average_speed: Option<f64>,
    pub max_speed: Option<f64>,
}

/// HTTP client for the Strava OAuth and API endpoints.
pub struct StravaClient {
    client_id: String,
    client_secret: String,
    client: Client,
}

impl StravaClient {
    /// Build a client from configuration; 503 when the integration is not
    /// configured.
    pub fn from_config(config: &AppConfig) -> Result<Self, ApiError> {
        let (client_id, client_secret) = match (
            config.strava_client_id.clone(),
            config.strava_client_secret.clone(),
        ) {
            (Some(id), Some(secret)) => (id, secret),
            _ => {
                return Err(ApiError::ServiceUnavailable(
                    "Strava integration not configured".to_string(),
                ))
            }
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ApiError::Internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client_id,
            client_secret,
            client,
        })
    }

    /// Authorization URL the frontend sends the user to. The `state`
    /// parameter correlates the public callback back to a user.
    pub fn authorize_url(&self, redirect_uri: &str, state: &str) -> String {
        format!(
            "{STRAVA_AUTH_URL}?client_id={}&redirect_uri={}&response_type=code&scope=read,activity:read_all&state={}",
            self.client_id, redirect_uri, state
        )
    }

    /// Exchange an authorization code for tokens.
    #[instrument(skip(self, code))]
    pub async fn exchange_code(&self, code: &str) -> Result<TokenExchangeResponse, ApiError> {
        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("code", code),
            ("grant_type", "authorization_code"),
        ];

        let response = self
            .client
            .post(STRAVA_TOKEN_URL)
            .form(&params)
            .send()
            .await
            .map_err(|e| ApiError::BadGateway(format!("Strava token request failed: {e}")))?;

        if !response.status().is_success() {
            warn!("Strava code exchange failed with status {}", response.status());
            return Err(ApiError::BadRequest(
                "Failed to exchange code for token".to_string(),
            ));
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::BadGateway(format!("Failed to parse Strava token response: {e}")))
    }

    /// Exchange a refresh token for fresh credentials.
    #[instrument(skip(self, refresh_token))]
    pub async fn refresh_access_token(
        &self,
        refresh_token: &str,
    ) -> Result<TokenExchangeResponse, ApiError> {
        info!("Refreshing Strava access token");

        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ];

        let response = self
            .client
            .post(STRAVA_TOKEN_URL)
            .form(&params)
            .send()
            .await
            .map_err(|e| ApiError::BadGateway(format!("Strava token request failed: {e}")))?;

        if !response.status().is_success() {
            warn!("Strava token refresh failed with status {}", response.status());
            return Err(ApiError::Unauthorized(
                "Failed to refresh Strava token. Please reconnect.".to_string(),
            ));
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::BadGateway(format!("Failed to parse Strava token response: {e}")))
    }

    /// Fetch activities after the given unix timestamp. Returns the raw
    /// JSON payloads so the importer can keep them verbatim.
    #[instrument(skip(self, access_token))]
    pub async fn fetch_activities(
        &self,
        access_token: &str,
        after: i64,
    ) -> Result<Vec<serde_json::Value>, ApiError> {
        let url = format!("{STRAVA_API_URL}/athlete/activities");

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {access_token}"))
            .query(&[
                ("after", after.to_string()),
                ("per_page", SYNC_PAGE_SIZE.to_string()),
            ])
            .send()
            .await
            .map_err(|e| ApiError::BadGateway(format!("Strava API request failed: {e}")))?;

        if !response.status().is_success() {
            warn!(
                "Strava activity fetch failed with status {}",
                response.status()
            );
            return Err(ApiError::BadGateway(
                "Failed to fetch activities from Strava".to_string(),
            ));
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::BadGateway(format!("Failed to parse Strava activities: {e}")))
    }
}

/// Ensure the integration's access token is usable: a token with no expiry
/// or a future expiry is taken as valid; otherwise the refresh token is
/// exchanged and the new credentials committed before returning. Nothing is
/// persisted when the refresh fails.
pub async fn ensure_fresh_token<C: ConnectionTrait>(
    db: &C,
    client: &StravaClient,
    integration: integration::Model,
) -> Result<integration::Model, ApiError> {
    let still_valid = match integration.token_expires_at {
        None => true,
        Some(expires_at) => expires_at > Utc::now(),
    };
    if still_valid {
        return Ok(integration);
    }

    let refresh_token = integration.refresh_token.clone().ok_or_else(|| {
        ApiError::Unauthorized("Failed to refresh Strava token. Please reconnect.".to_string())
    })?;

    let tokens = client.refresh_access_token(&refresh_token).await?;

    let expires_at = tokens.expires_at_utc();
    let mut active = integration.into_active_model();
    active.access_token = Set(tokens.access_token);
    if let Some(new_refresh) = tokens.refresh_token {
        active.refresh_token = Set(Some(new_refresh));
    }
    active.token_expires_at = Set(Some(expires_at));

    Ok(active.update(db).await?)
}

/// Fixed mapping from Strava's activity vocabulary to the internal one.
/// Unrecognized types pass through lower-cased.
pub fn map_activity_type(strava_type: &str) -> String {
    match strava_type.to_lowercase().as_str() {
        "ride" | "virtualride" => "cycling".to_string(),
        "run" | "virtualrun" => "running".to_string(),
        "swim" => "swimming".to_string(),
        "walk" => "walking".to_string(),
        "hike" => "hiking".to_string(),
        "weighttraining" => "strength".to_string(),
        "yoga" => "yoga".to_string(),
        other => other.to_string(),
    }
}

/// Import a page of fetched activities for a user. Activities whose
/// (user, source, external_id) triple already exists are skipped, making
/// repeated syncs idempotent. Returns the number of newly inserted rows.
#[instrument(skip(db, items))]
pub async fn import_activities<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    items: &[serde_json::Value],
) -> Result<u32, ApiError> {
    let mut synced_count = 0u32;

    for item in items {
        let parsed: StravaActivity = serde_json::from_value(item.clone())
            .map_err(|e| ApiError::BadGateway(format!("Malformed Strava activity: {e}")))?;

        let external_id = parsed.id.to_string();

        let existing = Activity::find()
            .filter(activity::Column::UserId.eq(user_id))
            .filter(activity::Column::Source.eq(PROVIDER))
            .filter(activity::Column::ExternalId.eq(external_id.as_str()))
            .one(db)
            .await?;

        if existing.is_some() {
            debug!("Skipping already imported activity {}", external_id);
            continue;
        }

        let activity_date = DateTime::parse_from_rfc3339(&parsed.start_date)
            .map_err(|e| ApiError::BadGateway(format!("Malformed activity start date: {e}")))?
            .with_timezone(&Utc);

        let raw_type = parsed.activity_type.as_deref().unwrap_or("Workout");

        activity::ActiveModel {
            user_id: Set(user_id),
            source: Set(PROVIDER.to_string()),
            external_id: Set(Some(external_id)),
            activity_type: Set(map_activity_type(raw_type)),
            name: Set(parsed.name.unwrap_or_else(|| "Strava Activity".to_string())),
            activity_date: Set(activity_date),
            duration_minutes: Set(Some(parsed.moving_time.unwrap_or(0.0) / 60.0)),
            distance_km: Set(Some(parsed.distance.unwrap_or(0.0) / 1000.0)),
            elevation_m: Set(parsed.total_elevation_gain),
            calories: Set(parsed.calories.map(|c| c as i32)),
            heart_rate_avg: Set(parsed.average_heartrate.map(|hr| hr as i32)),
            heart_rate_max: Set(parsed.max_heartrate.map(|hr| hr as i32)),
            power_avg: Set(parsed.average_watts.map(|w| w as i32)),
            power_max: Set(parsed.max_watts.map(|w| w as i32)),
            cadence_avg: Set(parsed.average_cadence.map(|c| c as i32)),
            speed_avg_kmh: Set(parsed.average_speed.map(|s| s * 3.6)),
            speed_max_kmh: Set(parsed.max_speed.map(|s| s * 3.6)),
            data_json: Set(Some(item.clone())),
            created_at: Set(Utc::now()),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await?;

        synced_count += 1;
    }

    info!("Imported {} new activities for user {}", synced_count, user_id);
    Ok(synced_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{Database, DatabaseConnection};
    use serde_json::json;

    #[test]
    fn test_activity_type_mapping() {
        assert_eq!(map_activity_type("Ride"), "cycling");
        assert_eq!(map_activity_type("VirtualRide"), "cycling");
        assert_eq!(map_activity_type("Run"), "running");
        assert_eq!(map_activity_type("VirtualRun"), "running");
        assert_eq!(map_activity_type("Swim"), "swimming");
        assert_eq!(map_activity_type("Walk"), "walking");
        assert_eq!(map_activity_type("Hike"), "hiking");
        assert_eq!(map_activity_type("WeightTraining"), "strength");
        assert_eq!(map_activity_type("Yoga"), "yoga");
        // Unknown types pass through lower-cased
        assert_eq!(map_activity_type("Kitesurf"), "kitesurf");
    }

    async fn setup_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");
        db
    }

    async fn insert_test_user(db: &DatabaseConnection) -> i32 {
        use model::entities::user;
        user::ActiveModel {
            email: Set("rider@example.com".to_string()),
            hashed_password: Set("$argon2id$test".to_string()),
            full_name: Set(None),
            role: Set(user::UserRole::Athlete),
            is_active: Set(true),
            is_locked: Set(false),
            created_at: Set(Utc::now()),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to insert user")
        .id
    }

    fn sample_activity() -> serde_json::Value {
        json!({
            "id": 987654321u64,
            "name": "Morning Ride",
            "type": "Ride",
            "start_date": "2025-05-01T06:30:00Z",
            "moving_time": 3600.0,
            "distance": 10000.0,
            "total_elevation_gain": 250.0,
            "average_speed": 5.0,
            "max_speed": 12.5,
            "average_heartrate": 142.7,
        })
    }

    #[tokio::test]
    async fn test_import_converts_units() {
        let db = setup_db().await;
        let user_id = insert_test_user(&db).await;

        let count = import_activities(&db, user_id, &[sample_activity()])
            .await
            .unwrap();
        assert_eq!(count, 1);

        let imported = Activity::find()
            .filter(activity::Column::UserId.eq(user_id))
            .one(&db)
            .await
            .unwrap()
            .expect("activity should exist");

        assert_eq!(imported.activity_type, "cycling");
        assert_eq!(imported.distance_km, Some(10.0));
        assert_eq!(imported.speed_avg_kmh, Some(18.0));
        assert_eq!(imported.duration_minutes, Some(60.0));
        assert_eq!(imported.heart_rate_avg, Some(142));
        assert_eq!(imported.external_id, Some("987654321".to_string()));
        assert!(imported.data_json.is_some());
    }

    #[tokio::test]
    async fn test_import_is_idempotent() {
        let db = setup_db().await;
        let user_id = insert_test_user(&db).await;

        let first = import_activities(&db, user_id, &[sample_activity()])
            .await
            .unwrap();
        let second = import_activities(&db, user_id, &[sample_activity()])
            .await
            .unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 0);

        let rows = Activity::find()
            .filter(activity::Column::UserId.eq(user_id))
            .filter(activity::Column::Source.eq(PROVIDER))
            .filter(activity::Column::ExternalId.eq("987654321"))
            .all(&db)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_import_malformed_payload_is_hard_failure() {
        let db = setup_db().await;
        let user_id = insert_test_user(&db).await;

        let result = import_activities(&db, user_id, &[json!({"name": "missing id"})]).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_type_defaults_to_workout() {
        let value = json!({
            "id": 1u64,
            "start_date": "2025-05-01T06:30:00Z",
        });
        let parsed: StravaActivity = serde_json::from_value(value).unwrap();
        assert_eq!(
            map_activity_type(parsed.activity_type.as_deref().unwrap_or("Workout")),
            "workout"
        );
    }
}
