use anyhow::Result;
use sea_orm::Database;

use crate::schemas::AppState;

/// Application configuration, loaded from environment variables
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Secret used to sign access tokens
    pub secret_key: String,
    /// Access token lifetime in minutes
    pub access_token_expire_minutes: i64,
    /// Strava OAuth application credentials; None leaves the integration
    /// unconfigured (503 on the connect endpoints)
    pub strava_client_id: Option<String>,
    pub strava_client_secret: Option<String>,
    pub strava_redirect_uri: Option<String>,
    /// Where the OAuth callback redirects the browser after completion
    pub frontend_url: String,
    /// API key for the AI document-parsing service
    pub anthropic_api_key: Option<String>,
    /// Root directory for uploaded training documents
    pub upload_dir: String,
}

impl AppConfig {
    /// Load configuration from the environment (after dotenvy has run).
    pub fn from_env() -> Self {
        Self {
            secret_key: std::env::var("SECRET_KEY")
                .unwrap_or_else(|_| "change-me-in-production".to_string()),
            access_token_expire_minutes: std::env::var("ACCESS_TOKEN_EXPIRE_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60 * 24 * 8), // 8 days
            strava_client_id: std::env::var("STRAVA_CLIENT_ID").ok(),
            strava_client_secret: std::env::var("STRAVA_CLIENT_SECRET").ok(),
            strava_redirect_uri: std::env::var("STRAVA_REDIRECT_URI").ok(),
            frontend_url: std::env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            anthropic_api_key: std::env::var("ANTHROPIC_API_KEY").ok(),
            upload_dir: std::env::var("UPLOAD_DIR")
                .unwrap_or_else(|_| "uploads/training_documents".to_string()),
        }
    }
}

/// Initialize application state against a specific database URL
pub async fn initialize_app_state_with_url(database_url: &str) -> Result<AppState> {
    dotenvy::dotenv().ok();

    tracing::info!("Connecting to database: {}", database_url);
    let db = Database::connect(database_url).await?;

    let config = AppConfig::from_env();

    Ok(AppState { db, config })
}

/// Get bind address from environment or use default
pub fn get_bind_address() -> String {
    std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string())
}
