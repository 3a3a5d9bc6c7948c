#[cfg(test)]
pub mod test_utils {
    use axum_test::TestServer;
    use chrono::Utc;
    use migration::{Migrator, MigratorTrait};
    use model::entities::user::{self, UserRole};
    use sea_orm::{ActiveModelTrait, ConnectionTrait, Database, DatabaseConnection, Set};
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    use crate::auth::hash_password;
    use crate::config::AppConfig;
    use crate::router::create_router;
    use crate::schemas::AppState;

    /// Password shared by every directly inserted test user.
    pub const TEST_PASSWORD: &str = "password12345";

    /// Create an in-memory SQLite database for testing
    pub async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");

        // Enable foreign keys so cascade deletes behave like production
        db.execute_unprepared("PRAGMA foreign_keys = ON;")
            .await
            .expect("Failed to enable foreign keys");

        // Run migrations
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        db
    }

    /// Configuration for tests: fixed secret, no external integrations
    pub fn test_config() -> AppConfig {
        AppConfig {
            secret_key: "test-secret-key".to_string(),
            access_token_expire_minutes: 60,
            strava_client_id: None,
            strava_client_secret: None,
            strava_redirect_uri: None,
            frontend_url: "http://localhost:5173".to_string(),
            anthropic_api_key: None,
            upload_dir: std::env::temp_dir()
                .join("etape-test-uploads")
                .to_string_lossy()
                .into_owned(),
        }
    }

    /// Create AppState for testing
    pub async fn setup_test_app_state() -> AppState {
        let db = setup_test_db().await;
        AppState {
            db,
            config: test_config(),
        }
    }

    /// Initialize tracing for tests with output to STDERR.
    ///
    /// The log level is taken from RUST_LOG, defaulting to WARN.
    fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let log_level = std::env::var("RUST_LOG")
            .ok()
            .and_then(|level| match level.to_uppercase().as_str() {
                "ERROR" => Some(Level::ERROR),
                "WARN" => Some(Level::WARN),
                "INFO" => Some(Level::INFO),
                "DEBUG" => Some(Level::DEBUG),
                "TRACE" => Some(Level::TRACE),
                _ => None,
            })
            .unwrap_or(Level::WARN);

        let subscriber = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// Create the axum test server plus a handle on its state
    pub async fn setup_test_server() -> (TestServer, AppState) {
        let _ = init_test_tracing();

        let state = setup_test_app_state().await;
        let server =
            TestServer::new(create_router(state.clone())).expect("Failed to build test server");
        (server, state)
    }

    /// Insert a user directly with the shared test password
    pub async fn create_user(
        db: &DatabaseConnection,
        email: &str,
        role: UserRole,
    ) -> user::Model {
        create_user_with_flags(db, email, role, true, false).await
    }

    /// Insert a user with explicit active/locked flags
    pub async fn create_user_with_flags(
        db: &DatabaseConnection,
        email: &str,
        role: UserRole,
        is_active: bool,
        is_locked: bool,
    ) -> user::Model {
        let now = Utc::now();
        user::ActiveModel {
            email: Set(email.to_string()),
            hashed_password: Set(hash_password(TEST_PASSWORD).expect("Failed to hash password")),
            full_name: Set(Some("Test User".to_string())),
            role: Set(role),
            is_active: Set(is_active),
            is_locked: Set(is_locked),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to insert test user")
    }

    /// Log a user in through the API and return the bearer token
    pub async fn login(server: &TestServer, email: &str) -> String {
        let response = server
            .post("/api/v1/auth/login")
            .json(&serde_json::json!({
                "email": email,
                "password": TEST_PASSWORD,
            }))
            .await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        body["data"]["access_token"]
            .as_str()
            .expect("login response should contain a token")
            .to_string()
    }
}
