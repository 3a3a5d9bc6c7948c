use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, OpenApi, ToSchema};
use validator::Validate;

use crate::config::AppConfig;

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Environment-derived configuration
    pub config: AppConfig,
}

/// API response wrapper
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

/// Error response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// Offset pagination shared by all collection endpoints
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
pub struct Pagination {
    /// Number of records to skip (default: 0)
    #[validate(range(min = 0, max = 100000))]
    pub skip: Option<u64>,
    /// Maximum number of records to return (default: 100)
    #[validate(range(min = 1, max = 500))]
    pub limit: Option<u64>,
}

impl Pagination {
    pub fn skip(&self) -> u64 {
        self.skip.unwrap_or(0)
    }

    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(100)
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::auth::register,
        crate::handlers::auth::login,
        crate::handlers::auth::read_me,
        crate::handlers::auth::validate_invite,
        crate::handlers::rides::create_ride,
        crate::handlers::rides::get_rides,
        crate::handlers::rides::get_ride,
        crate::handlers::rides::update_ride,
        crate::handlers::rides::delete_ride,
        crate::handlers::workouts::create_workout,
        crate::handlers::workouts::get_workouts,
        crate::handlers::workouts::get_workout,
        crate::handlers::workouts::update_workout,
        crate::handlers::workouts::delete_workout,
        crate::handlers::goals::create_goal,
        crate::handlers::goals::get_goals,
        crate::handlers::goals::get_goal,
        crate::handlers::goals::update_goal,
        crate::handlers::goals::delete_goal,
        crate::handlers::nutrition::create_nutrition_log,
        crate::handlers::nutrition::get_nutrition_logs,
        crate::handlers::nutrition::get_nutrition_log,
        crate::handlers::nutrition::update_nutrition_log,
        crate::handlers::nutrition::delete_nutrition_log,
        crate::handlers::trainer::send_trainer_request,
        crate::handlers::trainer::get_trainer_requests,
        crate::handlers::trainer::respond_to_request,
        crate::handlers::trainer::get_assignments,
        crate::handlers::trainer::end_assignment,
        crate::handlers::trainer::search_trainers,
        crate::handlers::trainer::get_my_athletes,
        crate::handlers::plans::create_training_plan,
        crate::handlers::plans::get_training_plans,
        crate::handlers::plans::get_training_plan,
        crate::handlers::plans::update_training_plan,
        crate::handlers::plans::delete_training_plan,
        crate::handlers::plans::add_planned_workout,
        crate::handlers::plans::update_planned_workout,
        crate::handlers::plans::delete_planned_workout,
        crate::handlers::plans::add_planned_goal,
        crate::handlers::plans::update_planned_goal,
        crate::handlers::plans::delete_planned_goal,
        crate::handlers::plans::add_nutrition_plan,
        crate::handlers::plans::update_nutrition_plan,
        crate::handlers::plans::delete_nutrition_plan,
        crate::handlers::plans::upload_document,
        crate::handlers::plans::download_document,
        crate::handlers::plans::delete_document,
        crate::handlers::plans::parse_document,
        crate::handlers::plans::import_parsed_plan,
        crate::handlers::messages::send_message,
        crate::handlers::messages::get_conversations,
        crate::handlers::messages::get_messages_with_user,
        crate::handlers::messages::get_unread_count,
        crate::handlers::messages::mark_message_read,
        crate::handlers::integrations::get_integration_status,
        crate::handlers::integrations::connect_strava,
        crate::handlers::integrations::strava_callback,
        crate::handlers::integrations::sync_strava,
        crate::handlers::integrations::disconnect_strava,
        crate::handlers::integrations::get_activities,
        crate::handlers::admin::get_all_users,
        crate::handlers::admin::get_user_by_id,
        crate::handlers::admin::change_user_role,
        crate::handlers::admin::lock_unlock_user,
        crate::handlers::admin::delete_user,
        crate::handlers::admin::get_all_assignments,
        crate::handlers::admin::create_assignment,
        crate::handlers::admin::delete_assignment,
        crate::handlers::admin::get_system_stats,
        crate::handlers::admin::create_invite,
        crate::handlers::admin::list_invites,
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            Pagination,
            crate::handlers::auth::RegisterRequest,
            crate::handlers::auth::LoginRequest,
            crate::handlers::auth::TokenResponse,
            crate::handlers::auth::UserResponse,
            crate::handlers::auth::InvitePublicResponse,
            crate::handlers::rides::CreateRideRequest,
            crate::handlers::rides::UpdateRideRequest,
            crate::handlers::rides::RideResponse,
            crate::handlers::workouts::CreateWorkoutRequest,
            crate::handlers::workouts::UpdateWorkoutRequest,
            crate::handlers::workouts::WorkoutResponse,
            crate::handlers::goals::CreateGoalRequest,
            crate::handlers::goals::UpdateGoalRequest,
            crate::handlers::goals::GoalResponse,
            crate::handlers::nutrition::CreateNutritionLogRequest,
            crate::handlers::nutrition::UpdateNutritionLogRequest,
            crate::handlers::nutrition::NutritionLogResponse,
            crate::handlers::trainer::TrainerRequestCreate,
            crate::handlers::trainer::TrainerRequestRespond,
            crate::handlers::trainer::TrainerRequestResponse,
            crate::handlers::trainer::AssignmentResponse,
            crate::handlers::plans::CreateTrainingPlanRequest,
            crate::handlers::plans::UpdateTrainingPlanRequest,
            crate::handlers::plans::TrainingPlanResponse,
            crate::handlers::plans::TrainingPlanDetailResponse,
            crate::handlers::plans::PlannedWorkoutCreate,
            crate::handlers::plans::PlannedWorkoutUpdate,
            crate::handlers::plans::PlannedWorkoutResponse,
            crate::handlers::plans::PlannedGoalCreate,
            crate::handlers::plans::PlannedGoalUpdate,
            crate::handlers::plans::PlannedGoalResponse,
            crate::handlers::plans::NutritionPlanCreate,
            crate::handlers::plans::NutritionPlanUpdate,
            crate::handlers::plans::NutritionPlanResponse,
            crate::handlers::plans::TrainingDocumentResponse,
            crate::handlers::plans::ImportPlanRequest,
            crate::handlers::messages::MessageCreate,
            crate::handlers::messages::MessageResponse,
            crate::handlers::messages::ConversationResponse,
            crate::handlers::integrations::IntegrationStatusResponse,
            crate::handlers::integrations::ConnectResponse,
            crate::handlers::integrations::SyncResultResponse,
            crate::handlers::integrations::ActivityResponse,
            crate::handlers::admin::UserRoleUpdate,
            crate::handlers::admin::UserLockUpdate,
            crate::handlers::admin::AssignmentCreate,
            crate::handlers::admin::SystemStatsResponse,
            crate::handlers::admin::InviteCreateRequest,
            crate::handlers::admin::InviteResponse,
            crate::ai::ParsedPlan,
            crate::ai::ParsedWeek,
            crate::ai::ParsedWorkout,
            crate::ai::ParsedNutrition,
            crate::ai::ParsedGoal,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Registration, login and invite validation"),
        (name = "rides", description = "Ride log endpoints"),
        (name = "workouts", description = "Workout log endpoints"),
        (name = "goals", description = "Personal goal endpoints"),
        (name = "nutrition", description = "Nutrition log endpoints"),
        (name = "trainer-athlete", description = "Trainer-athlete requests and assignments"),
        (name = "training-plans", description = "Training plans and their sub-resources"),
        (name = "messages", description = "Direct messaging between linked users"),
        (name = "integrations", description = "External provider connections and activity sync"),
        (name = "admin", description = "Administrative user and assignment management"),
    ),
    info(
        title = "Etape Training Hub API",
        description = "Multi-tenant fitness coaching backend - athletes log training, trainers author plans, admins manage the platform",
        version = "0.1.0",
    )
)]
pub struct ApiDoc;
