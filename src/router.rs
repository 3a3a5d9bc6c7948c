use crate::handlers::{
    admin::{
        change_user_role, create_assignment, create_invite, delete_assignment, delete_user,
        get_all_assignments, get_all_users, get_system_stats, get_user_by_id, list_invites,
        lock_unlock_user,
    },
    auth::{login, read_me, register, validate_invite},
    goals::{create_goal, delete_goal, get_goal, get_goals, update_goal},
    health::health_check,
    integrations::{
        connect_strava, disconnect_strava, get_activities, get_integration_status, strava_callback,
        sync_strava,
    },
    messages::{
        get_conversations, get_messages_with_user, get_unread_count, mark_message_read,
        send_message,
    },
    nutrition::{
        create_nutrition_log, delete_nutrition_log, get_nutrition_log, get_nutrition_logs,
        update_nutrition_log,
    },
    plans::{
        add_nutrition_plan, add_planned_goal, add_planned_workout, create_training_plan,
        delete_document, delete_nutrition_plan, delete_planned_goal, delete_planned_workout,
        delete_training_plan, download_document, get_training_plan, get_training_plans,
        import_parsed_plan, parse_document, update_nutrition_plan, update_planned_goal,
        update_planned_workout, update_training_plan, upload_document,
    },
    rides::{create_ride, delete_ride, get_ride, get_rides, update_ride},
    trainer::{
        end_assignment, get_assignments, get_my_athletes, get_trainer_requests,
        respond_to_request, search_trainers, send_trainer_request,
    },
    workouts::{create_workout, delete_workout, get_workout, get_workouts, update_workout},
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Auth routes
        .route("/api/v1/auth/register", post(register))
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/me", get(read_me))
        .route("/api/v1/auth/invite/:token", get(validate_invite))
        // Ride CRUD routes
        .route("/api/v1/rides", post(create_ride))
        .route("/api/v1/rides", get(get_rides))
        .route("/api/v1/rides/:ride_id", get(get_ride))
        .route("/api/v1/rides/:ride_id", put(update_ride))
        .route("/api/v1/rides/:ride_id", delete(delete_ride))
        // Workout CRUD routes
        .route("/api/v1/workouts", post(create_workout))
        .route("/api/v1/workouts", get(get_workouts))
        .route("/api/v1/workouts/:workout_id", get(get_workout))
        .route("/api/v1/workouts/:workout_id", put(update_workout))
        .route("/api/v1/workouts/:workout_id", delete(delete_workout))
        // Goal CRUD routes
        .route("/api/v1/goals", post(create_goal))
        .route("/api/v1/goals", get(get_goals))
        .route("/api/v1/goals/:goal_id", get(get_goal))
        .route("/api/v1/goals/:goal_id", put(update_goal))
        .route("/api/v1/goals/:goal_id", delete(delete_goal))
        // Nutrition log CRUD routes
        .route("/api/v1/nutrition", post(create_nutrition_log))
        .route("/api/v1/nutrition", get(get_nutrition_logs))
        .route("/api/v1/nutrition/:log_id", get(get_nutrition_log))
        .route("/api/v1/nutrition/:log_id", put(update_nutrition_log))
        .route("/api/v1/nutrition/:log_id", delete(delete_nutrition_log))
        // Trainer-athlete relationship routes
        .route("/api/v1/trainer-requests", post(send_trainer_request))
        .route("/api/v1/trainer-requests", get(get_trainer_requests))
        .route(
            "/api/v1/trainer-requests/:request_id/respond",
            put(respond_to_request),
        )
        .route("/api/v1/trainer-requests/assignments", get(get_assignments))
        .route(
            "/api/v1/trainer-requests/assignments/:assignment_id",
            delete(end_assignment),
        )
        .route(
            "/api/v1/trainer-requests/trainers/search",
            get(search_trainers),
        )
        .route("/api/v1/trainer-requests/my-athletes", get(get_my_athletes))
        // Training plan routes
        .route("/api/v1/training-plans", post(create_training_plan))
        .route("/api/v1/training-plans", get(get_training_plans))
        .route("/api/v1/training-plans/parse-document", post(parse_document))
        .route("/api/v1/training-plans/import", post(import_parsed_plan))
        .route("/api/v1/training-plans/:plan_id", get(get_training_plan))
        .route("/api/v1/training-plans/:plan_id", put(update_training_plan))
        .route(
            "/api/v1/training-plans/:plan_id",
            delete(delete_training_plan),
        )
        .route(
            "/api/v1/training-plans/:plan_id/workouts",
            post(add_planned_workout),
        )
        .route(
            "/api/v1/training-plans/:plan_id/workouts/:workout_id",
            put(update_planned_workout),
        )
        .route(
            "/api/v1/training-plans/:plan_id/workouts/:workout_id",
            delete(delete_planned_workout),
        )
        .route(
            "/api/v1/training-plans/:plan_id/goals",
            post(add_planned_goal),
        )
        .route(
            "/api/v1/training-plans/:plan_id/goals/:goal_id",
            put(update_planned_goal),
        )
        .route(
            "/api/v1/training-plans/:plan_id/goals/:goal_id",
            delete(delete_planned_goal),
        )
        .route(
            "/api/v1/training-plans/:plan_id/nutrition",
            post(add_nutrition_plan),
        )
        .route(
            "/api/v1/training-plans/:plan_id/nutrition/:nutrition_id",
            put(update_nutrition_plan),
        )
        .route(
            "/api/v1/training-plans/:plan_id/nutrition/:nutrition_id",
            delete(delete_nutrition_plan),
        )
        .route(
            "/api/v1/training-plans/:plan_id/documents",
            post(upload_document),
        )
        .route(
            "/api/v1/training-plans/:plan_id/documents/:doc_id",
            get(download_document),
        )
        .route(
            "/api/v1/training-plans/:plan_id/documents/:doc_id",
            delete(delete_document),
        )
        // Messaging routes
        .route("/api/v1/messages", post(send_message))
        .route("/api/v1/messages/conversations", get(get_conversations))
        .route("/api/v1/messages/with/:user_id", get(get_messages_with_user))
        .route("/api/v1/messages/unread-count", get(get_unread_count))
        .route("/api/v1/messages/:message_id/read", put(mark_message_read))
        // Integration routes (the OAuth callback is public)
        .route("/api/v1/integrations/status", get(get_integration_status))
        .route("/api/v1/integrations/strava/connect", get(connect_strava))
        .route("/api/v1/integrations/strava/callback", get(strava_callback))
        .route("/api/v1/integrations/strava/sync", post(sync_strava))
        .route(
            "/api/v1/integrations/strava/disconnect",
            delete(disconnect_strava),
        )
        .route("/api/v1/integrations/activities", get(get_activities))
        // Admin routes
        .route("/api/v1/admin/users", get(get_all_users))
        .route("/api/v1/admin/users/:user_id", get(get_user_by_id))
        .route("/api/v1/admin/users/:user_id/role", put(change_user_role))
        .route("/api/v1/admin/users/:user_id/lock", put(lock_unlock_user))
        .route("/api/v1/admin/users/:user_id", delete(delete_user))
        .route("/api/v1/admin/assignments", get(get_all_assignments))
        .route("/api/v1/admin/assignments", post(create_assignment))
        .route(
            "/api/v1/admin/assignments/:assignment_id",
            delete(delete_assignment),
        )
        .route("/api/v1/admin/stats", get(get_system_stats))
        .route("/api/v1/admin/invites", post(create_invite))
        .route("/api/v1/admin/invites", get(list_invites))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive())
                // Documents may be up to 10 MB plus multipart overhead
                .layer(DefaultBodyLimit::max(12 * 1024 * 1024)),
        )
        .with_state(state)
}
