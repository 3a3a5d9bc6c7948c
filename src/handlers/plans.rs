use axum::body::Body;
use axum::http::header;
use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{Json, Response},
};
use axum_valid::Valid;
use chrono::{DateTime, Utc};
use model::entities::{
    nutrition_plan, planned_goal, planned_workout, prelude::*, training_document, training_plan,
    user::UserRole,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, ModelTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;

use crate::access;
use crate::ai::{DocumentParser, ParsedPlan};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::files;
use crate::planner;
use crate::schemas::{ApiResponse, AppState, ErrorResponse, Pagination};

/// Request body for creating a training plan
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateTrainingPlanRequest {
    pub athlete_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// Request body for updating a training plan (unset fields untouched)
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTrainingPlanRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
}

/// Training plan summary response
#[derive(Debug, Serialize, ToSchema)]
pub struct TrainingPlanResponse {
    pub id: i32,
    pub trainer_id: i32,
    pub athlete_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<training_plan::Model> for TrainingPlanResponse {
    fn from(model: training_plan::Model) -> Self {
        Self {
            id: model.id,
            trainer_id: model.trainer_id,
            athlete_id: model.athlete_id,
            title: model.title,
            description: model.description,
            start_date: model.start_date,
            end_date: model.end_date,
            is_active: model.is_active,
            created_at: model.created_at,
        }
    }
}

/// Training plan with all sub-resources
#[derive(Debug, Serialize, ToSchema)]
pub struct TrainingPlanDetailResponse {
    #[serde(flatten)]
    pub plan: TrainingPlanResponse,
    pub workouts: Vec<PlannedWorkoutResponse>,
    pub goals: Vec<PlannedGoalResponse>,
    pub nutrition_plans: Vec<NutritionPlanResponse>,
    pub documents: Vec<TrainingDocumentResponse>,
}

/// Request body for adding a planned workout
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct PlannedWorkoutCreate {
    pub title: String,
    pub workout_type: String,
    pub scheduled_date: DateTime<Utc>,
    pub duration_minutes: Option<i32>,
    pub description: Option<String>,
    pub intensity: Option<String>,
    pub exercises: Option<String>,
}

/// Request body for updating a planned workout. Athletes may only change
/// completion; other fields are silently ignored for them.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct PlannedWorkoutUpdate {
    pub title: Option<String>,
    pub workout_type: Option<String>,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i32>,
    pub description: Option<String>,
    pub intensity: Option<String>,
    pub exercises: Option<String>,
    pub is_completed: Option<bool>,
}

/// Planned workout response model
#[derive(Debug, Serialize, ToSchema)]
pub struct PlannedWorkoutResponse {
    pub id: i32,
    pub training_plan_id: i32,
    pub title: String,
    pub workout_type: String,
    pub scheduled_date: DateTime<Utc>,
    pub duration_minutes: Option<i32>,
    pub description: Option<String>,
    pub intensity: Option<String>,
    pub exercises: Option<String>,
    pub is_completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<planned_workout::Model> for PlannedWorkoutResponse {
    fn from(model: planned_workout::Model) -> Self {
        Self {
            id: model.id,
            training_plan_id: model.training_plan_id,
            title: model.title,
            workout_type: model.workout_type,
            scheduled_date: model.scheduled_date,
            duration_minutes: model.duration_minutes,
            description: model.description,
            intensity: model.intensity,
            exercises: model.exercises,
            is_completed: model.is_completed,
            completed_at: model.completed_at,
        }
    }
}

/// Request body for adding a planned goal
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct PlannedGoalCreate {
    pub title: String,
    pub goal_type: String,
    pub description: Option<String>,
    pub target_value: Option<f64>,
    pub current_value: Option<f64>,
    pub unit: Option<String>,
    pub target_date: Option<DateTime<Utc>>,
}

/// Request body for updating a planned goal. Athletes may only change
/// progress fields; the rest is silently ignored for them.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct PlannedGoalUpdate {
    pub title: Option<String>,
    pub goal_type: Option<String>,
    pub description: Option<String>,
    pub target_value: Option<f64>,
    pub current_value: Option<f64>,
    pub unit: Option<String>,
    pub target_date: Option<DateTime<Utc>>,
    pub is_achieved: Option<bool>,
}

/// Planned goal response model
#[derive(Debug, Serialize, ToSchema)]
pub struct PlannedGoalResponse {
    pub id: i32,
    pub training_plan_id: i32,
    pub title: String,
    pub goal_type: String,
    pub description: Option<String>,
    pub target_value: Option<f64>,
    pub current_value: Option<f64>,
    pub unit: Option<String>,
    pub target_date: Option<DateTime<Utc>>,
    pub is_achieved: bool,
}

impl From<planned_goal::Model> for PlannedGoalResponse {
    fn from(model: planned_goal::Model) -> Self {
        Self {
            id: model.id,
            training_plan_id: model.training_plan_id,
            title: model.title,
            goal_type: model.goal_type,
            description: model.description,
            target_value: model.target_value,
            current_value: model.current_value,
            unit: model.unit,
            target_date: model.target_date,
            is_achieved: model.is_achieved,
        }
    }
}

/// Request body for adding a nutrition plan entry
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct NutritionPlanCreate {
    pub day_of_week: Option<String>,
    pub meal_type: Option<String>,
    pub description: Option<String>,
    pub calories: Option<f64>,
    pub protein_grams: Option<f64>,
    pub carbs_grams: Option<f64>,
    pub fat_grams: Option<f64>,
    pub notes: Option<String>,
}

/// Request body for updating a nutrition plan entry
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct NutritionPlanUpdate {
    pub day_of_week: Option<String>,
    pub meal_type: Option<String>,
    pub description: Option<String>,
    pub calories: Option<f64>,
    pub protein_grams: Option<f64>,
    pub carbs_grams: Option<f64>,
    pub fat_grams: Option<f64>,
    pub notes: Option<String>,
}

/// Nutrition plan entry response model
#[derive(Debug, Serialize, ToSchema)]
pub struct NutritionPlanResponse {
    pub id: i32,
    pub training_plan_id: i32,
    pub day_of_week: Option<String>,
    pub meal_type: Option<String>,
    pub description: Option<String>,
    pub calories: Option<f64>,
    pub protein_grams: Option<f64>,
    pub carbs_grams: Option<f64>,
    pub fat_grams: Option<f64>,
    pub notes: Option<String>,
}

impl From<nutrition_plan::Model> for NutritionPlanResponse {
    fn from(model: nutrition_plan::Model) -> Self {
        Self {
            id: model.id,
            training_plan_id: model.training_plan_id,
            day_of_week: model.day_of_week,
            meal_type: model.meal_type,
            description: model.description,
            calories: model.calories,
            protein_grams: model.protein_grams,
            carbs_grams: model.carbs_grams,
            fat_grams: model.fat_grams,
            notes: model.notes,
        }
    }
}

/// Training document response model
#[derive(Debug, Serialize, ToSchema)]
pub struct TrainingDocumentResponse {
    pub id: i32,
    pub training_plan_id: i32,
    pub filename: String,
    pub file_type: Option<String>,
    pub uploaded_at: DateTime<Utc>,
    pub description: Option<String>,
}

impl From<training_document::Model> for TrainingDocumentResponse {
    fn from(model: training_document::Model) -> Self {
        Self {
            id: model.id,
            training_plan_id: model.training_plan_id,
            filename: model.filename,
            file_type: model.file_type,
            uploaded_at: model.uploaded_at,
            description: model.description,
        }
    }
}

/// Request body for bulk-importing a parsed plan
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ImportPlanRequest {
    pub athlete_id: i32,
    pub start_date: DateTime<Utc>,
    pub plan: ParsedPlan,
}

/// Load a plan and apply the §view policy: non-participants get 404, never
/// 403, so existence is not revealed.
async fn load_visible_plan(
    state: &AppState,
    plan_id: i32,
    caller: &model::entities::user::Model,
) -> Result<training_plan::Model, ApiError> {
    let plan = TrainingPlan::find_by_id(plan_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Training plan not found".to_string()))?;

    if !access::can_view_plan(&plan, caller) {
        warn!("User {} denied view of plan {}", caller.id, plan_id);
        return Err(ApiError::NotFound("Training plan not found".to_string()));
    }
    Ok(plan)
}

/// Load a visible plan and require edit access on top.
async fn load_editable_plan(
    state: &AppState,
    plan_id: i32,
    caller: &model::entities::user::Model,
) -> Result<training_plan::Model, ApiError> {
    let plan = load_visible_plan(state, plan_id, caller).await?;
    if !access::can_edit_plan(&plan, caller) {
        warn!("User {} denied edit of plan {}", caller.id, plan_id);
        return Err(ApiError::Forbidden(
            "Not authorized to edit this plan".to_string(),
        ));
    }
    Ok(plan)
}

/// Create a training plan (trainers only; non-admins need an active
/// assignment with the athlete)
#[utoipa::path(
    post,
    path = "/api/v1/training-plans",
    tag = "training-plans",
    request_body = CreateTrainingPlanRequest,
    responses(
        (status = 201, description = "Training plan created successfully", body = ApiResponse<TrainingPlanResponse>),
        (status = 403, description = "No active assignment with this athlete", body = ErrorResponse),
        (status = 404, description = "Athlete not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn create_training_plan(
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
    Json(request): Json<CreateTrainingPlanRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TrainingPlanResponse>>), ApiError> {
    trace!("Entering create_training_plan function");
    access::require_trainer(&current_user)?;

    let athlete = User::find_by_id(request.athlete_id).one(&state.db).await?;
    if athlete.is_none() {
        return Err(ApiError::NotFound("Athlete not found".to_string()));
    }

    if current_user.role != UserRole::Admin
        && !access::has_active_assignment(&state.db, current_user.id, request.athlete_id).await?
    {
        warn!(
            "Trainer {} has no assignment with athlete {}",
            current_user.id, request.athlete_id
        );
        return Err(ApiError::Forbidden(
            "You must have an active assignment with this athlete to create a training plan"
                .to_string(),
        ));
    }

    let now = Utc::now();
    let plan = training_plan::ActiveModel {
        trainer_id: Set(current_user.id),
        athlete_id: Set(request.athlete_id),
        title: Set(request.title),
        description: Set(request.description),
        start_date: Set(request.start_date),
        end_date: Set(request.end_date),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!("Training plan created with ID: {}", plan.id);
    let response = ApiResponse {
        data: TrainingPlanResponse::from(plan),
        message: "Training plan created successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// List training plans filtered by role: admins see all, trainers their
/// authored plans, athletes their assigned plans
#[utoipa::path(
    get,
    path = "/api/v1/training-plans",
    tag = "training-plans",
    params(Pagination),
    responses(
        (status = 200, description = "Training plans retrieved successfully", body = ApiResponse<Vec<TrainingPlanResponse>>),
        (status = 401, description = "Missing or invalid credentials", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_training_plans(
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
    Valid(Query(pagination)): Valid<Query<Pagination>>,
) -> Result<Json<ApiResponse<Vec<TrainingPlanResponse>>>, ApiError> {
    trace!("Entering get_training_plans function");

    let mut query = TrainingPlan::find();
    match current_user.role {
        UserRole::Admin => {}
        UserRole::Trainer => {
            query = query.filter(training_plan::Column::TrainerId.eq(current_user.id));
        }
        UserRole::Athlete => {
            query = query.filter(training_plan::Column::AthleteId.eq(current_user.id));
        }
    }

    let plans = query
        .order_by_asc(training_plan::Column::Id)
        .offset(pagination.skip())
        .limit(pagination.limit())
        .all(&state.db)
        .await?;

    debug!("Retrieved {} training plans", plans.len());
    let response = ApiResponse {
        data: plans.into_iter().map(TrainingPlanResponse::from).collect(),
        message: "Training plans retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Get a training plan with all sub-resources
#[utoipa::path(
    get,
    path = "/api/v1/training-plans/{plan_id}",
    tag = "training-plans",
    params(
        ("plan_id" = i32, Path, description = "Training plan ID"),
    ),
    responses(
        (status = 200, description = "Training plan retrieved successfully", body = ApiResponse<TrainingPlanDetailResponse>),
        (status = 404, description = "Training plan not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_training_plan(
    Path(plan_id): Path<i32>,
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
) -> Result<Json<ApiResponse<TrainingPlanDetailResponse>>, ApiError> {
    trace!("Entering get_training_plan function for plan_id: {}", plan_id);

    let plan = load_visible_plan(&state, plan_id, &current_user).await?;

    // Sub-resources come back ordered by id
    let workouts = plan
        .find_related(PlannedWorkout)
        .order_by_asc(planned_workout::Column::Id)
        .all(&state.db)
        .await?;
    let goals = plan
        .find_related(PlannedGoal)
        .order_by_asc(planned_goal::Column::Id)
        .all(&state.db)
        .await?;
    let nutrition_plans = plan
        .find_related(NutritionPlan)
        .order_by_asc(nutrition_plan::Column::Id)
        .all(&state.db)
        .await?;
    let documents = plan
        .find_related(TrainingDocument)
        .order_by_asc(training_document::Column::Id)
        .all(&state.db)
        .await?;

    let response = ApiResponse {
        data: TrainingPlanDetailResponse {
            plan: TrainingPlanResponse::from(plan),
            workouts: workouts.into_iter().map(Into::into).collect(),
            goals: goals.into_iter().map(Into::into).collect(),
            nutrition_plans: nutrition_plans.into_iter().map(Into::into).collect(),
            documents: documents.into_iter().map(Into::into).collect(),
        },
        message: "Training plan retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Update a training plan (trainer or admin)
#[utoipa::path(
    put,
    path = "/api/v1/training-plans/{plan_id}",
    tag = "training-plans",
    params(
        ("plan_id" = i32, Path, description = "Training plan ID"),
    ),
    request_body = UpdateTrainingPlanRequest,
    responses(
        (status = 200, description = "Training plan updated successfully", body = ApiResponse<TrainingPlanResponse>),
        (status = 403, description = "Not authorized to edit this plan", body = ErrorResponse),
        (status = 404, description = "Training plan not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn update_training_plan(
    Path(plan_id): Path<i32>,
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
    Json(request): Json<UpdateTrainingPlanRequest>,
) -> Result<Json<ApiResponse<TrainingPlanResponse>>, ApiError> {
    trace!(
        "Entering update_training_plan function for plan_id: {}",
        plan_id
    );

    let plan = load_editable_plan(&state, plan_id, &current_user).await?;
    let mut plan_active = plan.into_active_model();

    if let Some(title) = request.title {
        plan_active.title = Set(title);
    }
    if let Some(description) = request.description {
        plan_active.description = Set(Some(description));
    }
    if let Some(start_date) = request.start_date {
        plan_active.start_date = Set(Some(start_date));
    }
    if let Some(end_date) = request.end_date {
        plan_active.end_date = Set(Some(end_date));
    }
    if let Some(is_active) = request.is_active {
        plan_active.is_active = Set(is_active);
    }
    plan_active.updated_at = Set(Utc::now());

    let updated = plan_active.update(&state.db).await?;

    info!("Training plan {} updated", updated.id);
    let response = ApiResponse {
        data: TrainingPlanResponse::from(updated),
        message: "Training plan updated successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Delete a training plan and everything belonging to it. Children are
/// removed before the parent inside one transaction; stored document files
/// are removed afterwards, failures logged and swallowed.
#[utoipa::path(
    delete,
    path = "/api/v1/training-plans/{plan_id}",
    tag = "training-plans",
    params(
        ("plan_id" = i32, Path, description = "Training plan ID"),
    ),
    responses(
        (status = 204, description = "Training plan deleted successfully"),
        (status = 403, description = "Not authorized to delete this plan", body = ErrorResponse),
        (status = 404, description = "Training plan not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_training_plan(
    Path(plan_id): Path<i32>,
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
) -> Result<StatusCode, ApiError> {
    trace!(
        "Entering delete_training_plan function for plan_id: {}",
        plan_id
    );

    let plan = load_editable_plan(&state, plan_id, &current_user).await?;

    let documents = plan.find_related(TrainingDocument).all(&state.db).await?;
    let file_paths: Vec<String> = documents.iter().map(|d| d.file_path.clone()).collect();

    let txn = state.db.begin().await?;
    PlannedWorkout::delete_many()
        .filter(planned_workout::Column::TrainingPlanId.eq(plan_id))
        .exec(&txn)
        .await?;
    PlannedGoal::delete_many()
        .filter(planned_goal::Column::TrainingPlanId.eq(plan_id))
        .exec(&txn)
        .await?;
    NutritionPlan::delete_many()
        .filter(nutrition_plan::Column::TrainingPlanId.eq(plan_id))
        .exec(&txn)
        .await?;
    TrainingDocument::delete_many()
        .filter(training_document::Column::TrainingPlanId.eq(plan_id))
        .exec(&txn)
        .await?;
    TrainingPlan::delete_by_id(plan_id).exec(&txn).await?;
    txn.commit().await?;

    for path in file_paths {
        files::delete_file(&path);
    }

    info!("Training plan {} deleted", plan_id);
    Ok(StatusCode::NO_CONTENT)
}

/// Add a workout to a plan (trainer or admin)
#[utoipa::path(
    post,
    path = "/api/v1/training-plans/{plan_id}/workouts",
    tag = "training-plans",
    params(
        ("plan_id" = i32, Path, description = "Training plan ID"),
    ),
    request_body = PlannedWorkoutCreate,
    responses(
        (status = 201, description = "Workout added successfully", body = ApiResponse<PlannedWorkoutResponse>),
        (status = 403, description = "Not authorized to edit this plan", body = ErrorResponse),
        (status = 404, description = "Training plan not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn add_planned_workout(
    Path(plan_id): Path<i32>,
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
    Json(request): Json<PlannedWorkoutCreate>,
) -> Result<(StatusCode, Json<ApiResponse<PlannedWorkoutResponse>>), ApiError> {
    trace!("Entering add_planned_workout function for plan {}", plan_id);

    load_editable_plan(&state, plan_id, &current_user).await?;

    let workout = planned_workout::ActiveModel {
        training_plan_id: Set(plan_id),
        title: Set(request.title),
        workout_type: Set(request.workout_type),
        scheduled_date: Set(request.scheduled_date),
        duration_minutes: Set(request.duration_minutes),
        description: Set(request.description),
        intensity: Set(request.intensity),
        exercises: Set(request.exercises),
        is_completed: Set(false),
        completed_at: Set(None),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!("Planned workout {} added to plan {}", workout.id, plan_id);
    let response = ApiResponse {
        data: PlannedWorkoutResponse::from(workout),
        message: "Workout added successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Update a planned workout. The plan's athlete may only toggle completion;
/// any other supplied field is ignored for them.
#[utoipa::path(
    put,
    path = "/api/v1/training-plans/{plan_id}/workouts/{workout_id}",
    tag = "training-plans",
    params(
        ("plan_id" = i32, Path, description = "Training plan ID"),
        ("workout_id" = i32, Path, description = "Planned workout ID"),
    ),
    request_body = PlannedWorkoutUpdate,
    responses(
        (status = 200, description = "Workout updated successfully", body = ApiResponse<PlannedWorkoutResponse>),
        (status = 403, description = "Not authorized to edit this workout", body = ErrorResponse),
        (status = 404, description = "Training plan or workout not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn update_planned_workout(
    Path((plan_id, workout_id)): Path<(i32, i32)>,
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
    Json(request): Json<PlannedWorkoutUpdate>,
) -> Result<Json<ApiResponse<PlannedWorkoutResponse>>, ApiError> {
    trace!(
        "Entering update_planned_workout function for workout {}",
        workout_id
    );

    let plan = load_visible_plan(&state, plan_id, &current_user).await?;

    let workout = PlannedWorkout::find_by_id(workout_id)
        .filter(planned_workout::Column::TrainingPlanId.eq(plan_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Workout not found".to_string()))?;

    // Athlete path: completion fields only, everything else ignored
    if access::is_plan_athlete(&plan, &current_user) {
        let mut workout_active = workout.into_active_model();
        if let Some(is_completed) = request.is_completed {
            workout_active.is_completed = Set(is_completed);
            if is_completed {
                workout_active.completed_at = Set(Some(Utc::now()));
            }
        }
        let updated = workout_active.update(&state.db).await?;
        info!("Athlete updated completion on workout {}", updated.id);
        return Ok(Json(ApiResponse {
            data: PlannedWorkoutResponse::from(updated),
            message: "Workout updated successfully".to_string(),
            success: true,
        }));
    }

    if !access::can_edit_plan(&plan, &current_user) {
        return Err(ApiError::Forbidden(
            "Not authorized to edit this workout".to_string(),
        ));
    }

    let mut workout_active = workout.into_active_model();
    if let Some(title) = request.title {
        workout_active.title = Set(title);
    }
    if let Some(workout_type) = request.workout_type {
        workout_active.workout_type = Set(workout_type);
    }
    if let Some(scheduled_date) = request.scheduled_date {
        workout_active.scheduled_date = Set(scheduled_date);
    }
    if let Some(duration_minutes) = request.duration_minutes {
        workout_active.duration_minutes = Set(Some(duration_minutes));
    }
    if let Some(description) = request.description {
        workout_active.description = Set(Some(description));
    }
    if let Some(intensity) = request.intensity {
        workout_active.intensity = Set(Some(intensity));
    }
    if let Some(exercises) = request.exercises {
        workout_active.exercises = Set(Some(exercises));
    }
    if let Some(is_completed) = request.is_completed {
        workout_active.is_completed = Set(is_completed);
        if is_completed {
            workout_active.completed_at = Set(Some(Utc::now()));
        }
    }

    let updated = workout_active.update(&state.db).await?;

    info!("Planned workout {} updated", updated.id);
    let response = ApiResponse {
        data: PlannedWorkoutResponse::from(updated),
        message: "Workout updated successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Delete a planned workout (trainer or admin)
#[utoipa::path(
    delete,
    path = "/api/v1/training-plans/{plan_id}/workouts/{workout_id}",
    tag = "training-plans",
    params(
        ("plan_id" = i32, Path, description = "Training plan ID"),
        ("workout_id" = i32, Path, description = "Planned workout ID"),
    ),
    responses(
        (status = 204, description = "Workout deleted successfully"),
        (status = 403, description = "Not authorized to edit this plan", body = ErrorResponse),
        (status = 404, description = "Training plan or workout not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_planned_workout(
    Path((plan_id, workout_id)): Path<(i32, i32)>,
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
) -> Result<StatusCode, ApiError> {
    trace!(
        "Entering delete_planned_workout function for workout {}",
        workout_id
    );

    load_editable_plan(&state, plan_id, &current_user).await?;

    let workout = PlannedWorkout::find_by_id(workout_id)
        .filter(planned_workout::Column::TrainingPlanId.eq(plan_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Workout not found".to_string()))?;

    workout.delete(&state.db).await?;

    info!("Planned workout {} deleted", workout_id);
    Ok(StatusCode::NO_CONTENT)
}

/// Add a goal to a plan (trainer or admin)
#[utoipa::path(
    post,
    path = "/api/v1/training-plans/{plan_id}/goals",
    tag = "training-plans",
    params(
        ("plan_id" = i32, Path, description = "Training plan ID"),
    ),
    request_body = PlannedGoalCreate,
    responses(
        (status = 201, description = "Goal added successfully", body = ApiResponse<PlannedGoalResponse>),
        (status = 403, description = "Not authorized to edit this plan", body = ErrorResponse),
        (status = 404, description = "Training plan not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn add_planned_goal(
    Path(plan_id): Path<i32>,
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
    Json(request): Json<PlannedGoalCreate>,
) -> Result<(StatusCode, Json<ApiResponse<PlannedGoalResponse>>), ApiError> {
    trace!("Entering add_planned_goal function for plan {}", plan_id);

    load_editable_plan(&state, plan_id, &current_user).await?;

    let goal = planned_goal::ActiveModel {
        training_plan_id: Set(plan_id),
        title: Set(request.title),
        goal_type: Set(request.goal_type),
        description: Set(request.description),
        target_value: Set(request.target_value),
        current_value: Set(request.current_value),
        unit: Set(request.unit),
        target_date: Set(request.target_date),
        is_achieved: Set(false),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!("Planned goal {} added to plan {}", goal.id, plan_id);
    let response = ApiResponse {
        data: PlannedGoalResponse::from(goal),
        message: "Goal added successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Update a planned goal. The plan's athlete may only update progress
/// (`current_value`, `is_achieved`); any other supplied field is ignored
/// for them.
#[utoipa::path(
    put,
    path = "/api/v1/training-plans/{plan_id}/goals/{goal_id}",
    tag = "training-plans",
    params(
        ("plan_id" = i32, Path, description = "Training plan ID"),
        ("goal_id" = i32, Path, description = "Planned goal ID"),
    ),
    request_body = PlannedGoalUpdate,
    responses(
        (status = 200, description = "Goal updated successfully", body = ApiResponse<PlannedGoalResponse>),
        (status = 403, description = "Not authorized to edit this goal", body = ErrorResponse),
        (status = 404, description = "Training plan or goal not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn update_planned_goal(
    Path((plan_id, goal_id)): Path<(i32, i32)>,
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
    Json(request): Json<PlannedGoalUpdate>,
) -> Result<Json<ApiResponse<PlannedGoalResponse>>, ApiError> {
    trace!("Entering update_planned_goal function for goal {}", goal_id);

    let plan = load_visible_plan(&state, plan_id, &current_user).await?;

    let goal = PlannedGoal::find_by_id(goal_id)
        .filter(planned_goal::Column::TrainingPlanId.eq(plan_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Goal not found".to_string()))?;

    // Athlete path: progress fields only, everything else ignored
    if access::is_plan_athlete(&plan, &current_user) {
        let mut goal_active = goal.into_active_model();
        if let Some(current_value) = request.current_value {
            goal_active.current_value = Set(Some(current_value));
        }
        if let Some(is_achieved) = request.is_achieved {
            goal_active.is_achieved = Set(is_achieved);
        }
        let updated = goal_active.update(&state.db).await?;
        info!("Athlete updated progress on goal {}", updated.id);
        return Ok(Json(ApiResponse {
            data: PlannedGoalResponse::from(updated),
            message: "Goal updated successfully".to_string(),
            success: true,
        }));
    }

    if !access::can_edit_plan(&plan, &current_user) {
        return Err(ApiError::Forbidden(
            "Not authorized to edit this goal".to_string(),
        ));
    }

    let mut goal_active = goal.into_active_model();
    if let Some(title) = request.title {
        goal_active.title = Set(title);
    }
    if let Some(goal_type) = request.goal_type {
        goal_active.goal_type = Set(goal_type);
    }
    if let Some(description) = request.description {
        goal_active.description = Set(Some(description));
    }
    if let Some(target_value) = request.target_value {
        goal_active.target_value = Set(Some(target_value));
    }
    if let Some(current_value) = request.current_value {
        goal_active.current_value = Set(Some(current_value));
    }
    if let Some(unit) = request.unit {
        goal_active.unit = Set(Some(unit));
    }
    if let Some(target_date) = request.target_date {
        goal_active.target_date = Set(Some(target_date));
    }
    if let Some(is_achieved) = request.is_achieved {
        goal_active.is_achieved = Set(is_achieved);
    }

    let updated = goal_active.update(&state.db).await?;

    info!("Planned goal {} updated", updated.id);
    let response = ApiResponse {
        data: PlannedGoalResponse::from(updated),
        message: "Goal updated successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Delete a planned goal (trainer or admin)
#[utoipa::path(
    delete,
    path = "/api/v1/training-plans/{plan_id}/goals/{goal_id}",
    tag = "training-plans",
    params(
        ("plan_id" = i32, Path, description = "Training plan ID"),
        ("goal_id" = i32, Path, description = "Planned goal ID"),
    ),
    responses(
        (status = 204, description = "Goal deleted successfully"),
        (status = 403, description = "Not authorized to edit this plan", body = ErrorResponse),
        (status = 404, description = "Training plan or goal not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_planned_goal(
    Path((plan_id, goal_id)): Path<(i32, i32)>,
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
) -> Result<StatusCode, ApiError> {
    trace!("Entering delete_planned_goal function for goal {}", goal_id);

    load_editable_plan(&state, plan_id, &current_user).await?;

    let goal = PlannedGoal::find_by_id(goal_id)
        .filter(planned_goal::Column::TrainingPlanId.eq(plan_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Goal not found".to_string()))?;

    goal.delete(&state.db).await?;

    info!("Planned goal {} deleted", goal_id);
    Ok(StatusCode::NO_CONTENT)
}

/// Add a nutrition entry to a plan (trainer or admin)
#[utoipa::path(
    post,
    path = "/api/v1/training-plans/{plan_id}/nutrition",
    tag = "training-plans",
    params(
        ("plan_id" = i32, Path, description = "Training plan ID"),
    ),
    request_body = NutritionPlanCreate,
    responses(
        (status = 201, description = "Nutrition plan added successfully", body = ApiResponse<NutritionPlanResponse>),
        (status = 403, description = "Not authorized to edit this plan", body = ErrorResponse),
        (status = 404, description = "Training plan not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn add_nutrition_plan(
    Path(plan_id): Path<i32>,
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
    Json(request): Json<NutritionPlanCreate>,
) -> Result<(StatusCode, Json<ApiResponse<NutritionPlanResponse>>), ApiError> {
    trace!("Entering add_nutrition_plan function for plan {}", plan_id);

    load_editable_plan(&state, plan_id, &current_user).await?;

    let nutrition = nutrition_plan::ActiveModel {
        training_plan_id: Set(plan_id),
        day_of_week: Set(request.day_of_week),
        meal_type: Set(request.meal_type),
        description: Set(request.description),
        calories: Set(request.calories),
        protein_grams: Set(request.protein_grams),
        carbs_grams: Set(request.carbs_grams),
        fat_grams: Set(request.fat_grams),
        notes: Set(request.notes),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!("Nutrition plan {} added to plan {}", nutrition.id, plan_id);
    let response = ApiResponse {
        data: NutritionPlanResponse::from(nutrition),
        message: "Nutrition plan added successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Update a nutrition entry (trainer or admin)
#[utoipa::path(
    put,
    path = "/api/v1/training-plans/{plan_id}/nutrition/{nutrition_id}",
    tag = "training-plans",
    params(
        ("plan_id" = i32, Path, description = "Training plan ID"),
        ("nutrition_id" = i32, Path, description = "Nutrition plan ID"),
    ),
    request_body = NutritionPlanUpdate,
    responses(
        (status = 200, description = "Nutrition plan updated successfully", body = ApiResponse<NutritionPlanResponse>),
        (status = 403, description = "Not authorized to edit this plan", body = ErrorResponse),
        (status = 404, description = "Training plan or nutrition plan not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn update_nutrition_plan(
    Path((plan_id, nutrition_id)): Path<(i32, i32)>,
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
    Json(request): Json<NutritionPlanUpdate>,
) -> Result<Json<ApiResponse<NutritionPlanResponse>>, ApiError> {
    trace!(
        "Entering update_nutrition_plan function for nutrition {}",
        nutrition_id
    );

    load_editable_plan(&state, plan_id, &current_user).await?;

    let nutrition = NutritionPlan::find_by_id(nutrition_id)
        .filter(nutrition_plan::Column::TrainingPlanId.eq(plan_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Nutrition plan not found".to_string()))?;

    let mut nutrition_active = nutrition.into_active_model();
    if let Some(day_of_week) = request.day_of_week {
        nutrition_active.day_of_week = Set(Some(day_of_week));
    }
    if let Some(meal_type) = request.meal_type {
        nutrition_active.meal_type = Set(Some(meal_type));
    }
    if let Some(description) = request.description {
        nutrition_active.description = Set(Some(description));
    }
    if let Some(calories) = request.calories {
        nutrition_active.calories = Set(Some(calories));
    }
    if let Some(protein_grams) = request.protein_grams {
        nutrition_active.protein_grams = Set(Some(protein_grams));
    }
    if let Some(carbs_grams) = request.carbs_grams {
        nutrition_active.carbs_grams = Set(Some(carbs_grams));
    }
    if let Some(fat_grams) = request.fat_grams {
        nutrition_active.fat_grams = Set(Some(fat_grams));
    }
    if let Some(notes) = request.notes {
        nutrition_active.notes = Set(Some(notes));
    }

    let updated = nutrition_active.update(&state.db).await?;

    info!("Nutrition plan {} updated", updated.id);
    let response = ApiResponse {
        data: NutritionPlanResponse::from(updated),
        message: "Nutrition plan updated successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Delete a nutrition entry (trainer or admin)
#[utoipa::path(
    delete,
    path = "/api/v1/training-plans/{plan_id}/nutrition/{nutrition_id}",
    tag = "training-plans",
    params(
        ("plan_id" = i32, Path, description = "Training plan ID"),
        ("nutrition_id" = i32, Path, description = "Nutrition plan ID"),
    ),
    responses(
        (status = 204, description = "Nutrition plan deleted successfully"),
        (status = 403, description = "Not authorized to edit this plan", body = ErrorResponse),
        (status = 404, description = "Training plan or nutrition plan not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_nutrition_plan(
    Path((plan_id, nutrition_id)): Path<(i32, i32)>,
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
) -> Result<StatusCode, ApiError> {
    trace!(
        "Entering delete_nutrition_plan function for nutrition {}",
        nutrition_id
    );

    load_editable_plan(&state, plan_id, &current_user).await?;

    let nutrition = NutritionPlan::find_by_id(nutrition_id)
        .filter(nutrition_plan::Column::TrainingPlanId.eq(plan_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Nutrition plan not found".to_string()))?;

    nutrition.delete(&state.db).await?;

    info!("Nutrition plan {} deleted", nutrition_id);
    Ok(StatusCode::NO_CONTENT)
}

/// Upload a document to a plan (trainer or admin). One file per request;
/// allowed extensions .pdf/.txt/.doc/.docx, max 10 MB.
#[utoipa::path(
    post,
    path = "/api/v1/training-plans/{plan_id}/documents",
    tag = "training-plans",
    params(
        ("plan_id" = i32, Path, description = "Training plan ID"),
    ),
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Document uploaded successfully", body = ApiResponse<TrainingDocumentResponse>),
        (status = 400, description = "Missing file, bad extension or oversize upload", body = ErrorResponse),
        (status = 403, description = "Not authorized to edit this plan", body = ErrorResponse),
        (status = 404, description = "Training plan not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state, multipart))]
pub async fn upload_document(
    Path(plan_id): Path<i32>,
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<TrainingDocumentResponse>>), ApiError> {
    trace!("Entering upload_document function for plan {}", plan_id);

    load_editable_plan(&state, plan_id, &current_user).await?;

    let mut file: Option<(String, Vec<u8>)> = None;
    let mut description: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart payload: {e}")))?
    {
        let field_name = field.name().map(ToString::to_string);
        match field_name.as_deref() {
            Some("file") => {
                let filename = field
                    .file_name()
                    .map(ToString::to_string)
                    .ok_or_else(|| ApiError::BadRequest("Upload has no filename".to_string()))?;
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {e}")))?;
                file = Some((filename, data.to_vec()));
            }
            Some("description") => {
                description = field.text().await.ok();
            }
            _ => {}
        }
    }

    let (filename, data) =
        file.ok_or_else(|| ApiError::BadRequest("No file provided".to_string()))?;

    let stored_path = files::save_upload(
        &state.config.upload_dir,
        &format!("plan_{plan_id}"),
        &filename,
        &data,
    )?;

    let document = training_document::ActiveModel {
        training_plan_id: Set(plan_id),
        filename: Set(filename.clone()),
        file_path: Set(stored_path),
        file_type: Set(files::file_extension(&filename)),
        uploaded_at: Set(Utc::now()),
        description: Set(description),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!("Document {} uploaded to plan {}", document.id, plan_id);
    let response = ApiResponse {
        data: TrainingDocumentResponse::from(document),
        message: "Document uploaded successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Download a training plan document
#[utoipa::path(
    get,
    path = "/api/v1/training-plans/{plan_id}/documents/{doc_id}",
    tag = "training-plans",
    params(
        ("plan_id" = i32, Path, description = "Training plan ID"),
        ("doc_id" = i32, Path, description = "Document ID"),
    ),
    responses(
        (status = 200, description = "Document content"),
        (status = 404, description = "Training plan, document or file not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn download_document(
    Path((plan_id, doc_id)): Path<(i32, i32)>,
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
) -> Result<Response, ApiError> {
    trace!("Entering download_document function for doc {}", doc_id);

    load_visible_plan(&state, plan_id, &current_user).await?;

    let document = TrainingDocument::find_by_id(doc_id)
        .filter(training_document::Column::TrainingPlanId.eq(plan_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Document not found".to_string()))?;

    let content = std::fs::read(&document.file_path)
        .map_err(|_| ApiError::NotFound("File not found on server".to_string()))?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", document.filename),
        )
        .body(Body::from(content))
        .map_err(|e| ApiError::Internal(format!("Failed to build file response: {e}")))
}

/// Delete a training plan document. The database record always goes away;
/// file removal failures are logged and swallowed.
#[utoipa::path(
    delete,
    path = "/api/v1/training-plans/{plan_id}/documents/{doc_id}",
    tag = "training-plans",
    params(
        ("plan_id" = i32, Path, description = "Training plan ID"),
        ("doc_id" = i32, Path, description = "Document ID"),
    ),
    responses(
        (status = 204, description = "Document deleted successfully"),
        (status = 403, description = "Not authorized to edit this plan", body = ErrorResponse),
        (status = 404, description = "Training plan or document not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_document(
    Path((plan_id, doc_id)): Path<(i32, i32)>,
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
) -> Result<StatusCode, ApiError> {
    trace!("Entering delete_document function for doc {}", doc_id);

    load_editable_plan(&state, plan_id, &current_user).await?;

    let document = TrainingDocument::find_by_id(doc_id)
        .filter(training_document::Column::TrainingPlanId.eq(plan_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Document not found".to_string()))?;

    let file_path = document.file_path.clone();
    document.delete(&state.db).await?;

    files::delete_file(&file_path);

    info!("Document {} deleted from plan {}", doc_id, plan_id);
    Ok(StatusCode::NO_CONTENT)
}

/// Parse an uploaded training plan document into structured data via the AI
/// service (trainers only). Nothing is persisted; pair with the import
/// endpoint.
#[utoipa::path(
    post,
    path = "/api/v1/training-plans/parse-document",
    tag = "training-plans",
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Document parsed successfully", body = ApiResponse<ParsedPlan>),
        (status = 400, description = "Missing file or bad upload", body = ErrorResponse),
        (status = 502, description = "AI service failed or returned malformed data", body = ErrorResponse),
        (status = 503, description = "AI service not configured", body = ErrorResponse)
    )
)]
#[instrument(skip(state, multipart))]
pub async fn parse_document(
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<ParsedPlan>>, ApiError> {
    trace!("Entering parse_document function");
    access::require_trainer(&current_user)?;

    let mut file: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart payload: {e}")))?
    {
        if field.name() == Some("file") {
            let filename = field
                .file_name()
                .map(ToString::to_string)
                .ok_or_else(|| ApiError::BadRequest("Upload has no filename".to_string()))?;
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {e}")))?;
            file = Some((filename, data.to_vec()));
        }
    }

    let (filename, data) =
        file.ok_or_else(|| ApiError::BadRequest("No file provided".to_string()))?;
    files::validate_upload(&filename, data.len())?;

    let parser = DocumentParser::from_config(&state.config)?;
    let parsed = parser.parse_training_plan(&data, &filename).await?;

    let response = ApiResponse {
        data: parsed,
        message: "Document parsed successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Bulk-create a plan with all sub-resources from parsed data (trainers
/// only; non-admins need an active assignment with the athlete). The whole
/// import commits as one transaction.
#[utoipa::path(
    post,
    path = "/api/v1/training-plans/import",
    tag = "training-plans",
    request_body = ImportPlanRequest,
    responses(
        (status = 201, description = "Plan imported successfully", body = ApiResponse<TrainingPlanResponse>),
        (status = 400, description = "Parsed plan data is invalid", body = ErrorResponse),
        (status = 403, description = "No active assignment with this athlete", body = ErrorResponse),
        (status = 404, description = "Athlete not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn import_parsed_plan(
    State(state): State<AppState>,
    AuthUser(current_user): AuthUser,
    Json(request): Json<ImportPlanRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TrainingPlanResponse>>), ApiError> {
    trace!("Entering import_parsed_plan function");
    access::require_trainer(&current_user)?;

    let athlete = User::find_by_id(request.athlete_id).one(&state.db).await?;
    if athlete.is_none() {
        return Err(ApiError::NotFound("Athlete not found".to_string()));
    }

    if current_user.role != UserRole::Admin
        && !access::has_active_assignment(&state.db, current_user.id, request.athlete_id).await?
    {
        return Err(ApiError::Forbidden(
            "You must have an active assignment with this athlete to create a training plan"
                .to_string(),
        ));
    }

    // Client-supplied parsed data gets the same defensive validation as AI
    // output
    request
        .plan
        .validate()
        .map_err(ApiError::BadRequest)?;

    let plan = planner::build_plan_from_parsed(
        &state.db,
        current_user.id,
        request.athlete_id,
        request.start_date,
        &request.plan,
    )
    .await?;

    info!("Imported plan {} for athlete {}", plan.id, request.athlete_id);
    let response = ApiResponse {
        data: TrainingPlanResponse::from(plan),
        message: "Plan imported successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}
