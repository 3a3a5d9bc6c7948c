use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string(Users::Email).unique_key())
                    .col(string(Users::HashedPassword))
                    .col(string_null(Users::FullName))
                    .col(string(Users::Role))
                    .col(boolean(Users::IsActive).default(true))
                    .col(boolean(Users::IsLocked).default(false))
                    .col(timestamp_with_time_zone(Users::CreatedAt))
                    .col(timestamp_with_time_zone(Users::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // Create invite_tokens table
        manager
            .create_table(
                Table::create()
                    .table(InviteTokens::Table)
                    .if_not_exists()
                    .col(pk_auto(InviteTokens::Id))
                    .col(string(InviteTokens::Token).unique_key())
                    .col(string_null(InviteTokens::Email))
                    .col(string(InviteTokens::Role))
                    .col(integer(InviteTokens::CreatedById))
                    .col(timestamp_with_time_zone(InviteTokens::CreatedAt))
                    .col(timestamp_with_time_zone(InviteTokens::ExpiresAt))
                    .col(timestamp_with_time_zone_null(InviteTokens::UsedAt))
                    .col(integer_null(InviteTokens::UsedById))
                    .col(boolean(InviteTokens::IsActive).default(true))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_invite_token_created_by")
                            .from(InviteTokens::Table, InviteTokens::CreatedById)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_invite_token_used_by")
                            .from(InviteTokens::Table, InviteTokens::UsedById)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create trainer_requests table
        manager
            .create_table(
                Table::create()
                    .table(TrainerRequests::Table)
                    .if_not_exists()
                    .col(pk_auto(TrainerRequests::Id))
                    .col(integer(TrainerRequests::AthleteId))
                    .col(integer(TrainerRequests::TrainerId))
                    .col(string(TrainerRequests::Status))
                    .col(string_null(TrainerRequests::Message))
                    .col(timestamp_with_time_zone(TrainerRequests::CreatedAt))
                    .col(timestamp_with_time_zone_null(TrainerRequests::RespondedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_trainer_request_athlete")
                            .from(TrainerRequests::Table, TrainerRequests::AthleteId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_trainer_request_trainer")
                            .from(TrainerRequests::Table, TrainerRequests::TrainerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create trainer_assignments table
        manager
            .create_table(
                Table::create()
                    .table(TrainerAssignments::Table)
                    .if_not_exists()
                    .col(pk_auto(TrainerAssignments::Id))
                    .col(integer(TrainerAssignments::TrainerId))
                    .col(integer(TrainerAssignments::AthleteId))
                    .col(timestamp_with_time_zone(TrainerAssignments::AssignedAt))
                    .col(boolean(TrainerAssignments::IsActive).default(true))
                    .col(string_null(TrainerAssignments::Notes))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_trainer_assignment_trainer")
                            .from(TrainerAssignments::Table, TrainerAssignments::TrainerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_trainer_assignment_athlete")
                            .from(TrainerAssignments::Table, TrainerAssignments::AthleteId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create training_plans table
        manager
            .create_table(
                Table::create()
                    .table(TrainingPlans::Table)
                    .if_not_exists()
                    .col(pk_auto(TrainingPlans::Id))
                    .col(integer(TrainingPlans::TrainerId))
                    .col(integer(TrainingPlans::AthleteId))
                    .col(string(TrainingPlans::Title))
                    .col(text_null(TrainingPlans::Description))
                    .col(timestamp_with_time_zone_null(TrainingPlans::StartDate))
                    .col(timestamp_with_time_zone_null(TrainingPlans::EndDate))
                    .col(boolean(TrainingPlans::IsActive).default(true))
                    .col(timestamp_with_time_zone(TrainingPlans::CreatedAt))
                    .col(timestamp_with_time_zone(TrainingPlans::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_training_plan_trainer")
                            .from(TrainingPlans::Table, TrainingPlans::TrainerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_training_plan_athlete")
                            .from(TrainingPlans::Table, TrainingPlans::AthleteId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create planned_workouts table (cascade with the plan)
        manager
            .create_table(
                Table::create()
                    .table(PlannedWorkouts::Table)
                    .if_not_exists()
                    .col(pk_auto(PlannedWorkouts::Id))
                    .col(integer(PlannedWorkouts::TrainingPlanId))
                    .col(string(PlannedWorkouts::Title))
                    .col(string(PlannedWorkouts::WorkoutType))
                    .col(timestamp_with_time_zone(PlannedWorkouts::ScheduledDate))
                    .col(integer_null(PlannedWorkouts::DurationMinutes))
                    .col(text_null(PlannedWorkouts::Description))
                    .col(string_null(PlannedWorkouts::Intensity))
                    .col(text_null(PlannedWorkouts::Exercises))
                    .col(boolean(PlannedWorkouts::IsCompleted).default(false))
                    .col(timestamp_with_time_zone_null(PlannedWorkouts::CompletedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_planned_workout_plan")
                            .from(PlannedWorkouts::Table, PlannedWorkouts::TrainingPlanId)
                            .to(TrainingPlans::Table, TrainingPlans::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create planned_goals table (cascade with the plan)
        manager
            .create_table(
                Table::create()
                    .table(PlannedGoals::Table)
                    .if_not_exists()
                    .col(pk_auto(PlannedGoals::Id))
                    .col(integer(PlannedGoals::TrainingPlanId))
                    .col(string(PlannedGoals::Title))
                    .col(string(PlannedGoals::GoalType))
                    .col(text_null(PlannedGoals::Description))
                    .col(double_null(PlannedGoals::TargetValue))
                    .col(double_null(PlannedGoals::CurrentValue))
                    .col(string_null(PlannedGoals::Unit))
                    .col(timestamp_with_time_zone_null(PlannedGoals::TargetDate))
                    .col(boolean(PlannedGoals::IsAchieved).default(false))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_planned_goal_plan")
                            .from(PlannedGoals::Table, PlannedGoals::TrainingPlanId)
                            .to(TrainingPlans::Table, TrainingPlans::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create nutrition_plans table (cascade with the plan)
        manager
            .create_table(
                Table::create()
                    .table(NutritionPlans::Table)
                    .if_not_exists()
                    .col(pk_auto(NutritionPlans::Id))
                    .col(integer(NutritionPlans::TrainingPlanId))
                    .col(string_null(NutritionPlans::DayOfWeek))
                    .col(string_null(NutritionPlans::MealType))
                    .col(text_null(NutritionPlans::Description))
                    .col(double_null(NutritionPlans::Calories))
                    .col(double_null(NutritionPlans::ProteinGrams))
                    .col(double_null(NutritionPlans::CarbsGrams))
                    .col(double_null(NutritionPlans::FatGrams))
                    .col(text_null(NutritionPlans::Notes))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_nutrition_plan_plan")
                            .from(NutritionPlans::Table, NutritionPlans::TrainingPlanId)
                            .to(TrainingPlans::Table, TrainingPlans::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create training_documents table (cascade with the plan)
        manager
            .create_table(
                Table::create()
                    .table(TrainingDocuments::Table)
                    .if_not_exists()
                    .col(pk_auto(TrainingDocuments::Id))
                    .col(integer(TrainingDocuments::TrainingPlanId))
                    .col(string(TrainingDocuments::Filename))
                    .col(string(TrainingDocuments::FilePath))
                    .col(string_null(TrainingDocuments::FileType))
                    .col(timestamp_with_time_zone(TrainingDocuments::UploadedAt))
                    .col(text_null(TrainingDocuments::Description))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_training_document_plan")
                            .from(TrainingDocuments::Table, TrainingDocuments::TrainingPlanId)
                            .to(TrainingPlans::Table, TrainingPlans::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create rides table
        manager
            .create_table(
                Table::create()
                    .table(Rides::Table)
                    .if_not_exists()
                    .col(pk_auto(Rides::Id))
                    .col(integer(Rides::UserId))
                    .col(string(Rides::Title))
                    .col(text_null(Rides::Description))
                    .col(double(Rides::DistanceKm))
                    .col(integer(Rides::DurationMinutes))
                    .col(double_null(Rides::ElevationGainM))
                    .col(double_null(Rides::AvgSpeedKmh))
                    .col(double_null(Rides::MaxSpeedKmh))
                    .col(integer_null(Rides::AvgPowerWatts))
                    .col(integer_null(Rides::AvgHeartRate))
                    .col(integer_null(Rides::MaxHeartRate))
                    .col(integer_null(Rides::AvgCadence))
                    .col(timestamp_with_time_zone(Rides::RideDate))
                    .col(string_null(Rides::RouteName))
                    .col(string_null(Rides::RideType))
                    .col(timestamp_with_time_zone(Rides::CreatedAt))
                    .col(timestamp_with_time_zone(Rides::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ride_user")
                            .from(Rides::Table, Rides::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create workouts table
        manager
            .create_table(
                Table::create()
                    .table(Workouts::Table)
                    .if_not_exists()
                    .col(pk_auto(Workouts::Id))
                    .col(integer(Workouts::UserId))
                    .col(string(Workouts::Title))
                    .col(text_null(Workouts::Description))
                    .col(string(Workouts::WorkoutType))
                    .col(integer(Workouts::DurationMinutes))
                    .col(string_null(Workouts::Intensity))
                    .col(text_null(Workouts::Notes))
                    .col(timestamp_with_time_zone(Workouts::WorkoutDate))
                    .col(timestamp_with_time_zone(Workouts::CreatedAt))
                    .col(timestamp_with_time_zone(Workouts::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_workout_user")
                            .from(Workouts::Table, Workouts::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create goals table
        manager
            .create_table(
                Table::create()
                    .table(Goals::Table)
                    .if_not_exists()
                    .col(pk_auto(Goals::Id))
                    .col(integer(Goals::UserId))
                    .col(string(Goals::Title))
                    .col(text_null(Goals::Description))
                    .col(string(Goals::GoalType))
                    .col(double_null(Goals::TargetValue))
                    .col(double_null(Goals::CurrentValue))
                    .col(string_null(Goals::Unit))
                    .col(timestamp_with_time_zone_null(Goals::TargetDate))
                    .col(boolean(Goals::IsCompleted).default(false))
                    .col(timestamp_with_time_zone_null(Goals::CompletedDate))
                    .col(timestamp_with_time_zone(Goals::CreatedAt))
                    .col(timestamp_with_time_zone(Goals::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_goal_user")
                            .from(Goals::Table, Goals::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create nutrition_logs table
        manager
            .create_table(
                Table::create()
                    .table(NutritionLogs::Table)
                    .if_not_exists()
                    .col(pk_auto(NutritionLogs::Id))
                    .col(integer(NutritionLogs::UserId))
                    .col(string_null(NutritionLogs::MealType))
                    .col(integer_null(NutritionLogs::Calories))
                    .col(double_null(NutritionLogs::ProteinG))
                    .col(double_null(NutritionLogs::CarbsG))
                    .col(double_null(NutritionLogs::FatG))
                    .col(integer_null(NutritionLogs::WaterMl))
                    .col(text_null(NutritionLogs::Description))
                    .col(text_null(NutritionLogs::Notes))
                    .col(timestamp_with_time_zone(NutritionLogs::LogDate))
                    .col(timestamp_with_time_zone(NutritionLogs::CreatedAt))
                    .col(timestamp_with_time_zone(NutritionLogs::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_nutrition_log_user")
                            .from(NutritionLogs::Table, NutritionLogs::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create integrations table
        manager
            .create_table(
                Table::create()
                    .table(Integrations::Table)
                    .if_not_exists()
                    .col(pk_auto(Integrations::Id))
                    .col(integer(Integrations::UserId))
                    .col(string(Integrations::Provider))
                    .col(text(Integrations::AccessToken))
                    .col(text_null(Integrations::RefreshToken))
                    .col(timestamp_with_time_zone_null(Integrations::TokenExpiresAt))
                    .col(string_null(Integrations::AthleteId))
                    .col(timestamp_with_time_zone(Integrations::ConnectedAt))
                    .col(timestamp_with_time_zone_null(Integrations::LastSync))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_integration_user")
                            .from(Integrations::Table, Integrations::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create activities table
        manager
            .create_table(
                Table::create()
                    .table(Activities::Table)
                    .if_not_exists()
                    .col(pk_auto(Activities::Id))
                    .col(integer(Activities::UserId))
                    .col(string(Activities::Source))
                    .col(string_null(Activities::ExternalId))
                    .col(string(Activities::ActivityType))
                    .col(string(Activities::Name))
                    .col(timestamp_with_time_zone(Activities::ActivityDate))
                    .col(double_null(Activities::DurationMinutes))
                    .col(double_null(Activities::DistanceKm))
                    .col(double_null(Activities::ElevationM))
                    .col(integer_null(Activities::Calories))
                    .col(integer_null(Activities::HeartRateAvg))
                    .col(integer_null(Activities::HeartRateMax))
                    .col(integer_null(Activities::PowerAvg))
                    .col(integer_null(Activities::PowerMax))
                    .col(integer_null(Activities::CadenceAvg))
                    .col(double_null(Activities::SpeedAvgKmh))
                    .col(double_null(Activities::SpeedMaxKmh))
                    .col(json_null(Activities::DataJson))
                    .col(timestamp_with_time_zone(Activities::CreatedAt))
                    .col(timestamp_with_time_zone(Activities::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_activity_user")
                            .from(Activities::Table, Activities::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index supporting the (user, source, external_id) dedup lookup
        manager
            .create_index(
                Index::create()
                    .name("idx_activities_user_source_external")
                    .table(Activities::Table)
                    .col(Activities::UserId)
                    .col(Activities::Source)
                    .col(Activities::ExternalId)
                    .to_owned(),
            )
            .await?;

        // Create messages table
        manager
            .create_table(
                Table::create()
                    .table(Messages::Table)
                    .if_not_exists()
                    .col(pk_auto(Messages::Id))
                    .col(integer(Messages::SenderId))
                    .col(integer(Messages::RecipientId))
                    .col(text(Messages::Content))
                    .col(boolean(Messages::IsRead).default(false))
                    .col(timestamp_with_time_zone(Messages::CreatedAt))
                    .col(timestamp_with_time_zone_null(Messages::ReadAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_message_sender")
                            .from(Messages::Table, Messages::SenderId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_message_recipient")
                            .from(Messages::Table, Messages::RecipientId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse dependency order
        manager
            .drop_table(Table::drop().table(Messages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Activities::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Integrations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(NutritionLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Goals::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Workouts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Rides::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TrainingDocuments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(NutritionPlans::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PlannedGoals::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PlannedWorkouts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TrainingPlans::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TrainerAssignments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TrainerRequests::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(InviteTokens::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    HashedPassword,
    FullName,
    Role,
    IsActive,
    IsLocked,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum InviteTokens {
    Table,
    Id,
    Token,
    Email,
    Role,
    CreatedById,
    CreatedAt,
    ExpiresAt,
    UsedAt,
    UsedById,
    IsActive,
}

#[derive(DeriveIden)]
enum TrainerRequests {
    Table,
    Id,
    AthleteId,
    TrainerId,
    Status,
    Message,
    CreatedAt,
    RespondedAt,
}

#[derive(DeriveIden)]
enum TrainerAssignments {
    Table,
    Id,
    TrainerId,
    AthleteId,
    AssignedAt,
    IsActive,
    Notes,
}

#[derive(DeriveIden)]
enum TrainingPlans {
    Table,
    Id,
    TrainerId,
    AthleteId,
    Title,
    Description,
    StartDate,
    EndDate,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PlannedWorkouts {
    Table,
    Id,
    TrainingPlanId,
    Title,
    WorkoutType,
    ScheduledDate,
    DurationMinutes,
    Description,
    Intensity,
    Exercises,
    IsCompleted,
    CompletedAt,
}

#[derive(DeriveIden)]
enum PlannedGoals {
    Table,
    Id,
    TrainingPlanId,
    Title,
    GoalType,
    Description,
    TargetValue,
    CurrentValue,
    Unit,
    TargetDate,
    IsAchieved,
}

#[derive(DeriveIden)]
enum NutritionPlans {
    Table,
    Id,
    TrainingPlanId,
    DayOfWeek,
    MealType,
    Description,
    Calories,
    ProteinGrams,
    CarbsGrams,
    FatGrams,
    Notes,
}

#[derive(DeriveIden)]
enum TrainingDocuments {
    Table,
    Id,
    TrainingPlanId,
    Filename,
    FilePath,
    FileType,
    UploadedAt,
    Description,
}

#[derive(DeriveIden)]
enum Rides {
    Table,
    Id,
    UserId,
    Title,
    Description,
    DistanceKm,
    DurationMinutes,
    ElevationGainM,
    AvgSpeedKmh,
    MaxSpeedKmh,
    AvgPowerWatts,
    AvgHeartRate,
    MaxHeartRate,
    AvgCadence,
    RideDate,
    RouteName,
    RideType,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Workouts {
    Table,
    Id,
    UserId,
    Title,
    Description,
    WorkoutType,
    DurationMinutes,
    Intensity,
    Notes,
    WorkoutDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Goals {
    Table,
    Id,
    UserId,
    Title,
    Description,
    GoalType,
    TargetValue,
    CurrentValue,
    Unit,
    TargetDate,
    IsCompleted,
    CompletedDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum NutritionLogs {
    Table,
    Id,
    UserId,
    MealType,
    Calories,
    ProteinG,
    CarbsG,
    FatG,
    WaterMl,
    Description,
    Notes,
    LogDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Integrations {
    Table,
    Id,
    UserId,
    Provider,
    AccessToken,
    RefreshToken,
    TokenExpiresAt,
    AthleteId,
    ConnectedAt,
    LastSync,
}

#[derive(DeriveIden)]
enum Activities {
    Table,
    Id,
    UserId,
    Source,
    ExternalId,
    ActivityType,
    Name,
    ActivityDate,
    DurationMinutes,
    DistanceKm,
    ElevationM,
    Calories,
    HeartRateAvg,
    HeartRateMax,
    PowerAvg,
    PowerMax,
    CadenceAvg,
    SpeedAvgKmh,
    SpeedMaxKmh,
    DataJson,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Messages {
    Table,
    Id,
    SenderId,
    RecipientId,
    Content,
    IsRead,
    CreatedAt,
    ReadAt,
}
