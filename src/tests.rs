#[cfg(test)]
mod integration_tests {
    use axum::http::header::AUTHORIZATION;
    use axum::http::{HeaderValue, StatusCode};
    use chrono::{Duration, Utc};
    use model::entities::user::UserRole;
    use model::entities::{invite_token, prelude::*, ride, trainer_assignment};
    use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

    use crate::test_utils::test_utils::{
        create_user, create_user_with_flags, login, setup_test_server, TEST_PASSWORD,
    };

    fn bearer(token: &str) -> HeaderValue {
        HeaderValue::from_str(&format!("Bearer {token}")).expect("valid header value")
    }

    #[tokio::test]
    async fn test_health_check() {
        let (server, _state) = setup_test_server().await;

        let response = server.get("/health").await;

        response.assert_status(StatusCode::OK);
    }

    #[tokio::test]
    async fn test_register_login_and_me() {
        let (server, _state) = setup_test_server().await;

        let response = server
            .post("/api/v1/auth/register")
            .json(&serde_json::json!({
                "email": "rider@example.com",
                "password": TEST_PASSWORD,
                "full_name": "First Rider",
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: serde_json::Value = response.json();
        assert!(body["success"].as_bool().unwrap());
        // Registration without an invite defaults to the athlete role
        assert_eq!(body["data"]["role"], "athlete");

        let token = login(&server, "rider@example.com").await;

        let me = server
            .get("/api/v1/auth/me")
            .add_header(AUTHORIZATION, bearer(&token))
            .await;
        me.assert_status(StatusCode::OK);
        let me_body: serde_json::Value = me.json();
        assert_eq!(me_body["data"]["email"], "rider@example.com");
    }

    #[tokio::test]
    async fn test_register_duplicate_email_rejected() {
        let (server, state) = setup_test_server().await;
        create_user(&state.db, "taken@example.com", UserRole::Athlete).await;

        let response = server
            .post("/api/v1/auth/register")
            .json(&serde_json::json!({
                "email": "taken@example.com",
                "password": TEST_PASSWORD,
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_requests_without_token_rejected() {
        let (server, _state) = setup_test_server().await;

        let response = server.get("/api/v1/rides").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_locked_account_cannot_authenticate() {
        let (server, state) = setup_test_server().await;
        create_user_with_flags(&state.db, "locked@example.com", UserRole::Athlete, true, true)
            .await;

        // Correct credentials still fail for a locked account
        let response = server
            .post("/api/v1/auth/login")
            .json(&serde_json::json!({
                "email": "locked@example.com",
                "password": TEST_PASSWORD,
            }))
            .await;
        response.assert_status(StatusCode::FORBIDDEN);
        let body: serde_json::Value = response.json();
        assert_eq!(body["code"], "ACCOUNT_LOCKED");
    }

    #[tokio::test]
    async fn test_lock_invalidates_existing_token() {
        let (server, state) = setup_test_server().await;
        let user = create_user(&state.db, "soon-locked@example.com", UserRole::Athlete).await;
        let token = login(&server, "soon-locked@example.com").await;

        // Lock the account after the token was issued
        let mut active: model::entities::user::ActiveModel = user.into();
        active.is_locked = Set(true);
        active.update(&state.db).await.unwrap();

        let response = server
            .get("/api/v1/auth/me")
            .add_header(AUTHORIZATION, bearer(&token))
            .await;
        response.assert_status(StatusCode::FORBIDDEN);
    }

    async fn insert_invite(
        state: &crate::schemas::AppState,
        token: &str,
        role: UserRole,
        email: Option<&str>,
        expires_in_days: i64,
        used: bool,
        is_active: bool,
    ) {
        let admin = create_user(
            &state.db,
            &format!("inviter-{token}@example.com"),
            UserRole::Admin,
        )
        .await;
        let now = Utc::now();
        invite_token::ActiveModel {
            token: Set(token.to_string()),
            email: Set(email.map(ToString::to_string)),
            role: Set(role),
            created_by_id: Set(admin.id),
            created_at: Set(now),
            expires_at: Set(now + Duration::days(expires_in_days)),
            used_at: Set(used.then_some(now)),
            used_by_id: Set(used.then_some(admin.id)),
            is_active: Set(is_active),
            ..Default::default()
        }
        .insert(&state.db)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_invite_token_grants_role() {
        let (server, state) = setup_test_server().await;
        insert_invite(&state, "trainer-invite", UserRole::Trainer, None, 7, false, true).await;

        let response = server
            .post("/api/v1/auth/register")
            .json(&serde_json::json!({
                "email": "coach@example.com",
                "password": TEST_PASSWORD,
                "invite_token": "trainer-invite",
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: serde_json::Value = response.json();
        assert_eq!(body["data"]["role"], "trainer");

        // The token is single-use
        let again = server
            .post("/api/v1/auth/register")
            .json(&serde_json::json!({
                "email": "other@example.com",
                "password": TEST_PASSWORD,
                "invite_token": "trainer-invite",
            }))
            .await;
        again.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_invalid_invites_rejected() {
        let (server, state) = setup_test_server().await;
        insert_invite(&state, "expired", UserRole::Trainer, None, -1, false, true).await;
        insert_invite(&state, "used", UserRole::Trainer, None, 7, true, true).await;
        insert_invite(&state, "inactive", UserRole::Trainer, None, 7, false, false).await;
        insert_invite(
            &state,
            "bound",
            UserRole::Trainer,
            Some("right@example.com"),
            7,
            false,
            true,
        )
        .await;

        for (email, invite) in [
            ("a@example.com", "expired"),
            ("b@example.com", "used"),
            ("c@example.com", "inactive"),
            ("d@example.com", "unknown-token"),
            // Pre-set email mismatch
            ("wrong@example.com", "bound"),
        ] {
            let response = server
                .post("/api/v1/auth/register")
                .json(&serde_json::json!({
                    "email": email,
                    "password": TEST_PASSWORD,
                    "invite_token": invite,
                }))
                .await;
            response.assert_status(StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn test_trainer_request_flow() {
        let (server, state) = setup_test_server().await;
        let athlete = create_user(&state.db, "athlete@example.com", UserRole::Athlete).await;
        let trainer = create_user(&state.db, "trainer@example.com", UserRole::Trainer).await;
        let athlete_token = login(&server, "athlete@example.com").await;
        let trainer_token = login(&server, "trainer@example.com").await;

        // Athlete sends a request
        let response = server
            .post("/api/v1/trainer-requests")
            .add_header(AUTHORIZATION, bearer(&athlete_token))
            .json(&serde_json::json!({"trainer_id": trainer.id, "message": "coach me"}))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: serde_json::Value = response.json();
        let request_id = body["data"]["id"].as_i64().unwrap();
        assert_eq!(body["data"]["status"], "pending");

        // A second pending request to the same trainer is rejected
        let duplicate = server
            .post("/api/v1/trainer-requests")
            .add_header(AUTHORIZATION, bearer(&athlete_token))
            .json(&serde_json::json!({"trainer_id": trainer.id}))
            .await;
        duplicate.assert_status(StatusCode::BAD_REQUEST);

        // Trainer approves
        let approve = server
            .put(&format!("/api/v1/trainer-requests/{request_id}/respond"))
            .add_header(AUTHORIZATION, bearer(&trainer_token))
            .json(&serde_json::json!({"approve": true}))
            .await;
        approve.assert_status(StatusCode::OK);
        let approve_body: serde_json::Value = approve.json();
        assert_eq!(approve_body["data"]["status"], "approved");
        assert!(!approve_body["data"]["responded_at"].is_null());

        // Exactly one active assignment was created
        let assignments = TrainerAssignment::find()
            .filter(trainer_assignment::Column::TrainerId.eq(trainer.id))
            .filter(trainer_assignment::Column::AthleteId.eq(athlete.id))
            .filter(trainer_assignment::Column::IsActive.eq(true))
            .all(&state.db)
            .await
            .unwrap();
        assert_eq!(assignments.len(), 1);

        // Responding again fails: the transition is terminal
        let again = server
            .put(&format!("/api/v1/trainer-requests/{request_id}/respond"))
            .add_header(AUTHORIZATION, bearer(&trainer_token))
            .json(&serde_json::json!({"approve": true}))
            .await;
        again.assert_status(StatusCode::BAD_REQUEST);

        // A new request while the assignment is active is also rejected
        let while_assigned = server
            .post("/api/v1/trainer-requests")
            .add_header(AUTHORIZATION, bearer(&athlete_token))
            .json(&serde_json::json!({"trainer_id": trainer.id}))
            .await;
        while_assigned.assert_status(StatusCode::BAD_REQUEST);
    }

    async fn create_assignment(
        state: &crate::schemas::AppState,
        trainer_id: i32,
        athlete_id: i32,
    ) {
        trainer_assignment::ActiveModel {
            trainer_id: Set(trainer_id),
            athlete_id: Set(athlete_id),
            assigned_at: Set(Utc::now()),
            is_active: Set(true),
            notes: Set(None),
            ..Default::default()
        }
        .insert(&state.db)
        .await
        .unwrap();
    }

    async fn create_ride_for(state: &crate::schemas::AppState, user_id: i32, title: &str) -> i32 {
        let now = Utc::now();
        ride::ActiveModel {
            user_id: Set(user_id),
            title: Set(title.to_string()),
            description: Set(None),
            distance_km: Set(42.0),
            duration_minutes: Set(90),
            ride_date: Set(now),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&state.db)
        .await
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn test_accessible_set_scopes_ride_visibility() {
        let (server, state) = setup_test_server().await;
        let athlete = create_user(&state.db, "athlete@example.com", UserRole::Athlete).await;
        let trainer = create_user(&state.db, "trainer@example.com", UserRole::Trainer).await;
        let stranger = create_user(&state.db, "stranger@example.com", UserRole::Athlete).await;

        let ride_id = create_ride_for(&state, athlete.id, "Morning Loop").await;
        create_ride_for(&state, stranger.id, "Other Ride").await;

        // Without an assignment the trainer sees only their own (zero) rides
        let trainer_token = login(&server, "trainer@example.com").await;
        let before: serde_json::Value = server
            .get("/api/v1/rides")
            .add_header(AUTHORIZATION, bearer(&trainer_token))
            .await
            .json();
        assert_eq!(before["data"].as_array().unwrap().len(), 0);

        create_assignment(&state, trainer.id, athlete.id).await;

        // With an active assignment the athlete's rides become visible
        let after: serde_json::Value = server
            .get("/api/v1/rides")
            .add_header(AUTHORIZATION, bearer(&trainer_token))
            .await
            .json();
        let titles: Vec<&str> = after["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, vec!["Morning Loop"]);

        // Reading another user's ride directly is a 404, not a 403
        let stranger_token = login(&server, "stranger@example.com").await;
        let hidden = server
            .get(&format!("/api/v1/rides/{ride_id}"))
            .add_header(AUTHORIZATION, bearer(&stranger_token))
            .await;
        hidden.assert_status(StatusCode::NOT_FOUND);

        // A trainer may read but not mutate an athlete's ride
        let update = server
            .put(&format!("/api/v1/rides/{ride_id}"))
            .add_header(AUTHORIZATION, bearer(&trainer_token))
            .json(&serde_json::json!({"title": "Hijacked"}))
            .await;
        update.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_plan_creation_requires_assignment() {
        let (server, state) = setup_test_server().await;
        let athlete = create_user(&state.db, "athlete@example.com", UserRole::Athlete).await;
        let trainer = create_user(&state.db, "trainer@example.com", UserRole::Trainer).await;
        let trainer_token = login(&server, "trainer@example.com").await;
        let athlete_token = login(&server, "athlete@example.com").await;

        // Athletes cannot create plans at all
        let forbidden = server
            .post("/api/v1/training-plans")
            .add_header(AUTHORIZATION, bearer(&athlete_token))
            .json(&serde_json::json!({"athlete_id": athlete.id, "title": "Self Plan"}))
            .await;
        forbidden.assert_status(StatusCode::FORBIDDEN);

        // A trainer without an assignment is also rejected
        let unassigned = server
            .post("/api/v1/training-plans")
            .add_header(AUTHORIZATION, bearer(&trainer_token))
            .json(&serde_json::json!({"athlete_id": athlete.id, "title": "Base Phase"}))
            .await;
        unassigned.assert_status(StatusCode::FORBIDDEN);

        create_assignment(&state, trainer.id, athlete.id).await;

        let created = server
            .post("/api/v1/training-plans")
            .add_header(AUTHORIZATION, bearer(&trainer_token))
            .json(&serde_json::json!({"athlete_id": athlete.id, "title": "Base Phase"}))
            .await;
        created.assert_status(StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_plan_visibility_and_athlete_narrow_update() {
        let (server, state) = setup_test_server().await;
        let athlete = create_user(&state.db, "athlete@example.com", UserRole::Athlete).await;
        let trainer = create_user(&state.db, "trainer@example.com", UserRole::Trainer).await;
        create_user(&state.db, "outsider@example.com", UserRole::Athlete).await;
        create_assignment(&state, trainer.id, athlete.id).await;

        let trainer_token = login(&server, "trainer@example.com").await;
        let athlete_token = login(&server, "athlete@example.com").await;
        let outsider_token = login(&server, "outsider@example.com").await;

        let plan: serde_json::Value = server
            .post("/api/v1/training-plans")
            .add_header(AUTHORIZATION, bearer(&trainer_token))
            .json(&serde_json::json!({"athlete_id": athlete.id, "title": "Build Phase"}))
            .await
            .json();
        let plan_id = plan["data"]["id"].as_i64().unwrap();

        let workout: serde_json::Value = server
            .post(&format!("/api/v1/training-plans/{plan_id}/workouts"))
            .add_header(AUTHORIZATION, bearer(&trainer_token))
            .json(&serde_json::json!({
                "title": "Threshold Intervals",
                "workout_type": "cycling",
                "scheduled_date": Utc::now(),
            }))
            .await
            .json();
        let workout_id = workout["data"]["id"].as_i64().unwrap();

        // Non-participants get 404, hiding the plan's existence
        let hidden = server
            .get(&format!("/api/v1/training-plans/{plan_id}"))
            .add_header(AUTHORIZATION, bearer(&outsider_token))
            .await;
        hidden.assert_status(StatusCode::NOT_FOUND);

        // The athlete can view it
        let visible = server
            .get(&format!("/api/v1/training-plans/{plan_id}"))
            .add_header(AUTHORIZATION, bearer(&athlete_token))
            .await;
        visible.assert_status(StatusCode::OK);

        // But cannot edit the plan itself
        let edit = server
            .put(&format!("/api/v1/training-plans/{plan_id}"))
            .add_header(AUTHORIZATION, bearer(&athlete_token))
            .json(&serde_json::json!({"title": "Renamed"}))
            .await;
        edit.assert_status(StatusCode::FORBIDDEN);

        // The athlete may mark a workout complete, but a title change in the
        // same call is silently ignored
        let narrow: serde_json::Value = server
            .put(&format!(
                "/api/v1/training-plans/{plan_id}/workouts/{workout_id}"
            ))
            .add_header(AUTHORIZATION, bearer(&athlete_token))
            .json(&serde_json::json!({"is_completed": true, "title": "Sneaky Rename"}))
            .await
            .json();
        assert_eq!(narrow["data"]["is_completed"], true);
        assert_eq!(narrow["data"]["title"], "Threshold Intervals");
        assert!(!narrow["data"]["completed_at"].is_null());
    }

    #[tokio::test]
    async fn test_plan_delete_cascades() {
        let (server, state) = setup_test_server().await;
        let athlete = create_user(&state.db, "athlete@example.com", UserRole::Athlete).await;
        let trainer = create_user(&state.db, "trainer@example.com", UserRole::Trainer).await;
        create_assignment(&state, trainer.id, athlete.id).await;
        let trainer_token = login(&server, "trainer@example.com").await;

        let plan: serde_json::Value = server
            .post("/api/v1/training-plans")
            .add_header(AUTHORIZATION, bearer(&trainer_token))
            .json(&serde_json::json!({"athlete_id": athlete.id, "title": "Doomed Plan"}))
            .await
            .json();
        let plan_id = plan["data"]["id"].as_i64().unwrap() as i32;

        server
            .post(&format!("/api/v1/training-plans/{plan_id}/goals"))
            .add_header(AUTHORIZATION, bearer(&trainer_token))
            .json(&serde_json::json!({"title": "FTP Goal", "goal_type": "power"}))
            .await
            .assert_status(StatusCode::CREATED);

        let deleted = server
            .delete(&format!("/api/v1/training-plans/{plan_id}"))
            .add_header(AUTHORIZATION, bearer(&trainer_token))
            .await;
        deleted.assert_status(StatusCode::NO_CONTENT);

        let orphans = PlannedGoal::find()
            .filter(model::entities::planned_goal::Column::TrainingPlanId.eq(plan_id))
            .all(&state.db)
            .await
            .unwrap();
        assert!(orphans.is_empty());
    }

    #[tokio::test]
    async fn test_plan_import_builds_schedule() {
        let (server, state) = setup_test_server().await;
        let athlete = create_user(&state.db, "athlete@example.com", UserRole::Athlete).await;
        let trainer = create_user(&state.db, "trainer@example.com", UserRole::Trainer).await;
        create_assignment(&state, trainer.id, athlete.id).await;
        let trainer_token = login(&server, "trainer@example.com").await;

        let start = chrono::DateTime::parse_from_rfc3339("2025-06-02T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);

        let imported: serde_json::Value = server
            .post("/api/v1/training-plans/import")
            .add_header(AUTHORIZATION, bearer(&trainer_token))
            .json(&serde_json::json!({
                "athlete_id": athlete.id,
                "start_date": start,
                "plan": {
                    "title": "8 Week Base",
                    "duration_weeks": 8,
                    "workouts": [
                        {"title": "Opener", "day_of_week": 1, "week": 1, "workout_type": "cycling"},
                        {"title": "Long Ride", "day_of_week": 7, "week": 2, "workout_type": "cycling"},
                    ],
                    "goals": [{"title": "Ride 100km", "goal_type": "endurance", "target_value": 100.0, "unit": "km"}],
                    "nutrition_guidance": [{"category": "general", "recommendation": "Eat more protein"}],
                }
            }))
            .await
            .json();
        let plan_id = imported["data"]["id"].as_i64().unwrap();
        assert_eq!(imported["data"]["title"], "8 Week Base");

        let detail: serde_json::Value = server
            .get(&format!("/api/v1/training-plans/{plan_id}"))
            .add_header(AUTHORIZATION, bearer(&trainer_token))
            .await
            .json();

        let workouts = detail["data"]["workouts"].as_array().unwrap();
        assert_eq!(workouts.len(), 2);
        // Week 1 day 1 is the start date; week 2 day 7 is 13 days later
        assert!(workouts[0]["scheduled_date"]
            .as_str()
            .unwrap()
            .starts_with("2025-06-02"));
        assert!(workouts[1]["scheduled_date"]
            .as_str()
            .unwrap()
            .starts_with("2025-06-15"));
        // End date is start + 8 weeks
        assert!(detail["data"]["end_date"]
            .as_str()
            .unwrap()
            .starts_with("2025-07-28"));
        assert_eq!(detail["data"]["goals"].as_array().unwrap().len(), 1);
        assert_eq!(detail["data"]["nutrition_plans"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_plan_import_rejects_invalid_data() {
        let (server, state) = setup_test_server().await;
        let athlete = create_user(&state.db, "athlete@example.com", UserRole::Athlete).await;
        let trainer = create_user(&state.db, "trainer@example.com", UserRole::Trainer).await;
        create_assignment(&state, trainer.id, athlete.id).await;
        let trainer_token = login(&server, "trainer@example.com").await;

        // Workout in week 9 of an 8-week plan
        let response = server
            .post("/api/v1/training-plans/import")
            .add_header(AUTHORIZATION, bearer(&trainer_token))
            .json(&serde_json::json!({
                "athlete_id": athlete.id,
                "start_date": Utc::now(),
                "plan": {
                    "title": "Broken",
                    "duration_weeks": 8,
                    "workouts": [{"title": "Ghost", "day_of_week": 1, "week": 9}],
                }
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        // Nothing was persisted
        let plans = TrainingPlan::find().all(&state.db).await.unwrap();
        assert!(plans.is_empty());
    }

    #[tokio::test]
    async fn test_admin_self_protection() {
        let (server, state) = setup_test_server().await;
        let admin = create_user(&state.db, "admin@example.com", UserRole::Admin).await;
        let admin_token = login(&server, "admin@example.com").await;

        // Demoting yourself as the only active, unlocked admin fails
        let demote = server
            .put(&format!("/api/v1/admin/users/{}/role", admin.id))
            .add_header(AUTHORIZATION, bearer(&admin_token))
            .json(&serde_json::json!({"role": "trainer"}))
            .await;
        demote.assert_status(StatusCode::BAD_REQUEST);

        // Self-lock is always rejected
        let lock = server
            .put(&format!("/api/v1/admin/users/{}/lock", admin.id))
            .add_header(AUTHORIZATION, bearer(&admin_token))
            .json(&serde_json::json!({"locked": true}))
            .await;
        lock.assert_status(StatusCode::BAD_REQUEST);

        // Self-deletion is always rejected
        let delete_self = server
            .delete(&format!("/api/v1/admin/users/{}", admin.id))
            .add_header(AUTHORIZATION, bearer(&admin_token))
            .await;
        delete_self.assert_status(StatusCode::BAD_REQUEST);

        // With a second active, unlocked admin the demotion goes through
        create_user(&state.db, "admin2@example.com", UserRole::Admin).await;
        let demote_again = server
            .put(&format!("/api/v1/admin/users/{}/role", admin.id))
            .add_header(AUTHORIZATION, bearer(&admin_token))
            .json(&serde_json::json!({"role": "trainer"}))
            .await;
        demote_again.assert_status(StatusCode::OK);
        let body: serde_json::Value = demote_again.json();
        assert_eq!(body["data"]["role"], "trainer");
    }

    #[tokio::test]
    async fn test_locked_admin_does_not_count_for_demotion() {
        let (server, state) = setup_test_server().await;
        let admin = create_user(&state.db, "admin@example.com", UserRole::Admin).await;
        // The other admin exists but is locked, so it cannot cover the demotion
        create_user_with_flags(&state.db, "locked-admin@example.com", UserRole::Admin, true, true)
            .await;
        let admin_token = login(&server, "admin@example.com").await;

        let demote = server
            .put(&format!("/api/v1/admin/users/{}/role", admin.id))
            .add_header(AUTHORIZATION, bearer(&admin_token))
            .json(&serde_json::json!({"role": "athlete"}))
            .await;
        demote.assert_status(StatusCode::BAD_REQUEST);

        // Deletion uses the is_active-only predicate, so the locked admin
        // *does* count there: deleting the locked admin is the last-admin case
        // seen from the other side
        let locked = model::entities::prelude::User::find()
            .filter(model::entities::user::Column::Email.eq("locked-admin@example.com"))
            .one(&state.db)
            .await
            .unwrap()
            .unwrap();
        let delete_locked = server
            .delete(&format!("/api/v1/admin/users/{}", locked.id))
            .add_header(AUTHORIZATION, bearer(&admin_token))
            .await;
        delete_locked.assert_status(StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_delete_last_admin_rejected() {
        let (server, state) = setup_test_server().await;
        // The caller is an admin whose account is inactive: it can still
        // authenticate, but does not count towards the active-admin total
        create_user_with_flags(
            &state.db,
            "retired-admin@example.com",
            UserRole::Admin,
            false,
            false,
        )
        .await;
        let target = create_user(&state.db, "admin@example.com", UserRole::Admin).await;
        let caller_token = login(&server, "retired-admin@example.com").await;

        // Deleting the only active admin is rejected
        let rejected = server
            .delete(&format!("/api/v1/admin/users/{}", target.id))
            .add_header(AUTHORIZATION, bearer(&caller_token))
            .await;
        rejected.assert_status(StatusCode::BAD_REQUEST);

        // Once another active admin exists, the deletion goes through
        create_user(&state.db, "admin2@example.com", UserRole::Admin).await;
        let allowed = server
            .delete(&format!("/api/v1/admin/users/{}", target.id))
            .add_header(AUTHORIZATION, bearer(&caller_token))
            .await;
        allowed.assert_status(StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_admin_surface_requires_admin_role() {
        let (server, state) = setup_test_server().await;
        create_user(&state.db, "trainer@example.com", UserRole::Trainer).await;
        let trainer_token = login(&server, "trainer@example.com").await;

        let response = server
            .get("/api/v1/admin/users")
            .add_header(AUTHORIZATION, bearer(&trainer_token))
            .await;
        response.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_admin_assignment_management() {
        let (server, state) = setup_test_server().await;
        create_user(&state.db, "admin@example.com", UserRole::Admin).await;
        let trainer = create_user(&state.db, "trainer@example.com", UserRole::Trainer).await;
        let athlete = create_user(&state.db, "athlete@example.com", UserRole::Athlete).await;
        let admin_token = login(&server, "admin@example.com").await;

        let created = server
            .post("/api/v1/admin/assignments")
            .add_header(AUTHORIZATION, bearer(&admin_token))
            .json(&serde_json::json!({"trainer_id": trainer.id, "athlete_id": athlete.id}))
            .await;
        created.assert_status(StatusCode::CREATED);

        // Duplicate active assignment is rejected
        let duplicate = server
            .post("/api/v1/admin/assignments")
            .add_header(AUTHORIZATION, bearer(&admin_token))
            .json(&serde_json::json!({"trainer_id": trainer.id, "athlete_id": athlete.id}))
            .await;
        duplicate.assert_status(StatusCode::BAD_REQUEST);

        // Assigning to a non-trainer is rejected
        let not_trainer = server
            .post("/api/v1/admin/assignments")
            .add_header(AUTHORIZATION, bearer(&admin_token))
            .json(&serde_json::json!({"trainer_id": athlete.id, "athlete_id": trainer.id}))
            .await;
        not_trainer.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_messaging_requires_active_assignment() {
        let (server, state) = setup_test_server().await;
        let athlete = create_user(&state.db, "athlete@example.com", UserRole::Athlete).await;
        let trainer = create_user(&state.db, "trainer@example.com", UserRole::Trainer).await;
        let athlete_token = login(&server, "athlete@example.com").await;
        let trainer_token = login(&server, "trainer@example.com").await;

        // No assignment yet: sending fails
        let forbidden = server
            .post("/api/v1/messages")
            .add_header(AUTHORIZATION, bearer(&athlete_token))
            .json(&serde_json::json!({"recipient_id": trainer.id, "content": "hello"}))
            .await;
        forbidden.assert_status(StatusCode::FORBIDDEN);

        create_assignment(&state, trainer.id, athlete.id).await;

        let sent = server
            .post("/api/v1/messages")
            .add_header(AUTHORIZATION, bearer(&athlete_token))
            .json(&serde_json::json!({"recipient_id": trainer.id, "content": "hello coach"}))
            .await;
        sent.assert_status(StatusCode::CREATED);

        // The trainer has one unread message
        let unread: serde_json::Value = server
            .get("/api/v1/messages/unread-count")
            .add_header(AUTHORIZATION, bearer(&trainer_token))
            .await
            .json();
        assert_eq!(unread["data"]["unread_count"], 1);

        // Reading the thread marks it read
        let thread: serde_json::Value = server
            .get(&format!("/api/v1/messages/with/{}", athlete.id))
            .add_header(AUTHORIZATION, bearer(&trainer_token))
            .await
            .json();
        assert_eq!(thread["data"].as_array().unwrap().len(), 1);

        let after: serde_json::Value = server
            .get("/api/v1/messages/unread-count")
            .add_header(AUTHORIZATION, bearer(&trainer_token))
            .await
            .json();
        assert_eq!(after["data"]["unread_count"], 0);

        // Conversations list the counterpart with the last message
        let conversations: serde_json::Value = server
            .get("/api/v1/messages/conversations")
            .add_header(AUTHORIZATION, bearer(&trainer_token))
            .await
            .json();
        let list = conversations["data"].as_array().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["user_id"], athlete.id);
        assert_eq!(list[0]["last_message"], "hello coach");
    }

    #[tokio::test]
    async fn test_messaging_to_unknown_recipient() {
        let (server, state) = setup_test_server().await;
        create_user(&state.db, "athlete@example.com", UserRole::Athlete).await;
        let token = login(&server, "athlete@example.com").await;

        let response = server
            .post("/api/v1/messages")
            .add_header(AUTHORIZATION, bearer(&token))
            .json(&serde_json::json!({"recipient_id": 9999, "content": "into the void"}))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_strava_endpoints_unconfigured() {
        let (server, state) = setup_test_server().await;
        create_user(&state.db, "athlete@example.com", UserRole::Athlete).await;
        let token = login(&server, "athlete@example.com").await;

        // No Strava credentials configured: connect reports 503
        let connect = server
            .get("/api/v1/integrations/strava/connect")
            .add_header(AUTHORIZATION, bearer(&token))
            .await;
        connect.assert_status(StatusCode::SERVICE_UNAVAILABLE);

        // Sync without a connected integration reports 400
        let sync = server
            .post("/api/v1/integrations/strava/sync")
            .add_header(AUTHORIZATION, bearer(&token))
            .await;
        sync.assert_status(StatusCode::BAD_REQUEST);

        // Status still works and shows a disconnected provider
        let status: serde_json::Value = server
            .get("/api/v1/integrations/status")
            .add_header(AUTHORIZATION, bearer(&token))
            .await
            .json();
        assert_eq!(status["data"][0]["provider"], "strava");
        assert_eq!(status["data"][0]["connected"], false);
    }

    #[tokio::test]
    async fn test_parse_document_unconfigured() {
        let (server, state) = setup_test_server().await;
        create_user(&state.db, "trainer@example.com", UserRole::Trainer).await;
        let token = login(&server, "trainer@example.com").await;

        let response = server
            .post("/api/v1/training-plans/parse-document")
            .add_header(AUTHORIZATION, bearer(&token))
            .multipart(
                axum_test::multipart::MultipartForm::new().add_part(
                    "file",
                    axum_test::multipart::Part::bytes("week 1: ride a lot".as_bytes().to_vec())
                        .file_name("plan.txt")
                        .mime_type("text/plain"),
                ),
            )
            .await;

        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_document_upload_validation() {
        let (server, state) = setup_test_server().await;
        let athlete = create_user(&state.db, "athlete@example.com", UserRole::Athlete).await;
        let trainer = create_user(&state.db, "trainer@example.com", UserRole::Trainer).await;
        create_assignment(&state, trainer.id, athlete.id).await;
        let trainer_token = login(&server, "trainer@example.com").await;

        let plan: serde_json::Value = server
            .post("/api/v1/training-plans")
            .add_header(AUTHORIZATION, bearer(&trainer_token))
            .json(&serde_json::json!({"athlete_id": athlete.id, "title": "Docs Plan"}))
            .await
            .json();
        let plan_id = plan["data"]["id"].as_i64().unwrap();

        // Disallowed extension
        let bad_ext = server
            .post(&format!("/api/v1/training-plans/{plan_id}/documents"))
            .add_header(AUTHORIZATION, bearer(&trainer_token))
            .multipart(
                axum_test::multipart::MultipartForm::new().add_part(
                    "file",
                    axum_test::multipart::Part::bytes(b"MZ".to_vec())
                        .file_name("malware.exe")
                        .mime_type("application/octet-stream"),
                ),
            )
            .await;
        bad_ext.assert_status(StatusCode::BAD_REQUEST);

        // A text document is accepted, stored, and downloadable
        let uploaded: serde_json::Value = server
            .post(&format!("/api/v1/training-plans/{plan_id}/documents"))
            .add_header(AUTHORIZATION, bearer(&trainer_token))
            .multipart(
                axum_test::multipart::MultipartForm::new().add_part(
                    "file",
                    axum_test::multipart::Part::bytes(b"week 1: easy spin".to_vec())
                        .file_name("notes.txt")
                        .mime_type("text/plain"),
                ),
            )
            .await
            .json();
        assert_eq!(uploaded["data"]["filename"], "notes.txt");
        let doc_id = uploaded["data"]["id"].as_i64().unwrap();

        let download = server
            .get(&format!(
                "/api/v1/training-plans/{plan_id}/documents/{doc_id}"
            ))
            .add_header(AUTHORIZATION, bearer(&trainer_token))
            .await;
        download.assert_status(StatusCode::OK);
        assert_eq!(download.as_bytes().as_ref(), b"week 1: easy spin");

        // Deleting the document always removes the record
        let deleted = server
            .delete(&format!(
                "/api/v1/training-plans/{plan_id}/documents/{doc_id}"
            ))
            .add_header(AUTHORIZATION, bearer(&trainer_token))
            .await;
        deleted.assert_status(StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_goal_completion_stamps_date() {
        let (server, state) = setup_test_server().await;
        create_user(&state.db, "athlete@example.com", UserRole::Athlete).await;
        let token = login(&server, "athlete@example.com").await;

        let goal: serde_json::Value = server
            .post("/api/v1/goals")
            .add_header(AUTHORIZATION, bearer(&token))
            .json(&serde_json::json!({"title": "Century", "goal_type": "distance", "target_value": 100.0, "unit": "km"}))
            .await
            .json();
        let goal_id = goal["data"]["id"].as_i64().unwrap();

        let updated: serde_json::Value = server
            .put(&format!("/api/v1/goals/{goal_id}"))
            .add_header(AUTHORIZATION, bearer(&token))
            .json(&serde_json::json!({"is_completed": true}))
            .await
            .json();
        assert_eq!(updated["data"]["is_completed"], true);
        assert!(!updated["data"]["completed_date"].is_null());
    }
}
