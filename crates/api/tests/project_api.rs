//! HTTP-level tests for categories, question sets and the project lifecycle.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, TestApp};
use intake_core::roles::{ROLE_ADMIN, ROLE_RPM};
use serde_json::{json, Value};
use sqlx::PgPool;
use uuid::Uuid;

struct Session {
    app: TestApp,
    admin: String,
    rpm: String,
    other_rpm: String,
}

fn session(pool: PgPool) -> Session {
    let app = TestApp::new(pool);
    Session {
        admin: app.token(Uuid::new_v4(), ROLE_ADMIN),
        rpm: app.token(Uuid::new_v4(), ROLE_RPM),
        other_rpm: app.token(Uuid::new_v4(), ROLE_RPM),
        app,
    }
}

/// Create a category with an active intake form through the API.
async fn film_category(s: &Session) -> String {
    let response = s
        .app
        .post_json("/api/v1/categories", &s.admin, json!({ "name": "Film Production" }))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = s
        .app
        .post_json(
            &format!("/api/v1/categories/{id}/question-sets"),
            &s.admin,
            json!({
                "questions": [
                    { "question_type": "SHORT_TEXT", "prompt": "Project Name", "required": true },
                    { "question_type": "SHORT_TEXT", "prompt": "Client Name" },
                    {
                        "question_type": "SINGLE_SELECT",
                        "prompt": "Budget Range",
                        "required": true,
                        "options": ["$5k - $10k", "$10k - $25k", "$25k+"]
                    },
                    { "question_type": "LONG_TEXT", "prompt": "Project Description" }
                ],
                "activate": true
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    id
}

async fn submit(s: &Session, category_id: &str) -> String {
    let response = s
        .app
        .post_json(
            "/api/v1/projects",
            &s.rpm,
            json!({
                "category_id": category_id,
                "answers": {
                    "q_project_name": "Spring Launch",
                    "q_client": "Acme Studios",
                    "q_budget": "$10k - $25k",
                    "q_description": "A short brand film"
                }
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string()
}

async fn data(response: axum::http::Response<axum::body::Body>) -> Value {
    body_json(response).await["data"].clone()
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn requests_without_token_are_unauthorized(pool: PgPool) {
    let s = session(pool);
    let response = s.app.send(Method::GET, "/api/v1/projects", None, None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn garbage_token_is_unauthorized(pool: PgPool) {
    let s = session(pool);
    let response = s.app.get("/api/v1/projects", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn producers_are_forbidden_from_admin_routes(pool: PgPool) {
    let s = session(pool);
    let category_id = film_category(&s).await;
    let id = submit(&s, &category_id).await;

    let review = s
        .app
        .post_json(
            &format!("/api/v1/projects/{id}/review"),
            &s.rpm,
            json!({ "decision": "APPROVED" }),
        )
        .await;
    assert_eq!(review.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(review).await["code"], "FORBIDDEN");

    let dashboard = s.app.get("/api/v1/admin/dashboard", &s.rpm).await;
    assert_eq!(dashboard.status(), StatusCode::FORBIDDEN);

    let category = s
        .app
        .post_json("/api/v1/categories", &s.rpm, json!({ "name": "Events" }))
        .await;
    assert_eq!(category.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn active_questions_include_date_placeholder(pool: PgPool) {
    let s = session(pool);
    let category_id = film_category(&s).await;

    let response = s
        .app
        .get(&format!("/api/v1/categories/{category_id}/questions"), &s.rpm)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let questions = data(response).await;
    let questions = questions.as_array().unwrap();
    assert_eq!(questions.len(), 5);
    let last = &questions[4];
    assert_eq!(last["id"], "q_date_fallback");
    assert_eq!(last["question_type"], "DATE");
    assert_eq!(last["ordering"], 5);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn questions_of_unknown_category_are_404(pool: PgPool) {
    let s = session(pool);
    let response = s
        .app
        .get(&format!("/api/v1/categories/{}/questions", Uuid::new_v4()), &s.rpm)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn activating_an_older_version_switches_back(pool: PgPool) {
    let s = session(pool);
    let category_id = film_category(&s).await;

    let sets = data(
        s.app
            .get(&format!("/api/v1/categories/{category_id}/question-sets"), &s.admin)
            .await,
    )
    .await;
    let first = sets[0]["id"].as_str().unwrap().to_string();

    let response = s
        .app
        .post_json(
            &format!("/api/v1/categories/{category_id}/question-sets"),
            &s.admin,
            json!({ "questions": [{ "question_type": "DATE", "prompt": "Event Date" }] }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let published = data(response).await;
    assert_eq!(published["version"], 2);
    assert_eq!(published["is_active"], true);
    assert_eq!(published["questions"].as_array().unwrap().len(), 1);

    let response = s
        .app
        .post(&format!("/api/v1/question-sets/{first}/activate"), &s.admin)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(data(response).await["is_active"], true);

    let questions = data(
        s.app
            .get(&format!("/api/v1/categories/{category_id}/questions"), &s.rpm)
            .await,
    )
    .await;
    assert_eq!(questions[0]["prompt"], "Project Name");
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn submission_round_trips_through_detail(pool: PgPool) {
    let s = session(pool);
    let category_id = film_category(&s).await;
    let id = submit(&s, &category_id).await;

    let response = s.app.get(&format!("/api/v1/projects/{id}"), &s.rpm).await;
    assert_eq!(response.status(), StatusCode::OK);

    let detail = data(response).await;
    assert_eq!(detail["name"], "Spring Launch");
    assert_eq!(detail["status"], "SUBMITTED");
    assert_eq!(detail["client"]["company_name"], "Acme Studios");
    assert_eq!(detail["commission"], 2000.0);
    let budget = detail["answers"]
        .as_array()
        .unwrap()
        .iter()
        .find(|a| a["prompt"] == "Budget Range")
        .expect("budget answer");
    assert_eq!(budget["value"], "$10k - $25k");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_required_answer_is_400(pool: PgPool) {
    let s = session(pool);
    let category_id = film_category(&s).await;

    let response = s
        .app
        .post_json(
            "/api/v1/projects",
            &s.rpm,
            json!({ "category_id": category_id, "answers": { "q_project_name": "No Budget" } }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"], "Please answer: Budget Range");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn other_producers_projects_are_hidden(pool: PgPool) {
    let s = session(pool);
    let category_id = film_category(&s).await;
    let id = submit(&s, &category_id).await;

    let response = s
        .app
        .get(&format!("/api/v1/projects/{id}"), &s.other_rpm)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let listed = data(s.app.get("/api/v1/projects", &s.other_rpm).await).await;
    assert!(listed.as_array().unwrap().is_empty());

    let listed = data(s.app.get("/api/v1/projects", &s.admin).await).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_filters_by_status(pool: PgPool) {
    let s = session(pool);
    let category_id = film_category(&s).await;
    submit(&s, &category_id).await;

    let submitted = data(s.app.get("/api/v1/projects?status=SUBMITTED", &s.admin).await).await;
    assert_eq!(submitted.as_array().unwrap().len(), 1);

    let drafts = data(s.app.get("/api/v1/projects?status=DRAFT", &s.admin).await).await;
    assert!(drafts.as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn change_request_resubmit_and_submit_cycle(pool: PgPool) {
    let s = session(pool);
    let category_id = film_category(&s).await;
    let id = submit(&s, &category_id).await;

    let response = s
        .app
        .post_json(
            &format!("/api/v1/projects/{id}/review"),
            &s.admin,
            json!({ "decision": "CHANGES_REQUESTED", "comments": "Confirm the budget" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let detail = data(s.app.get(&format!("/api/v1/projects/{id}"), &s.rpm).await).await;
    assert_eq!(detail["status"], "NEEDS_RPM_UPDATE");
    assert_eq!(detail["pending_feedback"]["comments"], "Confirm the budget");

    let response = s
        .app
        .put_json(
            &format!("/api/v1/projects/{id}"),
            &s.rpm,
            json!({ "answers": { "q_project_name": "Spring Launch", "q_budget": "$25k+" } }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(data(response).await["status"], "DRAFT");

    let response = s.app.post(&format!("/api/v1/projects/{id}/submit"), &s.rpm).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(data(response).await["status"], "SUBMITTED");

    // A second submit finds the project no longer in DRAFT.
    let response = s.app.post(&format!("/api/v1/projects/{id}/submit"), &s.rpm).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sow_flow_through_payment(pool: PgPool) {
    let s = session(pool);
    let category_id = film_category(&s).await;
    let id = submit(&s, &category_id).await;

    let response = s
        .app
        .post_json(
            &format!("/api/v1/projects/{id}/review"),
            &s.admin,
            json!({ "decision": "APPROVED" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = s.app.post(&format!("/api/v1/projects/{id}/sow"), &s.admin).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let sow = data(response).await;
    assert!(sow["body"].as_str().unwrap().contains("Spring Launch"));

    let again = s.app.post(&format!("/api/v1/projects/{id}/sow"), &s.admin).await;
    assert_eq!(again.status(), StatusCode::CONFLICT);

    let response = s
        .app
        .post_json(
            &format!("/api/v1/projects/{id}/sow/send"),
            &s.admin,
            json!({ "recipient_email": "client@example.com" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(data(response).await["status"], "PUBLISHED");

    for (action, status) in [
        ("CLIENT_APPROVE", "CLIENT_APPROVED"),
        ("START_PRODUCTION", "IN_PRODUCTION"),
    ] {
        let response = s
            .app
            .post_json(
                &format!("/api/v1/projects/{id}/advance"),
                &s.admin,
                json!({ "action": action }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(data(response).await["status"], status);
    }

    let response = s
        .app
        .post_json(
            &format!("/api/v1/projects/{id}/mark-paid"),
            &s.admin,
            json!({ "final_revenue": 15000.0 }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let paid = data(response).await;
    assert_eq!(paid["is_paid"], true);
    assert_eq!(paid["commission_paid"], 3000.0);

    let again = s
        .app
        .post_json(
            &format!("/api/v1/projects/{id}/mark-paid"),
            &s.admin,
            json!({ "final_revenue": 20000.0 }),
        )
        .await;
    assert_eq!(again.status(), StatusCode::CONFLICT);

    let commissions = data(s.app.get("/api/v1/commissions", &s.rpm).await).await;
    assert_eq!(commissions["summary"]["earned_total"], 3000.0);
    assert_eq!(commissions["summary"]["earned_count"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn advance_rejects_review_actions(pool: PgPool) {
    let s = session(pool);
    let category_id = film_category(&s).await;
    let id = submit(&s, &category_id).await;

    let response = s
        .app
        .post_json(
            &format!("/api/v1/projects/{id}/advance"),
            &s.admin,
            json!({ "action": "APPROVE" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_removes_project(pool: PgPool) {
    let s = session(pool);
    let category_id = film_category(&s).await;
    let id = submit(&s, &category_id).await;

    let response = s.app.delete(&format!("/api/v1/projects/{id}"), &s.rpm).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = s.app.get(&format!("/api/v1/projects/{id}"), &s.admin).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_dashboard_counts_pending_reviews(pool: PgPool) {
    let s = session(pool);
    let category_id = film_category(&s).await;
    submit(&s, &category_id).await;
    submit(&s, &category_id).await;

    let response = s.app.get("/api/v1/admin/dashboard", &s.admin).await;
    assert_eq!(response.status(), StatusCode::OK);
    let dashboard = data(response).await;
    assert_eq!(dashboard["pending_review"].as_array().unwrap().len(), 2);
}
