// tests/api_tests.rs

use questonauta::{config::Config, routes, state::AppState};
use sqlx::postgres::{PgPool, PgPoolOptions};

/// Helper function to spawn the app on a random port for testing.
/// Returns the base URL (e.g., "http://127.0.0.1:12345").
async fn spawn_app() -> String {
    // Note: For Postgres, you must have a running database.
    // We'll read from DATABASE_URL environment variable.
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await
        .expect("Failed to connect to Postgres for testing. Make sure DATABASE_URL is set.");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    let config = Config {
        database_url: database_url.clone(),
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600, // 10 minutes for tests
        rust_log: "error".to_string(),
        admin_email: None,
        admin_password: None,
        hugging_face_token: None,
        explanation_model: "mistralai/Mistral-7B-Instruct-v0.1".to_string(),
        billing_checkout_url: None,
        billing_webhook_secret: Some("test_webhook_secret".to_string()),
    };

    let state = AppState {
        pool,
        config,
        http: reqwest::Client::new(),
    };

    let app = routes::create_router(state);

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

async fn test_pool() -> PgPool {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await
        .expect("Failed to connect to test DB")
}

async fn seed_question(pool: &PgPool, disciplina: &str, assunto: &str) -> i64 {
    sqlx::query_scalar(
        r#"
        INSERT INTO questions
            (ano, banca, orgao, prova, disciplina, assunto,
             enunciado, comando, alternativas, resposta_correta, comentario)
        VALUES (2023, 'CESPE', 'Polícia Federal', 'Agente', $1, $2,
                'Enunciado de teste.', 'Julgue o item.', $3, 'Certo', 'Comentário oficial.')
        RETURNING id
        "#,
    )
    .bind(disciplina)
    .bind(assunto)
    .bind(serde_json::json!(["Certo", "Errado"]))
    .fetch_one(pool)
    .await
    .expect("Failed to seed question")
}

/// Registers and logs in a fresh user; returns (email, bearer token).
async fn register_and_login(client: &reqwest::Client, address: &str) -> (String, String) {
    let email = format!("u_{}@teste.dev", &uuid::Uuid::new_v4().to_string()[..8]);
    let password = "password123";

    let register = client
        .post(format!("{}/api/auth/register", address))
        .json(&serde_json::json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Register failed");
    assert_eq!(register.status().as_u16(), 201);

    let login: serde_json::Value = client
        .post(format!("{}/api/auth/login", address))
        .json(&serde_json::json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Login failed")
        .json()
        .await
        .expect("Failed to parse login json");

    let token = login["token"].as_str().expect("Token not found").to_string();
    (email, token)
}

#[tokio::test]
async fn unknown_route_is_404() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/random_path_that_does_not_exist", address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn register_rejects_invalid_email() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/auth/register", address))
        .json(&serde_json::json!({ "email": "not-an-email", "password": "password123" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn submitting_an_answer_requires_auth() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/questions/1/answer", address))
        .json(&serde_json::json!({ "answer": "Certo" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn answer_flow_grades_counts_and_unlocks() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let pool = test_pool().await;

    let question_id = seed_question(&pool, "Direito Penal", "Crimes contra a vida").await;
    let (_email, token) = register_and_login(&client, &address).await;

    // 1. Correct answer
    let result: serde_json::Value = client
        .post(format!("{}/api/questions/{}/answer", address, question_id))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "answer": "Certo" }))
        .send()
        .await
        .expect("Submit failed")
        .json()
        .await
        .expect("Failed to parse submit json");

    assert_eq!(result["correct"], true);
    assert_eq!(result["resposta_correta"], "Certo");
    assert_eq!(result["remaining_today"], 9);
    // First answer crosses the 'first answer' threshold.
    let unlocked = result["unlocked"].as_array().expect("unlocked missing");
    assert!(
        unlocked
            .iter()
            .any(|a| a["requirement_type"] == "total_answers" && a["requirement_value"] == 1)
    );

    // 2. Wrong answer still counts an attempt, awards nothing.
    let result: serde_json::Value = client
        .post(format!("{}/api/questions/{}/answer", address, question_id))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "answer": "Errado" }))
        .send()
        .await
        .expect("Submit failed")
        .json()
        .await
        .expect("Failed to parse submit json");

    assert_eq!(result["correct"], false);
    assert_eq!(result["remaining_today"], 8);

    // 3. Statistics reflect both attempts in one bucket.
    let stats: serde_json::Value = client
        .get(format!("{}/api/statistics/me", address))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Stats failed")
        .json()
        .await
        .expect("Failed to parse stats json");

    assert_eq!(stats["overall"]["total_answers"], 2);
    assert_eq!(stats["overall"]["total_correct"], 1);
    assert_eq!(stats["overall"]["disciplines_count"], 1);
    assert_eq!(stats["overall"]["subjects_count"], 1);

    // 4. Gamification profile: 10 points for the correct answer plus the
    // seeded rewards for 'first answer' (10) and '100 points' not yet.
    let gamification: serde_json::Value = client
        .get(format!("{}/api/gamification/me", address))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Gamification failed")
        .json()
        .await
        .expect("Failed to parse gamification json");

    assert_eq!(gamification["points"]["total_answers"], 2);
    assert_eq!(gamification["points"]["correct_answers"], 1);
    assert_eq!(gamification["points"]["streak_days"], 1);
    assert!(!gamification["unlocked"].as_array().unwrap().is_empty());

    // Locked achievements report clamped progress.
    for locked in gamification["locked"].as_array().unwrap() {
        let progress = locked["progress"].as_f64().unwrap();
        assert!((0.0..=1.0).contains(&progress));
    }

    // 5. Answer history for the question keeps both attempts.
    let history: serde_json::Value = client
        .get(format!("{}/api/questions/{}/answers", address, question_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("History failed")
        .json()
        .await
        .expect("Failed to parse history json");
    assert_eq!(history.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn free_user_is_blocked_after_ten_answers() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let pool = test_pool().await;

    let question_id = seed_question(&pool, "Português", "Crase").await;
    let (_email, token) = register_and_login(&client, &address).await;

    for i in 0..10 {
        let response = client
            .post(format!("{}/api/questions/{}/answer", address, question_id))
            .bearer_auth(&token)
            .json(&serde_json::json!({ "answer": "Certo" }))
            .send()
            .await
            .expect("Submit failed");
        assert_eq!(response.status().as_u16(), 200, "answer {} should pass", i);
    }

    let response = client
        .post(format!("{}/api/questions/{}/answer", address, question_id))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "answer": "Certo" }))
        .send()
        .await
        .expect("Submit failed");
    assert_eq!(response.status().as_u16(), 403);

    let status: serde_json::Value = client
        .get(format!("{}/api/subscription/me", address))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Status failed")
        .json()
        .await
        .expect("Failed to parse status json");
    assert_eq!(status["questions_answered_today"], 10);
    assert_eq!(status["remaining_today"], 0);
}

#[tokio::test]
async fn premium_user_has_no_daily_limit() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let pool = test_pool().await;

    let question_id = seed_question(&pool, "Informática", "Redes").await;
    let (email, token) = register_and_login(&client, &address).await;

    let user_id: i64 = sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
        .bind(&email)
        .fetch_one(&pool)
        .await
        .expect("User not found");

    // Promote via the billing webhook, as the collaborator would.
    let sync = client
        .post(format!("{}/api/subscription/sync", address))
        .header("x-webhook-token", "test_webhook_secret")
        .json(&serde_json::json!({
            "user_id": user_id,
            "subscribed": true,
            "subscription_tier": "premium",
            "subscription_end": null
        }))
        .send()
        .await
        .expect("Sync failed");
    assert_eq!(sync.status().as_u16(), 200);

    for _ in 0..12 {
        let result: serde_json::Value = client
            .post(format!("{}/api/questions/{}/answer", address, question_id))
            .bearer_auth(&token)
            .json(&serde_json::json!({ "answer": "Errado" }))
            .send()
            .await
            .expect("Submit failed")
            .json()
            .await
            .expect("Failed to parse submit json");
        assert_eq!(result["remaining_today"], -1);
    }

    let status: serde_json::Value = client
        .get(format!("{}/api/subscription/me", address))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Status failed")
        .json()
        .await
        .expect("Failed to parse status json");
    assert_eq!(status["subscription_tier"], "premium");
    assert_eq!(status["remaining_today"], -1);
}

#[tokio::test]
async fn webhook_sync_rejects_a_bad_token() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/subscription/sync", address))
        .header("x-webhook-token", "wrong_secret")
        .json(&serde_json::json!({
            "user_id": 1,
            "subscribed": true,
            "subscription_tier": "premium",
            "subscription_end": null
        }))
        .send()
        .await
        .expect("Sync request failed");

    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn fresh_user_gets_zero_state_statistics() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let (_email, token) = register_and_login(&client, &address).await;

    let stats: serde_json::Value = client
        .get(format!("{}/api/statistics/me", address))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Stats failed")
        .json()
        .await
        .expect("Failed to parse stats json");

    assert_eq!(stats["overall"]["total_answers"], 0);
    assert_eq!(stats["overall"]["accuracy"], 0.0);
    assert!(stats["weak_areas"].as_array().unwrap().is_empty());

    let gamification: serde_json::Value = client
        .get(format!("{}/api/gamification/me", address))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Gamification failed")
        .json()
        .await
        .expect("Failed to parse gamification json");

    // No points row yet: the zero profile, nothing unlocked.
    assert_eq!(gamification["points"]["total_points"], 0);
    assert!(gamification["unlocked"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn reporting_a_question_validates_and_persists() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let pool = test_pool().await;

    let question_id = seed_question(&pool, "Direito Constitucional", "Direitos fundamentais").await;
    let (_email, token) = register_and_login(&client, &address).await;

    // Anonymous callers cannot report.
    let response = client
        .post(format!("{}/api/questions/{}/report", address, question_id))
        .json(&serde_json::json!({
            "report_type": "erro_gabarito",
            "description": "A resposta correta deveria ser Errado."
        }))
        .send()
        .await
        .expect("Report failed");
    assert_eq!(response.status().as_u16(), 401);

    // Unknown category is rejected.
    let response = client
        .post(format!("{}/api/questions/{}/report", address, question_id))
        .bearer_auth(&token)
        .json(&serde_json::json!({
            "report_type": "erro_inexistente",
            "description": "texto"
        }))
        .send()
        .await
        .expect("Report failed");
    assert_eq!(response.status().as_u16(), 400);

    // A valid report is created and tied to the question.
    let response = client
        .post(format!("{}/api/questions/{}/report", address, question_id))
        .bearer_auth(&token)
        .json(&serde_json::json!({
            "report_type": "erro_gabarito",
            "description": "A resposta correta deveria ser Errado."
        }))
        .send()
        .await
        .expect("Report failed");
    assert_eq!(response.status().as_u16(), 201);

    let body: serde_json::Value = response.json().await.expect("Failed to parse report json");
    let report_id = body["id"].as_i64().expect("Report id missing");

    let (stored_question, stored_type): (i64, String) = sqlx::query_as(
        "SELECT question_id, report_type FROM question_reports WHERE id = $1",
    )
    .bind(report_id)
    .fetch_one(&pool)
    .await
    .expect("Report not stored");
    assert_eq!(stored_question, question_id);
    assert_eq!(stored_type, "erro_gabarito");

    // Reporting a missing question is a 404.
    let response = client
        .post(format!("{}/api/questions/999999999/report", address))
        .bearer_auth(&token)
        .json(&serde_json::json!({
            "report_type": "outros",
            "description": "Questão não abre."
        }))
        .send()
        .await
        .expect("Report failed");
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn study_suggestions_reflect_weak_performance() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let pool = test_pool().await;

    // Seeded exam weights are public.
    let stats: serde_json::Value = client
        .get(format!("{}/api/suggestions/exam-statistics", address))
        .send()
        .await
        .expect("Exam statistics failed")
        .json()
        .await
        .expect("Failed to parse exam statistics json");
    let stats = stats.as_array().expect("expected array");
    assert!(!stats.is_empty());
    assert!(stats.iter().any(|s| s["priority_level"] == "alta"));

    let (_email, token) = register_and_login(&client, &address).await;

    // A fresh user is pointed at the high-priority exam subjects.
    let suggestions: serde_json::Value = client
        .get(format!("{}/api/suggestions/me", address))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Suggestions failed")
        .json()
        .await
        .expect("Failed to parse suggestions json");
    assert!(
        suggestions
            .as_array()
            .unwrap()
            .iter()
            .any(|s| s["suggestion_type"] == "high_priority")
    );

    // Three wrong answers in one subject turn it into a weak area.
    let marker = format!("Disciplina-{}", &uuid::Uuid::new_v4().to_string()[..8]);
    let question_id = seed_question(&pool, &marker, "Assunto Fraco").await;
    for _ in 0..3 {
        let response = client
            .post(format!("{}/api/questions/{}/answer", address, question_id))
            .bearer_auth(&token)
            .json(&serde_json::json!({ "answer": "Errado" }))
            .send()
            .await
            .expect("Submit failed");
        assert_eq!(response.status().as_u16(), 200);
    }

    let suggestions: serde_json::Value = client
        .get(format!("{}/api/suggestions/me", address))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Suggestions failed")
        .json()
        .await
        .expect("Failed to parse suggestions json");
    let weak = suggestions
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["disciplina"] == marker.as_str())
        .expect("Weak subject missing from suggestions");
    assert_eq!(weak["suggestion_type"], "weak_area");
    assert!(weak["priority_score"].as_i64().unwrap() > 0);
    assert!(weak["reason"].as_str().unwrap().contains("3 questões"));
}

#[tokio::test]
async fn ranking_is_public_and_marks_anonymous_callers_unranked() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/api/gamification/ranking", address))
        .send()
        .await
        .expect("Ranking failed");
    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.expect("Failed to parse ranking json");
    assert_eq!(body["my_position"], 0);
    assert!(body["ranking"].is_array());

    // An authenticated caller gets the same list plus a position field.
    let (_email, token) = register_and_login(&client, &address).await;
    let body: serde_json::Value = client
        .get(format!("{}/api/gamification/ranking", address))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Ranking failed")
        .json()
        .await
        .expect("Failed to parse ranking json");
    assert!(body["my_position"].as_u64().is_some());
}

#[tokio::test]
async fn question_listing_filters_by_discipline() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let pool = test_pool().await;

    let marker = format!("Disciplina-{}", &uuid::Uuid::new_v4().to_string()[..8]);
    seed_question(&pool, &marker, "Assunto Único").await;

    let listed: serde_json::Value = client
        .get(format!("{}/api/questions?disciplina={}", address, marker))
        .send()
        .await
        .expect("List failed")
        .json()
        .await
        .expect("Failed to parse list json");

    let questions = listed.as_array().expect("expected array");
    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0]["disciplina"], marker.as_str());
    // The answer key must never leak to clients.
    assert!(questions[0].get("resposta_correta").is_none());
    assert!(questions[0].get("comentario").is_none());
}
