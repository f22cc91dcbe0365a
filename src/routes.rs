// src/routes.rs

use std::sync::Arc;

use axum::{
    Router, http::Method, middleware,
    routing::{delete, get, post, put},
};
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::GlobalKeyExtractor,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{
        admin, answers, auth, explanation, gamification, questions, reports, statistics,
        subscription, suggestions,
    },
    state::AppState,
    utils::jwt::{admin_middleware, auth_middleware, optional_auth_middleware},
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, questions, statistics, gamification,
///   suggestions, subscription, admin).
/// * Applies global middleware (Trace, CORS) and a rate limit on the
///   expensive text-generation route.
/// * Injects global state (pool, config, HTTP client).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:3000".parse().unwrap(),
        "http://127.0.0.1:3000".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    // Text generation is the one costly upstream call; throttle it
    // service-wide instead of per-IP.
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(2)
            .burst_size(5)
            .key_extractor(GlobalKeyExtractor)
            .finish()
            .expect("invalid governor configuration"),
    );

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    let question_routes = Router::new()
        .route("/", get(questions::list_questions))
        .route("/{id}", get(questions::get_question))
        // Protected question routes
        .merge(
            Router::new()
                .route("/{id}/answer", post(answers::submit_answer))
                .route("/{id}/answers", get(answers::answer_history))
                .route("/{id}/report", post(reports::report_question))
                .merge(
                    Router::new()
                        .route("/{id}/explanation", post(explanation::generate_explanation))
                        .layer(GovernorLayer::new(governor_conf)),
                )
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    auth_middleware,
                )),
        );

    let statistics_routes = Router::new()
        .route("/me", get(statistics::my_statistics))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let gamification_routes = Router::new()
        .route("/me", get(gamification::my_gamification))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        // Ranking is public; a valid token only adds the caller's position.
        .merge(
            Router::new()
                .route("/ranking", get(gamification::ranking))
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    optional_auth_middleware,
                )),
        );

    let suggestion_routes = Router::new()
        .route("/me", get(suggestions::my_suggestions))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .route("/exam-statistics", get(suggestions::exam_statistics));

    let subscription_routes = Router::new()
        .route("/me", get(subscription::my_subscription))
        .route("/checkout", post(subscription::create_checkout))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        // Webhook: authenticated by shared secret, not by user JWT.
        .route("/sync", post(subscription::sync_subscription));

    let admin_routes = Router::new()
        .route("/users", get(admin::list_users))
        .route("/reports", get(reports::list_reports))
        .route("/questions", post(admin::create_question))
        .route(
            "/questions/{id}",
            put(admin::update_question).delete(admin::delete_question),
        )
        // Double middleware protection: Auth first, then Admin check
        .layer(middleware::from_fn(admin_middleware))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/questions", question_routes)
        .nest("/api/statistics", statistics_routes)
        .nest("/api/gamification", gamification_routes)
        .nest("/api/suggestions", suggestion_routes)
        .nest("/api/subscription", subscription_routes)
        .nest("/api/admin", admin_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
