// src/config.rs

use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub rust_log: String,

    /// Optional admin account seeded at startup.
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,

    /// Hugging Face inference API token for generated explanations.
    /// When absent, the explanation endpoint reports the collaborator
    /// as unavailable instead of failing at startup.
    pub hugging_face_token: Option<String>,
    /// Model called for explanations.
    pub explanation_model: String,

    /// Billing collaborator endpoint that creates checkout sessions.
    pub billing_checkout_url: Option<String>,
    /// Shared secret expected on billing webhook calls.
    pub billing_webhook_secret: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");

        let jwt_expiration = env::var("JWT_EXPIRATION")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(86400);

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let explanation_model = env::var("EXPLANATION_MODEL")
            .unwrap_or_else(|_| "mistralai/Mistral-7B-Instruct-v0.1".to_string());

        Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            rust_log,
            admin_email: env::var("ADMIN_EMAIL").ok(),
            admin_password: env::var("ADMIN_PASSWORD").ok(),
            hugging_face_token: env::var("HUGGING_FACE_TOKEN").ok(),
            explanation_model,
            billing_checkout_url: env::var("BILLING_CHECKOUT_URL").ok(),
            billing_webhook_secret: env::var("BILLING_WEBHOOK_SECRET").ok(),
        }
    }
}
