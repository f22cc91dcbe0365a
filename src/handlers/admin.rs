// src/handlers/admin.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::PgPool;
use validator::Validate;

use crate::{
    error::AppError,
    models::{question::CreateQuestionRequest, user::User},
    utils::html::clean_html,
};

/// Lists all users in the system.
/// Admin only.
pub async fn list_users(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, password, full_name, role, created_at
        FROM users
        ORDER BY id DESC
        "#,
    )
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to list users: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(users))
}

/// Creates a new question.
/// Admin only. Free-text fields are HTML-sanitized before storage.
pub async fn create_question(
    State(pool): State<PgPool>,
    Json(payload): Json<CreateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO questions
            (ano, banca, orgao, prova, disciplina, assunto,
             enunciado, comando, alternativas, resposta_correta, comentario)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING id
        "#,
    )
    .bind(payload.ano)
    .bind(&payload.banca)
    .bind(&payload.orgao)
    .bind(&payload.prova)
    .bind(&payload.disciplina)
    .bind(&payload.assunto)
    .bind(payload.enunciado.as_deref().map(clean_html))
    .bind(clean_html(&payload.comando))
    .bind(sqlx::types::Json(&payload.alternativas))
    .bind(&payload.resposta_correta)
    .bind(clean_html(&payload.comentario))
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create question: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok((StatusCode::CREATED, Json(serde_json::json!({ "id": id }))))
}

/// Replaces a question's content.
/// Admin only.
pub async fn update_question(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
    Json(payload): Json<CreateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let result = sqlx::query(
        r#"
        UPDATE questions SET
            ano = $1, banca = $2, orgao = $3, prova = $4,
            disciplina = $5, assunto = $6, enunciado = $7, comando = $8,
            alternativas = $9, resposta_correta = $10, comentario = $11,
            updated_at = now()
        WHERE id = $12
        "#,
    )
    .bind(payload.ano)
    .bind(&payload.banca)
    .bind(&payload.orgao)
    .bind(&payload.prova)
    .bind(&payload.disciplina)
    .bind(&payload.assunto)
    .bind(payload.enunciado.as_deref().map(clean_html))
    .bind(clean_html(&payload.comando))
    .bind(sqlx::types::Json(&payload.alternativas))
    .bind(&payload.resposta_correta)
    .bind(clean_html(&payload.comentario))
    .bind(id)
    .execute(&pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Question not found".to_string()));
    }

    Ok(Json(serde_json::json!({ "updated": true })))
}

/// Deletes a question along with its answer history (cascade).
/// Admin only.
pub async fn delete_question(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM questions WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Question not found".to_string()));
    }

    Ok(Json(serde_json::json!({ "deleted": true })))
}
