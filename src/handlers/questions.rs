// src/handlers/questions.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    error::AppError,
    models::question::{PublicQuestion, Question, QuestionListParams},
};

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 200;

const QUESTION_COLUMNS: &str = "id, ano, banca, orgao, prova, disciplina, assunto, \
     enunciado, comando, alternativas, resposta_correta, comentario, created_at";

/// Lists questions, newest first, with optional filters.
///
/// `search` matches enunciado, comando, disciplina and assunto
/// (case-insensitive substring). The remaining filters are equality
/// lists given as comma-separated values.
pub async fn list_questions(
    State(pool): State<PgPool>,
    Query(params): Query<QuestionListParams>,
) -> Result<impl IntoResponse, AppError> {
    let mut qb = QueryBuilder::<Postgres>::new(format!(
        "SELECT {QUESTION_COLUMNS} FROM questions WHERE TRUE"
    ));

    if let Some(search) = params.search.as_deref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        qb.push(" AND (comando ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR enunciado ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR disciplina ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR assunto ILIKE ")
            .push_bind(pattern)
            .push(")");
    }

    if let Some(anos) = csv_ints(params.ano.as_deref()) {
        qb.push(" AND ano = ANY(").push_bind(anos).push(")");
    }
    push_text_filter(&mut qb, "banca", params.banca.as_deref());
    push_text_filter(&mut qb, "disciplina", params.disciplina.as_deref());
    push_text_filter(&mut qb, "assunto", params.assunto.as_deref());
    push_text_filter(&mut qb, "orgao", params.orgao.as_deref());

    let limit = params.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    qb.push(" ORDER BY created_at DESC, id DESC LIMIT ")
        .push_bind(limit);

    let questions: Vec<Question> = qb.build_query_as().fetch_all(&pool).await.map_err(|e| {
        tracing::error!("Failed to list questions: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    let public: Vec<PublicQuestion> = questions.into_iter().map(PublicQuestion::from).collect();
    Ok(Json(public))
}

/// Fetches a single question, without the answer key.
pub async fn get_question(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let question = fetch_question(&pool, id).await?;
    Ok(Json(PublicQuestion::from(question)))
}

/// Shared lookup used by the answer and explanation handlers.
pub async fn fetch_question(pool: &PgPool, id: i64) -> Result<Question, AppError> {
    sqlx::query_as::<_, Question>(&format!(
        "SELECT {QUESTION_COLUMNS} FROM questions WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("Question not found".to_string()))
}

fn push_text_filter(qb: &mut QueryBuilder<'_, Postgres>, column: &str, raw: Option<&str>) {
    if let Some(values) = csv_strings(raw) {
        qb.push(format!(" AND {column} = ANY("))
            .push_bind(values)
            .push(")");
    }
}

fn csv_strings(raw: Option<&str>) -> Option<Vec<String>> {
    let values: Vec<String> = raw?
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect();
    (!values.is_empty()).then_some(values)
}

fn csv_ints(raw: Option<&str>) -> Option<Vec<i32>> {
    let values: Vec<i32> = raw?
        .split(',')
        .filter_map(|v| v.trim().parse().ok())
        .collect();
    (!values.is_empty()).then_some(values)
}
