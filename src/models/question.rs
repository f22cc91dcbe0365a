// src/models/question.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};
use validator::Validate;

/// Represents the 'questions' table in the database.
///
/// Field names follow the exam-board vocabulary used throughout the product
/// (banca = examining board, orgao = hiring agency, comando = question stem).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,

    /// Year of the original exam.
    pub ano: i32,

    /// Examining board (e.g., 'CESPE/CEBRASPE').
    pub banca: String,

    /// Hiring agency (e.g., 'Polícia Federal').
    pub orgao: String,

    /// Exam/position label (e.g., 'Agente').
    pub prova: String,

    /// Top-level subject category.
    pub disciplina: String,

    /// Sub-category (assunto) within the discipline.
    pub assunto: String,

    /// Supporting text preceding the stem, when present.
    pub enunciado: Option<String>,

    /// The question stem itself.
    pub comando: String,

    /// Answer options. Stored as a JSON array in the database.
    pub alternativas: Json<Vec<String>>,

    /// The correct option, matched by strict string equality on submission.
    pub resposta_correta: String,

    /// Official commentary shown after answering.
    pub comentario: String,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for sending a question to the client (excludes answer and commentary).
#[derive(Debug, Serialize)]
pub struct PublicQuestion {
    pub id: i64,
    pub ano: i32,
    pub banca: String,
    pub orgao: String,
    pub prova: String,
    pub disciplina: String,
    pub assunto: String,
    pub enunciado: Option<String>,
    pub comando: String,
    pub alternativas: Json<Vec<String>>,
}

impl From<Question> for PublicQuestion {
    fn from(q: Question) -> Self {
        PublicQuestion {
            id: q.id,
            ano: q.ano,
            banca: q.banca,
            orgao: q.orgao,
            prova: q.prova,
            disciplina: q.disciplina,
            assunto: q.assunto,
            enunciado: q.enunciado,
            comando: q.comando,
            alternativas: q.alternativas,
        }
    }
}

/// Query parameters for listing questions.
/// List-valued filters accept comma-separated values (e.g. `?ano=2021,2023`).
#[derive(Debug, Deserialize, Default)]
pub struct QuestionListParams {
    pub search: Option<String>,
    pub ano: Option<String>,
    pub banca: Option<String>,
    pub disciplina: Option<String>,
    pub assunto: Option<String>,
    pub orgao: Option<String>,
    pub limit: Option<i64>,
}

/// DTO for creating or replacing a question (admin).
#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    #[validate(range(min = 1990, max = 2100))]
    pub ano: i32,
    #[validate(length(min = 1, max = 100))]
    pub banca: String,
    #[validate(length(min = 1, max = 100))]
    pub orgao: String,
    #[validate(length(min = 1, max = 100))]
    pub prova: String,
    #[validate(length(min = 1, max = 100))]
    pub disciplina: String,
    #[validate(length(min = 1, max = 100))]
    pub assunto: String,
    #[validate(length(max = 5000))]
    pub enunciado: Option<String>,
    #[validate(length(min = 1, max = 5000))]
    pub comando: String,
    #[validate(custom(function = validate_alternativas))]
    pub alternativas: Vec<String>,
    #[validate(length(min = 1, max = 500))]
    pub resposta_correta: String,
    #[validate(length(min = 1, max = 10000))]
    pub comentario: String,
}

fn validate_alternativas(alternativas: &[String]) -> Result<(), validator::ValidationError> {
    if alternativas.len() < 2 {
        return Err(validator::ValidationError::new("at_least_two_alternatives"));
    }
    for alt in alternativas {
        if alt.is_empty() || alt.len() > 500 {
            return Err(validator::ValidationError::new("alternative_length"));
        }
    }
    Ok(())
}
