// src/handlers/explanation.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde_json::json;

use crate::{
    error::AppError,
    handlers::questions::fetch_question,
    models::question::Question,
    state::AppState,
    utils::jwt::Claims,
};

const INFERENCE_BASE_URL: &str = "https://api-inference.huggingface.co/models";

/// Generates a didactic explanation for a question via the text-generation
/// collaborator (Hugging Face inference API).
///
/// The collaborator's output is an opaque string; the only contract is
/// "non-empty on success". Failures surface as 502 and change nothing.
pub async fn generate_explanation(
    State(state): State<AppState>,
    Extension(_claims): Extension<Claims>,
    Path(question_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let token = state
        .config
        .hugging_face_token
        .as_deref()
        .ok_or_else(|| {
            AppError::Upstream("Text-generation collaborator is not configured".to_string())
        })?;

    let question = fetch_question(&state.pool, question_id).await?;
    let prompt = build_prompt(&question);

    tracing::debug!(question_id, "Requesting generated explanation");

    let response = state
        .http
        .post(format!(
            "{INFERENCE_BASE_URL}/{}",
            state.config.explanation_model
        ))
        .bearer_auth(token)
        .json(&json!({
            "inputs": prompt,
            "parameters": {
                "max_new_tokens": 1000,
                "temperature": 0.7,
                "top_p": 0.9,
                "do_sample": true,
            },
        }))
        .send()
        .await?
        .error_for_status()?;

    let body: serde_json::Value = response.json().await?;
    let generated = body
        .get(0)
        .and_then(|entry| entry.get("generated_text"))
        .and_then(|text| text.as_str())
        .ok_or_else(|| {
            AppError::Upstream("Unexpected response shape from text generation".to_string())
        })?;

    let explanation = strip_prompt(generated, &prompt);
    if explanation.is_empty() {
        return Err(AppError::Upstream(
            "Text generation returned an empty explanation".to_string(),
        ));
    }

    Ok(Json(json!({ "explanation": explanation })))
}

/// Builds the pt-BR prompt asking for a structured, didactic explanation.
fn build_prompt(question: &Question) -> String {
    format!(
        "Como um especialista em {disciplina}, especificamente em {assunto}, \
explique detalhadamente a seguinte questão de concurso:\n\n\
QUESTÃO: {enunciado}\n\
COMANDO: {comando}\n\
ALTERNATIVAS: {alternativas}\n\
RESPOSTA CORRETA: {resposta}\n\
COMENTÁRIO OFICIAL: {comentario}\n\n\
Por favor, forneça uma explicação didática e detalhada que inclua:\n\n\
1. CONCEITO PRINCIPAL: Explique o conceito fundamental abordado na questão\n\
2. ANÁLISE DA QUESTÃO: Analise por que a resposta correta está certa e por que as outras estão erradas\n\
3. EXEMPLOS PRÁTICOS: Dê exemplos relacionados ao tema para facilitar o entendimento\n\
4. DICAS DE ESTUDO: Sugira pontos importantes para estudar sobre este assunto\n\n\
Responda de forma clara, didática e estruturada, como se estivesse ensinando para um estudante.",
        disciplina = question.disciplina,
        assunto = question.assunto,
        enunciado = question.enunciado.as_deref().unwrap_or(""),
        comando = question.comando,
        alternativas = question.alternativas.join("; "),
        resposta = question.resposta_correta,
        comentario = question.comentario,
    )
}

/// Completion models echo the prompt before the generated text; keep
/// only the explanation itself.
fn strip_prompt<'a>(generated: &'a str, prompt: &str) -> &'a str {
    generated.strip_prefix(prompt).unwrap_or(generated).trim()
}
