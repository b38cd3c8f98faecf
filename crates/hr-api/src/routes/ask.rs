//! Conversational question endpoint.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use hr_core::agent::{EMPLOYEE_NOT_FOUND, MISSING_IDENTIFIER};
use hr_core::{EmailDraft, EmployeeDirectory, Selector, TurnAction};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Request body for asking a question.
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub employee_id: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    /// Omit to start a new session; the generated id is returned.
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub success: bool,
    pub session_id: String,
    pub answer: String,
    pub intent: &'static str,
    pub action: TurnAction,
    pub raw_data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub w2_download_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_draft: Option<EmailDraft>,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// POST /api/ask: answer one turn of a conversation.
pub async fn ask(
    State(state): State<AppState>,
    Json(req): Json<AskRequest>,
) -> ApiResult<Json<AskResponse>> {
    let question = non_blank(req.question.as_deref())
        .ok_or_else(|| ApiError::BadRequest("question is required".into()))?;
    let selector = Selector::from_parts(
        non_blank(req.employee_id.as_deref()),
        non_blank(req.first_name.as_deref()),
    )
    .ok_or_else(|| ApiError::BadRequest(MISSING_IDENTIFIER.into()))?;

    let employee = state
        .store
        .find(&selector)
        .await
        .ok_or_else(|| ApiError::NotFound(EMPLOYEE_NOT_FOUND.into()))?;

    let session_id = non_blank(req.session_id.as_deref())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::now_v7().to_string());

    let session = state.session(&session_id).await;
    let reply = {
        let mut session = session.lock().await;
        state
            .conversation
            .handle_turn(question, Some(&selector), &mut session)
            .await
    };
    state.release_if_idle(&session_id).await;

    tracing::debug!(
        session_id = %session_id,
        selector = %selector,
        intent = reply.intent,
        action = ?reply.action,
        "turn handled"
    );

    let w2_download_url = reply.w2_document.as_ref().map(|_| {
        let identifier = employee
            .id()
            .unwrap_or_else(|| employee.display_name())
            .to_string();
        format!("/api/download-w2/{identifier}")
    });

    Ok(Json(AskResponse {
        success: !reply.is_error(),
        session_id,
        answer: reply.text,
        intent: reply.intent,
        action: reply.action,
        raw_data: reply.raw_data,
        w2_download_url,
        email_draft: reply.email_draft,
    }))
}
