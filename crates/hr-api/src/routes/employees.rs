//! Employee record endpoints.

use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use hr_core::composer::describe_updates;
use hr_core::{Employee, EmployeeDirectory, Field, FieldUpdates, FieldValue, Selector};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Resolve a path identifier to an employee record.
pub(crate) async fn lookup(state: &AppState, identifier: &str) -> ApiResult<Employee> {
    let selector = Selector::from_identifier(identifier)
        .ok_or_else(|| ApiError::BadRequest("employee identifier is required".into()))?;
    state
        .store
        .find(&selector)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("employee '{identifier}' not found")))
}

/// GET /api/employees/{identifier}: the full record.
pub async fn get_employee(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> ApiResult<Json<Value>> {
    let employee = lookup(&state, &identifier).await?;
    Ok(Json(employee.to_json()))
}

/// Request body for a direct field update.
#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    /// Field name or alias ("address", "pto", "bonus", ...).
    pub field: String,
    pub value: Value,
}

#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub success: bool,
    pub message: String,
}

fn field_value(value: Value) -> ApiResult<FieldValue> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Ok(FieldValue::Text(s.trim().to_string())),
        Value::Bool(b) => Ok(FieldValue::Flag(b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Ok(FieldValue::Integer(i)),
            None => n
                .as_f64()
                .map(FieldValue::Decimal)
                .ok_or_else(|| ApiError::BadRequest(format!("unsupported number {n}"))),
        },
        other => Err(ApiError::BadRequest(format!("unsupported value {other}"))),
    }
}

/// POST /api/employees/{identifier}/update: set one field directly.
pub async fn update_employee(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
    Json(req): Json<UpdateRequest>,
) -> ApiResult<Json<UpdateResponse>> {
    let field = Field::from_alias(&req.field)
        .ok_or_else(|| ApiError::BadRequest(format!("unknown field '{}'", req.field)))?;
    if matches!(field, Field::Id | Field::FirstName) {
        return Err(ApiError::BadRequest(format!(
            "field '{}' cannot be changed",
            req.field
        )));
    }
    let value = field_value(req.value)?;

    let employee = lookup(&state, &identifier).await?;
    let updates = FieldUpdates::new().with(field, value);
    state.store.update(&employee.selector(), &updates).await?;

    Ok(Json(UpdateResponse {
        success: true,
        message: format!(
            "Successfully updated {} for {}.",
            describe_updates(&employee, &updates),
            employee.display_name()
        ),
    }))
}
