//! `GET /` - echoes the current request's execution id

use axum::{extract::State, Json};
use serde::Serialize;

use crate::{error::AppError, state::AppState, Result};

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionIdResponse {
    pub execution_id: String,
}

pub async fn root(State(state): State<AppState>) -> Result<Json<ExecutionIdResponse>> {
    let execution_id = state
        .context
        .get_execution_id()
        .ok_or(AppError::ContextNotFound)?;

    Ok(Json(ExecutionIdResponse { execution_id }))
}
