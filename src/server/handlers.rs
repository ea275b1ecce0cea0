use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use tracing::info;

use super::auth::Identity;
use super::errors::ApiError;
use super::AppState;
use crate::types::{
    FunctionCall, FunctionDefinition, FunctionList, FunctionResponse, ToolCallRequest,
    ToolResponse,
};

#[derive(Debug, Deserialize)]
pub struct ExecuteRequest {
    pub text: String,
}

pub async fn list_functions(State(state): State<AppState>) -> Json<FunctionList> {
    Json(FunctionList {
        functions: state.executor.registry().list_function_definitions(),
    })
}

pub async fn get_function(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<FunctionDefinition>, ApiError> {
    state
        .executor
        .registry()
        .get_function_definition(&name)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Function '{}' not found", name)))
}

pub async fn call_function(
    State(state): State<AppState>,
    Extension(Identity(user)): Extension<Identity>,
    Json(call): Json<FunctionCall>,
) -> Result<Json<FunctionResponse>, ApiError> {
    info!(%user, function = %call.name, "function call");
    let executor = state.executor.clone();
    let response = tokio::task::spawn_blocking(move || executor.execute_function(call)).await?;
    Ok(Json(response))
}

pub async fn call_tool(
    State(state): State<AppState>,
    Extension(Identity(user)): Extension<Identity>,
    Json(request): Json<ToolCallRequest>,
) -> Result<Json<ToolResponse>, ApiError> {
    let call = request.into_tool_call();
    info!(%user, function = %call.function.name, call_id = %call.id, "tool call");
    let executor = state.executor.clone();
    let response = tokio::task::spawn_blocking(move || executor.execute_tool_call(&call)).await?;
    Ok(Json(response))
}

pub async fn execute(
    State(state): State<AppState>,
    Extension(Identity(user)): Extension<Identity>,
    Json(request): Json<ExecuteRequest>,
) -> Result<Json<FunctionResponse>, ApiError> {
    info!(%user, "execute from text");
    let executor = state.executor.clone();
    let response =
        tokio::task::spawn_blocking(move || executor.execute_from_text(&request.text)).await?;
    response
        .map(Json)
        .ok_or_else(|| ApiError::BadRequest("No function call found in text".to_string()))
}
