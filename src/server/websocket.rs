//! Streaming endpoints.
//!
//! The first text message is the call. Execution is not incremental, so a
//! stream carries exactly one chunk: the final one, with the result or the
//! error. Malformed requests get an error chunk as well.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
    Extension,
};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::auth::Identity;
use super::AppState;
use crate::types::{tool::generate_call_id, FunctionCall, StreamingChunk, ToolCall};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreamKind {
    Function,
    Tool,
}

pub async fn stream_function(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Extension(Identity(user)): Extension<Identity>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| serve_stream(socket, state, user, StreamKind::Function))
}

pub async fn stream_tool(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Extension(Identity(user)): Extension<Identity>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| serve_stream(socket, state, user, StreamKind::Tool))
}

async fn serve_stream(mut socket: WebSocket, state: AppState, user: String, kind: StreamKind) {
    let Some(text) = first_text(&mut socket).await else {
        warn!(%user, "WebSocket client disconnected before sending a request");
        return;
    };

    let chunk = match parse_request(kind, &text) {
        Ok(call) => dispatch(&state, &user, call).await,
        Err(chunk) => chunk,
    };

    match serde_json::to_string(&chunk) {
        Ok(payload) => {
            if let Err(e) = socket.send(Message::Text(payload.into())).await {
                warn!(error = %e, "Failed to send final chunk");
                return;
            }
        }
        Err(e) => warn!(error = %e, "Failed to encode final chunk"),
    }
    if let Err(e) = socket.send(Message::Close(None)).await {
        debug!(error = %e, "Peer gone before close frame");
    }
}

async fn first_text(socket: &mut WebSocket) -> Option<String> {
    while let Some(Ok(message)) = socket.recv().await {
        match message {
            Message::Text(text) => return Some(text.as_str().to_string()),
            Message::Close(_) => return None,
            _ => continue,
        }
    }
    None
}

async fn dispatch(state: &AppState, user: &str, call: ToolCall) -> StreamingChunk {
    let registry = state.executor.registry();
    if !registry.contains(&call.function.name) {
        return StreamingChunk::final_error(
            call.id,
            format!("Function '{}' not found", call.function.name),
        );
    }

    info!(%user, function = %call.function.name, call_id = %call.id, "stream call");
    let executor = state.executor.clone();
    let call_id = call.id.clone();
    match tokio::task::spawn_blocking(move || executor.execute_tool_call(&call)).await {
        Ok(response) => match response.function.into_result() {
            Ok(result) => StreamingChunk::final_success(response.id, result),
            Err(error) => StreamingChunk::final_error(response.id, error),
        },
        Err(e) => {
            warn!(error = %e, "Stream dispatch task failed");
            StreamingChunk::final_error(call_id, format!("Internal server error: {}", e))
        }
    }
}

/// Parse the first message into a call, or the error chunk to send back.
fn parse_request(kind: StreamKind, text: &str) -> Result<ToolCall, StreamingChunk> {
    let value: Value = serde_json::from_str(text).map_err(|e| {
        debug!(error = %e, "Invalid JSON on stream");
        StreamingChunk::final_error(generate_call_id(), "Invalid JSON in request")
    })?;

    let function = match kind {
        StreamKind::Function => {
            if !has_call_shape(&value) {
                return Err(StreamingChunk::final_error(
                    generate_call_id(),
                    "Invalid request format. Must include 'name' and 'parameters'.",
                ));
            }
            value.clone()
        }
        StreamKind::Tool => {
            let Some(function @ Value::Object(_)) = value.get("function") else {
                return Err(StreamingChunk::final_error(
                    generate_call_id(),
                    "Invalid request format. Must include 'function' object.",
                ));
            };
            if !has_call_shape(function) {
                return Err(StreamingChunk::final_error(
                    generate_call_id(),
                    "Invalid function format. Must include 'name' and 'parameters'.",
                ));
            }
            function.clone()
        }
    };

    let call_id = value
        .get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(generate_call_id);

    match serde_json::from_value::<FunctionCall>(function) {
        Ok(function) => Ok(ToolCall::new(Some(call_id), function)),
        Err(e) => Err(StreamingChunk::final_error(
            call_id,
            format!("Invalid function call: {}", e),
        )),
    }
}

fn has_call_shape(value: &Value) -> bool {
    value.get("name").is_some() && value.get("parameters").is_some()
}
