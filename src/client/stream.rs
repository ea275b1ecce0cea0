//! WebSocket streaming of call results.

use futures::{SinkExt, StreamExt};
use serde_json::Value;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, warn};
use url::Url;

use super::policy::{Decision, RetryPolicy};
use crate::transport::websocket::{self, WsStream};
use crate::transport::TransportError;
use crate::types::StreamingChunk;
use crate::{BoxStream, Error, ErrorContext, Result};

const SOURCE: &str = "stream";

/// Connection parameters for one streamed call.
pub(crate) struct StreamRequest<'a> {
    pub url: Url,
    pub api_key: Option<&'a str>,
    pub timeout: std::time::Duration,
    pub policy: RetryPolicy,
    pub payload: Value,
}

/// Connect (with retries), send the request, and stream chunks until the
/// final one. The socket is closed after the final chunk and dropped with
/// the stream.
pub(crate) async fn open(request: StreamRequest<'_>) -> Result<BoxStream<'static, StreamingChunk>> {
    let mut attempt = 0u32;
    let ws = loop {
        match connect_and_send(&request).await {
            Ok(ws) => break ws,
            Err(e) => match request.policy.decide(attempt, &e) {
                Decision::Retry { delay } => {
                    attempt += 1;
                    warn!(
                        url = %request.url,
                        attempt,
                        max_retries = request.policy.max_retries,
                        error = %e,
                        "Stream connection failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Decision::Fail => {
                    error!(url = %request.url, error = %e, "Stream connection failed");
                    return Err(e);
                }
            },
        }
    };

    Ok(Box::pin(chunk_stream(ws)))
}

async fn connect_and_send(request: &StreamRequest<'_>) -> Result<WsStream> {
    let mut ws = websocket::connect(&request.url, request.api_key, request.timeout).await?;
    ws.send(Message::text(request.payload.to_string()))
        .await
        .map_err(TransportError::from)?;
    debug!(url = %request.url, "Stream request sent");
    Ok(ws)
}

/// Yields chunks from `ws`; ends after the final chunk or the first error.
fn chunk_stream(ws: WsStream) -> impl futures::Stream<Item = Result<StreamingChunk>> + Send {
    futures::stream::unfold(Some(ws), |state| async move {
        let mut ws = state?;
        loop {
            let text = match ws.next().await {
                Some(Ok(Message::Text(text))) => text,
                Some(Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_))) => continue,
                Some(Ok(Message::Binary(_))) => {
                    return Some((Err(protocol_error("binary frame", None)), None));
                }
                Some(Ok(Message::Close(_))) | None => {
                    return Some((
                        Err(protocol_error("connection closed before the final chunk", None)),
                        None,
                    ));
                }
                Some(Err(e)) => return Some((Err(Error::Transport(e.into())), None)),
            };

            let chunk: StreamingChunk = match serde_json::from_str(text.as_str()) {
                Ok(chunk) => chunk,
                Err(e) => {
                    return Some((
                        Err(protocol_error(
                            format!("malformed chunk: {}", e),
                            Some(text.as_str()),
                        )),
                        None,
                    ));
                }
            };

            if chunk.is_final {
                if let Err(e) = ws.close(None).await {
                    debug!(error = %e, "Close after final chunk failed");
                }
                return Some((Ok(chunk), None));
            }
            return Some((Ok(chunk), Some(ws)));
        }
    })
}

fn protocol_error(message: impl Into<String>, frame: Option<&str>) -> Error {
    let mut ctx = ErrorContext::new().with_source(SOURCE);
    if let Some(frame) = frame {
        ctx = ctx.with_details(frame.to_string());
    }
    Error::stream_protocol_with_context(message, ctx)
}
