//! WebSocket upgrade + message loop. Each client message is parsed as JSON and
//! forwarded to core logic. We reply with a single JSON message per request.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{info, error, instrument, debug};

use crate::protocol::{day_answers, day_finish_out, hint_out, situation_out, ClientWsMessage, ServerWsMessage};
use crate::logic::*;
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "consultant_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "consultant_backend", "WebSocket connected");
  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        // Parse, dispatch, serialize response.
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            debug!(target: "consultant_backend", "WS received: {:?}", &incoming);
            handle_client_ws(incoming, &state).await
          }
          Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
        };

        let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "consultant_backend", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "consultant_backend", "WebSocket disconnected");
}

#[instrument(level = "info", skip(state))]
async fn handle_client_ws(msg: ClientWsMessage, state: &AppState) -> ServerWsMessage {
  let result = match msg {
    ClientWsMessage::Ping => return ServerWsMessage::Pong,

    ClientWsMessage::GenerateSituation { seed, iteration } => generate_situation(state, &seed, iteration)
      .await
      .map(|g| ServerWsMessage::Situation { situation: situation_out(&g) }),

    ClientWsMessage::GetHint { seed, iteration } => get_hint(state, &seed, iteration)
      .await
      .map(|(hint, product)| ServerWsMessage::Hint { hint: hint_out(&hint, &product) }),

    ClientWsMessage::AcknowledgeDayFinish { seed, answers } => acknowledge_day_finish(state, &seed, &day_answers(&answers))
      .await
      .map(|day| ServerWsMessage::DayFinished { result: day_finish_out(&day) }),
  };

  result.unwrap_or_else(|e| {
    error!(target: "consultant_backend", error = %e, "WS request failed");
    ServerWsMessage::Error { message: e.to_string() }
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::generation::tests::fixture_config;
  use crate::store::MemoryGenerationStore;

  fn state() -> AppState {
    AppState::with_parts(fixture_config(), Arc::new(MemoryGenerationStore::new()))
  }

  #[tokio::test]
  async fn ping_gets_pong() {
    assert!(matches!(handle_client_ws(ClientWsMessage::Ping, &state()).await, ServerWsMessage::Pong));
  }

  #[tokio::test]
  async fn engine_errors_become_error_messages() {
    let msg = ClientWsMessage::GenerateSituation { seed: "demo".into(), iteration: 0 };
    match handle_client_ws(msg, &state()).await {
      ServerWsMessage::Error { message } => assert!(message.contains("iteration")),
      other => panic!("unexpected {other:?}"),
    }
  }

  #[tokio::test]
  async fn hint_matches_http_logic() {
    let state = state();
    let msg = ClientWsMessage::GetHint { seed: "demo".into(), iteration: 2 };
    let (hint, _) = get_hint(&state, &"demo".into(), 2).await.unwrap();
    match handle_client_ws(msg, &state).await {
      ServerWsMessage::Hint { hint: out } => assert_eq!(out.text, hint.text),
      other => panic!("unexpected {other:?}"),
    }
  }
}
