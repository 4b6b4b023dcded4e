//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs parameters and basic result info.

use std::sync::Arc;
use axum::{extract::State, Json, response::IntoResponse};
use tracing::{info, instrument, warn};

use crate::error::EngineResult;
use crate::protocol::*;
use crate::state::AppState;
use crate::logic::*;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state, body), fields(seed = %body.seed, iteration = body.iteration))]
pub async fn http_generate_situation(
  State(state): State<Arc<AppState>>,
  Json(body): Json<GenerationParams>,
) -> EngineResult<Json<SituationOut>> {
  let generation = generate_situation(&state, &body.seed, body.iteration).await?;
  info!(target: "generation", seed = %body.seed, iteration = body.iteration, id = %generation.id, "HTTP situation served");
  Ok(Json(situation_out(&generation)))
}

#[instrument(level = "info", skip(state, body), fields(seed = %body.seed, iteration = body.iteration))]
pub async fn http_get_hint(
  State(state): State<Arc<AppState>>,
  Json(body): Json<GenerationParams>,
) -> EngineResult<Json<HintOut>> {
  let (hint, product) = get_hint(&state, &body.seed, body.iteration).await?;
  info!(target: "generation", seed = %body.seed, iteration = body.iteration, hint_id = hint.id, "HTTP hint served");
  Ok(Json(hint_out(&hint, &product)))
}

#[instrument(level = "info", skip(state, body), fields(seed = %body.seed, answers = body.answers.len()))]
pub async fn http_acknowledge_day_finish(
  State(state): State<Arc<AppState>>,
  Json(body): Json<DayFinishIn>,
) -> EngineResult<Json<DayFinishOut>> {
  let day = acknowledge_day_finish(&state, &body.seed, &day_answers(&body.answers)).await?;
  info!(target: "scoring", seed = %body.seed, total_rating = day.total_rating, "HTTP day finish evaluated");
  Ok(Json(day_finish_out(&day)))
}

#[instrument(level = "info", skip(state))]
pub async fn http_reload_catalog(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let reloaded = state.reload_from_env().await;
  if !reloaded {
    warn!(target: "consultant_backend", "Catalog reload requested but CATALOG_PATH is missing or invalid; keeping current snapshot");
  }
  Json(ReloadOut { reloaded })
}
