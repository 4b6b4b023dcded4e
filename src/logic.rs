//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - get-or-generate of the frozen generation for (seed, iteration)
//!   - serving the generation's hint
//!   - day-finish: scoring every submitted answer of one seed

use tracing::{debug, info, instrument, warn};

use crate::domain::{ClientProfile, Generation, Hint, Product, ProductId, Seed};
use crate::error::{EngineError, EngineResult, StoreError};
use crate::generation::compute_generation;
use crate::scoring::score;
use crate::state::AppState;

/// Return the persisted generation for (seed, iteration), computing and
/// persisting it on first request. A generation that already exists is
/// returned as stored, whatever the current reference data says.
#[instrument(level = "info", skip(state), fields(%seed, iteration))]
pub async fn generate_situation(state: &AppState, seed: &Seed, iteration: u32) -> EngineResult<Generation> {
  if iteration == 0 {
    return Err(EngineError::InvalidIteration(iteration));
  }
  if let Some(existing) = state.store.find(seed, iteration).await? {
    debug!(target: "generation", %seed, iteration, id = %existing.id, "Serving stored generation");
    return Ok(existing);
  }

  let snapshot = state.snapshot().await;
  let computed = compute_generation(seed, iteration, &snapshot)?;

  match state.store.create_atomic(computed).await {
    Ok(created) => {
      info!(target: "generation", %seed, iteration, id = %created.id, situation_id = created.situation_id, "Created generation");
      Ok(created)
    }
    Err(StoreError::Duplicate { .. }) => {
      warn!(target: "generation", %seed, iteration, "Lost creation race; discarding local result");
      state
        .store
        .find(seed, iteration)
        .await?
        .ok_or_else(|| {
          StoreError::Backend(format!("generation {seed}/{iteration} vanished after duplicate")).into()
        })
    }
    Err(e) => Err(e.into()),
  }
}

/// Hint attached to the generation, generating it if needed.
#[instrument(level = "info", skip(state), fields(%seed, iteration))]
pub async fn get_hint(state: &AppState, seed: &Seed, iteration: u32) -> EngineResult<(Hint, Product)> {
  let generation = generate_situation(state, seed, iteration).await?;
  Ok((generation.hint, generation.hint_product))
}

/// One submitted answer of a day.
#[derive(Clone, Debug)]
pub struct DayAnswer {
  pub iteration: u32,
  pub recommended_product_ids: Vec<ProductId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientReview {
  pub client: ClientProfile,
  pub review: String,
  pub rating: u32,
  pub is_success: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DayFinish {
  pub reviews: Vec<ClientReview>,
  pub total_rating: u32,
}

/// Score every answer of the day, in input order. Iterations that were never
/// generated are generated first.
#[instrument(level = "info", skip(state, answers), fields(%seed, answers = answers.len()))]
pub async fn acknowledge_day_finish(state: &AppState, seed: &Seed, answers: &[DayAnswer]) -> EngineResult<DayFinish> {
  let snapshot = state.snapshot().await;
  let mut reviews = Vec::with_capacity(answers.len());
  for ans in answers {
    let generation = generate_situation(state, seed, ans.iteration).await?;
    let outcome = score(&generation, &ans.recommended_product_ids, &snapshot.reviews)?;
    debug!(
      target: "scoring",
      %seed,
      iteration = ans.iteration,
      hit = outcome.hit.len(),
      wrong = outcome.wrong.len(),
      missed = outcome.missed.len(),
      rating = outcome.rating,
      review_id = outcome.review.id,
      "Client scored"
    );
    reviews.push(ClientReview {
      is_success: outcome.is_success(),
      client: generation.client,
      review: outcome.review.text,
      rating: outcome.rating,
    });
  }
  let total_rating = reviews.iter().map(|r| r.rating).sum();
  info!(target: "scoring", %seed, clients = reviews.len(), total_rating, "Day finished");
  Ok(DayFinish { reviews, total_rating })
}
