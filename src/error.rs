//! Error types for generation, scoring and persistence.

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use thiserror::Error;

use crate::protocol::ErrorOut;

pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Failures of the generation store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
  /// Another request already created the generation for this key.
  #[error("generation already exists for seed {seed} iteration {iteration}")]
  Duplicate { seed: String, iteration: u32 },

  #[error("store backend failure: {0}")]
  Backend(String),
}

/// Failures of the deterministic engine. All of them are fatal for the
/// current request; nothing is persisted when one is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
  /// A catalog (or a filtered view of it) has no eligible rows.
  #[error("catalog '{catalog}' has no eligible entries")]
  EmptyCatalog { catalog: &'static str },

  /// Reference data is incomplete for the synthesized client.
  #[error("insufficient reference data: {what}")]
  InsufficientData { what: String },

  /// More distinct products were requested than the list can provide.
  #[error("cannot pick {requested} distinct entries out of {available}")]
  UnresolvableSampling { requested: usize, available: usize },

  #[error("iteration must be >= 1, got {0}")]
  InvalidIteration(u32),

  #[error(transparent)]
  Store(#[from] StoreError),
}

impl EngineError {
  pub fn status(&self) -> StatusCode {
    match self {
      EngineError::EmptyCatalog { .. }
      | EngineError::InsufficientData { .. }
      | EngineError::UnresolvableSampling { .. } => StatusCode::UNPROCESSABLE_ENTITY,
      EngineError::InvalidIteration(_) => StatusCode::BAD_REQUEST,
      EngineError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl IntoResponse for EngineError {
  fn into_response(self) -> Response {
    (self.status(), Json(ErrorOut { error: self.to_string() })).into_response()
  }
}
