//! Generation persistence.
//!
//! `GenerationStore` is the seam to the storage backend. Contract:
//! - at most one generation per (seed, iteration);
//! - `create_atomic` inserts the generation together with its answers or
//!   nothing at all, and fails with `StoreError::Duplicate` if the key is
//!   already taken (it never overwrites);
//! - stored generations are never mutated.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{Generation, NewGeneration, Seed};
use crate::error::StoreError;
use crate::generation::TOTAL_ANSWERS_COUNT;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[async_trait]
pub trait GenerationStore: Send + Sync {
  /// Fetch the generation for (seed, iteration), if it was ever created.
  async fn find(&self, seed: &Seed, iteration: u32) -> StoreResult<Option<Generation>>;

  /// Persist a freshly computed generation with its answers in one step.
  async fn create_atomic(&self, new: NewGeneration) -> StoreResult<Generation>;
}

/// In-memory store; a single write lock covers the uniqueness check and the
/// insert of the generation and all of its answers.
#[derive(Debug, Default)]
pub struct MemoryGenerationStore {
  rows: RwLock<HashMap<(Seed, u32), Generation>>,
}

impl MemoryGenerationStore {
  pub fn new() -> Self {
    Self::default()
  }

  #[cfg(test)]
  pub async fn len(&self) -> usize {
    self.rows.read().await.len()
  }
}

#[async_trait]
impl GenerationStore for MemoryGenerationStore {
  async fn find(&self, seed: &Seed, iteration: u32) -> StoreResult<Option<Generation>> {
    let rows = self.rows.read().await;
    Ok(rows.get(&(seed.clone(), iteration)).cloned())
  }

  async fn create_atomic(&self, new: NewGeneration) -> StoreResult<Generation> {
    if new.answers.len() != TOTAL_ANSWERS_COUNT {
      return Err(StoreError::Backend(format!(
        "expected {} answers, got {}",
        TOTAL_ANSWERS_COUNT,
        new.answers.len()
      )));
    }
    let key = (new.seed.clone(), new.iteration);
    let mut rows = self.rows.write().await;
    if rows.contains_key(&key) {
      return Err(StoreError::Duplicate { seed: new.seed.to_string(), iteration: new.iteration });
    }
    let generation = new.into_generation();
    rows.insert(key, generation.clone());
    Ok(generation)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::generation::compute_generation;
  use crate::generation::tests::fixture;

  fn computed(seed: &str, iteration: u32) -> NewGeneration {
    compute_generation(&Seed::from(seed), iteration, &fixture()).unwrap()
  }

  #[tokio::test]
  async fn create_then_find_returns_same_row() {
    let store = MemoryGenerationStore::new();
    let seed = Seed::from("demo");
    assert!(store.find(&seed, 1).await.unwrap().is_none());

    let created = store.create_atomic(computed("demo", 1)).await.unwrap();
    let found = store.find(&seed, 1).await.unwrap().unwrap();
    assert_eq!(created, found);
    assert_eq!(found.answers.len(), TOTAL_ANSWERS_COUNT);
    assert!(store.find(&seed, 2).await.unwrap().is_none());
  }

  #[tokio::test]
  async fn second_create_for_same_key_is_rejected() {
    let store = MemoryGenerationStore::new();
    let first = store.create_atomic(computed("demo", 1)).await.unwrap();
    let err = store.create_atomic(computed("demo", 1)).await.unwrap_err();
    assert_eq!(err, StoreError::Duplicate { seed: "demo".into(), iteration: 1 });

    let kept = store.find(&Seed::from("demo"), 1).await.unwrap().unwrap();
    assert_eq!(kept.id, first.id);
    assert_eq!(store.len().await, 1);
  }

  #[tokio::test]
  async fn partial_answer_sets_are_not_stored() {
    let store = MemoryGenerationStore::new();
    let mut new = computed("demo", 1);
    new.answers.pop();
    assert!(matches!(store.create_atomic(new).await, Err(StoreError::Backend(_))));
    assert_eq!(store.len().await, 0);
  }
}
