//! Draw sequence: the fixed-shape tuple of random values behind one iteration.
//!
//! The stream for a seed is a ChaCha20 generator keyed by the SHA-256 of the
//! seed string. Iteration `n` is obtained by drawing and discarding
//! `n - 1` full draw sets first, so every iteration depends only on
//! (seed, iteration) and no cross-request state is kept.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use sha2::{Digest, Sha256};

use crate::domain::Seed;
use crate::error::{EngineError, EngineResult};

/// Uniform slots used to pick the presented answers.
pub const ANSWER_SLOTS: usize = 4;

/// One iteration's random values, in draw order.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawSet {
  pub situation: f64,
  pub gender: f64,
  pub job: f64,
  pub age: f64,
  /// Decides married, child and (by default) real-estate flags.
  pub is_married: f64,
  /// Drawn to keep the stream shape; not read by client synthesis.
  pub is_have_child: f64,
  /// Drawn to keep the stream shape; not read by client synthesis.
  pub is_have_real_estate: f64,
  pub city: f64,
  pub sprite: f64,
  pub hint: f64,
  pub review: f64,
  pub first_name: f64,
  pub last_name: f64,
  /// Desired number of correct answers, in 1..=3.
  pub correct_answers_num: usize,
  pub answers: [f64; ANSWER_SLOTS],
}

impl DrawSet {
  /// Consume exactly one draw set from `rng`. Field order is part of the
  /// stream contract and must not change.
  pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
    Self {
      situation: rng.gen(),
      gender: rng.gen(),
      job: rng.gen(),
      age: rng.gen(),
      is_married: rng.gen(),
      is_have_child: rng.gen(),
      is_have_real_estate: rng.gen(),
      city: rng.gen(),
      sprite: rng.gen(),
      hint: rng.gen(),
      review: rng.gen(),
      first_name: rng.gen(),
      last_name: rng.gen(),
      correct_answers_num: rng.gen_range(1..=3),
      answers: [rng.gen(), rng.gen(), rng.gen(), rng.gen()],
    }
  }
}

/// Fresh generator positioned at the start of the seed's stream.
pub fn stream_for(seed: &Seed) -> ChaCha20Rng {
  let digest = Sha256::digest(seed.as_str().as_bytes());
  let mut bytes = [0u8; 32];
  bytes.copy_from_slice(&digest);
  ChaCha20Rng::from_seed(bytes)
}

/// Draw set of `iteration` (1-based) for `seed`.
pub fn draws(seed: &Seed, iteration: u32) -> EngineResult<DrawSet> {
  if iteration == 0 {
    return Err(EngineError::InvalidIteration(iteration));
  }
  let mut rng = stream_for(seed);
  for _ in 1..iteration {
    DrawSet::generate(&mut rng);
  }
  Ok(DrawSet::generate(&mut rng))
}
