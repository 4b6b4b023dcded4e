//! Scoring a recommendation against a frozen generation and choosing the
//! client's review.

use std::collections::BTreeSet;

use tracing::instrument;

use crate::catalog::Catalog;
use crate::domain::{Generation, ProductId, Review};
use crate::draws::draws;
use crate::error::{EngineError, EngineResult};

/// Points for recommending every correct product and nothing else.
pub const TOTAL_POINTS: u32 = 10;
/// Penalty per recommended product that is not correct.
pub const INCORRECT_ANSWER_FINE: u32 = 3;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreOutcome {
  /// Correct products that were recommended.
  pub hit: BTreeSet<ProductId>,
  /// Recommended products that are not correct.
  pub wrong: BTreeSet<ProductId>,
  /// Correct products that were not recommended.
  pub missed: BTreeSet<ProductId>,
  pub rating: u32,
  pub review: Review,
}

impl ScoreOutcome {
  pub fn is_success(&self) -> bool {
    self.wrong.is_empty() && self.missed.is_empty()
  }
}

/// `|hits * (TOTAL_POINTS / |correct|) - wrong * INCORRECT_ANSWER_FINE|`.
///
/// The absolute value means a heavily penalised answer can score the same
/// as a good one; that is the established rating rule.
pub fn rating(correct_count: usize, hit_count: usize, wrong_count: usize) -> EngineResult<u32> {
  if correct_count == 0 {
    return Err(EngineError::EmptyCatalog { catalog: "correct answers" });
  }
  let per_answer = TOTAL_POINTS / correct_count as u32;
  let earned = hit_count as u32 * per_answer;
  let fined = wrong_count as u32 * INCORRECT_ANSWER_FINE;
  Ok(earned.abs_diff(fined))
}

/// Reviews eligible for an outcome.
///
/// A perfect answer draws from generic reviews (no product). Otherwise the
/// pool is every review of one of the generation's correct products, plus
/// reviews about an unwanted recommendation (when something wrong was chosen)
/// and about an omitted product (when a correct one was missed).
pub fn review_pool(
  reviews: &Catalog<Review>,
  correct: &BTreeSet<ProductId>,
  any_wrong: bool,
  any_missed: bool,
) -> Catalog<Review> {
  if !any_wrong && !any_missed {
    return reviews.filtered(|r| r.product_id.is_none());
  }
  reviews.filtered(|r| {
    r.product_id.map_or(false, |p| correct.contains(&p))
      || (any_wrong && r.product_in_answer)
      || (any_missed && !r.product_in_answer)
  })
}

/// Score with an explicit review draw.
pub fn score_with_draw(
  generation: &Generation,
  chosen: &[ProductId],
  reviews: &Catalog<Review>,
  review_draw: f64,
) -> EngineResult<ScoreOutcome> {
  let correct = generation.correct_product_ids();
  let chosen: BTreeSet<ProductId> = chosen.iter().copied().collect();

  let hit: BTreeSet<ProductId> = correct.intersection(&chosen).copied().collect();
  let wrong: BTreeSet<ProductId> = chosen.difference(&correct).copied().collect();
  let missed: BTreeSet<ProductId> = correct.difference(&chosen).copied().collect();

  let rating = rating(correct.len(), hit.len(), wrong.len())?;
  let review = review_pool(reviews, &correct, !wrong.is_empty(), !missed.is_empty())
    .pick(review_draw)?
    .clone();

  Ok(ScoreOutcome { hit, wrong, missed, rating, review })
}

/// Score `chosen` against `generation`; the review is picked with the review
/// draw of the generation's own (seed, iteration).
#[instrument(level = "debug", skip(generation, reviews), fields(seed = %generation.seed, iteration = generation.iteration))]
pub fn score(generation: &Generation, chosen: &[ProductId], reviews: &Catalog<Review>) -> EngineResult<ScoreOutcome> {
  let d = draws(&generation.seed, generation.iteration)?;
  score_with_draw(generation, chosen, reviews, d.review)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::ReferenceData;
  use crate::domain::Seed;
  use crate::draws::DrawSet;
  use crate::generation::compute_from_draws;
  use crate::generation::tests::{draw_set, fixture};

  fn reviews() -> Catalog<Review> {
    let r = |id, product_id, product_in_answer| Review { id, product_id, product_in_answer, text: format!("review {id}") };
    Catalog::new(
      "reviews",
      vec![r(1, None, false), r(2, None, false), r(3, Some(1), true), r(4, Some(2), false), r(5, Some(3), true)],
    )
  }

  /// Generation presenting products 1, 2 as correct and 5, 6 as incorrect.
  fn generation() -> Generation {
    let data: ReferenceData = fixture();
    let d = DrawSet { correct_answers_num: 2, answers: [0.1, 0.2, 0.5, 0.55], ..draw_set() };
    let g = compute_from_draws(&Seed::from("demo"), 1, &d, &data).unwrap().into_generation();
    assert_eq!(
      g.answers.iter().map(|a| (a.product.id, a.is_correct)).collect::<Vec<_>>(),
      vec![(1, true), (2, true), (5, false), (6, false)]
    );
    g
  }

  #[test]
  fn two_correct_answers_give_five_points_each() {
    let g = generation();
    let out = score_with_draw(&g, &[1, 2], &reviews(), 0.0).unwrap();
    assert_eq!(out.rating, 10);
    assert!(out.is_success());
    assert!(out.missed.is_empty() && out.wrong.is_empty());
  }

  #[test]
  fn extraneous_product_is_fined() {
    let g = generation();
    let out = score_with_draw(&g, &[1, 5], &reviews(), 0.0).unwrap();
    assert_eq!(out.rating, 2);
    assert_eq!(out.hit, BTreeSet::from([1]));
    assert_eq!(out.wrong, BTreeSet::from([5]));
    assert_eq!(out.missed, BTreeSet::from([2]));
    assert!(!out.is_success());
  }

  #[test]
  fn rating_uses_absolute_difference() {
    assert_eq!(rating(2, 0, 4).unwrap(), 12);
    // 1 hit of 3 correct (3 points) minus one fine (3) reaches zero.
    assert_eq!(rating(3, 1, 1).unwrap(), 0);
    assert_eq!(rating(3, 3, 0).unwrap(), 9);
    assert_eq!(rating(1, 1, 0).unwrap(), 10);
  }

  #[test]
  fn no_correct_answers_cannot_be_scored() {
    assert_eq!(rating(0, 0, 1), Err(EngineError::EmptyCatalog { catalog: "correct answers" }));
    let mut g = generation();
    for a in &mut g.answers {
      a.is_correct = false;
    }
    assert!(score_with_draw(&g, &[1], &reviews(), 0.0).is_err());
  }

  #[test]
  fn unknown_chosen_ids_count_as_wrong() {
    let g = generation();
    let out = score_with_draw(&g, &[1, 2, 42, 42], &reviews(), 0.0).unwrap();
    assert_eq!(out.wrong, BTreeSet::from([42]));
    assert_eq!(out.rating, 7);
  }

  #[test]
  fn perfect_answer_picks_generic_review() {
    let g = generation();
    assert_eq!(score_with_draw(&g, &[2, 1], &reviews(), 0.0).unwrap().review.id, 1);
    assert_eq!(score_with_draw(&g, &[2, 1], &reviews(), 0.9).unwrap().review.id, 2);
  }

  #[test]
  fn review_pool_by_outcome() {
    let ids = |c: Catalog<Review>| c.items().iter().map(|r| r.id).collect::<Vec<_>>();
    let correct = BTreeSet::from([1, 2]);
    assert_eq!(ids(review_pool(&reviews(), &correct, false, false)), vec![1, 2]);
    assert_eq!(ids(review_pool(&reviews(), &correct, true, false)), vec![3, 4, 5]);
    assert_eq!(ids(review_pool(&reviews(), &correct, false, true)), vec![1, 2, 3, 4]);
    assert_eq!(ids(review_pool(&reviews(), &correct, true, true)), vec![1, 2, 3, 4, 5]);
  }

  #[test]
  fn correct_product_reviews_join_any_imperfect_pool() {
    let r = |id, product_id, product_in_answer| Review { id, product_id: Some(product_id), product_in_answer, text: String::new() };
    let reviews = Catalog::new("reviews", vec![r(10, 1, false), r(11, 9, true)]);
    let pool = review_pool(&reviews, &BTreeSet::from([1, 2]), true, false);
    assert_eq!(pool.items().iter().map(|r| r.id).collect::<Vec<_>>(), vec![10, 11]);
    // Product 1 is no longer correct, so its omission review drops out.
    let pool = review_pool(&reviews, &BTreeSet::from([3]), true, false);
    assert_eq!(pool.items().iter().map(|r| r.id).collect::<Vec<_>>(), vec![11]);
  }

  #[test]
  fn missed_only_draws_from_correct_product_and_omission_reviews() {
    let g = generation();
    let out = score_with_draw(&g, &[1], &reviews(), 0.5).unwrap();
    assert_eq!(out.rating, 5);
    assert_eq!(out.review.id, 3);
    assert_eq!(score_with_draw(&g, &[1], &reviews(), 0.8).unwrap().review.id, 4);
  }

  #[test]
  fn empty_review_pool_fails() {
    let g = generation();
    let only_generic = reviews().filtered(|r| r.product_id.is_none());
    assert_eq!(
      score_with_draw(&g, &[1, 2, 6], &only_generic, 0.0),
      Err(EngineError::EmptyCatalog { catalog: "reviews" })
    );
  }

  #[test]
  fn review_draw_comes_from_the_generation_iteration() {
    let mut g = generation();
    g.iteration = 4;
    let expected = draws(&g.seed, 4).unwrap().review;
    let a = score(&g, &[1, 2], &reviews()).unwrap();
    let b = score_with_draw(&g, &[1, 2], &reviews(), expected).unwrap();
    assert_eq!(a, b);
  }
}
