//! Pure computation of one generation from a draw set and a reference snapshot:
//! client synthesis, recommendation resolution, answer sampling and hint choice.
//!
//! Nothing here touches shared state; the same (seed, iteration, snapshot)
//! always yields the same `NewGeneration`.

use std::collections::{BTreeSet, HashSet};

use tracing::{debug, instrument};

use crate::catalog::{index_of, ReferenceData};
use crate::domain::{
  ClientProfile, Condition, Gender, GenerationAnswer, Hint, NewGeneration, Product, ProductId, Seed,
  Situation,
};
use crate::draws::{draws, DrawSet, ANSWER_SLOTS};
use crate::error::{EngineError, EngineResult};

/// Answers presented per generation.
pub const TOTAL_ANSWERS_COUNT: usize = ANSWER_SLOTS;

/// Build the client for `situation`.
///
/// The married draw also decides the child flag and, unless the situation
/// fixes it, the real-estate flag. Historical generations depend on this
/// mapping, so the three flags stay correlated.
pub fn synthesize_client(
  d: &DrawSet,
  situation: &Situation,
  data: &ReferenceData,
) -> EngineResult<ClientProfile> {
  let gender = Gender::ALL[index_of(d.gender, Gender::ALL.len(), "genders")?];
  let age_group = data.age_groups.pick(d.age)?.clone();
  let city = data.cities.pick(d.city)?.clone();
  let job_sphere = data.job_spheres.pick(d.job)?.clone();

  let sprites = data
    .sprites
    .filtered(|s| s.gender == gender && s.age_group_id == age_group.id);
  if sprites.is_empty() {
    return Err(EngineError::InsufficientData {
      what: format!("no sprite for {:?} client in age group '{}'", gender, age_group.name),
    });
  }
  let sprite = sprites.pick(d.sprite)?.clone();

  let married_flag = index_of(d.is_married, 2, "flags")? == 1;
  let is_married = married_flag;
  let is_have_child = married_flag;
  let is_have_real_estate = situation.real_estate_condition.unwrap_or(married_flag);

  let first_name = data.first_names.filtered(|n| n.gender == gender).pick(d.first_name)?.clone();
  let last_name = data.last_names.filtered(|n| n.gender == gender).pick(d.last_name)?.clone();

  let message = match gender {
    Gender::Male => situation.male_text.clone(),
    Gender::Female => situation.female_text.clone(),
  };

  Ok(ClientProfile {
    gender,
    age_group,
    job_sphere,
    is_married,
    is_have_child,
    is_have_real_estate,
    city,
    sprite,
    first_name,
    last_name,
    message,
  })
}

/// Conjunction over the fields the condition sets; unset fields always pass.
pub fn matches(client: &ClientProfile, cond: &Condition) -> bool {
  cond.children.map_or(true, |v| v == client.is_have_child)
    && cond.real_estate.map_or(true, |v| v == client.is_have_real_estate)
    && cond.age_group_id.map_or(true, |id| id == client.age_group.id)
    && cond.job_sphere_id.map_or(true, |id| id == client.job_sphere.id)
    && cond.city_id.map_or(true, |id| id == client.city.id)
}

/// Products that are a correct recommendation for this client, by ascending id.
pub fn resolve_correct_products(
  situation: &Situation,
  client: &ClientProfile,
  data: &ReferenceData,
) -> EngineResult<Vec<Product>> {
  let ids: BTreeSet<ProductId> = situation
    .common_product_ids
    .iter()
    .copied()
    .chain(
      situation
        .conditions
        .iter()
        .filter(|c| matches(client, c))
        .map(|c| c.product_id),
    )
    .collect();

  ids.into_iter().map(|id| data.product(id).cloned()).collect()
}

/// Make raw indices distinct: in draw order, a taken index moves forward by
/// one (wrapping at `len`) until it lands on a free slot.
pub fn resolve_duplicates(indices: &[usize], len: usize) -> EngineResult<Vec<usize>> {
  if indices.len() > len {
    return Err(EngineError::UnresolvableSampling { requested: indices.len(), available: len });
  }
  let mut used = HashSet::with_capacity(indices.len());
  let mut out = Vec::with_capacity(indices.len());
  for &raw in indices {
    let mut idx = raw % len;
    while used.contains(&idx) {
      idx = (idx + 1) % len;
    }
    used.insert(idx);
    out.push(idx);
  }
  Ok(out)
}

fn sample_distinct<T: Clone>(values: &[f64], items: &[T], catalog: &'static str) -> EngineResult<Vec<T>> {
  if values.len() > items.len() {
    return Err(EngineError::UnresolvableSampling { requested: values.len(), available: items.len() });
  }
  let raw = values
    .iter()
    .map(|&v| index_of(v, items.len(), catalog))
    .collect::<EngineResult<Vec<_>>>()?;
  let resolved = resolve_duplicates(&raw, items.len())?;
  Ok(resolved.into_iter().map(|i| items[i].clone()).collect())
}

/// Presented products, split into (correct, incorrect).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SampledAnswers {
  pub correct: Vec<Product>,
  pub incorrect: Vec<Product>,
}

/// Pick `k = min(desired, |correct|)` correct products with the first `k`
/// answer slots and fill the remaining slots from every other product.
pub fn sample_answers(d: &DrawSet, correct: &[Product], data: &ReferenceData) -> EngineResult<SampledAnswers> {
  let k = d.correct_answers_num.min(correct.len());
  let correct_ids: HashSet<ProductId> = correct.iter().map(|p| p.id).collect();
  let others = data.products.filtered(|p| !correct_ids.contains(&p.id));

  let (correct_slots, other_slots) = d.answers.split_at(k);
  Ok(SampledAnswers {
    correct: sample_distinct(correct_slots, correct, "correct products")?,
    incorrect: sample_distinct(other_slots, others.items(), "other products")?,
  })
}

/// Hint for one of the presented correct products. The hint draw is used
/// twice: to pick the product and to pick among that product's hints.
pub fn pick_hint(d: &DrawSet, presented_correct: &[Product], data: &ReferenceData) -> EngineResult<(Hint, Product)> {
  let idx = index_of(d.hint, presented_correct.len(), "correct answers")?;
  let product = &presented_correct[idx];
  let hint = data.hints.filtered(|h| h.product_id == product.id).pick(d.hint)?.clone();
  Ok((hint, product.clone()))
}

/// Compute the generation for (seed, iteration) from an explicit draw set.
pub fn compute_from_draws(
  seed: &Seed,
  iteration: u32,
  d: &DrawSet,
  data: &ReferenceData,
) -> EngineResult<NewGeneration> {
  let situation = data.situations.pick(d.situation)?;
  let client = synthesize_client(d, situation, data)?;

  let correct = resolve_correct_products(situation, &client, data)?;
  if correct.is_empty() {
    return Err(EngineError::EmptyCatalog { catalog: "correct products" });
  }
  let sampled = sample_answers(d, &correct, data)?;
  let (hint, hint_product) = pick_hint(d, &sampled.correct, data)?;

  debug!(
    target: "generation",
    %seed,
    iteration,
    situation_id = situation.id,
    correct_total = correct.len(),
    presented_correct = sampled.correct.len(),
    hint_id = hint.id,
    "Computed generation"
  );

  let answers = sampled
    .correct
    .into_iter()
    .map(|product| GenerationAnswer { product, is_correct: true })
    .chain(sampled.incorrect.into_iter().map(|product| GenerationAnswer { product, is_correct: false }))
    .collect();

  Ok(NewGeneration {
    seed: seed.clone(),
    iteration,
    situation_id: situation.id,
    client,
    hint,
    hint_product,
    answers,
  })
}

/// Compute the generation for (seed, iteration) against one snapshot.
#[instrument(level = "debug", skip(data), fields(%seed, iteration))]
pub fn compute_generation(seed: &Seed, iteration: u32, data: &ReferenceData) -> EngineResult<NewGeneration> {
  let d = draws(seed, iteration)?;
  compute_from_draws(seed, iteration, &d, data)
}
