//! Domain models: reference entities (products, client features, situations,
//! hints, reviews), the synthesized client, and the frozen generation.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type ProductId = u64;

/// Opaque identity of one reproducible random stream ("one day of play").
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Seed(String);

impl Seed {
  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for Seed {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl From<&str> for Seed {
  fn from(s: &str) -> Self { Seed(s.to_string()) }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
  Male,
  Female,
}

impl Gender {
  /// Selection order for the gender draw.
  pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Product {
  pub id: ProductId,
  pub name: String,
  #[serde(default)] pub link: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgeGroup {
  pub id: u64,
  pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct City {
  pub id: u64,
  pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct JobSphere {
  pub id: u64,
  pub name: String,
}

/// Client avatar, eligible for one gender and age group.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Sprite {
  pub id: u64,
  pub gender: Gender,
  pub age_group_id: u64,
  pub image_url: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FirstName {
  pub id: u64,
  pub gender: Gender,
  pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LastName {
  pub id: u64,
  pub gender: Gender,
  pub name: String,
}

/// Attaches a product to a situation for clients matching every set field.
/// `None` means "does not matter".
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Condition {
  #[serde(default)] pub id: u64,
  pub product_id: ProductId,
  #[serde(default)] pub children: Option<bool>,
  #[serde(default)] pub real_estate: Option<bool>,
  #[serde(default)] pub age_group_id: Option<u64>,
  #[serde(default)] pub job_sphere_id: Option<u64>,
  #[serde(default)] pub city_id: Option<u64>,
}

/// Scripted scenario the client comes in with.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Situation {
  pub id: u64,
  pub male_text: String,
  pub female_text: String,
  /// Forces the client's real-estate flag when set.
  #[serde(default)] pub real_estate_condition: Option<bool>,
  /// Products that are correct regardless of the client.
  #[serde(default)] pub common_product_ids: Vec<ProductId>,
  #[serde(default)] pub conditions: Vec<Condition>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Hint {
  pub id: u64,
  pub product_id: ProductId,
  pub text: String,
}

/// Narrative feedback. Reviews without a product are the generic positive
/// ones; product reviews are split by `product_in_answer`:
/// `true` = an unwanted product was recommended, `false` = a needed one was omitted.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Review {
  pub id: u64,
  #[serde(default)] pub product_id: Option<ProductId>,
  #[serde(default)] pub product_in_answer: bool,
  pub text: String,
}

/// Synthesized customer, frozen inside a `Generation`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientProfile {
  pub gender: Gender,
  pub age_group: AgeGroup,
  pub job_sphere: JobSphere,
  pub is_married: bool,
  pub is_have_child: bool,
  pub is_have_real_estate: bool,
  pub city: City,
  pub sprite: Sprite,
  pub first_name: FirstName,
  pub last_name: LastName,
  pub message: String,
}

/// One presented product and whether recommending it is correct.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerationAnswer {
  pub product: Product,
  pub is_correct: bool,
}

/// Persisted result for one (seed, iteration). Holds owned copies of every
/// referenced row so later reference-data changes cannot reach it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Generation {
  pub id: Uuid,
  pub seed: Seed,
  pub iteration: u32,
  pub situation_id: u64,
  pub client: ClientProfile,
  pub hint: Hint,
  pub hint_product: Product,
  pub answers: Vec<GenerationAnswer>,
}

impl Generation {
  pub fn correct_product_ids(&self) -> BTreeSet<ProductId> {
    self.answers.iter().filter(|a| a.is_correct).map(|a| a.product.id).collect()
  }
}

/// Freshly computed generation, not yet persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewGeneration {
  pub seed: Seed,
  pub iteration: u32,
  pub situation_id: u64,
  pub client: ClientProfile,
  pub hint: Hint,
  pub hint_product: Product,
  pub answers: Vec<GenerationAnswer>,
}

impl NewGeneration {
  /// Assign a storage identity.
  pub fn into_generation(self) -> Generation {
    Generation {
      id: Uuid::new_v4(),
      seed: self.seed,
      iteration: self.iteration,
      situation_id: self.situation_id,
      client: self.client,
      hint: self.hint,
      hint_product: self.hint_product,
      answers: self.answers,
    }
  }
}
