//! Stably ordered reference catalogs and the index-based feature selector.
//!
//! Every random pick in the engine is `index_of(draw, catalog.len())` over a
//! catalog sorted by ascending id. A `ReferenceData` value is one immutable
//! snapshot of all catalogs; a single generation must read only from one.

use crate::config::CatalogConfig;
use crate::domain::{
  AgeGroup, City, FirstName, Hint, JobSphere, LastName, Product, ProductId, Review, Situation, Sprite,
};
use crate::error::{EngineError, EngineResult};

/// Stable ordering key of a catalog row.
pub trait Keyed {
  fn key(&self) -> u64;
}

macro_rules! keyed_by_id {
  ($($ty:ty),* $(,)?) => {
    $(impl Keyed for $ty {
      fn key(&self) -> u64 { self.id }
    })*
  };
}

keyed_by_id!(Product, AgeGroup, City, JobSphere, Sprite, FirstName, LastName, Situation, Hint, Review);

/// Map a uniform draw in [0, 1) onto an index in [0, n).
pub fn index_of(value: f64, n: usize, catalog: &'static str) -> EngineResult<usize> {
  if n == 0 {
    return Err(EngineError::EmptyCatalog { catalog });
  }
  // Float rounding can push value * n up to n for draws just below 1.0.
  let idx = (value * n as f64).floor() as usize;
  Ok(idx.min(n - 1))
}

#[derive(Clone, Debug)]
pub struct Catalog<T> {
  name: &'static str,
  items: Vec<T>,
}

impl<T: Keyed + Clone> Catalog<T> {
  pub fn new(name: &'static str, mut items: Vec<T>) -> Self {
    items.sort_by_key(Keyed::key);
    Self { name, items }
  }

  pub fn len(&self) -> usize { self.items.len() }
  pub fn is_empty(&self) -> bool { self.items.is_empty() }
  pub fn items(&self) -> &[T] { &self.items }

  pub fn get(&self, key: u64) -> Option<&T> {
    self.items
      .binary_search_by_key(&key, Keyed::key)
      .ok()
      .map(|i| &self.items[i])
  }

  /// Select a row by draw value.
  pub fn pick(&self, value: f64) -> EngineResult<&T> {
    let idx = index_of(value, self.items.len(), self.name)?;
    Ok(&self.items[idx])
  }

  /// Sub-catalog keeping the original order.
  pub fn filtered(&self, keep: impl Fn(&T) -> bool) -> Catalog<T> {
    Catalog {
      name: self.name,
      items: self.items.iter().filter(|it| keep(it)).cloned().collect(),
    }
  }
}

/// One consistent snapshot of every reference catalog.
#[derive(Clone, Debug)]
pub struct ReferenceData {
  pub products: Catalog<Product>,
  pub age_groups: Catalog<AgeGroup>,
  pub cities: Catalog<City>,
  pub job_spheres: Catalog<JobSphere>,
  pub sprites: Catalog<Sprite>,
  pub first_names: Catalog<FirstName>,
  pub last_names: Catalog<LastName>,
  pub situations: Catalog<Situation>,
  pub hints: Catalog<Hint>,
  pub reviews: Catalog<Review>,
}

impl ReferenceData {
  pub fn from_config(cfg: CatalogConfig) -> Self {
    Self {
      products: Catalog::new("products", cfg.products),
      age_groups: Catalog::new("age_groups", cfg.age_groups),
      cities: Catalog::new("cities", cfg.cities),
      job_spheres: Catalog::new("job_spheres", cfg.job_spheres),
      sprites: Catalog::new("sprites", cfg.sprites),
      first_names: Catalog::new("first_names", cfg.first_names),
      last_names: Catalog::new("last_names", cfg.last_names),
      situations: Catalog::new("situations", cfg.situations),
      hints: Catalog::new("hints", cfg.hints),
      reviews: Catalog::new("reviews", cfg.reviews),
    }
  }

  pub fn product(&self, id: ProductId) -> EngineResult<&Product> {
    self.products.get(id).ok_or_else(|| EngineError::InsufficientData {
      what: format!("unknown product id {id}"),
    })
  }
}
