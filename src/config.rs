//! Loading reference data (catalogs, situations, hints, reviews) from TOML.
//!
//! See `CatalogConfig` for the expected schema. Every table is an array of
//! rows with a numeric `id`; order in the file does not matter, catalogs are
//! sorted by id when materialized.

use serde::Deserialize;
use tracing::{error, info};

use crate::domain::{AgeGroup, City, FirstName, Hint, JobSphere, LastName, Product, Review, Situation, Sprite};

pub const CATALOG_PATH_ENV: &str = "CATALOG_PATH";

#[derive(Clone, Debug, Deserialize, Default)]
pub struct CatalogConfig {
  #[serde(default)] pub products: Vec<Product>,
  #[serde(default)] pub age_groups: Vec<AgeGroup>,
  #[serde(default)] pub cities: Vec<City>,
  #[serde(default)] pub job_spheres: Vec<JobSphere>,
  #[serde(default)] pub sprites: Vec<Sprite>,
  #[serde(default)] pub first_names: Vec<FirstName>,
  #[serde(default)] pub last_names: Vec<LastName>,
  #[serde(default)] pub situations: Vec<Situation>,
  #[serde(default)] pub hints: Vec<Hint>,
  #[serde(default)] pub reviews: Vec<Review>,
}

pub fn parse_catalog(src: &str) -> Result<CatalogConfig, toml::de::Error> {
  toml::from_str::<CatalogConfig>(src)
}

/// Attempt to load `CatalogConfig` from CATALOG_PATH. On any parsing/IO error, returns None.
pub fn load_catalog_from_env() -> Option<CatalogConfig> {
  let path = std::env::var(CATALOG_PATH_ENV).ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_catalog(&s) {
      Ok(cfg) => {
        info!(
          target: "consultant_backend",
          %path,
          products = cfg.products.len(),
          situations = cfg.situations.len(),
          "Loaded reference catalog (TOML)"
        );
        Some(cfg)
      }
      Err(e) => {
        error!(target: "consultant_backend", %path, error = %e, "Failed to parse catalog TOML");
        None
      }
    },
    Err(e) => {
      error!(target: "consultant_backend", %path, error = %e, "Failed to read catalog file");
      None
    }
  }
}
