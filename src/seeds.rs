//! Built-in reference data so the service is playable without a catalog file.

use crate::config::CatalogConfig;
use crate::domain::{
  AgeGroup, City, Condition, FirstName, Gender, Hint, JobSphere, LastName, Product, Review, Situation, Sprite,
};

fn product(id: u64, name: &str, slug: &str) -> Product {
  Product { id, name: name.into(), link: format!("https://bank.example/products/{slug}") }
}

fn named<T>(rows: &[(u64, &str)], build: impl Fn(u64, String) -> T) -> Vec<T> {
  rows.iter().map(|(id, name)| build(*id, name.to_string())).collect()
}

/// Demo catalog: a bank branch with ten products and three scripted visits.
pub fn demo_catalog() -> CatalogConfig {
  let products = vec![
    product(1, "Debit card", "debit-card"),
    product(2, "Credit card", "credit-card"),
    product(3, "Savings account", "savings"),
    product(4, "Term deposit", "deposit"),
    product(5, "Mortgage", "mortgage"),
    product(6, "Consumer loan", "consumer-loan"),
    product(7, "Child savings plan", "child-plan"),
    product(8, "Property insurance", "property-insurance"),
    product(9, "Salary project", "salary-project"),
    product(10, "Investment account", "brokerage"),
  ];

  let age_groups = named(&[(1, "18-25"), (2, "26-45"), (3, "46+")], |id, name| AgeGroup { id, name });
  let cities = named(&[(1, "Moscow"), (2, "Kazan"), (3, "Novosibirsk")], |id, name| City { id, name });
  let job_spheres = named(&[(1, "IT"), (2, "Retail"), (3, "Public sector")], |id, name| JobSphere { id, name });

  let mut sprites = Vec::new();
  for (gi, gender) in Gender::ALL.into_iter().enumerate() {
    for age in &age_groups {
      let id = gi as u64 * 10 + age.id;
      sprites.push(Sprite { id, gender, age_group_id: age.id, image_url: format!("/media/sprites/{id}.png") });
    }
  }

  let first_names = vec![
    FirstName { id: 1, gender: Gender::Male, name: "Ivan".into() },
    FirstName { id: 2, gender: Gender::Male, name: "Dmitry".into() },
    FirstName { id: 3, gender: Gender::Female, name: "Anna".into() },
    FirstName { id: 4, gender: Gender::Female, name: "Olga".into() },
  ];
  let last_names = vec![
    LastName { id: 1, gender: Gender::Male, name: "Smirnov".into() },
    LastName { id: 2, gender: Gender::Male, name: "Volkov".into() },
    LastName { id: 3, gender: Gender::Female, name: "Smirnova".into() },
    LastName { id: 4, gender: Gender::Female, name: "Volkova".into() },
  ];

  let situations = vec![
    Situation {
      id: 1,
      male_text: "I just got my first salary and want to keep some of it aside.".into(),
      female_text: "I just got my first salary and want to keep some of it aside.".into(),
      real_estate_condition: None,
      common_product_ids: vec![1, 3],
      conditions: vec![
        Condition { id: 1, product_id: 7, children: Some(true), ..Default::default() },
        Condition { id: 2, product_id: 10, job_sphere_id: Some(1), ..Default::default() },
      ],
    },
    Situation {
      id: 2,
      male_text: "My family is growing and we need a bigger flat.".into(),
      female_text: "Our family is growing and we need a bigger flat.".into(),
      real_estate_condition: Some(false),
      common_product_ids: vec![5],
      conditions: vec![
        Condition { id: 3, product_id: 8, ..Default::default() },
        Condition { id: 4, product_id: 7, children: Some(true), ..Default::default() },
        Condition { id: 5, product_id: 4, age_group_id: Some(3), ..Default::default() },
      ],
    },
    Situation {
      id: 3,
      male_text: "I want to renovate my apartment but I'm short on cash.".into(),
      female_text: "I want to renovate my apartment but I'm short on cash.".into(),
      real_estate_condition: Some(true),
      common_product_ids: vec![6],
      conditions: vec![
        Condition { id: 6, product_id: 2, age_group_id: Some(1), ..Default::default() },
        Condition { id: 7, product_id: 8, real_estate: Some(true), city_id: Some(1), ..Default::default() },
        Condition { id: 8, product_id: 9, job_sphere_id: Some(3), ..Default::default() },
      ],
    },
  ];

  let hints = products
    .iter()
    .map(|p| Hint {
      id: p.id,
      product_id: p.id,
      text: format!("Ask the client whether a {} would fit their plans.", p.name.to_lowercase()),
    })
    .collect();

  let reviews = vec![
    Review { id: 1, product_id: None, product_in_answer: false, text: "Exactly what I needed, thank you!".into() },
    Review { id: 2, product_id: None, product_in_answer: false, text: "Quick and to the point. Great service.".into() },
    Review { id: 3, product_id: Some(2), product_in_answer: true, text: "Why was I pushed products I never asked for?".into() },
    Review { id: 4, product_id: Some(6), product_in_answer: true, text: "Too much selling, too little listening.".into() },
    Review { id: 5, product_id: Some(3), product_in_answer: false, text: "I later found out about a product that suited me better.".into() },
    Review { id: 6, product_id: Some(8), product_in_answer: false, text: "Nobody mentioned the insurance I actually needed.".into() },
  ];

  CatalogConfig {
    products,
    age_groups,
    cities,
    job_spheres,
    sprites,
    first_names,
    last_names,
    situations,
    hints,
    reviews,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::ReferenceData;
  use crate::domain::Seed;
  use crate::generation::compute_generation;
  use crate::scoring::score;

  #[test]
  fn demo_catalog_resolves_every_iteration() {
    let data = ReferenceData::from_config(demo_catalog());
    for seed in ["demo", "a", "b", "0b6f7c52-2f0e-4c58-9a0e-2d4f1b7b4a11"] {
      let seed = Seed::from(seed);
      for iteration in 1..=200 {
        let g = compute_generation(&seed, iteration, &data)
          .unwrap_or_else(|e| panic!("{seed}/{iteration}: {e}"))
          .into_generation();
        let correct: Vec<u64> = g.correct_product_ids().into_iter().collect();
        assert!(!correct.is_empty());
        assert!(correct.contains(&g.hint_product.id));
        score(&g, &correct, &data.reviews).unwrap_or_else(|e| panic!("{seed}/{iteration}: {e}"));
        score(&g, &[], &data.reviews).unwrap_or_else(|e| panic!("{seed}/{iteration}: {e}"));
      }
    }
  }
}
