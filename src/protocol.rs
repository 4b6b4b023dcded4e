//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::domain::{ClientProfile, Gender, Generation, Hint, Product, ProductId, Seed};
use crate::logic::{DayAnswer, DayFinish};

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    GenerateSituation {
        seed: Seed,
        iteration: u32,
    },
    GetHint {
        seed: Seed,
        iteration: u32,
    },
    AcknowledgeDayFinish {
        seed: Seed,
        answers: Vec<DayAnswerIn>,
    },
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Situation { situation: SituationOut },
    Hint { hint: HintOut },
    DayFinished { result: DayFinishOut },
    Error { message: String },
}

/// Identifies one client of one day.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationParams {
    pub seed: Seed,
    #[serde(alias = "numIterations", alias = "num_iterations")]
    pub iteration: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductOut {
    pub id: ProductId,
    pub name: String,
    pub link: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientOut {
    pub gender: Gender,
    pub first_name: String,
    pub last_name: String,
    pub age: String,
    pub job_sphere: String,
    pub is_married: bool,
    pub is_have_child: bool,
    pub is_have_real_estate: bool,
    pub city: String,
    pub message: String,
    pub sprite: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SituationAnswerOut {
    pub product: ProductOut,
    pub is_correct: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SituationOut {
    pub generation_params: GenerationParams,
    pub client: ClientOut,
    pub answers: Vec<SituationAnswerOut>,
}

#[derive(Debug, Serialize)]
pub struct HintOut {
    pub product: ProductOut,
    pub text: String,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayAnswerIn {
    pub iteration: u32,
    pub recommended_product_ids: Vec<ProductId>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct DayFinishIn {
    pub seed: Seed,
    pub answers: Vec<DayAnswerIn>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewOut {
    pub client: ClientOut,
    pub review: String,
    pub rating: u32,
    pub is_success: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayFinishOut {
    pub total_rating: u32,
    pub reviews: Vec<ReviewOut>,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

#[derive(Serialize)]
pub struct ReloadOut {
    pub reloaded: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorOut {
    pub error: String,
}

//
// Internal -> public conversions
//

pub fn product_out(p: &Product) -> ProductOut {
    ProductOut { id: p.id, name: p.name.clone(), link: p.link.clone() }
}

pub fn client_out(c: &ClientProfile) -> ClientOut {
    ClientOut {
        gender: c.gender,
        first_name: c.first_name.name.clone(),
        last_name: c.last_name.name.clone(),
        age: c.age_group.name.clone(),
        job_sphere: c.job_sphere.name.clone(),
        is_married: c.is_married,
        is_have_child: c.is_have_child,
        is_have_real_estate: c.is_have_real_estate,
        city: c.city.name.clone(),
        message: c.message.clone(),
        sprite: c.sprite.image_url.clone(),
    }
}

pub fn situation_out(g: &Generation) -> SituationOut {
    SituationOut {
        generation_params: GenerationParams { seed: g.seed.clone(), iteration: g.iteration },
        client: client_out(&g.client),
        answers: g
            .answers
            .iter()
            .map(|a| SituationAnswerOut { product: product_out(&a.product), is_correct: a.is_correct })
            .collect(),
    }
}

pub fn hint_out(hint: &Hint, product: &Product) -> HintOut {
    HintOut { product: product_out(product), text: hint.text.clone() }
}

pub fn day_answers(answers: &[DayAnswerIn]) -> Vec<DayAnswer> {
    answers
        .iter()
        .map(|a| DayAnswer { iteration: a.iteration, recommended_product_ids: a.recommended_product_ids.clone() })
        .collect()
}

pub fn day_finish_out(day: &DayFinish) -> DayFinishOut {
    DayFinishOut {
        total_rating: day.total_rating,
        reviews: day
            .reviews
            .iter()
            .map(|r| ReviewOut {
                client: client_out(&r.client),
                review: r.review.clone(),
                rating: r.rating,
                is_success: r.is_success,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ws_messages_parse() {
        let msg: ClientWsMessage =
            serde_json::from_str(r#"{"type":"generate_situation","seed":"demo","iteration":3}"#).unwrap();
        match msg {
            ClientWsMessage::GenerateSituation { seed, iteration } => {
                assert_eq!(seed.as_str(), "demo");
                assert_eq!(iteration, 3);
            }
            other => panic!("unexpected {other:?}"),
        }

        let msg: ClientWsMessage = serde_json::from_str(
            r#"{"type":"acknowledge_day_finish","seed":"demo","answers":[{"iteration":1,"recommendedProductIds":[4,2]}]}"#,
        )
        .unwrap();
        match msg {
            ClientWsMessage::AcknowledgeDayFinish { answers, .. } => {
                let answers = day_answers(&answers);
                assert_eq!(answers[0].recommended_product_ids, vec![4, 2]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn legacy_iteration_field_is_accepted() {
        let p: GenerationParams = serde_json::from_str(r#"{"seed":"s","num_iterations":7}"#).unwrap();
        assert_eq!(p.iteration, 7);
    }

    #[test]
    fn server_messages_are_tagged() {
        let out = serde_json::to_value(ServerWsMessage::Error { message: "boom".into() }).unwrap();
        assert_eq!(out, serde_json::json!({ "type": "error", "message": "boom" }));
        let out = serde_json::to_value(ServerWsMessage::Pong).unwrap();
        assert_eq!(out, serde_json::json!({ "type": "pong" }));
    }
}
