//! AI enrichment: opportunity score, readiness and a short summary per
//! business. An LLM is used when configured; the heuristic always backs it.

pub mod heuristic;

use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, warn};
use crate::errors::{with_retry, BlackCardError, RetryConfig};
use crate::llm::LLMProvider;
use crate::models::{AiReadiness, Business, Enrichment};
use crate::outreach::{detect_signals, OfferCatalog};
use crate::utils::truncation::truncate_summary;

const SYSTEM_PROMPT: &str = "Eres analista comercial de una agencia de automatización con IA para negocios de hospitalidad en Colombia. Evalúas qué tan buena oportunidad de venta es un negocio.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrichmentSource {
    Llm,
    Heuristic,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichmentOutcome {
    #[serde(flatten)]
    pub enrichment: Enrichment,
    pub source: EnrichmentSource,
}

fn response_schema() -> Value {
    json!({
        "type": "object",
        "required": ["aiScore", "aiSummary"],
        "properties": {
            "aiScore": {"type": "integer", "minimum": 0, "maximum": 100},
            "aiSummary": {"type": "string", "maxLength": 1000}
        }
    })
}

fn build_prompt(business: &Business, signals: &[&str], offer: &str) -> String {
    let facts = json!({
        "name": business.name,
        "category": business.category,
        "city": business.city,
        "website": business.website,
        "instagram": business.instagram,
        "rating": business.rating,
        "reviewCount": business.review_count,
        "responseTimeHours": business.response_time_hours,
        "hasPhone": business.phone.is_some(),
        "hasEmail": business.email.is_some(),
    });
    format!(
        "Negocio:\n{}\n\nSeñales detectadas: {}\nOferta sugerida: {}\n\n\
         Da un puntaje de oportunidad de 0 a 100 (100 = necesita automatización y puede pagarla) \
         y un resumen de dos o tres frases en español para el vendedor.",
        serde_json::to_string_pretty(&facts).unwrap_or_default(),
        if signals.is_empty() { "ninguna".to_string() } else { signals.join(", ") },
        offer,
    )
}

/// Read the fields we need out of the model's JSON. Anything out of range or
/// missing is an error so the caller falls back.
fn parse_llm_enrichment(value: &Value) -> Result<Enrichment, BlackCardError> {
    let score = value["aiScore"]
        .as_i64()
        .or_else(|| value["aiScore"].as_f64().map(|f| f.round() as i64))
        .ok_or_else(|| BlackCardError::LLMApi("Response is missing aiScore".into()))?;
    if !(0..=100).contains(&score) {
        return Err(BlackCardError::LLMApi(format!("aiScore {} out of range", score)));
    }
    let summary = value["aiSummary"]
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| BlackCardError::LLMApi("Response is missing aiSummary".into()))?;
    Ok(Enrichment {
        ai_score: score,
        ai_readiness: AiReadiness::from_score(score),
        ai_summary: truncate_summary(summary),
    })
}

/// Score one business. Never fails: LLM problems are logged and the
/// heuristic result is returned instead.
pub async fn enrich_business(
    business: &Business,
    catalog: &OfferCatalog,
    llm: Option<&dyn LLMProvider>,
    retry: &RetryConfig,
) -> EnrichmentOutcome {
    let signals = detect_signals(business);
    let offer = catalog.match_offer(business.category_kind(), &signals);

    if let Some(llm) = llm {
        let names: Vec<&str> = signals.iter().map(|s| s.as_str()).collect();
        let prompt = build_prompt(business, &names, &offer.offer);
        let schema = response_schema();
        let (prompt, schema) = (&prompt, &schema);
        let result = with_retry("enrich_business", retry, || async move {
            let value = llm.complete_structured(prompt, schema, Some(SYSTEM_PROMPT)).await?;
            parse_llm_enrichment(&value)
        })
        .await;

        match result {
            Ok(enrichment) => {
                debug!(business_id = %business.id, score = enrichment.ai_score, provider = llm.provider_name(), "LLM enrichment");
                return EnrichmentOutcome { enrichment, source: EnrichmentSource::Llm };
            }
            Err(e) => {
                warn!(business_id = %business.id, error = %e, "LLM enrichment failed, using heuristic");
            }
        }
    }

    EnrichmentOutcome {
        enrichment: heuristic::enrich(business, &signals, &offer),
        source: EnrichmentSource::Heuristic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use crate::llm::LLMResponse;

    struct FixedLlm {
        reply: Result<Value, fn() -> BlackCardError>,
        calls: AtomicU32,
    }

    #[async_trait]
    impl LLMProvider for FixedLlm {
        async fn complete(&self, _prompt: &str, _system: Option<&str>) -> Result<LLMResponse, BlackCardError> {
            Err(BlackCardError::LLMApi("unused".into()))
        }

        async fn complete_structured(&self, _prompt: &str, _schema: &Value, _system: Option<&str>) -> Result<Value, BlackCardError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Ok(v) => Ok(v.clone()),
                Err(make) => Err(make()),
            }
        }

        fn provider_name(&self) -> &str { "fixed" }
        fn model_name(&self) -> &str { "fixed-1" }
    }

    fn business() -> Business {
        Business {
            id: "b1".into(),
            name: "Hostal Mar".into(),
            category: "hostel".into(),
            city: "Santa Marta".into(),
            rating: Some(4.2),
            review_count: Some(40),
            ..Default::default()
        }
    }

    fn fail_fast() -> RetryConfig {
        RetryConfig { max_retries: 0, fail_fast: true }
    }

    #[tokio::test]
    async fn test_heuristic_without_llm() {
        let out = enrich_business(&business(), &OfferCatalog::new(), None, &fail_fast()).await;
        assert_eq!(out.source, EnrichmentSource::Heuristic);
        assert_eq!(out.enrichment.ai_readiness, AiReadiness::from_score(out.enrichment.ai_score));
    }

    #[tokio::test]
    async fn test_llm_result_used() {
        let llm = FixedLlm {
            reply: Ok(json!({"aiScore": 82, "aiSummary": "Buen candidato."})),
            calls: AtomicU32::new(0),
        };
        let out = enrich_business(&business(), &OfferCatalog::new(), Some(&llm), &fail_fast()).await;
        assert_eq!(out.source, EnrichmentSource::Llm);
        assert_eq!(out.enrichment.ai_score, 82);
        assert_eq!(out.enrichment.ai_readiness, AiReadiness::High);
        assert_eq!(out.enrichment.ai_summary, "Buen candidato.");
    }

    #[tokio::test]
    async fn test_llm_error_falls_back() {
        let llm = FixedLlm {
            reply: Err(|| BlackCardError::LLMApi("boom".into())),
            calls: AtomicU32::new(0),
        };
        let out = enrich_business(&business(), &OfferCatalog::new(), Some(&llm), &fail_fast()).await;
        assert_eq!(out.source, EnrichmentSource::Heuristic);
        assert_eq!(llm.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_llm_out_of_range_falls_back() {
        let llm = FixedLlm {
            reply: Ok(json!({"aiScore": 140, "aiSummary": "x"})),
            calls: AtomicU32::new(0),
        };
        let out = enrich_business(&business(), &OfferCatalog::new(), Some(&llm), &fail_fast()).await;
        assert_eq!(out.source, EnrichmentSource::Heuristic);
    }

    #[test]
    fn test_parse_accepts_float_score() {
        let e = parse_llm_enrichment(&json!({"aiScore": 55.4, "aiSummary": " ok "})).unwrap();
        assert_eq!(e.ai_score, 55);
        assert_eq!(e.ai_readiness, AiReadiness::Medium);
        assert_eq!(e.ai_summary, "ok");
    }
}
