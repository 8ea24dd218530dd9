use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cache::TtlCache;
use crate::llm::LlmAdvisor;
use crate::types::response::TransportMode;

const US_GDP_PER_CAPITA: f64 = 76_000.0;
const MIN_GROUND_DISTANCE_KM: f64 = 150.0;
const MAX_GROUND_DISTANCE_KM: f64 = 800.0;
const MIN_PRICING_MULTIPLIER: f64 = 0.01;
const MAX_PRICING_MULTIPLIER: f64 = 1.5;

#[derive(Debug, Clone, Copy)]
struct CountryFacts {
    area_km2: f64,
    population: f64,
    gdp_per_capita: f64,
    regional_factor: f64,
}

fn facts_table() -> &'static HashMap<&'static str, CountryFacts> {
    static TABLE: OnceLock<HashMap<&'static str, CountryFacts>> = OnceLock::new();
    TABLE.get_or_init(|| {
        HashMap::from([
            (
                "sri lanka",
                CountryFacts { area_km2: 65_610.0, population: 22_000_000.0, gdp_per_capita: 4_100.0, regional_factor: 0.9 },
            ),
            (
                "india",
                CountryFacts { area_km2: 3_287_263.0, population: 1_425_000_000.0, gdp_per_capita: 2_600.0, regional_factor: 0.85 },
            ),
            (
                "france",
                CountryFacts { area_km2: 551_695.0, population: 68_000_000.0, gdp_per_capita: 44_000.0, regional_factor: 1.05 },
            ),
            (
                "united states",
                CountryFacts { area_km2: 9_833_517.0, population: 335_000_000.0, gdp_per_capita: US_GDP_PER_CAPITA, regional_factor: 1.0 },
            ),
            (
                "japan",
                CountryFacts { area_km2: 377_975.0, population: 124_000_000.0, gdp_per_capita: 33_800.0, regional_factor: 1.1 },
            ),
            (
                "united kingdom",
                CountryFacts { area_km2: 243_610.0, population: 67_000_000.0, gdp_per_capita: 46_000.0, regional_factor: 1.05 },
            ),
            (
                "thailand",
                CountryFacts { area_km2: 513_120.0, population: 71_000_000.0, gdp_per_capita: 7_100.0, regional_factor: 0.8 },
            ),
            (
                "australia",
                CountryFacts { area_km2: 7_692_024.0, population: 26_000_000.0, gdp_per_capita: 64_000.0, regional_factor: 1.0 },
            ),
        ])
    })
}

/// Derived ground-transport strategy for a country (§4.3). Shared across
/// TravelAnalysis and TransportAgent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CountryStrategy {
    pub max_ground_distance_km: f64,
    pub preferred_modes: Vec<TransportMode>,
    pub pricing_multiplier: f64,
}

/// Per-country economic/geographic profile → [`CountryStrategy`], cached
/// with a 24h TTL. Falls back to a regional-tier table when the country is
/// not in the known facts set (§4.3).
pub struct CountryProfileCache {
    llm: Option<Arc<LlmAdvisor>>,
    cache: TtlCache<String, CountryStrategy>,
}

impl CountryProfileCache {
    pub fn new(llm: Option<Arc<LlmAdvisor>>, ttl: Duration) -> Self {
        Self { llm, cache: TtlCache::new(Some(ttl)) }
    }

    pub async fn strategy_for(&self, country: &str) -> CountryStrategy {
        let key = country.trim().to_lowercase();
        if let Some(cached) = self.cache.get(&key).await {
            return cached;
        }

        let strategy = self.compute_strategy(&key).await;
        self.cache.put(key, strategy.clone()).await;
        strategy
    }

    async fn compute_strategy(&self, key: &str) -> CountryStrategy {
        let Some(facts) = facts_table().get(key).copied() else {
            debug!(target: "travelcraft::geo", country = key, "no country facts, using regional-tier fallback");
            return fallback_tier_strategy();
        };

        let density = facts.population / facts.area_km2;
        let mut max_ground_distance_km =
            (facts.area_km2.sqrt() / 10.0).clamp(MIN_GROUND_DISTANCE_KM, MAX_GROUND_DISTANCE_KM);

        let preferred_modes = if density > 150.0 {
            vec![TransportMode::Train, TransportMode::Bus, TransportMode::CarRental]
        } else {
            max_ground_distance_km = (max_ground_distance_km * 1.1).min(MAX_GROUND_DISTANCE_KM);
            vec![TransportMode::CarRental, TransportMode::Train, TransportMode::Bus]
        };

        let mut pricing_multiplier = ((facts.gdp_per_capita / US_GDP_PER_CAPITA).sqrt()
            * facts.regional_factor)
            .clamp(MIN_PRICING_MULTIPLIER, MAX_PRICING_MULTIPLIER);

        if let Some(llm) = &self.llm {
            pricing_multiplier = self.refine_multiplier(llm, key, pricing_multiplier).await;
        }

        CountryStrategy { max_ground_distance_km, preferred_modes, pricing_multiplier }
    }

    async fn refine_multiplier(&self, llm: &LlmAdvisor, country: &str, baseline: f64) -> f64 {
        let prompt = format!(
            "Given a baseline cost-of-living multiplier of {baseline:.2} (USA=1.0) for {country}, \
             respond with a refined multiplier as JSON: {{\"multiplier\": number}}. Keep it within 30% of the baseline."
        );
        let Some(value) = llm
            .generate_json(
                "You are a terse economics assistant. Reply with strict JSON only.",
                &prompt,
                Some(0.2),
                Some(60),
            )
            .await
        else {
            return baseline;
        };

        value
            .get("multiplier")
            .and_then(|v| v.as_f64())
            .map(|refined| refined.clamp(baseline * 0.7, baseline * 1.3))
            .unwrap_or(baseline)
            .clamp(MIN_PRICING_MULTIPLIER, MAX_PRICING_MULTIPLIER)
    }
}

/// `{budget, mid, expensive}` regional-tier fallback (§4.3) used when a
/// country has no entry in the facts table. Defaults to the `mid` tier —
/// without a region signal there is nothing to pick budget/expensive with.
fn fallback_tier_strategy() -> CountryStrategy {
    CountryStrategy {
        max_ground_distance_km: 400.0,
        preferred_modes: vec![TransportMode::Bus, TransportMode::Train, TransportMode::CarRental],
        pricing_multiplier: 0.6,
    }
}
