use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use tracing::{debug, warn};

use crate::cache::TtlCache;
use crate::llm::LlmAdvisor;

pub const UNKNOWN: &str = "UNKNOWN";

/// Result of resolving a free-text city to an airport code and country
/// (§4.1). Either field may be [`UNKNOWN`] if every tier failed.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AirportResolution {
    pub code: String,
    pub country: String,
}

impl AirportResolution {
    fn unknown() -> Self {
        Self { code: UNKNOWN.to_string(), country: UNKNOWN.to_string() }
    }
}

/// City → (IATA code, country). ~100 high-traffic cities in production;
/// this crate ships a smaller but directly extensible seed set — add
/// entries here, lowercase key, nothing else needs to change.
fn curated_map() -> &'static HashMap<&'static str, (&'static str, &'static str)> {
    static MAP: OnceLock<HashMap<&'static str, (&'static str, &'static str)>> = OnceLock::new();
    MAP.get_or_init(|| {
        HashMap::from([
            ("galle", ("CMB", "Sri Lanka")),
            ("matara", ("CMB", "Sri Lanka")),
            ("colombo", ("CMB", "Sri Lanka")),
            ("paris", ("CDG", "France")),
            ("london", ("LHR", "United Kingdom")),
            ("new york", ("JFK", "United States")),
            ("new york city", ("JFK", "United States")),
            ("nyc", ("JFK", "United States")),
            ("tokyo", ("NRT", "Japan")),
            ("delhi", ("DEL", "India")),
            ("new delhi", ("DEL", "India")),
            ("mumbai", ("BOM", "India")),
            ("bangalore", ("BLR", "India")),
            ("bengaluru", ("BLR", "India")),
            ("singapore", ("SIN", "Singapore")),
            ("dubai", ("DXB", "United Arab Emirates")),
            ("bangkok", ("BKK", "Thailand")),
            ("sydney", ("SYD", "Australia")),
            ("melbourne", ("MEL", "Australia")),
            ("rome", ("FCO", "Italy")),
            ("milan", ("MXP", "Italy")),
            ("madrid", ("MAD", "Spain")),
            ("barcelona", ("BCN", "Spain")),
            ("berlin", ("BER", "Germany")),
            ("munich", ("MUC", "Germany")),
            ("amsterdam", ("AMS", "Netherlands")),
            ("lisbon", ("LIS", "Portugal")),
            ("istanbul", ("IST", "Turkey")),
            ("cairo", ("CAI", "Egypt")),
            ("cape town", ("CPT", "South Africa")),
            ("johannesburg", ("JNB", "South Africa")),
            ("nairobi", ("NBO", "Kenya")),
            ("los angeles", ("LAX", "United States")),
            ("san francisco", ("SFO", "United States")),
            ("chicago", ("ORD", "United States")),
            ("miami", ("MIA", "United States")),
            ("toronto", ("YYZ", "Canada")),
            ("vancouver", ("YVR", "Canada")),
            ("mexico city", ("MEX", "Mexico")),
            ("sao paulo", ("GRU", "Brazil")),
            ("rio de janeiro", ("GIG", "Brazil")),
            ("buenos aires", ("EZE", "Argentina")),
            ("lima", ("LIM", "Peru")),
            ("bogota", ("BOG", "Colombia")),
            ("seoul", ("ICN", "South Korea")),
            ("beijing", ("PEK", "China")),
            ("shanghai", ("PVG", "China")),
            ("hong kong", ("HKG", "Hong Kong")),
            ("kuala lumpur", ("KUL", "Malaysia")),
            ("jakarta", ("CGK", "Indonesia")),
            ("manila", ("MNL", "Philippines")),
            ("auckland", ("AKL", "New Zealand")),
            ("honolulu", ("HNL", "United States")),
            ("reykjavik", ("KEF", "Iceland")),
            ("zurich", ("ZRH", "Switzerland")),
            ("vienna", ("VIE", "Austria")),
            ("prague", ("PRG", "Czech Republic")),
            ("athens", ("ATH", "Greece")),
            ("doha", ("DOH", "Qatar")),
            ("tel aviv", ("TLV", "Israel")),
            ("kathmandu", ("KTM", "Nepal")),
            ("male", ("MLE", "Maldives")),
            ("kandy", ("CMB", "Sri Lanka")),
        ])
    })
}

/// Country → primary international gateway, used by tier 4 (§4.1).
fn country_gateway_map() -> &'static HashMap<&'static str, &'static str> {
    static MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    MAP.get_or_init(|| {
        HashMap::from([
            ("sri lanka", "CMB"),
            ("france", "CDG"),
            ("united kingdom", "LHR"),
            ("united states", "JFK"),
            ("japan", "NRT"),
            ("india", "DEL"),
            ("singapore", "SIN"),
            ("united arab emirates", "DXB"),
            ("thailand", "BKK"),
            ("australia", "SYD"),
            ("italy", "FCO"),
            ("spain", "MAD"),
            ("germany", "BER"),
            ("netherlands", "AMS"),
        ])
    })
}

fn is_known_code(code: &str) -> bool {
    curated_map().values().any(|(c, _)| *c == code)
        || country_gateway_map().values().any(|c| *c == code)
}

/// Resolves free-text cities to IATA codes and countries via the 5-tier
/// strategy of §4.1, memoizing per-input (case-insensitive).
pub struct AirportResolver {
    llm: Option<Arc<LlmAdvisor>>,
    cache: TtlCache<String, AirportResolution>,
}

impl AirportResolver {
    pub fn new(llm: Option<Arc<LlmAdvisor>>) -> Self {
        Self { llm, cache: TtlCache::new(None) }
    }

    pub async fn resolve(&self, city: &str) -> AirportResolution {
        let key = city.trim().to_lowercase();
        if let Some(cached) = self.cache.get(&key).await {
            return cached;
        }

        let resolution = self.resolve_uncached(city, &key).await;
        self.cache.put(key, resolution.clone()).await;
        resolution
    }

    async fn resolve_uncached(&self, city: &str, normalized: &str) -> AirportResolution {
        // Tier 1: already a known 3-letter code.
        let upper = city.trim().to_uppercase();
        if upper.len() == 3 && upper.chars().all(|c| c.is_ascii_alphabetic()) && is_known_code(&upper) {
            debug!(target: "travelcraft::geo", tier = 1, %upper, "airport resolved");
            if let Some((_, country)) = curated_map().values().find(|(c, _)| *c == upper) {
                return AirportResolution { code: upper, country: country.to_string() };
            }
            if let Some((country, _)) = country_gateway_map().iter().find(|(_, c)| **c == upper) {
                return AirportResolution { code: upper, country: country.to_string() };
            }
        }

        // Tier 2: curated city map.
        if let Some((code, country)) = curated_map().get(normalized) {
            debug!(target: "travelcraft::geo", tier = 2, city = normalized, "airport resolved");
            return AirportResolution { code: code.to_string(), country: country.to_string() };
        }

        // Tier 3: LLM/search probe (skipped if no advisor configured).
        let mut probed_country: Option<String> = None;
        if let Some(llm) = &self.llm {
            let prompt = format!(
                "Nearest IATA airport to {city}. Respond ONLY as JSON: {{\"code\": \"XXX\", \"country\": \"Country Name\"}}"
            );
            if let Some(value) = llm
                .generate_json(
                    "You are a precise travel-geography assistant. Reply with strict JSON only.",
                    &prompt,
                    Some(0.0),
                    Some(100),
                )
                .await
            {
                let code = value.get("code").and_then(|v| v.as_str()).map(str::to_uppercase);
                let country = value.get("country").and_then(|v| v.as_str()).map(str::to_string);

                if let Some(code) = code {
                    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
                        debug!(target: "travelcraft::geo", tier = 3, city, "airport resolved");
                        return AirportResolution {
                            code,
                            country: country.unwrap_or_else(|| UNKNOWN.to_string()),
                        };
                    }
                }
                probed_country = country;
            }
        }

        // Tier 4: country known, code not — use the country's primary gateway.
        if let Some(country) = probed_country {
            if let Some(code) = country_gateway_map().get(country.to_lowercase().as_str()) {
                debug!(target: "travelcraft::geo", tier = 4, city, "airport resolved via country fallback");
                return AirportResolution { code: code.to_string(), country };
            }
        }

        // Tier 5: unresolved.
        warn!(target: "travelcraft::geo", city, "airport resolution failed, returning UNKNOWN");
        AirportResolution::unknown()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn resolves_curated_city_case_insensitively() {
        let resolver = AirportResolver::new(None);
        let resolution = resolver.resolve("GALLE").await;
        assert_eq!(resolution.code, "CMB");
        assert_eq!(resolution.country, "Sri Lanka");
    }

    #[tokio::test]
    async fn resolves_known_code_directly() {
        let resolver = AirportResolver::new(None);
        let resolution = resolver.resolve("CDG").await;
        assert_eq!(resolution.code, "CDG");
        assert_eq!(resolution.country, "France");
    }

    #[tokio::test]
    async fn falls_back_to_unknown_without_llm() {
        let resolver = AirportResolver::new(None);
        let resolution = resolver.resolve("Nowhereville").await;
        assert_eq!(resolution.code, UNKNOWN);
        assert_eq!(resolution.country, UNKNOWN);
    }

    #[tokio::test]
    async fn memoizes_results() {
        let resolver = AirportResolver::new(None);
        let first = resolver.resolve("Paris").await;
        let second = resolver.resolve("paris").await;
        assert_eq!(first, second);
    }
}
