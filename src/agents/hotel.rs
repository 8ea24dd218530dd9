use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use crate::llm::LlmAdvisor;
use crate::providers::{HotelProvider, RawHotelResult};
use crate::types::response::{Confidence, Hotel, HotelContext};

const MIN_HIGH_CONFIDENCE_PRICE: f64 = 10.0;
const MAX_HIGH_CONFIDENCE_PRICE: f64 = 2000.0;
const DEFAULT_TOP_N: usize = 5;

/// Declarative nested-field probe list (§4.7, §9): tried in order against
/// the provider's raw payload until one yields a plausible nightly price.
const PRICE_PROBES: &[&str] = &[
    "rate_per_night.extracted_lowest",
    "price.extracted_lowest",
    "nightly_rate",
    "rate.lowest",
    "price",
];

fn get_by_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = value;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Probe the raw payload for a nightly price, falling back to `total_rate /
/// nights` when only a stay total is present.
fn probe_nightly_price(raw: &Value, nights: i64) -> Option<f64> {
    for path in PRICE_PROBES {
        if let Some(value) = get_by_path(raw, path).and_then(Value::as_f64) {
            return Some(value);
        }
    }

    let total = get_by_path(raw, "total_rate.extracted_lowest")
        .or_else(|| get_by_path(raw, "total_rate"))
        .and_then(Value::as_f64)?;
    if nights > 0 {
        Some(total / nights as f64)
    } else {
        None
    }
}

fn heuristic_price(result: &RawHotelResult) -> f64 {
    (50.0 + f64::from(result.stars) * 30.0).clamp(MIN_HIGH_CONFIDENCE_PRICE, MAX_HIGH_CONFIDENCE_PRICE)
}

fn to_hotel(result: RawHotelResult, nights: i64) -> Hotel {
    let probed = probe_nightly_price(&result.raw, nights);
    let (price, confidence) = match probed {
        Some(price) if (MIN_HIGH_CONFIDENCE_PRICE..=MAX_HIGH_CONFIDENCE_PRICE).contains(&price) => {
            (price, Confidence::High)
        }
        _ => (heuristic_price(&result), Confidence::Estimated),
    };

    Hotel {
        name: result.name,
        price_per_night_usd: price,
        currency: "USD".to_string(),
        stars: result.stars,
        rating: result.rating,
        amenities: result.amenities,
        location: result.location,
        image_url: result.image_url,
        confidence,
    }
}

fn composite_score(hotel: &Hotel, min_price: f64, max_price: f64, max_rating: f32) -> f64 {
    let rating_norm = if max_rating > 0.0 { f64::from(hotel.rating) / f64::from(max_rating) } else { 0.0 };
    let price_range = (max_price - min_price).max(0.01);
    let price_norm = 1.0 - ((hotel.price_per_night_usd - min_price) / price_range);
    0.6 * rating_norm + 0.4 * price_norm
}

fn sort_hotels(hotels: &mut [Hotel]) {
    let min_price = hotels.iter().map(|h| h.price_per_night_usd).fold(f64::INFINITY, f64::min);
    let max_price = hotels.iter().map(|h| h.price_per_night_usd).fold(f64::NEG_INFINITY, f64::max);
    let max_rating = hotels.iter().map(|h| h.rating).fold(0.0f32, f32::max);

    hotels.sort_by(|a, b| {
        match (a.confidence, b.confidence) {
            (Confidence::High, Confidence::Estimated) => std::cmp::Ordering::Less,
            (Confidence::Estimated, Confidence::High) => std::cmp::Ordering::Greater,
            _ => {
                let score_a = composite_score(a, min_price, max_price, max_rating);
                let score_b = composite_score(b, min_price, max_price, max_rating);
                score_b.total_cmp(&score_a)
            }
        }
    });
}

pub struct HotelSearchOutcome {
    pub hotels: Vec<Hotel>,
    pub hotel_context: Option<HotelContext>,
}

pub async fn run(
    hotel_provider: Option<&Arc<dyn HotelProvider>>,
    llm: Option<&Arc<LlmAdvisor>>,
    destination: &str,
    check_in: chrono::NaiveDate,
    check_out: chrono::NaiveDate,
    guests: u32,
    include_hotel_context: bool,
    top_n: Option<usize>,
) -> (HotelSearchOutcome, Vec<String>) {
    let mut warnings = Vec::new();
    let nights = (check_out - check_in).num_days().max(1);

    let Some(provider) = hotel_provider else {
        warnings.push("no hotel provider configured; hotels list is empty".to_string());
        return (HotelSearchOutcome { hotels: Vec::new(), hotel_context: None }, warnings);
    };

    let raw = match provider.search(destination, check_in, check_out, guests).await {
        Ok(results) => results,
        Err(err) => {
            warn!(target: "travelcraft::agents::hotel", error = %err, "hotel search failed");
            warnings.push(format!("hotel search failed: {err}"));
            Vec::new()
        }
    };

    let mut hotels: Vec<Hotel> = raw.into_iter().map(|r| to_hotel(r, nights)).collect();
    sort_hotels(&mut hotels);
    hotels.truncate(top_n.unwrap_or(DEFAULT_TOP_N));

    let hotel_context = if include_hotel_context {
        match llm {
            Some(llm) => Some(build_hotel_context(llm, destination).await),
            None => {
                warnings.push("hotel context requested but no LLM advisor configured".to_string());
                None
            }
        }
    } else {
        None
    };

    (HotelSearchOutcome { hotels, hotel_context }, warnings)
}

/// Three concurrent LLM sub-tasks (§5): neighborhoods, seasonal pricing
/// level, tiered nightly averages.
async fn build_hotel_context(llm: &Arc<LlmAdvisor>, destination: &str) -> HotelContext {
    let (neighborhoods, seasonal, tiers) = tokio::join!(
        fetch_neighborhoods(llm, destination),
        fetch_seasonal_level(llm, destination),
        fetch_tiered_averages(llm, destination),
    );

    HotelContext {
        neighborhoods: neighborhoods.unwrap_or_default(),
        seasonal_price_level: seasonal.unwrap_or_else(|| "moderate".to_string()),
        tiered_nightly_averages: tiers.unwrap_or_default(),
    }
}

async fn fetch_neighborhoods(llm: &LlmAdvisor, destination: &str) -> Option<Vec<String>> {
    let prompt = format!(
        "List 3-5 popular tourist neighborhoods to stay in {destination}. Respond as JSON: {{\"neighborhoods\": [str]}}"
    );
    let value = llm
        .generate_json("You are a concise travel assistant. Reply with strict JSON only.", &prompt, Some(0.3), Some(200))
        .await?;
    value.get("neighborhoods")?.as_array().map(|arr| {
        arr.iter().filter_map(|v| v.as_str().map(str::to_string)).collect()
    })
}

async fn fetch_seasonal_level(llm: &LlmAdvisor, destination: &str) -> Option<String> {
    let prompt = format!(
        "Is the current hotel pricing season in {destination} low, moderate, or high? Respond as JSON: {{\"level\": \"low|moderate|high\"}}"
    );
    let value = llm
        .generate_json("You are a concise travel assistant. Reply with strict JSON only.", &prompt, Some(0.3), Some(60))
        .await?;
    value.get("level")?.as_str().map(str::to_string)
}

async fn fetch_tiered_averages(llm: &LlmAdvisor, destination: &str) -> Option<Vec<(String, f64)>> {
    let prompt = format!(
        "Give typical nightly hotel prices in USD for budget, mid, and luxury tiers in {destination}. \
         Respond as JSON: {{\"tiers\": [{{\"name\": str, \"avg_usd\": number}}]}}"
    );
    let value = llm
        .generate_json("You are a concise travel assistant. Reply with strict JSON only.", &prompt, Some(0.3), Some(150))
        .await?;
    value.get("tiers")?.as_array().map(|arr| {
        arr.iter()
            .filter_map(|v| {
                let name = v.get("name")?.as_str()?.to_string();
                let avg = v.get("avg_usd")?.as_f64()?;
                Some((name, avg))
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn probes_first_matching_field() {
        let raw = json!({"rate_per_night": {"extracted_lowest": 120.0}});
        assert_eq!(probe_nightly_price(&raw, 3), Some(120.0));
    }

    #[test]
    fn falls_back_to_total_over_nights() {
        let raw = json!({"total_rate": {"extracted_lowest": 300.0}});
        assert_eq!(probe_nightly_price(&raw, 3), Some(100.0));
    }

    #[test]
    fn high_confidence_only_within_band() {
        let result = RawHotelResult {
            name: "Test".into(), stars: 3.0, rating: 4.2, amenities: vec![],
            location: "Downtown".into(), image_url: None, currency: "USD".into(),
            raw: json!({"price": 5.0}),
        };
        let hotel = to_hotel(result, 2);
        assert_eq!(hotel.confidence, Confidence::Estimated);
    }
}
