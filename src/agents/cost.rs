use std::sync::Arc;

use crate::geo::CountryStrategy;
use crate::llm::LlmAdvisor;
use crate::types::request::Vibe;
use crate::types::response::{CostBreakdown, Flight, Hotel};

use super::transport::TransportOutcome;

const FALLBACK_NIGHTLY_USD: f64 = 40.0;
const BASELINE_FOOD_PER_DAY_USD: f64 = 30.0;
const BASELINE_ACTIVITIES_PER_DAY_USD: f64 = 25.0;
const BASELINE_MISC_PER_DAY_USD: f64 = 10.0;

#[derive(Debug, Clone, Copy)]
enum Tier {
    Budget,
    Mid,
    Expensive,
}

fn tier_for(multiplier: f64) -> Tier {
    if multiplier < 0.4 {
        Tier::Budget
    } else if multiplier < 0.9 {
        Tier::Mid
    } else {
        Tier::Expensive
    }
}

fn band_for(category: Category, tier: Tier) -> (f64, f64) {
    match (category, tier) {
        (Category::Food, Tier::Budget) => (5.0, 40.0),
        (Category::Food, Tier::Mid) => (15.0, 90.0),
        (Category::Food, Tier::Expensive) => (30.0, 200.0),
        (Category::Activities, Tier::Budget) => (3.0, 50.0),
        (Category::Activities, Tier::Mid) => (10.0, 120.0),
        (Category::Activities, Tier::Expensive) => (20.0, 250.0),
        (Category::Misc, Tier::Budget) => (1.0, 20.0),
        (Category::Misc, Tier::Mid) => (5.0, 50.0),
        (Category::Misc, Tier::Expensive) => (10.0, 100.0),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Category {
    Food,
    Activities,
    Misc,
}

/// Vibe multiplier tables (§4.9, P6), applied to the per-person daily
/// baseline before scaling by days and travelers.
fn vibe_multiplier(category: Category, vibe: Vibe) -> f64 {
    match category {
        Category::Food => match vibe {
            Vibe::Culinary => 1.5,
            Vibe::Romantic => 1.3,
            Vibe::Wellness => 1.2,
            Vibe::Cultural | Vibe::Adventure | Vibe::Beach | Vibe::Nature => 1.0,
        },
        Category::Activities => match vibe {
            Vibe::Adventure => 1.5,
            Vibe::Wellness => 1.4,
            Vibe::Romantic => 1.3,
            Vibe::Culinary => 1.2,
            Vibe::Beach => 0.8,
            Vibe::Cultural | Vibe::Nature => 1.0,
        },
        Category::Misc => match vibe {
            Vibe::Romantic => 1.3,
            Vibe::Wellness => 1.2,
            _ => 1.0,
        },
    }
}

pub struct CostInputs<'a> {
    pub flights: &'a [Flight],
    pub hotels: &'a [Hotel],
    pub transport: &'a TransportOutcome,
    pub country: &'a str,
    pub strategy: &'a CountryStrategy,
    pub vibe: Vibe,
    pub travelers: u32,
    pub trip_duration_days: i64,
    pub rooms_needed: u32,
}

/// Assembles the breakdown in the fixed category order required for
/// reproducible totals (§5): flights, accommodation, transportation, food,
/// activities, miscellaneous.
pub async fn run(llm: Option<&Arc<LlmAdvisor>>, inputs: CostInputs<'_>) -> (CostBreakdown, Vec<String>) {
    let mut warnings = Vec::new();

    let flights = inputs.flights.first().map(|f| f.price_usd).unwrap_or(0.0);

    let nightly = inputs
        .hotels
        .first()
        .map(|h| h.price_per_night_usd)
        .unwrap_or_else(|| FALLBACK_NIGHTLY_USD * inputs.strategy.pricing_multiplier);
    let accommodation = nightly * inputs.trip_duration_days as f64 * f64::from(inputs.rooms_needed);

    let transportation_inter_city = inputs
        .transport
        .inter_city_options
        .iter()
        .map(|opt| opt.cost_per_trip_usd)
        .fold(f64::INFINITY, f64::min);
    let transportation_inter_city =
        if inputs.transport.inter_city_options.is_empty() { 0.0 } else { transportation_inter_city };
    let transportation_local =
        inputs.transport.local.local_total_usd + inputs.transport.local.airport_transfer_usd.unwrap_or(0.0);

    let (food, food_warning) = estimate_category(
        llm, Category::Food, inputs.country, inputs.strategy, inputs.vibe, inputs.travelers, inputs.trip_duration_days,
    )
    .await;
    let (activities, activities_warning) = estimate_category(
        llm, Category::Activities, inputs.country, inputs.strategy, inputs.vibe, inputs.travelers, inputs.trip_duration_days,
    )
    .await;
    let (miscellaneous, misc_warning) = estimate_category(
        llm, Category::Misc, inputs.country, inputs.strategy, inputs.vibe, inputs.travelers, inputs.trip_duration_days,
    )
    .await;
    warnings.extend(food_warning.into_iter().chain(activities_warning).chain(misc_warning));

    let total =
        flights + accommodation + transportation_inter_city + transportation_local + food + activities + miscellaneous;

    (
        CostBreakdown {
            flights,
            accommodation,
            transportation_inter_city,
            transportation_local,
            food,
            activities,
            miscellaneous,
            total,
        },
        warnings,
    )
}

async fn estimate_category(
    llm: Option<&Arc<LlmAdvisor>>,
    category: Category,
    country: &str,
    strategy: &CountryStrategy,
    vibe: Vibe,
    travelers: u32,
    trip_duration_days: i64,
) -> (f64, Option<String>) {
    let category_name = match category {
        Category::Food => "food",
        Category::Activities => "activities",
        Category::Misc => "miscellaneous spending",
    };

    let baseline_per_day = match llm {
        Some(llm) => {
            let prompt = format!(
                "Estimate typical daily {category_name} cost per person in USD while traveling in {country}. \
                 Respond as JSON: {{\"daily_per_person_usd\": number}}"
            );
            llm.generate_json(
                "You are a terse travel-budgeting assistant. Reply with strict JSON only.",
                &prompt,
                Some(0.3),
                Some(80),
            )
            .await
            .and_then(|v| v.get("daily_per_person_usd")?.as_f64())
        }
        None => None,
    };

    let (baseline_per_day, warning) = match baseline_per_day {
        Some(value) => (value, None),
        None => {
            let fallback = match category {
                Category::Food => BASELINE_FOOD_PER_DAY_USD,
                Category::Activities => BASELINE_ACTIVITIES_PER_DAY_USD,
                Category::Misc => BASELINE_MISC_PER_DAY_USD,
            } * strategy.pricing_multiplier;
            (fallback, Some(format!("{category_name} cost fell back to the deterministic estimate")))
        }
    };

    let tier = tier_for(strategy.pricing_multiplier);
    let (min, max) = band_for(category, tier);
    let clamped = baseline_per_day.clamp(min, max);
    let warning = if clamped != baseline_per_day {
        Some(format!("{category_name} estimate clamped to the {country} pricing tier band"))
    } else {
        warning
    };

    let multiplier = vibe_multiplier(category, vibe);
    let total = clamped * trip_duration_days as f64 * f64::from(travelers) * multiplier;

    (total, warning)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn food_multiplier_matches_table() {
        assert_eq!(vibe_multiplier(Category::Food, Vibe::Culinary), 1.5);
        assert_eq!(vibe_multiplier(Category::Food, Vibe::Romantic), 1.3);
        assert_eq!(vibe_multiplier(Category::Food, Vibe::Wellness), 1.2);
        assert_eq!(vibe_multiplier(Category::Food, Vibe::Cultural), 1.0);
    }

    #[test]
    fn activities_multiplier_matches_table() {
        assert_eq!(vibe_multiplier(Category::Activities, Vibe::Adventure), 1.5);
        assert_eq!(vibe_multiplier(Category::Activities, Vibe::Beach), 0.8);
    }

    #[test]
    fn misc_multiplier_matches_table() {
        assert_eq!(vibe_multiplier(Category::Misc, Vibe::Romantic), 1.3);
        assert_eq!(vibe_multiplier(Category::Misc, Vibe::Adventure), 1.0);
    }

    #[tokio::test]
    async fn vibe_changes_food_total_by_exact_multiplier() {
        let strategy = CountryStrategy {
            max_ground_distance_km: 150.0,
            preferred_modes: vec![],
            pricing_multiplier: 1.0,
        };
        let (cultural_cost, _) = estimate_category(None, Category::Food, "Testland", &strategy, Vibe::Cultural, 2, 3).await;
        let (culinary_cost, _) = estimate_category(None, Category::Food, "Testland", &strategy, Vibe::Culinary, 2, 3).await;
        assert!((culinary_cost / cultural_cost - 1.5).abs() < 1e-9);
    }
}
