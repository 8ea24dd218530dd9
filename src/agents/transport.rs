use std::sync::Arc;

use crate::geo::CountryStrategy;
use crate::llm::LlmAdvisor;
use crate::types::response::{Confidence, LocalTransportation, TransportMode, TransportOption};

const MIN_TRAIN_PRICE_PER_KM: f64 = 0.009;
const MIN_TRAIN_FLOOR_USD: f64 = 0.40;
const TAXI_BASE_USD: f64 = 6.0;
const TAXI_PER_KM_USD: f64 = 0.5;
const CAR_RENTAL_BASE_USD: f64 = 20.0;
const CAR_RENTAL_PER_KM_USD: f64 = 0.6;
const LOCAL_DAILY_BASE_USD: f64 = 15.0;
const AIRPORT_TRANSFER_BASE_USD: f64 = 15.0;

pub struct TransportOutcome {
    pub inter_city_options: Vec<TransportOption>,
    pub local: LocalTransportation,
    pub cost_total: f64,
}

/// Inter-city ground options (whenever origin and destination share a
/// country) plus the always-on local/daily estimate and conditional
/// airport transfers (§4.8).
#[allow(clippy::too_many_arguments)]
pub async fn run(
    llm: Option<&Arc<LlmAdvisor>>,
    country: &str,
    strategy: &CountryStrategy,
    same_country: bool,
    distance_km: f64,
    travelers: u32,
    trip_duration_days: i64,
    has_flights: bool,
) -> (TransportOutcome, Vec<String>) {
    let mut warnings = Vec::new();

    // Reachability is gated on same_country alone: the distance-vs-strategy
    // comparison drives Orchestrator's skip_flight_search decision, not
    // whether ground alternatives are worth presenting. A same-country trip
    // far beyond the comfortable ground radius (e.g. Delhi -> Mumbai) still
    // surfaces a long-distance train/bus/car option alongside flights.
    let inter_city_reached = same_country;
    let inter_city_options = if inter_city_reached {
        let (options, inter_warnings) =
            inter_city_options(llm, country, strategy, distance_km, travelers).await;
        warnings.extend(inter_warnings);
        options
    } else {
        Vec::new()
    };

    let (local, local_warnings) =
        local_transportation(llm, country, strategy, trip_duration_days, has_flights).await;
    warnings.extend(local_warnings);

    let inter_city_total: f64 = inter_city_options
        .iter()
        .map(|opt| opt.cost_per_trip_usd)
        .fold(f64::INFINITY, f64::min)
        .max(0.0);
    let inter_city_total = if inter_city_options.is_empty() { 0.0 } else { inter_city_total };

    let cost_total = inter_city_total + local.local_total_usd + local.airport_transfer_usd.unwrap_or(0.0);

    (TransportOutcome { inter_city_options, local, cost_total }, warnings)
}

/// Step 1: route analysis — country, urban/rural character, tourism level,
/// infrastructure quality, as a short descriptive string used to ground the
/// pricing step.
async fn route_analysis(llm: &LlmAdvisor, country: &str, distance_km: f64) -> Option<String> {
    let prompt = format!(
        "Describe in one sentence the ground-transport route character for a {distance_km:.0}km trip \
         within {country}: urban/rural mix, tourism level, infrastructure quality."
    );
    llm.generate("You are a terse travel-infrastructure analyst.", &prompt, Some(0.3), Some(120))
        .await
        .ok()
}

struct EconomicContext {
    gdp_per_capita: f64,
    monthly_income: f64,
    cost_of_living_index: f64,
}

/// Step 2: economic context — GDP/capita, monthly income, cost-of-living
/// index for `country`.
async fn economic_context(llm: &LlmAdvisor, country: &str) -> Option<EconomicContext> {
    let prompt = format!(
        "Estimate for {country}: GDP per capita (USD), average monthly income (USD), and a \
         cost-of-living index where USA=100. Respond as JSON: \
         {{\"gdp_per_capita\": number, \"monthly_income\": number, \"cost_of_living_index\": number}}"
    );
    let value = llm
        .generate_json("You are a terse economics assistant. Reply with strict JSON only.", &prompt, Some(0.2), Some(150))
        .await?;
    Some(EconomicContext {
        gdp_per_capita: value.get("gdp_per_capita")?.as_f64()?,
        monthly_income: value.get("monthly_income")?.as_f64()?,
        cost_of_living_index: value.get("cost_of_living_index")?.as_f64()?,
    })
}

struct LocalPrices {
    train_per_person: Option<f64>,
    bus_per_person: Option<f64>,
    taxi_shared: Option<f64>,
    car_rental_shared: Option<f64>,
}

/// Step 3: local price research — one-way prices per mode, grounded by the
/// route and economic context.
async fn local_price_research(
    llm: &LlmAdvisor,
    country: &str,
    route_context: &str,
    economics: &EconomicContext,
    distance_km: f64,
) -> Option<LocalPrices> {
    let prompt = format!(
        "Route context: {route_context}\nCost-of-living index: {:.0} (USA=100). Monthly income: ${:.0}.\n\
         For a one-way {distance_km:.0}km trip in {country}, estimate one-way prices in USD: train \
         (per person), bus (per person), taxi (shared total for the group), car rental (shared total \
         per day). Respond as JSON: {{\"train\": number, \"bus\": number, \"taxi\": number, \"car_rental\": number}}",
        economics.cost_of_living_index, economics.monthly_income
    );
    let value = llm
        .generate_json("You are a terse ground-transport pricing assistant. Reply with strict JSON only.", &prompt, Some(0.3), Some(150))
        .await?;

    Some(LocalPrices {
        train_per_person: value.get("train").and_then(|v| v.as_f64()),
        bus_per_person: value.get("bus").and_then(|v| v.as_f64()),
        taxi_shared: value.get("taxi").and_then(|v| v.as_f64()),
        car_rental_shared: value.get("car_rental").and_then(|v| v.as_f64()),
    })
}

/// Step 4 + 5: scale by travelers where per-seat, keep shared modes
/// unscaled, double for the round trip, then enforce floors/ceilings and
/// sanity-check against the country's pricing multiplier.
///
/// **Invariant** (P5): a shared-mode price is never multiplied by
/// travelers a second time at this or any later layer.
fn cost_calculation_and_validation(
    prices: LocalPrices,
    strategy: &CountryStrategy,
    distance_km: f64,
    travelers: u32,
) -> Vec<TransportOption> {
    let multiplier = strategy.pricing_multiplier;
    let travelers_f = f64::from(travelers);

    let train_one_way = prices
        .train_per_person
        .unwrap_or_else(|| fallback_train_price(distance_km) / multiplier.max(0.01) * multiplier)
        .max(train_floor(distance_km));
    let bus_one_way = prices.bus_per_person.unwrap_or(train_one_way * 0.7).max(train_floor(distance_km) * 0.6);
    let taxi_one_way = prices
        .taxi_shared
        .unwrap_or_else(|| fallback_taxi_price(distance_km, multiplier));
    let car_rental_one_way = prices
        .car_rental_shared
        .unwrap_or_else(|| fallback_car_rental_price(distance_km, multiplier));

    vec![
        TransportOption {
            mode: TransportMode::Train,
            cost_per_trip_usd: train_one_way * travelers_f * 2.0,
            duration_minutes: (distance_km / 60.0 * 60.0) as u32,
            distance_km,
            description: "Round-trip train fare, per-seat pricing".to_string(),
            confidence: if prices.train_per_person.is_some() { Confidence::High } else { Confidence::Estimated },
        },
        TransportOption {
            mode: TransportMode::Bus,
            cost_per_trip_usd: bus_one_way * travelers_f * 2.0,
            duration_minutes: (distance_km / 45.0 * 60.0) as u32,
            distance_km,
            description: "Round-trip bus fare, per-seat pricing".to_string(),
            confidence: if prices.bus_per_person.is_some() { Confidence::High } else { Confidence::Estimated },
        },
        TransportOption {
            mode: TransportMode::Taxi,
            // Shared total: never multiplied by travelers (P5).
            cost_per_trip_usd: taxi_one_way * 2.0,
            duration_minutes: (distance_km / 70.0 * 60.0) as u32,
            distance_km,
            description: "Round-trip taxi, shared group total".to_string(),
            confidence: if prices.taxi_shared.is_some() { Confidence::High } else { Confidence::Estimated },
        },
        TransportOption {
            mode: TransportMode::CarRental,
            cost_per_trip_usd: car_rental_one_way * 2.0,
            duration_minutes: (distance_km / 70.0 * 60.0) as u32,
            distance_km,
            description: "Round-trip car rental, shared group total".to_string(),
            confidence: if prices.car_rental_shared.is_some() { Confidence::High } else { Confidence::Estimated },
        },
    ]
}

fn train_floor(distance_km: f64) -> f64 {
    MIN_TRAIN_FLOOR_USD.max(MIN_TRAIN_PRICE_PER_KM * distance_km)
}

fn fallback_train_price(distance_km: f64) -> f64 {
    train_floor(distance_km)
}

fn fallback_taxi_price(distance_km: f64, multiplier: f64) -> f64 {
    (TAXI_BASE_USD + TAXI_PER_KM_USD * distance_km) * multiplier
}

fn fallback_car_rental_price(distance_km: f64, multiplier: f64) -> f64 {
    (CAR_RENTAL_BASE_USD + CAR_RENTAL_PER_KM_USD * distance_km) * multiplier
}

async fn inter_city_options(
    llm: Option<&Arc<LlmAdvisor>>,
    country: &str,
    strategy: &CountryStrategy,
    distance_km: f64,
    travelers: u32,
) -> (Vec<TransportOption>, Vec<String>) {
    let mut warnings = Vec::new();

    let prices = match llm {
        Some(llm) => {
            let context = route_analysis(llm, country, distance_km).await;
            let economics = economic_context(llm, country).await;
            match (context, economics) {
                (Some(context), Some(economics)) => {
                    local_price_research(llm, country, &context, &economics, distance_km).await
                }
                _ => None,
            }
        }
        None => None,
    };

    if prices.is_none() {
        warnings.push("inter-city transport pricing fell back to the deterministic formula".to_string());
    }

    let prices = prices.unwrap_or(LocalPrices {
        train_per_person: None,
        bus_per_person: None,
        taxi_shared: None,
        car_rental_shared: None,
    });

    let mut options = cost_calculation_and_validation(prices, strategy, distance_km, travelers);
    options.sort_by(|a, b| a.cost_per_trip_usd.total_cmp(&b.cost_per_trip_usd));
    (options, warnings)
}

/// Always-active per-day destination transport, plus airport transfers when
/// flights exist (§4.8b). `local_total` scales with trip length, not
/// travelers.
async fn local_transportation(
    llm: Option<&Arc<LlmAdvisor>>,
    country: &str,
    strategy: &CountryStrategy,
    trip_duration_days: i64,
    has_flights: bool,
) -> (LocalTransportation, Vec<String>) {
    let mut warnings = Vec::new();

    let daily_group_cost = match llm {
        Some(llm) => {
            let prompt = format!(
                "Estimate the typical daily group cost in USD for local transport (tuk-tuk/taxi/bus) \
                 for tourists in {country}. Respond as JSON: {{\"daily_cost_usd\": number}}"
            );
            llm.generate_json(
                "You are a terse local-transport pricing assistant. Reply with strict JSON only.",
                &prompt,
                Some(0.3),
                Some(80),
            )
            .await
            .and_then(|v| v.get("daily_cost_usd")?.as_f64())
        }
        None => None,
    };

    let daily_group_cost = match daily_group_cost {
        Some(cost) => cost,
        None => {
            warnings.push("local transport cost fell back to the deterministic formula".to_string());
            LOCAL_DAILY_BASE_USD * strategy.pricing_multiplier
        }
    };

    let local_total_usd = daily_group_cost * trip_duration_days as f64;

    let airport_transfer_usd = has_flights
        .then(|| AIRPORT_TRANSFER_BASE_USD * strategy.pricing_multiplier * 2.0);

    (
        LocalTransportation {
            daily_group_cost_usd: daily_group_cost,
            trip_duration_days,
            local_total_usd,
            airport_transfer_usd,
            description: "Daily local transport (tuk-tuk/taxi/bus) for the group".to_string(),
        },
        warnings,
    )
}
