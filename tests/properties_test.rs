mod support;

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use support::{FailingFlightProvider, FailingHotelProvider, FixedDistanceProvider, FixedFlightProvider, FixedHotelProvider};
use travelcraft::agents::cost::{self, CostInputs};
use travelcraft::agents::flight;
use travelcraft::agents::transport;
use travelcraft::geo::{AirportResolver, CountryProfileCache, CountryStrategy, DistanceCalculator};
use travelcraft::orchestrator::Orchestrator;
use travelcraft::types::request::{TravelRequest, Vibe};
use travelcraft::types::response::TransportMode;

fn request(travelers: u32, vibe: Vibe, origin: &str, destination: &str) -> TravelRequest {
    TravelRequest {
        origin: origin.to_string(),
        destination: destination.to_string(),
        start_date: NaiveDate::from_ymd_opt(2024, 12, 1).unwrap(),
        return_date: NaiveDate::from_ymd_opt(2024, 12, 3).unwrap(),
        travelers,
        budget: None,
        vibe,
        include_price_trends: false,
        include_hotel_context: false,
    }
}

fn bare_orchestrator() -> Orchestrator {
    Orchestrator {
        airport_resolver: AirportResolver::new(None),
        distance_calculator: DistanceCalculator::new(None, None),
        country_profiles: CountryProfileCache::new(None, Duration::from_secs(86_400)),
        llm: None,
        flight_provider: None,
        hotel_provider: None,
        price_calendar_window_days: 7,
        hotel_top_n: None,
    }
}

/// P1: total_cost must equal the sum of cost_breakdown fields within $1.
#[tokio::test]
async fn p1_total_consistency() {
    let mut orchestrator = bare_orchestrator();
    orchestrator.flight_provider = Some(Arc::new(FixedFlightProvider { base_price_usd: 900.0 }));
    orchestrator.hotel_provider = Some(Arc::new(FixedHotelProvider { nightly_price_usd: 120.0 }));

    let req = request(4, Vibe::Cultural, "Galle", "Paris");
    let response = orchestrator.run(&req).await.unwrap();

    let diff = (response.total_cost - response.cost_breakdown.sum_of_fields()).abs();
    assert!(diff < 1.0, "diff was {diff}");
    assert!((response.total_cost - response.cost_breakdown.total).abs() < 1e-9);
}

/// P2: doubling travelers must not double Flight.price_usd.
#[tokio::test]
async fn p2_flight_price_is_not_scaled_by_travelers_in_agent_layer() {
    let provider: Arc<dyn travelcraft::providers::FlightProvider> =
        Arc::new(FixedFlightProvider { base_price_usd: 1000.0 });

    let (outcome_2, _) = flight::run(
        Some(&provider), "CMB", "CDG",
        NaiveDate::from_ymd_opt(2025, 10, 22).unwrap(), NaiveDate::from_ymd_opt(2025, 10, 27).unwrap(),
        2, false, 7,
    ).await;
    let (outcome_8, _) = flight::run(
        Some(&provider), "CMB", "CDG",
        NaiveDate::from_ymd_opt(2025, 10, 22).unwrap(), NaiveDate::from_ymd_opt(2025, 10, 27).unwrap(),
        8, false, 7,
    ).await;

    assert_eq!(outcome_2.flights[0].price_usd, outcome_8.flights[0].price_usd);
}

/// P4: skip_flight_search iff same_airport OR (same_country AND distance_km <= max_ground_distance_km).
#[tokio::test]
async fn p4_skip_logic_short_circuits_flights() {
    let mut orchestrator = bare_orchestrator();
    orchestrator.flight_provider = Some(Arc::new(FixedFlightProvider { base_price_usd: 900.0 }));
    orchestrator.hotel_provider = Some(Arc::new(FixedHotelProvider { nightly_price_usd: 80.0 }));

    // Galle and Matara both resolve to CMB via the curated map -> same_airport.
    let domestic = request(3, Vibe::Cultural, "Galle", "Matara");
    let response = orchestrator.run(&domestic).await.unwrap();
    assert!(response.flights.is_empty());
    assert_eq!(response.cost_breakdown.flights, 0.0);

    // Galle (Sri Lanka) -> Paris (France): different country, flights must run.
    let international = request(4, Vibe::Cultural, "Galle", "Paris");
    let response = orchestrator.run(&international).await.unwrap();
    assert!(!response.flights.is_empty());
    assert!(response.cost_breakdown.flights > 0.0);
}

/// P5: shared-mode inter-city transport totals never scale with travelers.
#[tokio::test]
async fn p5_transport_shared_modes_never_double_scale() {
    let strategy = CountryStrategy {
        max_ground_distance_km: 150.0,
        preferred_modes: vec![TransportMode::Train, TransportMode::Bus, TransportMode::CarRental],
        pricing_multiplier: 0.9,
    };

    let (outcome_2, _) = transport::run(None, "Sri Lanka", &strategy, true, 47.0, 2, 2, false).await;
    let (outcome_6, _) = transport::run(None, "Sri Lanka", &strategy, true, 47.0, 6, 2, false).await;

    let taxi_2 = outcome_2.inter_city_options.iter().find(|o| o.mode == TransportMode::Taxi).unwrap();
    let taxi_6 = outcome_6.inter_city_options.iter().find(|o| o.mode == TransportMode::Taxi).unwrap();
    assert_eq!(taxi_2.cost_per_trip_usd, taxi_6.cost_per_trip_usd);
}

/// P6: food/activities/misc totals change by the exact vibe multiplier when only vibe varies.
#[tokio::test]
async fn p6_vibe_multiplier_changes_totals_exactly() {
    let strategy = CountryStrategy { max_ground_distance_km: 150.0, preferred_modes: vec![], pricing_multiplier: 1.0 };
    let (transport_outcome, _) = transport::run(None, "Testland", &strategy, false, 0.0, 2, 3, false).await;

    let make_inputs = |vibe: Vibe, flights: &'static [travelcraft::types::response::Flight], hotels: &'static [travelcraft::types::response::Hotel]| CostInputs {
        flights, hotels, transport: &transport_outcome, country: "Testland", strategy: &strategy,
        vibe, travelers: 2, trip_duration_days: 3, rooms_needed: 1,
    };

    let (cultural, _) = cost::run(None, make_inputs(Vibe::Cultural, &[], &[])).await;
    let (culinary, _) = cost::run(None, make_inputs(Vibe::Culinary, &[], &[])).await;

    assert!((culinary.food / cultural.food - 1.5).abs() < 1e-9);
}

/// P7: with every external provider absent, the response is still complete with non-zero totals and warnings.
#[tokio::test]
async fn p7_fallback_soundness_with_all_providers_down() {
    let mut orchestrator = bare_orchestrator();
    orchestrator.flight_provider = Some(Arc::new(FailingFlightProvider));
    orchestrator.hotel_provider = Some(Arc::new(FailingHotelProvider));

    let req = request(2, Vibe::Beach, "Galle", "Paris");
    let response = orchestrator.run(&req).await.unwrap();

    assert!(response.total_cost > 0.0);
    assert!(!response.warnings.is_empty());
    assert!(response.confidence_mix < 0.5);
}

/// P8: repeating a resolution/strategy lookup within TTL returns the same value.
#[tokio::test]
async fn p8_cache_idempotence() {
    let resolver = AirportResolver::new(None);
    let first = resolver.resolve("Paris").await;
    let second = resolver.resolve("paris").await;
    assert_eq!(first, second);

    let countries = CountryProfileCache::new(None, Duration::from_secs(86_400));
    let first = countries.strategy_for("France").await;
    let second = countries.strategy_for("france").await;
    assert_eq!(first, second);

    let distances = DistanceCalculator::new(Some(Arc::new(FixedDistanceProvider { km: 47.0 })), None);
    let first = distances.drive("Galle", "Matara").await;
    let second = distances.drive("matara", "galle").await;
    assert_eq!(first, second);
}
