mod support;

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use support::{FailingFlightProvider, FailingHotelProvider, FixedDistanceProvider, FixedFlightProvider, FixedHotelProvider};
use travelcraft::geo::{AirportResolver, CountryProfileCache, DistanceCalculator};
use travelcraft::orchestrator::Orchestrator;
use travelcraft::types::request::{TravelRequest, Vibe};

fn orchestrator_with_distance(km: f64) -> Orchestrator {
    Orchestrator {
        airport_resolver: AirportResolver::new(None),
        distance_calculator: DistanceCalculator::new(Some(Arc::new(FixedDistanceProvider { km })), None),
        country_profiles: CountryProfileCache::new(None, Duration::from_secs(86_400)),
        llm: None,
        flight_provider: None,
        hotel_provider: None,
        price_calendar_window_days: 7,
        hotel_top_n: None,
    }
}

/// Scenario 1: Galle -> Matara, 2024-12-01..2024-12-03, travelers=3, cultural, no budget.
#[tokio::test]
async fn scenario_1_galle_to_matara_domestic_short_haul() {
    let mut orchestrator = orchestrator_with_distance(47.0);
    orchestrator.hotel_provider = Some(Arc::new(FixedHotelProvider { nightly_price_usd: 25.0 }));

    let request = TravelRequest {
        origin: "Galle".to_string(),
        destination: "Matara".to_string(),
        start_date: NaiveDate::from_ymd_opt(2024, 12, 1).unwrap(),
        return_date: NaiveDate::from_ymd_opt(2024, 12, 3).unwrap(),
        travelers: 3,
        budget: None,
        vibe: Vibe::Cultural,
        include_price_trends: true,
        include_hotel_context: false,
    };

    let response = orchestrator.run(&request).await.unwrap();

    assert!(response.is_domestic_travel);
    assert!((response.travel_distance_km - 47.0).abs() / 47.0 < 0.10);
    assert!(response.flights.is_empty());
    assert_eq!(response.cost_breakdown.flights, 0.0);

    let expected_accommodation = 25.0 * 2.0 * 2.0; // nightly * nights * rooms_needed(ceil(3/2)=2)
    assert_eq!(response.cost_breakdown.accommodation, expected_accommodation);

    assert!(response.total_cost < 500.0, "total was {}", response.total_cost);
    assert!((response.per_person_cost - (response.total_cost / 3.0).round()).abs() < 1e-9);
}

/// Scenario 2: Galle -> Paris, 2025-10-22..2025-10-27, travelers=4, cultural, price trends on.
#[tokio::test]
async fn scenario_2_galle_to_paris_international_with_price_trends() {
    let mut orchestrator = orchestrator_with_distance(9000.0);
    orchestrator.flight_provider = Some(Arc::new(FixedFlightProvider { base_price_usd: 4800.0 }));
    orchestrator.hotel_provider = Some(Arc::new(FixedHotelProvider { nightly_price_usd: 150.0 }));

    let request = TravelRequest {
        origin: "Galle".to_string(),
        destination: "Paris".to_string(),
        start_date: NaiveDate::from_ymd_opt(2025, 10, 22).unwrap(),
        return_date: NaiveDate::from_ymd_opt(2025, 10, 27).unwrap(),
        travelers: 4,
        budget: None,
        vibe: Vibe::Cultural,
        include_price_trends: true,
        include_hotel_context: false,
    };

    let response = orchestrator.run(&request).await.unwrap();

    assert!(!response.is_domestic_travel);
    assert!(!response.flights.is_empty());

    for pair in response.flights.windows(2) {
        assert!(pair[0].sort_score() <= pair[1].sort_score());
    }

    let cheapest = &response.flights[0];
    let per_person = cheapest.per_person_price(4);
    assert!((500.0..=1500.0).contains(&per_person), "per-person was {per_person}");

    let trends = response.price_trends.expect("price trends requested");
    assert!(trends.statistics.min <= cheapest.price_usd);
    assert!(cheapest.price_usd <= trends.statistics.max);

    let expected_accommodation = 150.0 * 5.0 * 2.0; // nights=5, rooms_needed=ceil(4/2)=2
    assert_eq!(response.cost_breakdown.accommodation, expected_accommodation);
}

/// Scenario 3: Delhi -> Mumbai, 7 days, travelers=2, adventure.
#[tokio::test]
async fn scenario_3_delhi_to_mumbai_same_country_long_distance() {
    let mut orchestrator = orchestrator_with_distance(1400.0);
    orchestrator.flight_provider = Some(Arc::new(FixedFlightProvider { base_price_usd: 300.0 }));
    orchestrator.hotel_provider = Some(Arc::new(FixedHotelProvider { nightly_price_usd: 40.0 }));

    let request = TravelRequest {
        origin: "Delhi".to_string(),
        destination: "Mumbai".to_string(),
        start_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        return_date: NaiveDate::from_ymd_opt(2025, 3, 8).unwrap(),
        travelers: 2,
        budget: None,
        vibe: Vibe::Adventure,
        include_price_trends: false,
        include_hotel_context: false,
    };

    let response = orchestrator.run(&request).await.unwrap();

    assert!(response.is_domestic_travel);
    assert!(!response.flights.is_empty());
    assert!(!response.transportation.inter_city_options.is_empty());
}

/// Scenario 4: Tokyo -> New York, 10 days, travelers=2, culinary.
#[tokio::test]
async fn scenario_4_tokyo_to_new_york_culinary_food_multiplier() {
    let mut orchestrator = orchestrator_with_distance(10_800.0);
    orchestrator.flight_provider = Some(Arc::new(FixedFlightProvider { base_price_usd: 2000.0 }));
    orchestrator.hotel_provider = Some(Arc::new(FixedHotelProvider { nightly_price_usd: 200.0 }));

    let request = TravelRequest {
        origin: "Tokyo".to_string(),
        destination: "New York".to_string(),
        start_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        return_date: NaiveDate::from_ymd_opt(2025, 6, 11).unwrap(),
        travelers: 2,
        budget: None,
        vibe: Vibe::Culinary,
        include_price_trends: false,
        include_hotel_context: false,
    };

    let response = orchestrator.run(&request).await.unwrap();

    assert!(!response.is_domestic_travel);
    // Destination country is the United States (multiplier 1.0, expensive tier):
    // baseline $30/day, clamped within [$30, $200], x1.5 culinary x10 days x2 travelers.
    let expected_food = 30.0 * 1.5 * 10.0 * 2.0;
    assert_eq!(response.cost_breakdown.food, expected_food);
}

/// Scenario 5: single traveler, budget=$500, Galle -> Colombo, 3 days, beach.
#[tokio::test]
async fn scenario_5_single_traveler_budget_mismatch_is_advisory() {
    let mut orchestrator = orchestrator_with_distance(5.0);
    orchestrator.hotel_provider = Some(Arc::new(FixedHotelProvider { nightly_price_usd: 20.0 }));

    let request = TravelRequest {
        origin: "Galle".to_string(),
        destination: "Colombo".to_string(),
        start_date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
        return_date: NaiveDate::from_ymd_opt(2025, 1, 13).unwrap(),
        travelers: 1,
        budget: Some(500.0),
        vibe: Vibe::Beach,
        include_price_trends: false,
        include_hotel_context: false,
    };

    let response = orchestrator.run(&request).await.unwrap();
    assert_eq!(request.rooms_needed(), 1);

    let mismatch = response.warnings.iter().any(|w| w.starts_with("BudgetMismatch"));
    if response.total_cost > 500.0 * 1.10 {
        assert!(mismatch, "expected a BudgetMismatch warning when total exceeds budget by >10%");
    } else {
        assert!(!mismatch);
    }
}

/// Scenario 6: every external provider fails; the response still degrades gracefully.
#[tokio::test]
async fn scenario_6_all_providers_down_still_yields_a_complete_response() {
    let mut orchestrator = orchestrator_with_distance(9000.0);
    orchestrator.flight_provider = Some(Arc::new(FailingFlightProvider));
    orchestrator.hotel_provider = Some(Arc::new(FailingHotelProvider));

    let request = TravelRequest {
        origin: "Galle".to_string(),
        destination: "Paris".to_string(),
        start_date: NaiveDate::from_ymd_opt(2025, 10, 22).unwrap(),
        return_date: NaiveDate::from_ymd_opt(2025, 10, 27).unwrap(),
        travelers: 2,
        budget: None,
        vibe: Vibe::Romantic,
        include_price_trends: false,
        include_hotel_context: false,
    };

    let response = orchestrator.run(&request).await.unwrap();

    assert!(response.confidence_mix < 0.5);
    assert!(response.total_cost > 0.0);
    assert!(response.warnings.iter().any(|w| w.contains("flight search failed")));
    assert!(response.warnings.iter().any(|w| w.contains("hotel search failed")));
}
