use std::sync::Arc;

use tracing::{info, instrument};

use crate::agents::{cost, flight, hotel, itinerary, transport, vibe};
use crate::agents::cost::CostInputs;
use crate::error::{Result, TravelError};
use crate::geo::{AirportResolver, CountryProfileCache, DistanceCalculator};
use crate::llm::LlmAdvisor;
use crate::providers::{FlightProvider, HotelProvider};
use crate::types::request::TravelRequest;
use crate::types::response::{Confidence, TransportationSummary, TravelAnalysis, TravelResponse};

const BUDGET_MISMATCH_TOLERANCE: f64 = 1.10;

/// Collaborators the orchestrator wires together; everything optional
/// beyond the resolvers/caches is a pluggable external capability (§6).
pub struct Orchestrator {
    pub airport_resolver: AirportResolver,
    pub distance_calculator: DistanceCalculator,
    pub country_profiles: CountryProfileCache,
    pub llm: Option<Arc<LlmAdvisor>>,
    pub flight_provider: Option<Arc<dyn FlightProvider>>,
    pub hotel_provider: Option<Arc<dyn HotelProvider>>,
    pub price_calendar_window_days: i64,
    pub hotel_top_n: Option<usize>,
}

impl Orchestrator {
    /// Runs the full state machine (§4.12):
    /// `start → analyze_travel_type → vibe → (flights?) → hotels →
    /// transport → costs → itinerary → end`. Only `InvalidRequest`
    /// propagates; every other failure degrades into a warning.
    #[instrument(skip_all, fields(origin = %request.origin, destination = %request.destination))]
    pub async fn run(&self, request: &TravelRequest) -> Result<TravelResponse> {
        request.validate()?;

        let mut warnings = Vec::new();

        let analysis = self.analyze_travel_type(request).await;
        info!(
            target: "travelcraft::orchestrator",
            skip_flight_search = analysis.skip_flight_search,
            distance_km = analysis.distance_km,
            "travel type analyzed"
        );

        let (vibe_analysis, vibe_warnings) =
            vibe::run(self.llm.as_ref(), request.vibe, request.start_date).await;
        warnings.extend(vibe_warnings);

        let (flights, price_trends) = if analysis.skip_flight_search {
            (Vec::new(), None)
        } else {
            let (outcome, flight_warnings) = flight::run(
                self.flight_provider.as_ref(),
                &analysis.origin_airport,
                &analysis.destination_airport,
                request.start_date,
                request.return_date,
                request.travelers,
                request.include_price_trends,
                self.price_calendar_window_days,
            )
            .await;
            warnings.extend(flight_warnings);
            (outcome.flights, outcome.price_trends)
        };

        let (hotel_outcome, hotel_warnings) = hotel::run(
            self.hotel_provider.as_ref(),
            self.llm.as_ref(),
            &request.destination,
            request.start_date,
            request.return_date,
            request.travelers,
            request.include_hotel_context,
            self.hotel_top_n,
        )
        .await;
        warnings.extend(hotel_warnings);

        let (transport_outcome, transport_warnings) = transport::run(
            self.llm.as_ref(),
            &analysis.destination_country,
            &analysis.country_strategy,
            analysis.same_country,
            analysis.distance_km,
            request.travelers,
            request.trip_duration_days(),
            !flights.is_empty(),
        )
        .await;
        warnings.extend(transport_warnings);

        let (cost_breakdown, cost_warnings) = cost::run(
            self.llm.as_ref(),
            CostInputs {
                flights: &flights,
                hotels: &hotel_outcome.hotels,
                transport: &transport_outcome,
                country: &analysis.destination_country,
                strategy: &analysis.country_strategy,
                vibe: request.vibe,
                travelers: request.travelers,
                trip_duration_days: request.trip_duration_days(),
                rooms_needed: request.rooms_needed(),
            },
        )
        .await;
        warnings.extend(cost_warnings);

        let estimated_day_cost = (cost_breakdown.food + cost_breakdown.activities + cost_breakdown.miscellaneous)
            / request.trip_duration_days() as f64;
        let (itinerary_days, itinerary_warnings) = itinerary::run(
            self.llm.as_ref(),
            &request.destination,
            request.vibe,
            &vibe_analysis.season,
            request.trip_duration_days(),
            hotel_outcome.hotel_context.as_ref(),
            estimated_day_cost,
        )
        .await;
        warnings.extend(itinerary_warnings);

        let total_cost = cost_breakdown.total;
        let per_person_cost = (total_cost / f64::from(request.travelers)).round();

        if let Some(budget) = request.budget {
            if total_cost > budget * BUDGET_MISMATCH_TOLERANCE {
                warnings.push(format!(
                    "BudgetMismatch: total_cost ${total_cost:.0} exceeds budget ${budget:.0} by more than 10%"
                ));
            }
        }

        let confidence_mix = confidence_mix(&hotel_outcome.hotels, &transport_outcome.inter_city_options);

        let transportation = TransportationSummary {
            inter_city_options: transport_outcome.inter_city_options,
            local_transportation: transport_outcome.local,
            cost_total: transport_outcome.cost_total,
        };

        Ok(TravelResponse {
            vibe_analysis,
            flights,
            price_trends,
            is_domestic_travel: analysis.is_domestic_travel,
            travel_distance_km: analysis.distance_km,
            hotels: hotel_outcome.hotels,
            hotel_context: hotel_outcome.hotel_context,
            transportation,
            itinerary: itinerary_days,
            cost_breakdown,
            total_cost,
            per_person_cost,
            confidence_mix,
            warnings,
        })
    }

    /// First stage: resolves airports/countries (C1), distance (C2) and the
    /// destination country's strategy (C3), then derives `skip_flight_search`
    /// (P4): `same_airport OR (same_country AND distance_km <=
    /// strategy.max_ground_distance_km)`.
    async fn analyze_travel_type(&self, request: &TravelRequest) -> TravelAnalysis {
        let origin = self.airport_resolver.resolve(&request.origin).await;
        let destination = self.airport_resolver.resolve(&request.destination).await;

        let same_airport = origin.code != crate::geo::airport::UNKNOWN && origin.code == destination.code;
        let same_country = origin.country != crate::geo::airport::UNKNOWN && origin.country == destination.country;

        let distance_km = match self.distance_calculator.drive(&request.origin, &request.destination).await {
            Some(estimate) => estimate.km,
            None => 0.0,
        };

        let country_strategy = self.country_profiles.strategy_for(&destination.country).await;

        let skip_flight_search =
            same_airport || (same_country && distance_km <= country_strategy.max_ground_distance_km);
        let is_domestic_travel = same_country;

        TravelAnalysis {
            origin_airport: origin.code,
            destination_airport: destination.code,
            destination_country: destination.country,
            same_airport,
            same_country,
            distance_km,
            is_domestic_travel,
            skip_flight_search,
            country_strategy,
        }
    }
}

fn confidence_mix(
    hotels: &[crate::types::response::Hotel],
    inter_city_options: &[crate::types::response::TransportOption],
) -> f64 {
    let mut high = 0usize;
    let mut total = 0usize;

    for hotel in hotels {
        total += 1;
        if hotel.confidence == Confidence::High {
            high += 1;
        }
    }
    for option in inter_city_options {
        total += 1;
        if option.confidence == Confidence::High {
            high += 1;
        }
    }

    if total == 0 {
        0.0
    } else {
        high as f64 / total as f64
    }
}
