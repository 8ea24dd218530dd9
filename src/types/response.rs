use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::types::request::Vibe;

/// Whether a price was extracted from a live provider (`High`) or derived
/// from a deterministic heuristic / LLM estimate (`Estimated`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Estimated,
}

/// §3 Flight. `price_usd` is the **group total** as returned by the
/// provider for `adults = travelers` — never multiplied again downstream
/// (P2, §4.6).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Flight {
    pub airline: String,
    pub flight_number: String,
    pub departure_airport: String,
    pub arrival_airport: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub duration_minutes: u32,
    pub stops: u32,
    pub class: String,
    pub price_usd: f64,
}

impl Flight {
    /// Sort key per §9's resolved open question: price plus a flat $50
    /// penalty per stop.
    pub fn sort_score(&self) -> f64 {
        self.price_usd + f64::from(self.stops) * 50.0
    }

    pub fn per_person_price(&self, travelers: u32) -> f64 {
        self.price_usd / f64::from(travelers.max(1))
    }
}

/// §3 Hotel.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Hotel {
    pub name: String,
    pub price_per_night_usd: f64,
    pub currency: String,
    pub stars: f32,
    pub rating: f32,
    pub amenities: Vec<String>,
    pub location: String,
    pub image_url: Option<String>,
    pub confidence: Confidence,
}

/// §3 TransportOption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    Train,
    Bus,
    CarRental,
    Taxi,
    PrivateCar,
    PublicTransit,
}

impl TransportMode {
    /// Per-seat modes scale with travelers; shared modes quote one
    /// group-total price regardless of headcount (§4.8a).
    pub fn is_shared(&self) -> bool {
        matches!(self, TransportMode::Taxi | TransportMode::PrivateCar | TransportMode::CarRental)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TransportOption {
    #[serde(rename = "type")]
    pub mode: TransportMode,
    pub cost_per_trip_usd: f64,
    pub duration_minutes: u32,
    pub distance_km: f64,
    pub description: String,
    pub confidence: Confidence,
}

/// Local, always-on per-day destination transport plus optional airport
/// transfers (§4.8b).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LocalTransportation {
    pub daily_group_cost_usd: f64,
    pub trip_duration_days: i64,
    pub local_total_usd: f64,
    pub airport_transfer_usd: Option<f64>,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TransportationSummary {
    pub inter_city_options: Vec<TransportOption>,
    pub local_transportation: LocalTransportation,
    pub cost_total: f64,
}

/// §3 CostBreakdown. Invariant: `total = Σ(fields)` within ±$1 (P1).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CostBreakdown {
    pub flights: f64,
    pub accommodation: f64,
    pub transportation_inter_city: f64,
    pub transportation_local: f64,
    pub food: f64,
    pub activities: f64,
    pub miscellaneous: f64,
    pub total: f64,
}

impl CostBreakdown {
    pub fn sum_of_fields(&self) -> f64 {
        self.flights
            + self.accommodation
            + self.transportation_inter_city
            + self.transportation_local
            + self.food
            + self.activities
            + self.miscellaneous
    }
}

/// §3 TravelAnalysis — output of `analyze_travel_type` (C12 first stage,
/// using C1/C2/C3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TravelAnalysis {
    pub origin_airport: String,
    pub destination_airport: String,
    pub destination_country: String,
    pub same_airport: bool,
    pub same_country: bool,
    pub distance_km: f64,
    pub is_domestic_travel: bool,
    pub skip_flight_search: bool,
    pub country_strategy: crate::geo::country::CountryStrategy,
}

/// §3 VibeAnalysis.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct VibeAnalysis {
    pub vibe: Vibe,
    pub season: String,
    pub compatibility_score: f64,
    pub mood_indicators: Vec<String>,
    pub wellness_tips: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Day {
    pub title: String,
    pub activities: Vec<String>,
    pub meals: Vec<String>,
    pub transport_notes: String,
    pub estimated_day_cost: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PriceTier {
    Cheap,
    Moderate,
    Expensive,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceGridEntry {
    pub date: chrono::NaiveDate,
    pub price_usd: f64,
    pub tier: PriceTier,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceCalendarStatistics {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub stdev: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceCalendar {
    pub price_grid: Vec<PriceGridEntry>,
    pub cheapest_option: Option<PriceGridEntry>,
    pub statistics: PriceCalendarStatistics,
    pub recommendations: Vec<String>,
    pub low_confidence: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotelContext {
    pub neighborhoods: Vec<String>,
    pub seasonal_price_level: String,
    pub tiered_nightly_averages: Vec<(String, f64)>,
}

/// §6 TravelResponse — stable, UI-facing shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TravelResponse {
    pub vibe_analysis: VibeAnalysis,
    pub flights: Vec<Flight>,
    pub price_trends: Option<PriceCalendar>,
    pub is_domestic_travel: bool,
    pub travel_distance_km: f64,
    pub hotels: Vec<Hotel>,
    pub hotel_context: Option<HotelContext>,
    pub transportation: TransportationSummary,
    pub itinerary: Vec<Day>,
    pub cost_breakdown: CostBreakdown,
    pub total_cost: f64,
    pub per_person_cost: f64,
    pub confidence_mix: f64,
    pub warnings: Vec<String>,
}
