use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;

use crate::error::TravelError;

/// Raw flight search hit, shaped close to what a real aggregator returns.
/// `raw` carries the full provider payload so [`crate::agents::flight`] can
/// read whatever informational fields it needs without this trait growing a
/// field per provider quirk.
#[derive(Debug, Clone)]
pub struct RawFlightResult {
    pub airline: String,
    pub flight_number: String,
    pub departure_airport: String,
    pub arrival_airport: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub duration_minutes: u32,
    pub stops: u32,
    pub class: String,
    /// Group-total price for the requested `adults` count (§4.6 contract).
    pub price_usd: f64,
    pub raw: Value,
}

/// `FlightProvider.search(origin_iata, dest_iata, depart, return, adults)`
/// (§6). Out of scope to implement concretely — this crate depends only on
/// the trait.
#[async_trait]
pub trait FlightProvider: Send + Sync {
    async fn search(
        &self,
        origin_iata: &str,
        dest_iata: &str,
        depart: NaiveDate,
        return_date: NaiveDate,
        adults: u32,
    ) -> Result<Vec<RawFlightResult>, TravelError>;
}

/// Raw hotel search hit. `raw` is probed by the nested-field list in §4.7
/// (`rate_per_night.extracted_lowest`, `price.extracted_lowest`,
/// `total_rate / nights`, ...) since providers disagree on where the
/// nightly price actually lives.
#[derive(Debug, Clone)]
pub struct RawHotelResult {
    pub name: String,
    pub stars: f32,
    pub rating: f32,
    pub amenities: Vec<String>,
    pub location: String,
    pub image_url: Option<String>,
    pub currency: String,
    pub raw: Value,
}

/// `HotelProvider.search(destination, check_in, check_out, guests)` (§6).
#[async_trait]
pub trait HotelProvider: Send + Sync {
    async fn search(
        &self,
        destination: &str,
        check_in: NaiveDate,
        check_out: NaiveDate,
        guests: u32,
    ) -> Result<Vec<RawHotelResult>, TravelError>;
}

#[derive(Debug, Clone)]
pub struct RawActivityResult {
    pub name: String,
    pub category: String,
    pub price_usd: Option<f64>,
}

/// `ActivityProvider.search(destination, date, interests)` (§6, optional).
#[async_trait]
pub trait ActivityProvider: Send + Sync {
    async fn search(
        &self,
        destination: &str,
        date: NaiveDate,
        interests: &[String],
    ) -> Result<Vec<RawActivityResult>, TravelError>;
}

/// `Geocoder.forward(city) -> (lat, lon, country)` (§1, §4.2).
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn forward(&self, city: &str) -> Result<(f64, f64, String), TravelError>;
}

/// `DistanceProvider.drive(origin, destination) -> (km, minutes)` (§4.2).
#[async_trait]
pub trait DistanceProvider: Send + Sync {
    async fn drive(&self, origin: &str, destination: &str) -> Result<(f64, f64), TravelError>;
}
