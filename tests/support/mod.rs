use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::json;
use travelcraft::error::TravelError;
use travelcraft::providers::{DistanceProvider, FlightProvider, HotelProvider, RawFlightResult, RawHotelResult};

/// Deterministic flight provider: price scales with stops, never with
/// `adults` — the canonical P2 bug this crate guards against.
pub struct FixedFlightProvider {
    pub base_price_usd: f64,
}

#[async_trait]
impl FlightProvider for FixedFlightProvider {
    async fn search(
        &self,
        origin_iata: &str,
        dest_iata: &str,
        depart: NaiveDate,
        _return_date: NaiveDate,
        _adults: u32,
    ) -> Result<Vec<RawFlightResult>, TravelError> {
        Ok(vec![
            RawFlightResult {
                airline: "Test Air".to_string(),
                flight_number: "TA100".to_string(),
                departure_airport: origin_iata.to_string(),
                arrival_airport: dest_iata.to_string(),
                departure_time: depart.to_string(),
                arrival_time: depart.to_string(),
                duration_minutes: 600,
                stops: 0,
                class: "economy".to_string(),
                price_usd: self.base_price_usd,
                raw: json!({}),
            },
            RawFlightResult {
                airline: "Test Air".to_string(),
                flight_number: "TA200".to_string(),
                departure_airport: origin_iata.to_string(),
                arrival_airport: dest_iata.to_string(),
                departure_time: depart.to_string(),
                arrival_time: depart.to_string(),
                duration_minutes: 700,
                stops: 1,
                class: "economy".to_string(),
                price_usd: self.base_price_usd - 80.0,
                raw: json!({}),
            },
        ])
    }
}

pub struct FixedHotelProvider {
    pub nightly_price_usd: f64,
}

#[async_trait]
impl HotelProvider for FixedHotelProvider {
    async fn search(
        &self,
        destination: &str,
        _check_in: NaiveDate,
        _check_out: NaiveDate,
        _guests: u32,
    ) -> Result<Vec<RawHotelResult>, TravelError> {
        Ok(vec![RawHotelResult {
            name: format!("{destination} Grand Hotel"),
            stars: 4.0,
            rating: 4.3,
            amenities: vec!["wifi".to_string(), "breakfast".to_string()],
            location: destination.to_string(),
            image_url: None,
            currency: "USD".to_string(),
            raw: json!({"rate_per_night": {"extracted_lowest": self.nightly_price_usd}}),
        }])
    }
}

pub struct FailingFlightProvider;

#[async_trait]
impl FlightProvider for FailingFlightProvider {
    async fn search(
        &self,
        _origin_iata: &str,
        _dest_iata: &str,
        _depart: NaiveDate,
        _return_date: NaiveDate,
        _adults: u32,
    ) -> Result<Vec<RawFlightResult>, TravelError> {
        Err(TravelError::ProviderFailure { provider: "flight", message: "down for testing".to_string() })
    }
}

pub struct FailingHotelProvider;

#[async_trait]
impl HotelProvider for FailingHotelProvider {
    async fn search(
        &self,
        _destination: &str,
        _check_in: NaiveDate,
        _check_out: NaiveDate,
        _guests: u32,
    ) -> Result<Vec<RawHotelResult>, TravelError> {
        Err(TravelError::ProviderFailure { provider: "hotel", message: "down for testing".to_string() })
    }
}

/// Returns a fixed km figure for a known (origin, destination) pair,
/// case-insensitively and order-independently, so scenario tests can assert
/// on `TravelAnalysis.distance_km` without a live maps provider.
pub struct FixedDistanceProvider {
    pub km: f64,
}

#[async_trait]
impl DistanceProvider for FixedDistanceProvider {
    async fn drive(&self, _origin: &str, _destination: &str) -> Result<(f64, f64), TravelError> {
        Ok((self.km, self.km / 70.0 * 60.0))
    }
}
