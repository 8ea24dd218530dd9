use std::sync::Arc;

use chrono::NaiveDate;
use tracing::warn;

use crate::agents::price_calendar::build_price_calendar;
use crate::providers::FlightProvider;
use crate::types::response::{Flight, PriceCalendar};

const TOP_N: usize = 10;

pub struct FlightSearchOutcome {
    pub flights: Vec<Flight>,
    pub price_trends: Option<PriceCalendar>,
}

/// Normalizes flight provider results into [`Flight`] DTOs, sorts by the
/// stop-penalized price, and optionally builds a price calendar (§4.6).
///
/// `Flight.price_usd` is stored exactly as the provider returns it (a group
/// total for `adults = travelers`) — never multiplied here.
pub async fn run(
    flight_provider: Option<&Arc<dyn FlightProvider>>,
    origin_iata: &str,
    dest_iata: &str,
    start_date: NaiveDate,
    return_date: NaiveDate,
    travelers: u32,
    include_price_trends: bool,
    price_calendar_window_days: i64,
) -> (FlightSearchOutcome, Vec<String>) {
    let mut warnings = Vec::new();

    let Some(provider) = flight_provider else {
        warnings.push("no flight provider configured; flights list is empty".to_string());
        return (FlightSearchOutcome { flights: Vec::new(), price_trends: None }, warnings);
    };

    let raw = match provider.search(origin_iata, dest_iata, start_date, return_date, travelers).await {
        Ok(results) => results,
        Err(err) => {
            warn!(target: "travelcraft::agents::flight", error = %err, "flight search failed");
            warnings.push(format!("flight search failed: {err}"));
            Vec::new()
        }
    };

    let mut flights: Vec<Flight> = raw
        .into_iter()
        .map(|r| Flight {
            airline: r.airline,
            flight_number: r.flight_number,
            departure_airport: r.departure_airport,
            arrival_airport: r.arrival_airport,
            departure_time: r.departure_time,
            arrival_time: r.arrival_time,
            duration_minutes: r.duration_minutes,
            stops: r.stops,
            class: r.class,
            price_usd: r.price_usd,
        })
        .collect();

    flights.sort_by(|a, b| a.sort_score().total_cmp(&b.sort_score()));
    flights.truncate(TOP_N);

    let price_trends = if include_price_trends {
        let return_offset_days = (return_date - start_date).num_days();
        let (calendar, calendar_warnings) = build_price_calendar(
            provider,
            origin_iata,
            dest_iata,
            start_date,
            return_offset_days,
            travelers,
            price_calendar_window_days,
        )
        .await;
        warnings.extend(calendar_warnings);
        Some(calendar)
    } else {
        None
    };

    (FlightSearchOutcome { flights, price_trends }, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_score_penalizes_stops() {
        let direct = Flight {
            airline: "A".into(), flight_number: "1".into(), departure_airport: "CMB".into(),
            arrival_airport: "CDG".into(), departure_time: "".into(), arrival_time: "".into(),
            duration_minutes: 600, stops: 0, class: "economy".into(), price_usd: 900.0,
        };
        let one_stop = Flight { stops: 1, price_usd: 870.0, ..direct.clone() };
        assert!(direct.sort_score() < one_stop.sort_score());
    }

    #[test]
    fn price_is_not_multiplied_by_travelers() {
        let flight = Flight {
            airline: "A".into(), flight_number: "1".into(), departure_airport: "CMB".into(),
            arrival_airport: "CDG".into(), departure_time: "".into(), arrival_time: "".into(),
            duration_minutes: 600, stops: 0, class: "economy".into(), price_usd: 1200.0,
        };
        // P2: doubling travelers must not double price_usd; only per-person changes.
        assert_eq!(flight.price_usd, 1200.0);
        assert_eq!(flight.per_person_price(4), 300.0);
        assert_eq!(flight.per_person_price(8), 150.0);
    }
}
