use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::TravelError;

/// Closed enumeration of travel styles shaping activity, food and pricing
/// choices (§ GLOSSARY).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Vibe {
    Romantic,
    Adventure,
    Beach,
    Nature,
    Cultural,
    Culinary,
    Wellness,
}

impl Vibe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Vibe::Romantic => "romantic",
            Vibe::Adventure => "adventure",
            Vibe::Beach => "beach",
            Vibe::Nature => "nature",
            Vibe::Cultural => "cultural",
            Vibe::Culinary => "culinary",
            Vibe::Wellness => "wellness",
        }
    }
}

/// Inbound request (§6). `origin`/`destination` are free-text city names
/// resolved downstream by [`crate::geo::airport::AirportResolver`].
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TravelRequest {
    pub origin: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub return_date: NaiveDate,
    pub travelers: u32,
    #[serde(default)]
    pub budget: Option<f64>,
    pub vibe: Vibe,
    #[serde(default = "default_true")]
    pub include_price_trends: bool,
    #[serde(default = "default_true")]
    pub include_hotel_context: bool,
}

fn default_true() -> bool {
    true
}

impl TravelRequest {
    /// Validates the request per §7 InvalidRequest: the only error kind that
    /// propagates fatally, before any agent runs.
    pub fn validate(&self) -> Result<(), TravelError> {
        if self.origin.trim().is_empty() {
            return Err(TravelError::InvalidRequest("origin must not be empty".into()));
        }
        if self.destination.trim().is_empty() {
            return Err(TravelError::InvalidRequest("destination must not be empty".into()));
        }
        if self.return_date < self.start_date {
            return Err(TravelError::InvalidRequest(
                "return_date must not be before start_date".into(),
            ));
        }
        if self.travelers < 1 || self.travelers > 10 {
            return Err(TravelError::InvalidRequest(
                "travelers must be between 1 and 10".into(),
            ));
        }
        if let Some(budget) = self.budget {
            if budget < 0.0 {
                return Err(TravelError::InvalidRequest("budget must not be negative".into()));
            }
        }
        Ok(())
    }

    /// `trip_duration_days = max(1, return_date - start_date)` (§3), used
    /// everywhere downstream.
    pub fn trip_duration_days(&self) -> i64 {
        (self.return_date - self.start_date).num_days().max(1)
    }

    /// `rooms_needed = ceil(travelers / 2)` (§ GLOSSARY, P3).
    pub fn rooms_needed(&self) -> u32 {
        self.travelers.div_ceil(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_request() -> TravelRequest {
        TravelRequest {
            origin: "Galle".to_string(),
            destination: "Matara".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 12, 1).unwrap(),
            return_date: NaiveDate::from_ymd_opt(2024, 12, 3).unwrap(),
            travelers: 3,
            budget: None,
            vibe: Vibe::Cultural,
            include_price_trends: true,
            include_hotel_context: true,
        }
    }

    #[test]
    fn rejects_return_before_start() {
        let mut req = base_request();
        req.return_date = req.start_date - chrono::Duration::days(1);
        assert!(matches!(req.validate(), Err(TravelError::InvalidRequest(_))));
    }

    #[test]
    fn rejects_travelers_out_of_range() {
        let mut req = base_request();
        req.travelers = 0;
        assert!(req.validate().is_err());
        req.travelers = 11;
        assert!(req.validate().is_err());
    }

    #[test]
    fn room_scaling_matches_p3() {
        let cases = [(1, 1), (2, 1), (3, 2), (4, 2), (5, 3), (6, 3)];
        for (travelers, rooms) in cases {
            let mut req = base_request();
            req.travelers = travelers;
            assert_eq!(req.rooms_needed(), rooms, "travelers={travelers}");
        }
    }
}
