use std::sync::Arc;

use chrono::NaiveDate;
use clap::Parser;

use crate::config::Config;
use crate::error::{Result, TravelError};
use crate::geo::{AirportResolver, CountryProfileCache, DistanceCalculator};
use crate::llm::{client::OpenAiChatService, LlmAdvisor};
use crate::orchestrator::Orchestrator;
use crate::types::request::{TravelRequest, Vibe};

/// Estimate the cost and itinerary for a round trip.
#[derive(Debug, Parser)]
#[command(name = "travelcraft", version, about)]
pub struct Cli {
    /// Free-text origin city
    #[arg(long)]
    pub origin: String,

    /// Free-text destination city
    #[arg(long)]
    pub destination: String,

    /// ISO date (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: NaiveDate,

    /// ISO date (YYYY-MM-DD), must not be before start_date
    #[arg(long)]
    pub return_date: NaiveDate,

    #[arg(long, default_value_t = 2)]
    pub travelers: u32,

    #[arg(long)]
    pub budget: Option<f64>,

    #[arg(long, value_enum)]
    pub vibe: VibeArg,

    #[arg(long, default_value_t = true)]
    pub price_trends: bool,

    #[arg(long, default_value_t = true)]
    pub hotel_context: bool,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum VibeArg {
    Romantic,
    Adventure,
    Beach,
    Nature,
    Cultural,
    Culinary,
    Wellness,
}

impl From<VibeArg> for Vibe {
    fn from(value: VibeArg) -> Self {
        match value {
            VibeArg::Romantic => Vibe::Romantic,
            VibeArg::Adventure => Vibe::Adventure,
            VibeArg::Beach => Vibe::Beach,
            VibeArg::Nature => Vibe::Nature,
            VibeArg::Cultural => Vibe::Cultural,
            VibeArg::Culinary => Vibe::Culinary,
            VibeArg::Wellness => Vibe::Wellness,
        }
    }
}

impl Cli {
    pub fn into_request(self) -> TravelRequest {
        TravelRequest {
            origin: self.origin,
            destination: self.destination,
            start_date: self.start_date,
            return_date: self.return_date,
            travelers: self.travelers,
            budget: self.budget,
            vibe: self.vibe.into(),
            include_price_trends: self.price_trends,
            include_hotel_context: self.hotel_context,
        }
    }
}

/// Builds the orchestrator from environment configuration and runs one
/// request, printing the `TravelResponse` as pretty JSON. Flight/hotel
/// providers are out of scope for this crate (§1) so the CLI always runs
/// with them absent, exercising the fallback paths of §7 end to end.
pub async fn run(cli: Cli) -> Result<()> {
    let config = Config::from_env()?;

    let llm_service = OpenAiChatService::new(config.llm_key.clone(), config.llm_model.clone())
        .with_base_url(config.llm_endpoint.clone());
    let llm = Arc::new(LlmAdvisor::new(Arc::new(llm_service), config.max_llm_inflight, config.call_timeout));

    let orchestrator = Orchestrator {
        airport_resolver: AirportResolver::new(Some(Arc::clone(&llm))),
        distance_calculator: DistanceCalculator::new(None, None),
        country_profiles: CountryProfileCache::new(Some(Arc::clone(&llm)), config.cache_ttl_country),
        llm: Some(llm),
        flight_provider: None,
        hotel_provider: None,
        price_calendar_window_days: config.price_calendar_window_days,
        hotel_top_n: None,
    };

    let request = cli.into_request();
    let response = orchestrator.run(&request).await?;

    let json = serde_json::to_string_pretty(&response)
        .map_err(|err| TravelError::Serialization(err.to_string()))?;
    println!("{json}");

    Ok(())
}
