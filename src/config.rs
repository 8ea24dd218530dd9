use std::env;
use std::time::Duration;

use crate::error::TravelError;

/// Runtime configuration (§6), sourced from the environment. Call
/// [`Config::from_env`] once at startup; everything downstream takes a
/// `&Config` rather than re-reading `std::env`.
#[derive(Debug, Clone)]
pub struct Config {
    pub llm_endpoint: String,
    pub llm_key: String,
    pub llm_model: String,
    pub llm_temperature: f32,
    pub llm_max_tokens: u32,

    pub flight_provider_key: Option<String>,
    pub hotel_provider_key: Option<String>,
    pub maps_key: Option<String>,

    pub cache_ttl_country: Duration,
    pub cache_max_distance_entries: usize,

    pub stage_timeout: Duration,
    pub call_timeout: Duration,

    pub max_concurrent_requests: usize,
    pub max_llm_inflight: usize,
    pub price_calendar_window_days: i64,
}

impl Config {
    /// Loads `.env` if present (mirrors the teacher's `Agent::from_env`),
    /// then reads each variable in §6 with its documented default.
    pub fn from_env() -> Result<Self, TravelError> {
        let _ = dotenvy::dotenv();

        Ok(Self {
            llm_endpoint: env::var("LLM_ENDPOINT")
                .unwrap_or_else(|_| "https://openrouter.ai/api/v1".to_string()),
            llm_key: env::var("LLM_KEY")
                .map_err(|_| TravelError::Config("LLM_KEY is not set".to_string()))?,
            llm_model: env::var("LLM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            llm_temperature: parse_env_or("LLM_TEMPERATURE", 0.3)?,
            llm_max_tokens: parse_env_or("LLM_MAX_TOKENS", 400)?,

            flight_provider_key: env::var("FLIGHT_PROVIDER_KEY").ok(),
            hotel_provider_key: env::var("HOTEL_PROVIDER_KEY").ok(),
            maps_key: env::var("MAPS_KEY").ok(),

            cache_ttl_country: Duration::from_secs(parse_env_or("CACHE_TTL_COUNTRY_SECS", 86_400)?),
            cache_max_distance_entries: parse_env_or("CACHE_MAX_DISTANCE_ENTRIES", 10_000)?,

            stage_timeout: Duration::from_secs(parse_env_or("STAGE_TIMEOUT_SECS", 60)?),
            call_timeout: Duration::from_secs(parse_env_or("CALL_TIMEOUT_SECS", 30)?),

            max_concurrent_requests: parse_env_or("MAX_CONCURRENT_REQUESTS", 32)?,
            max_llm_inflight: parse_env_or("MAX_LLM_INFLIGHT", 8)?,
            price_calendar_window_days: parse_env_or("PRICE_CALENDAR_WINDOW_DAYS", 7)?,
        })
    }
}

fn parse_env_or<T: std::str::FromStr>(key: &str, default: T) -> Result<T, TravelError> {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| TravelError::Config(format!("{key} is not a valid value: {raw}"))),
        Err(_) => Ok(default),
    }
}
