use std::sync::Arc;

use crate::llm::LlmAdvisor;
use crate::types::request::Vibe;
use crate::types::response::{Day, HotelContext};

/// Day-by-day plan from vibe, destination context, and season (§4.10).
/// Falls back to a deterministic templated schedule, annotated with the
/// vibe name, when the LLM is unavailable or returns something unusable.
pub async fn run(
    llm: Option<&Arc<LlmAdvisor>>,
    destination: &str,
    vibe: Vibe,
    season: &str,
    trip_duration_days: i64,
    hotel_context: Option<&HotelContext>,
    estimated_day_cost: f64,
) -> (Vec<Day>, Vec<String>) {
    let mut warnings = Vec::new();

    let days = match llm {
        Some(llm) => match fetch_itinerary(llm, destination, vibe, season, trip_duration_days, hotel_context).await {
            Some(days) if days.len() as i64 == trip_duration_days => days,
            _ => {
                warnings.push("itinerary generation fell back to the deterministic template".to_string());
                fallback_itinerary(destination, vibe, trip_duration_days, estimated_day_cost)
            }
        },
        None => fallback_itinerary(destination, vibe, trip_duration_days, estimated_day_cost),
    };

    (days, warnings)
}

async fn fetch_itinerary(
    llm: &LlmAdvisor,
    destination: &str,
    vibe: Vibe,
    season: &str,
    trip_duration_days: i64,
    hotel_context: Option<&HotelContext>,
) -> Option<Vec<Day>> {
    let neighborhoods = hotel_context
        .map(|ctx| ctx.neighborhoods.join(", "))
        .unwrap_or_else(|| "no specific neighborhood data".to_string());

    let prompt = format!(
        "Plan a {trip_duration_days}-day {} trip to {destination} in {season}. Relevant neighborhoods: {neighborhoods}.\n\
         For each day give: a short title, 2-4 activities, meal suggestions (name + price tier), a one-line \
         transport note, and an estimated day cost in USD. Respond as JSON: \
         {{\"days\": [{{\"title\": str, \"activities\": [str], \"meals\": [str], \"transport_notes\": str, \"estimated_day_cost\": number}}]}}",
        vibe.as_str()
    );

    let value = llm
        .generate_json(
            "You are a concise travel itinerary planner. Reply with strict JSON only.",
            &prompt,
            Some(0.5),
            Some(800),
        )
        .await?;

    let raw_days = value.get("days")?.as_array()?;
    let mut days = Vec::with_capacity(raw_days.len());
    for raw in raw_days {
        let title = raw.get("title")?.as_str()?.to_string();
        let activities: Vec<String> =
            raw.get("activities")?.as_array()?.iter().filter_map(|v| v.as_str().map(str::to_string)).collect();
        let meals: Vec<String> =
            raw.get("meals")?.as_array()?.iter().filter_map(|v| v.as_str().map(str::to_string)).collect();
        let transport_notes = raw.get("transport_notes")?.as_str()?.to_string();
        let estimated_day_cost = raw.get("estimated_day_cost")?.as_f64()?;

        if activities.len() < 2 || activities.len() > 4 {
            return None;
        }

        days.push(Day { title, activities, meals, transport_notes, estimated_day_cost });
    }

    Some(days)
}

fn fallback_itinerary(destination: &str, vibe: Vibe, trip_duration_days: i64, estimated_day_cost: f64) -> Vec<Day> {
    (1..=trip_duration_days)
        .map(|day| Day {
            title: format!("Day {day}: {} exploration in {destination}", vibe.as_str()),
            activities: vec![
                format!("Explore a {}-themed spot near {destination}", vibe.as_str()),
                "Free time to wander and rest".to_string(),
            ],
            meals: vec!["Breakfast at the hotel (budget tier)".to_string(), "Dinner at a local restaurant (mid tier)".to_string()],
            transport_notes: "Use local transport or walk where practical".to_string(),
            estimated_day_cost,
        })
        .collect()
}
