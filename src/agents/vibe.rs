use std::sync::Arc;

use chrono::NaiveDate;

use crate::llm::LlmAdvisor;
use crate::types::request::Vibe;
use crate::types::response::VibeAnalysis;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
}

impl Season {
    fn as_str(&self) -> &'static str {
        match self {
            Season::Winter => "winter",
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
        }
    }
}

/// Northern-hemisphere meteorological seasons from the request's start
/// month. The crate has no per-destination hemisphere data source, so this
/// is a deliberate simplification (§9 open-question territory).
fn season_for(date: NaiveDate) -> Season {
    use chrono::Datelike;
    match date.month() {
        12 | 1 | 2 => Season::Winter,
        3..=5 => Season::Spring,
        6..=8 => Season::Summer,
        _ => Season::Autumn,
    }
}

/// Precomputed vibe × season compatibility matrix (§4.11).
fn compatibility_score(vibe: Vibe, season: Season) -> f64 {
    match (vibe, season) {
        (Vibe::Beach, Season::Summer) => 1.0,
        (Vibe::Beach, Season::Spring) => 0.7,
        (Vibe::Beach, Season::Autumn) => 0.6,
        (Vibe::Beach, Season::Winter) => 0.3,

        (Vibe::Cultural, Season::Spring) => 1.0,
        (Vibe::Cultural, Season::Autumn) => 1.0,
        (Vibe::Cultural, Season::Summer) => 0.7,
        (Vibe::Cultural, Season::Winter) => 0.6,

        (Vibe::Adventure, Season::Summer) => 0.9,
        (Vibe::Adventure, Season::Autumn) => 0.9,
        (Vibe::Adventure, Season::Spring) => 0.8,
        (Vibe::Adventure, Season::Winter) => 0.6,

        (Vibe::Nature, Season::Spring) => 1.0,
        (Vibe::Nature, Season::Autumn) => 0.9,
        (Vibe::Nature, Season::Summer) => 0.8,
        (Vibe::Nature, Season::Winter) => 0.5,

        (Vibe::Romantic, Season::Spring) => 0.9,
        (Vibe::Romantic, Season::Autumn) => 0.9,
        (Vibe::Romantic, Season::Winter) => 0.8,
        (Vibe::Romantic, Season::Summer) => 0.7,

        (Vibe::Culinary, _) => 0.9,

        (Vibe::Wellness, Season::Winter) => 0.9,
        (Vibe::Wellness, Season::Autumn) => 0.8,
        (Vibe::Wellness, Season::Spring) => 0.8,
        (Vibe::Wellness, Season::Summer) => 0.7,
    }
}

/// Season-vs-vibe compatibility plus LLM-advised mood notes (§4.11).
pub async fn run(llm: Option<&Arc<LlmAdvisor>>, vibe: Vibe, start_date: NaiveDate) -> (VibeAnalysis, Vec<String>) {
    let mut warnings = Vec::new();
    let season = season_for(start_date);
    let compatibility_score = compatibility_score(vibe, season);

    let (mood_indicators, wellness_tips) = match llm {
        Some(llm) => match fetch_mood_and_tips(llm, vibe, season).await {
            Some(result) => result,
            None => {
                warnings.push("vibe mood indicators fell back to defaults".to_string());
                fallback_mood_and_tips(vibe)
            }
        },
        None => fallback_mood_and_tips(vibe),
    };

    (
        VibeAnalysis {
            vibe,
            season: season.as_str().to_string(),
            compatibility_score,
            mood_indicators,
            wellness_tips,
        },
        warnings,
    )
}

async fn fetch_mood_and_tips(llm: &LlmAdvisor, vibe: Vibe, season: Season) -> Option<(Vec<String>, Vec<String>)> {
    let prompt = format!(
        "Traveler vibe: {}. Current season: {}. Give 3 short mood indicators and 2 short wellness tips. \
         Respond as JSON: {{\"mood_indicators\": [str], \"wellness_tips\": [str]}}",
        vibe.as_str(),
        season.as_str()
    );
    let value = llm
        .generate_json("You are a concise travel-mood assistant. Reply with strict JSON only.", &prompt, Some(0.4), Some(150))
        .await?;

    let mood_indicators = value.get("mood_indicators")?.as_array()?.iter().filter_map(|v| v.as_str().map(str::to_string)).collect();
    let wellness_tips = value.get("wellness_tips")?.as_array()?.iter().filter_map(|v| v.as_str().map(str::to_string)).collect();
    Some((mood_indicators, wellness_tips))
}

fn fallback_mood_and_tips(vibe: Vibe) -> (Vec<String>, Vec<String>) {
    let mood = match vibe {
        Vibe::Romantic => vec!["intimate".to_string(), "slow-paced".to_string()],
        Vibe::Adventure => vec!["energetic".to_string(), "outdoorsy".to_string()],
        Vibe::Beach => vec!["relaxed".to_string(), "sun-seeking".to_string()],
        Vibe::Nature => vec!["grounded".to_string(), "quiet".to_string()],
        Vibe::Cultural => vec!["curious".to_string(), "exploratory".to_string()],
        Vibe::Culinary => vec!["indulgent".to_string(), "social".to_string()],
        Vibe::Wellness => vec!["restorative".to_string(), "mindful".to_string()],
    };
    let tips = vec!["Stay hydrated and pace your days.".to_string(), "Build in at least one rest day.".to_string()];
    (mood, tips)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn beach_peaks_in_summer_and_dips_in_winter() {
        assert_eq!(compatibility_score(Vibe::Beach, Season::Summer), 1.0);
        assert_eq!(compatibility_score(Vibe::Beach, Season::Winter), 0.3);
    }

    #[test]
    fn cultural_peaks_spring_and_autumn() {
        assert_eq!(compatibility_score(Vibe::Cultural, Season::Spring), 1.0);
        assert_eq!(compatibility_score(Vibe::Cultural, Season::Autumn), 1.0);
    }

    #[test]
    fn season_buckets_months_correctly() {
        assert_eq!(season_for(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()), Season::Winter);
        assert_eq!(season_for(NaiveDate::from_ymd_opt(2024, 4, 15).unwrap()), Season::Spring);
        assert_eq!(season_for(NaiveDate::from_ymd_opt(2024, 7, 15).unwrap()), Season::Summer);
        assert_eq!(season_for(NaiveDate::from_ymd_opt(2024, 10, 15).unwrap()), Season::Autumn);
    }
}
