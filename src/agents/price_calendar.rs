use std::sync::Arc;

use chrono::{Duration as ChronoDuration, NaiveDate};
use futures::stream::{self, StreamExt};
use tracing::warn;

use crate::providers::FlightProvider;
use crate::types::response::{PriceCalendar, PriceCalendarStatistics, PriceGridEntry, PriceTier};

const MAX_CONCURRENT_SEARCHES: usize = 8;
const MIN_VALID_PRICES_FOR_CONFIDENCE: usize = 3;
const MAX_RECOMMENDATIONS: usize = 5;
const MIN_RECOMMENDATIONS: usize = 3;

/// Fans out `2*window_days + 1` single-cheapest-price flight searches
/// around `target_date` with bounded concurrency (§4.5).
pub async fn build_price_calendar(
    flight_provider: &Arc<dyn FlightProvider>,
    origin_iata: &str,
    dest_iata: &str,
    target_date: NaiveDate,
    return_offset_days: i64,
    travelers: u32,
    window_days: i64,
) -> (PriceCalendar, Vec<String>) {
    let mut warnings = Vec::new();
    let dates: Vec<NaiveDate> = (-window_days..=window_days)
        .map(|offset| target_date + ChronoDuration::days(offset))
        .collect();

    let results: Vec<Option<(NaiveDate, f64)>> = stream::iter(dates.into_iter())
        .map(|date| {
            let provider = Arc::clone(flight_provider);
            async move {
                let return_date = date + ChronoDuration::days(return_offset_days);
                match provider.search(origin_iata, dest_iata, date, return_date, travelers).await {
                    Ok(results) if !results.is_empty() => {
                        let cheapest = results
                            .iter()
                            .map(|r| r.price_usd)
                            .fold(f64::INFINITY, f64::min);
                        Some((date, cheapest))
                    }
                    Ok(_) => None,
                    Err(err) => {
                        warn!(target: "travelcraft::agents::price_calendar", error = %err, "search failed for one date");
                        None
                    }
                }
            }
        })
        .buffer_unordered(MAX_CONCURRENT_SEARCHES)
        .collect()
        .await;

    let mut valid: Vec<(NaiveDate, f64)> = results.into_iter().flatten().collect();
    valid.sort_by_key(|(date, _)| *date);

    if valid.len() < MIN_VALID_PRICES_FOR_CONFIDENCE {
        warnings.push("price calendar degraded to a single-point estimate (too few valid prices)".to_string());
        let cheapest = valid.into_iter().min_by(|a, b| a.1.total_cmp(&b.1));
        let entry = cheapest.map(|(date, price)| PriceGridEntry { date, price_usd: price, tier: PriceTier::Moderate });
        return (
            PriceCalendar {
                price_grid: entry.clone().into_iter().collect(),
                cheapest_option: entry,
                statistics: PriceCalendarStatistics { min: 0.0, max: 0.0, mean: 0.0, stdev: 0.0 },
                recommendations: Vec::new(),
                low_confidence: true,
            },
            warnings,
        );
    }

    let prices: Vec<f64> = valid.iter().map(|(_, price)| *price).collect();
    let min = prices.iter().copied().fold(f64::INFINITY, f64::min);
    let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = prices.iter().sum::<f64>() / prices.len() as f64;
    let variance = prices.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / prices.len() as f64;
    let stdev = variance.sqrt();

    let price_grid: Vec<PriceGridEntry> = valid
        .iter()
        .map(|(date, price)| PriceGridEntry { date: *date, price_usd: *price, tier: classify(*price, mean, stdev, min) })
        .collect();

    let cheapest_option = price_grid
        .iter()
        .min_by(|a, b| a.price_usd.total_cmp(&b.price_usd))
        .cloned();

    let recommendations = build_recommendations(&price_grid, target_date);

    (
        PriceCalendar {
            price_grid,
            cheapest_option,
            statistics: PriceCalendarStatistics { min, max, mean, stdev },
            recommendations,
            low_confidence: false,
        },
        warnings,
    )
}

/// `cheap`: `price <= mean - 0.5*stdev` AND within 110% of `min`.
/// `expensive`: `price >= mean + 0.5*stdev`. Otherwise `moderate` (§4.5).
fn classify(price: f64, mean: f64, stdev: f64, min: f64) -> PriceTier {
    if price <= mean - 0.5 * stdev && price <= min * 1.1 {
        PriceTier::Cheap
    } else if price >= mean + 0.5 * stdev {
        PriceTier::Expensive
    } else {
        PriceTier::Moderate
    }
}

fn build_recommendations(grid: &[PriceGridEntry], target_date: NaiveDate) -> Vec<String> {
    let target_price = grid
        .iter()
        .find(|entry| entry.date == target_date)
        .map(|entry| entry.price_usd);

    let mut cheap_entries: Vec<&PriceGridEntry> =
        grid.iter().filter(|entry| entry.tier == PriceTier::Cheap).collect();
    cheap_entries.sort_by(|a, b| a.price_usd.total_cmp(&b.price_usd));

    let mut recommendations = Vec::new();
    for entry in cheap_entries.iter().take(MAX_RECOMMENDATIONS) {
        match target_price {
            Some(target) if target > entry.price_usd => {
                recommendations.push(format!(
                    "Save ${:.0} by departing on {} instead of {}",
                    target - entry.price_usd,
                    entry.date,
                    target_date
                ));
            }
            _ => {
                recommendations.push(format!("{} is a cheap date at ${:.0}", entry.date, entry.price_usd));
            }
        }
    }

    while recommendations.len() < MIN_RECOMMENDATIONS {
        if let Some(entry) = grid.iter().min_by(|a, b| a.price_usd.total_cmp(&b.price_usd)) {
            recommendations.push(format!("Cheapest overall date found: {} at ${:.0}", entry.date, entry.price_usd));
        } else {
            break;
        }
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_thresholds() {
        assert_eq!(classify(80.0, 100.0, 20.0, 80.0), PriceTier::Cheap);
        assert_eq!(classify(115.0, 100.0, 20.0, 80.0), PriceTier::Expensive);
        assert_eq!(classify(100.0, 100.0, 20.0, 80.0), PriceTier::Moderate);
    }
}
