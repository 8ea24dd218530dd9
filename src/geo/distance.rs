use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::TtlCache;
use crate::providers::{DistanceProvider, Geocoder};

const EARTH_RADIUS_KM: f64 = 6371.0;
const FALLBACK_SPEED_KMH: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DriveEstimate {
    pub km: f64,
    pub minutes: f64,
}

/// Road distance + drive time between two places (§4.2). Tries the maps
/// provider first; on failure or absence, forward-geocodes both endpoints
/// and falls back to haversine distance plus a `km / 70 km/h` heuristic.
pub struct DistanceCalculator {
    distance_provider: Option<Arc<dyn DistanceProvider>>,
    geocoder: Option<Arc<dyn Geocoder>>,
    cache: TtlCache<(String, String), DriveEstimate>,
}

impl DistanceCalculator {
    pub fn new(
        distance_provider: Option<Arc<dyn DistanceProvider>>,
        geocoder: Option<Arc<dyn Geocoder>>,
    ) -> Self {
        Self { distance_provider, geocoder, cache: TtlCache::new(None) }
    }

    pub async fn drive(&self, origin: &str, destination: &str) -> Option<DriveEstimate> {
        let key = symmetric_key(origin, destination);
        if let Some(cached) = self.cache.get(&key).await {
            return Some(cached);
        }

        let estimate = self.drive_uncached(origin, destination).await?;
        self.cache.put(key, estimate).await;
        Some(estimate)
    }

    async fn drive_uncached(&self, origin: &str, destination: &str) -> Option<DriveEstimate> {
        if let Some(provider) = &self.distance_provider {
            match provider.drive(origin, destination).await {
                Ok((km, minutes)) => {
                    debug!(target: "travelcraft::geo", origin, destination, "distance via maps provider");
                    return Some(DriveEstimate { km, minutes });
                }
                Err(err) => {
                    warn!(target: "travelcraft::geo", error = %err, "maps provider failed, falling back to geocode");
                }
            }
        }

        let geocoder = self.geocoder.as_ref()?;
        let (origin_lat, origin_lon, _) = geocoder.forward(origin).await.ok()?;
        let (dest_lat, dest_lon, _) = geocoder.forward(destination).await.ok()?;

        let km = haversine_km(origin_lat, origin_lon, dest_lat, dest_lon);
        let minutes = (km / FALLBACK_SPEED_KMH) * 60.0;
        debug!(target: "travelcraft::geo", origin, destination, km, "distance via haversine fallback");
        Some(DriveEstimate { km, minutes })
    }
}

fn symmetric_key(a: &str, b: &str) -> (String, String) {
    let mut pair = [a.trim().to_lowercase(), b.trim().to_lowercase()];
    pair.sort();
    let [first, second] = pair;
    (first, second)
}

/// Great-circle distance between two (lat, lon) points in kilometers.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (lat1, lon1, lat2, lon2) =
        (lat1.to_radians(), lon1.to_radians(), lat2.to_radians(), lon2.to_radians());

    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}
