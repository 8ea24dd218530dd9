pub mod airport;
pub mod country;
pub mod distance;

pub use airport::{AirportResolution, AirportResolver};
pub use country::{CountryProfileCache, CountryStrategy};
pub use distance::{haversine_km, DistanceCalculator, DriveEstimate};
