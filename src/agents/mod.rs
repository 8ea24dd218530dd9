pub mod cost;
pub mod flight;
pub mod hotel;
pub mod itinerary;
pub mod price_calendar;
pub mod transport;
pub mod vibe;
