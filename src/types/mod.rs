pub mod request;
pub mod response;

pub use request::{TravelRequest, Vibe};
pub use response::{
    Confidence, CostBreakdown, Day, Flight, Hotel, HotelContext, LocalTransportation,
    PriceCalendar, PriceCalendarStatistics, PriceGridEntry, PriceTier, TransportMode,
    TransportOption, TransportationSummary, TravelAnalysis, TravelResponse, VibeAnalysis,
};
