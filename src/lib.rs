pub mod agents;
pub mod cache;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod geo;
pub mod llm;
pub mod orchestrator;
pub mod providers;
pub mod schemas;
pub mod types;

pub use error::{Result, TravelError};
pub use llm::LlmAdvisor;
pub use orchestrator::Orchestrator;
pub use schemas::{CompletionSchema, SchemaHandle};
pub use travelcraft_macros::completion_schema;
pub use types::{TravelRequest, TravelResponse, Vibe};
