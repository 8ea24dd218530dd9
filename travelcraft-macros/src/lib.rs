mod completion_schema;
mod schema_extraction;

use proc_macro::TokenStream;

/// Derives a cached JSON Schema (via `schemars`) for a DTO returned by an
/// LLM-advised estimator, so callers can validate a parsed response before
/// trusting it. Doc comments on the struct and its fields become schema
/// descriptions.
#[proc_macro_attribute]
pub fn completion_schema(attr: TokenStream, item: TokenStream) -> TokenStream {
    completion_schema::completion_schema(attr, item)
}
