/// Upstream API clients
///
/// Typed fetch wrappers for each external provider. Every adapter
/// normalizes transport failures into its own error shape at this boundary;
/// no untyped provider payload escapes this module except the deliberately
/// raw market-detail/chart documents, which the handlers reshape.
pub mod alchemy;
pub mod client;
pub mod coingecko;
pub mod llm;

pub use client::HttpClient;
