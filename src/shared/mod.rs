/// Shared utilities used across all layers
pub mod error;
pub mod result;
pub mod security;
pub mod telemetry;

pub use result::Result;
