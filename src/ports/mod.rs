/// Ports module defining interfaces for hexagonal architecture
///
/// Outbound ports (driven ports) are the infrastructure interfaces the
/// application core depends on. The CLI drives the use case directly.
pub mod outbound;
