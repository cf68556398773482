/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses
/// to interact with external systems (inventory service, file system, console).
pub mod encoder;
pub mod inventory_repository;
pub mod output_writer;
pub mod progress_reporter;

pub use encoder::{BomDecoder, BomEncoder};
pub use inventory_repository::InventoryRepository;
pub use output_writer::OutputWriter;
pub use progress_reporter::ProgressReporter;
