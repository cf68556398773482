//! sbom-generator - SPDX SBOM generation from a remote dependency inventory
//!
//! This library fetches the dependency inventory of one or more scopes
//! (projects or products) from an inventory service, normalizes it into a
//! package graph, and encodes SPDX 2.3 documents as JSON, RDF/XML or
//! tag-value, following hexagonal architecture and Domain-Driven Design principles.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`sbom_generation`): Pure business logic and domain models
//! - **Application Layer** (`application`): Use cases, pipeline stages and DTOs
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Concrete implementations of ports
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use sbom_generator::prelude::*;
//! use std::path::PathBuf;
//!
//! # async fn generate() -> Result<()> {
//! // Create adapters
//! let credentials = Credentials::new("user-key", "org-token")?;
//! let inventory_client = InventoryClient::new(credentials, InventoryClientConfig::default())?;
//! let output_writer = AtomicFileWriter::new(PathBuf::from("sboms"));
//! let progress_reporter = StderrProgressReporter::new();
//!
//! // Create use case
//! let use_case = GenerateSbomUseCase::new(inventory_client, output_writer, progress_reporter);
//!
//! // Execute
//! let request = SbomRequest::new(vec![Scope::new("my-project-token")?], OutputFormat::Json);
//! let response = use_case.execute(request).await?;
//! for path in response.paths() {
//!     println!("{}", path.display());
//! }
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod cli;
pub mod config;
pub mod ports;
pub mod sbom_generation;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::encoders::{
        JsonDecoder, JsonEncoder, RdfEncoder, TagValueDecoder, TagValueEncoder,
    };
    pub use crate::adapters::outbound::filesystem::AtomicFileWriter;
    pub use crate::adapters::outbound::network::{
        Credentials, InventoryClient, InventoryClientConfig,
    };
    pub use crate::application::dto::{OutputFormat, SbomRequest, SbomResponse};
    pub use crate::application::pipeline::{PipelineError, PipelineStage};
    pub use crate::application::use_cases::GenerateSbomUseCase;
    pub use crate::ports::outbound::{
        BomDecoder, BomEncoder, InventoryRepository, OutputWriter, ProgressReporter,
    };
    pub use crate::sbom_generation::domain::{
        Bom, Package, PackageGraph, PackageId, RawInventory, Scope, SbomMetadata,
    };
    pub use crate::sbom_generation::services::{
        DependencyAnalyzer, ModelNormalizer, SbomGenerator,
    };
    pub use crate::shared::error::{ExitCode, SbomError};
    pub use crate::shared::Result;
}
