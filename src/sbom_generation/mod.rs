/// SBOM generation bounded context: domain model, policies and services
pub mod domain;
pub mod policies;
pub mod services;
