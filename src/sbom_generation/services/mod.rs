mod dependency_analyzer;
mod model_normalizer;
mod sbom_generator;

pub use dependency_analyzer::{DependencyAnalyzer, DependencyReport};
pub use model_normalizer::ModelNormalizer;
pub use sbom_generator::{MetadataSettings, SbomGenerator};
