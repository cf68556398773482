use crate::sbom_generation::domain::{Bom, PackageGraph};
use crate::shared::Result;

/// BomEncoder port for serializing a Bom into one SBOM format
///
/// Encoding is pure: implementations must not perform I/O and must produce
/// identical bytes for identical input.
pub trait BomEncoder {
    /// Serializes the Bom
    ///
    /// # Errors
    /// Returns an error if serialization fails
    fn encode(&self, bom: &Bom) -> Result<Vec<u8>>;
}

/// BomDecoder port for reading a document back into a package graph
pub trait BomDecoder {
    /// Parses packages and relationships; document-level relationships
    /// are not part of the graph and are skipped
    ///
    /// # Errors
    /// Returns an error if the document is not valid for this format
    fn decode(&self, content: &[u8]) -> Result<PackageGraph>;
}
