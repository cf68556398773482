use crate::adapters::outbound::encoders::{
    JsonDecoder, JsonEncoder, RdfEncoder, TagValueDecoder, TagValueEncoder,
};
use crate::application::dto::OutputFormat;
use crate::ports::outbound::{BomDecoder, BomEncoder};
use crate::sbom_generation::domain::{Bom, PackageGraph};
use crate::shared::error::SbomError;
use crate::shared::Result;

/// Factory dispatching to the encoder adapter of an output format
///
/// Selection is a plain `match` over the closed [`OutputFormat`] set, so
/// every format is known at compile time and no trait objects are involved.
pub struct EncoderFactory;

impl EncoderFactory {
    /// Encodes a Bom in the requested format
    ///
    /// # Errors
    /// Returns an error if the encoder fails to render the document, and
    /// `SbomError::UnsupportedFormat` for `All`, which is expanded by the caller
    pub fn encode(format: OutputFormat, bom: &Bom) -> Result<Vec<u8>> {
        match format {
            OutputFormat::Json => JsonEncoder::new().encode(bom),
            OutputFormat::Rdf => RdfEncoder::new().encode(bom),
            OutputFormat::TagValue => TagValueEncoder::new().encode(bom),
            OutputFormat::All => Err(SbomError::UnsupportedFormat {
                format: format!("{} (as a single document)", format),
            }
            .into()),
        }
    }

    /// Decodes a document back into its package graph
    ///
    /// # Errors
    /// Returns `SbomError::UnsupportedFormat` for RDF, which has no decoder,
    /// and for `All`. Unreadable documents give `SbomError::MalformedRecord`.
    pub fn decode(format: OutputFormat, content: &[u8]) -> Result<PackageGraph> {
        match format {
            OutputFormat::Json => JsonDecoder::new().decode(content),
            OutputFormat::TagValue => TagValueDecoder::new().decode(content),
            OutputFormat::Rdf | OutputFormat::All => Err(SbomError::UnsupportedFormat {
                format: format!("{} (decoding)", format),
            }
            .into()),
        }
    }

    /// Returns the progress message for the specified output format
    pub fn progress_message(format: OutputFormat) -> &'static str {
        match format {
            OutputFormat::Json => "📝 Generating SPDX JSON output...",
            OutputFormat::Rdf => "📝 Generating SPDX RDF/XML output...",
            OutputFormat::TagValue => "📝 Generating SPDX tag-value output...",
            OutputFormat::All => "📝 Generating SPDX output in every format...",
        }
    }
}
