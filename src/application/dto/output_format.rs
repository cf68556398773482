use crate::shared::error::SbomError;

/// Output format enumeration for SBOM generation
///
/// This enum represents the supported SPDX serializations. It belongs in the
/// application layer as both the CLI and the encoder adapters need to
/// understand it. The set is closed: adding a format means adding a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    /// SPDX JSON (default)
    Json,
    /// SPDX RDF/XML
    Rdf,
    /// SPDX tag-value
    TagValue,
    /// Every serialization above, one file each
    All,
}

impl OutputFormat {
    /// The formats that map to exactly one document
    pub const SINGLE: [OutputFormat; 3] =
        [OutputFormat::Json, OutputFormat::Rdf, OutputFormat::TagValue];

    /// The single-document formats this selection expands to
    pub fn formats(&self) -> Vec<OutputFormat> {
        match self {
            OutputFormat::All => Self::SINGLE.to_vec(),
            single => vec![*single],
        }
    }

    /// File extension of documents in this format
    ///
    /// `All` writes one file per expanded format and has no extension itself.
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            OutputFormat::Json => Some("json"),
            OutputFormat::Rdf => Some("rdf"),
            OutputFormat::TagValue => Some("tv"),
            OutputFormat::All => None,
        }
    }

    /// Whether a decoder exists for this format
    pub fn is_decodable(&self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::TagValue)
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = SbomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "rdf" | "xml" => Ok(OutputFormat::Rdf),
            "tv" | "tagvalue" | "tag-value" => Ok(OutputFormat::TagValue),
            "all" => Ok(OutputFormat::All),
            _ => Err(SbomError::UnsupportedFormat {
                format: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Rdf => write!(f, "rdf"),
            OutputFormat::TagValue => write!(f, "tv"),
            OutputFormat::All => write!(f, "all"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::from_str("json").unwrap(), OutputFormat::Json);
        assert_eq!(OutputFormat::from_str("rdf").unwrap(), OutputFormat::Rdf);
        assert_eq!(OutputFormat::from_str("tv").unwrap(), OutputFormat::TagValue);
        assert_eq!(OutputFormat::from_str("ALL").unwrap(), OutputFormat::All);
    }

    #[test]
    fn test_output_format_aliases_and_case() {
        assert_eq!(OutputFormat::from_str("JSON").unwrap(), OutputFormat::Json);
        assert_eq!(OutputFormat::from_str("xml").unwrap(), OutputFormat::Rdf);
        assert_eq!(OutputFormat::from_str("TagValue").unwrap(), OutputFormat::TagValue);
    }

    #[test]
    fn test_output_format_from_str_invalid() {
        let error = OutputFormat::from_str("yaml").unwrap_err();
        assert_eq!(error.kind(), "unsupported format");
        assert!(error.to_string().contains("yaml"));
        assert_eq!(error.exit_code().as_i32(), 4);

        assert!(OutputFormat::from_str("").is_err());
    }

    #[test]
    fn test_display_round_trips() {
        for format in OutputFormat::SINGLE.into_iter().chain([OutputFormat::All]) {
            assert_eq!(OutputFormat::from_str(&format.to_string()).unwrap(), format);
        }
    }

    #[test]
    fn test_extension() {
        assert_eq!(OutputFormat::Json.extension(), Some("json"));
        assert_eq!(OutputFormat::Rdf.extension(), Some("rdf"));
        assert_eq!(OutputFormat::TagValue.extension(), Some("tv"));
        assert_eq!(OutputFormat::All.extension(), None);
    }

    #[test]
    fn test_all_expands_to_every_single_format() {
        assert_eq!(
            OutputFormat::All.formats(),
            vec![OutputFormat::Json, OutputFormat::Rdf, OutputFormat::TagValue]
        );
        assert_eq!(OutputFormat::Rdf.formats(), vec![OutputFormat::Rdf]);
        assert!(!OutputFormat::All.is_decodable());
    }
}
