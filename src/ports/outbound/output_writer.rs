use crate::shared::Result;
use std::path::PathBuf;

/// OutputWriter port for persisting an encoded document
///
/// This port abstracts the output destination where encoded SBOM
/// documents are stored.
pub trait OutputWriter {
    /// Writes `content` under `file_name`, replacing any previous file
    ///
    /// Implementations must never leave a partially written file behind.
    ///
    /// # Returns
    /// The final path of the written file
    ///
    /// # Errors
    /// Returns an error if:
    /// - The destination cannot be created or is not writable
    /// - The destination is a symbolic link
    fn write_output(&self, file_name: &str, content: &[u8]) -> Result<PathBuf>;
}
