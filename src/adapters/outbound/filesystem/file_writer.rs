use crate::ports::outbound::OutputWriter;
use crate::shared::error::SbomError;
use crate::shared::security::validate_not_symlink;
use crate::shared::Result;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// AtomicFileWriter adapter for writing encoded documents into a directory
///
/// This adapter implements the OutputWriter port. Each document is written
/// to a temporary file in the target directory and then renamed over the
/// final name, so a reader never observes a partially written document and
/// an interrupted run leaves no output behind.
pub struct AtomicFileWriter {
    output_dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn write_error(path: &Path, details: impl Into<String>) -> SbomError {
        SbomError::FileWriteError {
            path: path.to_path_buf(),
            details: details.into(),
        }
    }

    /// Creates the output directory when missing and rejects anything that
    /// is not a real directory
    fn prepare_output_dir(&self) -> Result<()> {
        match fs::symlink_metadata(&self.output_dir) {
            Ok(metadata) if metadata.is_dir() => Ok(()),
            Ok(metadata) if metadata.is_symlink() => {
                // Symlinked directories are allowed as long as they resolve to a directory
                if self.output_dir.is_dir() {
                    Ok(())
                } else {
                    Err(Self::write_error(
                        &self.output_dir,
                        "Output path is a symbolic link that does not point to a directory",
                    )
                    .into())
                }
            }
            Ok(_) => Err(Self::write_error(
                &self.output_dir,
                "Output path exists but is not a directory",
            )
            .into()),
            Err(_) => {
                fs::create_dir_all(&self.output_dir).map_err(|e| {
                    Self::write_error(
                        &self.output_dir,
                        format!("Failed to create output directory: {}", e),
                    )
                })?;
                tracing::debug!(dir = %self.output_dir.display(), "Created output directory");
                Ok(())
            }
        }
    }

    /// Rejects an existing target that is a symlink or a directory
    fn validate_target(target: &Path) -> Result<()> {
        let Ok(metadata) = fs::symlink_metadata(target) else {
            return Ok(());
        };
        validate_not_symlink(target, "write")
            .map_err(|e| Self::write_error(target, e.to_string()))?;
        if metadata.is_dir() {
            return Err(Self::write_error(target, "Output path is a directory").into());
        }
        Ok(())
    }
}

impl OutputWriter for AtomicFileWriter {
    fn write_output(&self, file_name: &str, content: &[u8]) -> Result<PathBuf> {
        if file_name.is_empty() || file_name.contains(['/', '\\']) || file_name == ".." {
            return Err(SbomError::Internal {
                details: format!("refusing to write outside the output directory: {}", file_name),
            }
            .into());
        }

        self.prepare_output_dir()?;
        let target = self.output_dir.join(file_name);
        Self::validate_target(&target)?;

        let mut temp = NamedTempFile::new_in(&self.output_dir).map_err(|e| {
            Self::write_error(&target, format!("Failed to create temporary file: {}", e))
        })?;
        temp.write_all(content)
            .and_then(|_| temp.as_file().sync_all())
            .map_err(|e| Self::write_error(&target, e.to_string()))?;
        temp.persist(&target)
            .map_err(|e| Self::write_error(&target, e.error.to_string()))?;

        tracing::debug!(path = %target.display(), bytes = content.len(), "Wrote document");
        Ok(target)
    }
}
