use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes allow CI systems to distinguish between different
/// types of failures and successes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - every requested SBOM was written
    Success = 0,
    /// Invalid command-line arguments (clap parsing errors, empty credentials)
    InvalidArguments = 2,
    /// Upstream error (bad credentials, unknown scope, network failure)
    UpstreamError = 3,
    /// Application error (encoding, malformed inventory, file I/O, etc.)
    ApplicationError = 4,
    /// The run was interrupted before completion
    Interrupted = 130,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::UpstreamError => write!(f, "Upstream Error (3)"),
            ExitCode::ApplicationError => write!(f, "Application Error (4)"),
            ExitCode::Interrupted => write!(f, "Interrupted (130)"),
        }
    }
}

/// Application-specific errors for SBOM generation.
///
/// Messages never carry credential values: variants hold details produced
/// by this crate, not raw request bodies.
#[derive(Debug, Error)]
pub enum SbomError {
    #[error("Invalid usage: {message}\n\n💡 Hint: Run with --help to see the required arguments")]
    Usage { message: String },

    #[error("Authentication failed: {details}\n\n💡 Hint: Verify the user key (-u) and organization token (-k)")]
    Authentication { details: String },

    #[error("Scope not found: {scope}\nDetails: {details}\n\n💡 Hint: Verify the scope token (-s) belongs to this organization")]
    ScopeNotFound { scope: String, details: String },

    #[error("Network error: {details}\n\n💡 Hint: Check the inventory URL (-a) and your network connection")]
    Network { details: String },

    #[error("Malformed inventory data: {details}")]
    MalformedRecord { details: String },

    #[error("Unsupported output format: {format}\n\n💡 Hint: Please specify 'json', 'rdf' or 'tv'")]
    UnsupportedFormat { format: String },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },

    #[error("Internal error: {details}")]
    Internal { details: String },
}

impl SbomError {
    /// Short label naming the error kind, used in driver diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            SbomError::Usage { .. } => "usage error",
            SbomError::Authentication { .. } => "authentication error",
            SbomError::ScopeNotFound { .. } => "not found",
            SbomError::Network { .. } => "network error",
            SbomError::MalformedRecord { .. } => "malformed record",
            SbomError::UnsupportedFormat { .. } => "unsupported format",
            SbomError::FileWriteError { .. } => "write error",
            SbomError::Internal { .. } => "internal error",
        }
    }

    /// Maps the error to the process exit code
    pub fn exit_code(&self) -> ExitCode {
        match self {
            SbomError::Usage { .. } => ExitCode::InvalidArguments,
            SbomError::Authentication { .. }
            | SbomError::ScopeNotFound { .. }
            | SbomError::Network { .. } => ExitCode::UpstreamError,
            SbomError::MalformedRecord { .. }
            | SbomError::UnsupportedFormat { .. }
            | SbomError::FileWriteError { .. }
            | SbomError::Internal { .. } => ExitCode::ApplicationError,
        }
    }

    /// Whether a retry may succeed (network-level failures only)
    pub fn is_transient(&self) -> bool {
        matches!(self, SbomError::Network { .. })
    }

    /// Finds the first `SbomError` in an anyhow error chain
    pub fn find_in(err: &anyhow::Error) -> Option<&SbomError> {
        err.chain().find_map(|cause| cause.downcast_ref::<SbomError>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::InvalidArguments.as_i32(), 2);
        assert_eq!(ExitCode::UpstreamError.as_i32(), 3);
        assert_eq!(ExitCode::ApplicationError.as_i32(), 4);
        assert_eq!(ExitCode::Interrupted.as_i32(), 130);
    }

    #[test]
    fn test_exit_code_display() {
        assert_eq!(format!("{}", ExitCode::Success), "Success (0)");
        assert_eq!(
            format!("{}", ExitCode::InvalidArguments),
            "Invalid Arguments (2)"
        );
        assert_eq!(format!("{}", ExitCode::UpstreamError), "Upstream Error (3)");
        assert_eq!(
            format!("{}", ExitCode::ApplicationError),
            "Application Error (4)"
        );
    }

    #[test]
    fn test_error_exit_code_mapping() {
        let usage = SbomError::Usage {
            message: "missing -s".to_string(),
        };
        let auth = SbomError::Authentication {
            details: "status 401".to_string(),
        };
        let network = SbomError::Network {
            details: "timeout".to_string(),
        };
        let format = SbomError::UnsupportedFormat {
            format: "yaml".to_string(),
        };
        let internal = SbomError::Internal {
            details: "boom".to_string(),
        };

        assert_eq!(usage.exit_code(), ExitCode::InvalidArguments);
        assert_eq!(auth.exit_code(), ExitCode::UpstreamError);
        assert_eq!(network.exit_code(), ExitCode::UpstreamError);
        assert_eq!(format.exit_code(), ExitCode::ApplicationError);
        assert_eq!(internal.exit_code(), ExitCode::ApplicationError);
        assert_ne!(usage.exit_code(), format.exit_code());
    }

    #[test]
    fn test_only_network_errors_are_transient() {
        assert!(SbomError::Network {
            details: "503".to_string()
        }
        .is_transient());
        assert!(!SbomError::Authentication {
            details: "401".to_string()
        }
        .is_transient());
    }

    #[test]
    fn test_find_in_walks_context_chain() {
        let err: anyhow::Error = Err::<(), _>(SbomError::ScopeNotFound {
            scope: "demo-go".to_string(),
            details: "status 404".to_string(),
        })
        .context("fetching inventory")
        .unwrap_err();

        let found = SbomError::find_in(&err).unwrap();
        assert_eq!(found.kind(), "not found");
    }

    #[test]
    fn test_find_in_returns_none_for_foreign_errors() {
        let err = anyhow::anyhow!("something else");
        assert!(SbomError::find_in(&err).is_none());
    }

    #[test]
    fn test_unsupported_format_display() {
        let error = SbomError::UnsupportedFormat {
            format: "yaml".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Unsupported output format: yaml"));
        assert!(display.contains("💡 Hint:"));
    }

    #[test]
    fn test_file_write_error_display() {
        let error = SbomError::FileWriteError {
            path: PathBuf::from("/test/output.json"),
            details: "Permission denied".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Failed to write to file"));
        assert!(display.contains("/test/output.json"));
        assert!(display.contains("Permission denied"));
    }
}
