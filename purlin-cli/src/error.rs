//! CLI-specific error types and exit code mapping

use purlin_core::error::{DocumentError, PurlinError};

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-facing message.
/// The `exit_code()` method maps errors to the documented exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Invalid arguments or SBOM file discovery failure.
    #[error("{0}")]
    Usage(String),

    /// Failed to read the input file.
    #[error("failed to read {path}: {source}")]
    ReadInput {
        path: String,
        source: std::io::Error,
    },

    /// Failed to write the enriched document to stdout.
    #[error("failed to write output: {0}")]
    WriteOutput(std::io::Error),

    /// Document-level enrichment failure (parse, unknown format, marshal).
    #[error("{0}")]
    Enrich(#[from] DocumentError),

    /// Wrapped domain error from purlin-core.
    #[error("{0}")]
    Core(#[from] PurlinError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                |
    /// |------|------------------------|
    /// | 0    | Success                |
    /// | 1    | Argument / usage error |
    /// | 3    | Runtime error          |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_) => 1,
            Self::ReadInput { .. } | Self::WriteOutput(_) | Self::Enrich(_) | Self::Core(_) => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_error_exits_1() {
        let err = CliError::Usage("no SBOM files found".to_owned());
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn runtime_errors_exit_3() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        assert_eq!(
            CliError::ReadInput {
                path: "sbom.json".to_owned(),
                source: io_err,
            }
            .exit_code(),
            3
        );

        let write_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        assert_eq!(CliError::WriteOutput(write_err).exit_code(), 3);

        assert_eq!(CliError::Enrich(DocumentError::UnknownFormat).exit_code(), 3);
    }

    #[test]
    fn document_error_converts_via_from() {
        let err: CliError = DocumentError::UnknownFormat.into();
        assert!(matches!(err, CliError::Enrich(_)));
    }

    #[test]
    fn error_display_includes_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = CliError::ReadInput {
            path: "/tmp/sbom.json".to_owned(),
            source: io_err,
        };
        assert!(err.to_string().contains("/tmp/sbom.json"));
    }
}
