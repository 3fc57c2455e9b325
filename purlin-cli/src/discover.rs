//! SBOM file discovery for the CLI path argument
//!
//! A file path is taken as-is. A directory is scanned one level deep for
//! `.json` entries, and exactly one must result — enriching multiple
//! documents in one invocation is not supported.

use std::path::{Path, PathBuf};

use crate::error::CliError;

/// Resolve a path argument to exactly one SBOM file.
pub fn resolve_sbom_path(path: &Path) -> Result<PathBuf, CliError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| CliError::Usage(format!("cannot access path {}: {e}", path.display())))?;

    if !metadata.is_dir() {
        return Ok(path.to_path_buf());
    }

    let entries = std::fs::read_dir(path)
        .map_err(|e| CliError::Usage(format!("cannot read directory {}: {e}", path.display())))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| {
            CliError::Usage(format!("cannot read directory {}: {e}", path.display()))
        })?;
        let entry_path = entry.path();
        if entry_path.is_dir() {
            continue;
        }
        if entry_path.extension().is_some_and(|ext| ext == "json") {
            files.push(entry_path);
        }
    }
    files.sort();

    match files.len() {
        0 => Err(CliError::Usage(format!(
            "no SBOM files found in {}",
            path.display()
        ))),
        1 => Ok(files.remove(0)),
        n => Err(CliError::Usage(format!(
            "found {n} .json files in {}: only one SBOM file is supported at a time",
            path.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn file_path_is_returned_as_is() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("sbom.json");
        std::fs::write(&file, "{}").unwrap();

        assert_eq!(resolve_sbom_path(&file).unwrap(), file);
    }

    #[test]
    fn non_json_file_path_is_still_accepted() {
        // The extension filter only applies to directory scans
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("sbom.spdx");
        std::fs::write(&file, "{}").unwrap();

        assert_eq!(resolve_sbom_path(&file).unwrap(), file);
    }

    #[test]
    fn directory_with_one_json_file_resolves() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("sbom.json");
        std::fs::write(&file, "{}").unwrap();
        std::fs::write(dir.path().join("README.md"), "docs").unwrap();

        assert_eq!(resolve_sbom_path(dir.path()).unwrap(), file);
    }

    #[test]
    fn empty_directory_is_a_usage_error() {
        let dir = TempDir::new().unwrap();
        let err = resolve_sbom_path(dir.path()).unwrap_err();
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("no SBOM files found"));
    }

    #[test]
    fn directory_with_multiple_json_files_is_rejected() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.json"), "{}").unwrap();
        std::fs::write(dir.path().join("b.json"), "{}").unwrap();

        let err = resolve_sbom_path(dir.path()).unwrap_err();
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("only one SBOM file"));
    }

    #[test]
    fn discovery_is_not_recursive() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("nested");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(nested.join("sbom.json"), "{}").unwrap();

        // Files in nested directories are not considered
        assert!(resolve_sbom_path(dir.path()).is_err());
    }

    #[test]
    fn missing_path_is_a_usage_error() {
        let err = resolve_sbom_path(Path::new("/nonexistent/for/test")).unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }
}
