//! # Error Module
//!
//! Error types for scanning and organizing.
//!
//! Every variant carries the path it is about. Per-file failures are not
//! returned as `Err`; the runner renders them into the report's error list
//! and moves on to the next file.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum MediaSorterError {
    #[error("Scan failed: {0}")]
    Scan(#[from] ScanError),

    #[error("Organize error: {0}")]
    Organize(#[from] OrganizeError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors that occur while enumerating source folders
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Source folder does not exist: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("No permission to read {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Cannot read {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur while placing files in the destination tree
#[derive(Error, Debug)]
pub enum OrganizeError {
    #[error("Cannot create destination folder {path}: {source}")]
    DestinationUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No free name for {path} after {limit} attempts")]
    CollisionLimit { path: PathBuf, limit: usize },

    #[error("Failed to copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, MediaSorterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_source_names_folder() {
        let error = ScanError::DirectoryNotFound {
            path: PathBuf::from("/camera/dcim"),
        };
        assert_eq!(error.to_string(), "Source folder does not exist: /camera/dcim");
    }

    #[test]
    fn copy_error_names_both_paths() {
        let error = OrganizeError::Copy {
            from: PathBuf::from("/camera/IMG_0001.jpg"),
            to: PathBuf::from("/sorted/2024/06/IMG_0001.jpg"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let message = error.to_string();
        assert!(message.contains("/camera/IMG_0001.jpg"));
        assert!(message.contains("/sorted/2024/06/IMG_0001.jpg"));
        assert!(message.contains("denied"));
    }

    #[test]
    fn collision_limit_reports_limit() {
        let error = OrganizeError::CollisionLimit {
            path: PathBuf::from("/sorted/2024/photo.jpg"),
            limit: 10_000,
        };
        assert!(error.to_string().contains("10000"));
    }

    #[test]
    fn organize_error_converts_to_top_level() {
        let error: MediaSorterError = OrganizeError::DestinationUnavailable {
            path: PathBuf::from("/readonly"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        }
        .into();
        assert!(error.to_string().starts_with("Organize error"));
    }
}
