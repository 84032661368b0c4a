//! Event type definitions for progress reporting.

use crate::core::organize::RunStatistics;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted by the media sorter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Scanning phase events
    Scan(ScanEvent),
    /// Per-file organization events
    Organize(OrganizeEvent),
    /// Multi-folder batch events
    Batch(BatchEvent),
}

/// Events during the scanning phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScanEvent {
    /// Scanning has started
    Started { root: PathBuf },
    /// A matching file was found
    FileFound { path: PathBuf, files_found: usize },
    /// An error occurred but scanning continues
    Error { path: PathBuf, message: String },
    /// Scanning completed
    Completed { total_files: usize, cancelled: bool },
}

/// Events while files are dated and copied
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OrganizeEvent {
    /// A run over `total_files` files has started
    Started { total_files: usize, dry_run: bool },
    /// One file has been handled (copied, simulated or skipped)
    Progress(OrganizeProgress),
    /// A file was skipped
    FileError { path: PathBuf, message: String },
    /// The run finished over every file
    Completed { processed: usize, skipped: usize },
    /// The run stopped early on request
    Cancelled { processed: usize },
}

/// Progress information for a single file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizeProgress {
    /// Files handled so far, including skipped ones
    pub processed: usize,
    /// Number of files in this run
    pub total: usize,
    /// File name of the file just handled
    pub current_file: String,
    /// Destination relative to the destination root; `None` when skipped
    pub destination: Option<PathBuf>,
}

/// Events from the multi-folder batch driver
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BatchEvent {
    /// Processing of a source folder has started
    FolderStarted {
        folder_index: usize,
        total_folders: usize,
        folder_path: PathBuf,
    },
    /// All folders are done (or the batch was cancelled)
    Completed { statistics: RunStatistics },
}
