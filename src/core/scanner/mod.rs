//! # Scanner Module
//!
//! Discovers media files in a source folder tree.
//!
//! ## Default Formats
//! - Images: .jpg .jpeg .png .gif .bmp .tiff .tif .webp .heic
//! - Videos: .mp4 .avi .mov .wmv .flv .mkv .m4v .mpg .mpeg .3gp .webm
//!   .mts .m2ts .ogv .asf .vob .dat .f4v
//!
//! ## Example
//! ```rust,ignore
//! use media_sorter::core::scanner::{MediaScanner, ScanConfig, WalkDirScanner};
//!
//! let scanner = WalkDirScanner::new(ScanConfig::default());
//! let result = scanner.scan(Path::new("/Users/me/Camera"))?;
//! ```

mod filter;
mod walker;

pub use filter::{ExtensionFilter, IMAGE_EXTENSIONS, VIDEO_EXTENSIONS};
pub use walker::{ScanConfig, WalkDirScanner};

use crate::error::ScanError;
use crate::events::EventSender;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A discovered media file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaFile {
    /// Full path to the source file
    pub path: PathBuf,
    /// Lowercased extension including the leading dot (".jpg")
    pub extension: String,
    /// Image, video or something else the user selected
    pub kind: MediaKind,
    /// File size in bytes at scan time
    pub size: u64,
}

impl MediaFile {
    /// Build a `MediaFile` from a path, reading its size from disk.
    ///
    /// Missing files get a size of zero; the runner reports them when it
    /// fails to date or copy them.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let extension = filter::dotted_extension(&path).unwrap_or_default();
        let size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
        Self {
            kind: MediaKind::from_extension(&extension),
            extension,
            path,
            size,
        }
    }

    /// File name for display
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Broad media category, used to pick metadata readers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaKind {
    Image,
    Video,
    Other,
}

impl MediaKind {
    /// Classify an extension, with or without the leading dot
    pub fn from_extension(ext: &str) -> Self {
        let ext = ext.trim_start_matches('.').to_lowercase();
        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            MediaKind::Image
        } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            MediaKind::Video
        } else {
            MediaKind::Other
        }
    }

    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .map(Self::from_extension)
            .unwrap_or(MediaKind::Other)
    }
}

/// Result of a scan operation
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Matching files, in directory-walk order (sorted by name per folder)
    pub files: Vec<MediaFile>,
    /// Errors that occurred during scanning (non-fatal)
    pub errors: Vec<ScanError>,
    /// Number of matching files per extension
    pub extension_counts: BTreeMap<String, usize>,
    /// True when the scan stopped early on request
    pub cancelled: bool,
}

/// Trait for media scanners
///
/// Implement this trait to plug a different file source into the batch driver.
pub trait MediaScanner: Send + Sync {
    /// Scan one root folder
    fn scan(&self, root: &Path) -> Result<ScanResult, ScanError>;

    /// Scan with progress reporting via events
    fn scan_with_events(&self, root: &Path, events: &EventSender)
        -> Result<ScanResult, ScanError>;
}
