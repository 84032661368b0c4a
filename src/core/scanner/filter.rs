//! Extension filtering for the scanner.

use std::collections::HashSet;
use std::path::Path;

/// Image extensions offered by default (without the dot)
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "tiff", "tif", "webp", "heic",
];

/// Video extensions offered by default (without the dot)
pub const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "avi", "mov", "wmv", "flv", "mkv", "m4v", "mpg", "mpeg", "3gp", "webm", "mts", "m2ts",
    "ogv", "asf", "vob", "dat", "f4v",
];

/// Lowercased extension of `path` with a leading dot
pub(crate) fn dotted_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
}

/// Keeps files whose extension is in the selected set
#[derive(Debug, Clone)]
pub struct ExtensionFilter {
    /// Normalized extensions (".jpg")
    extensions: HashSet<String>,
    include_hidden: bool,
}

impl ExtensionFilter {
    /// Every default image and video extension
    pub fn new() -> Self {
        let all = IMAGE_EXTENSIONS.iter().chain(VIDEO_EXTENSIONS.iter());
        Self::with_extensions(all.map(|e| e.to_string()))
    }

    /// Only the given extensions.
    ///
    /// Accepts "JPG", ".jpg" or "jpg" alike.
    pub fn with_extensions<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|e| normalize_extension(e.as_ref()))
                .filter(|e| e.len() > 1)
                .collect(),
            include_hidden: true,
        }
    }

    /// Include dot-files
    pub fn with_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    pub fn includes_hidden(&self) -> bool {
        self.include_hidden
    }

    /// Check if a file should be included
    pub fn should_include(&self, path: &Path) -> bool {
        if !self.include_hidden && is_hidden(path) {
            return false;
        }

        dotted_extension(path)
            .map(|ext| self.extensions.contains(&ext))
            .unwrap_or(false)
    }
}

impl Default for ExtensionFilter {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.'))
        .unwrap_or(false)
}

fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim().trim_start_matches('.').to_lowercase();
    format!(".{}", ext)
}
