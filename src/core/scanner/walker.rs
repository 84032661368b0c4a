//! Directory walking implementation using walkdir.

use super::filter::{dotted_extension, is_hidden, ExtensionFilter};
use super::{MediaFile, MediaKind, MediaScanner, ScanResult};
use crate::core::cancel::CancellationToken;
use crate::error::ScanError;
use crate::events::{null_sender, Event, EventSender, ScanEvent};
use std::io;
use std::path::Path;
use walkdir::WalkDir;

/// Configuration for the directory scanner
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Extensions to include (None = every default image and video type)
    pub extensions: Option<Vec<String>>,
    /// Whether to include hidden files and directories
    pub include_hidden: bool,
    /// Whether to follow symbolic links
    pub follow_symlinks: bool,
    /// Maximum directory depth (None = unlimited)
    pub max_depth: Option<usize>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: None,
            include_hidden: true,
            follow_symlinks: false,
            max_depth: None,
        }
    }
}

/// Scanner implementation using the walkdir crate
pub struct WalkDirScanner {
    config: ScanConfig,
    filter: ExtensionFilter,
    cancel: CancellationToken,
}

impl WalkDirScanner {
    /// Create a new scanner with the given configuration
    pub fn new(config: ScanConfig) -> Self {
        let filter = match config.extensions {
            Some(ref extensions) => ExtensionFilter::with_extensions(extensions),
            None => ExtensionFilter::new(),
        }
        .with_hidden(config.include_hidden);

        Self {
            config,
            filter,
            cancel: CancellationToken::new(),
        }
    }

    /// Stop walking when `token` is cancelled; the partial result is kept.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    fn walk(&self, root: &Path, events: &EventSender) -> Result<ScanResult, ScanError> {
        if !root.is_dir() {
            return Err(ScanError::DirectoryNotFound {
                path: root.to_path_buf(),
            });
        }

        events.send(Event::Scan(ScanEvent::Started {
            root: root.to_path_buf(),
        }));

        let mut result = ScanResult::default();

        let mut walker = WalkDir::new(root)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name();
        if let Some(depth) = self.config.max_depth {
            walker = walker.max_depth(depth);
        }

        let include_hidden = self.filter.includes_hidden();
        let entries = walker
            .into_iter()
            .filter_entry(|e| include_hidden || e.depth() == 0 || !is_hidden(e.path()));

        for entry in entries {
            if self.cancel.is_cancelled() {
                tracing::info!(
                    root = %root.display(),
                    found = result.files.len(),
                    "scan cancelled"
                );
                result.cancelled = true;
                break;
            }

            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().map(|p| p.to_path_buf()).unwrap_or_default();
                    let error = if e.io_error().map(|io| io.kind())
                        == Some(io::ErrorKind::PermissionDenied)
                    {
                        ScanError::PermissionDenied { path: path.clone() }
                    } else {
                        ScanError::ReadDirectory {
                            path: path.clone(),
                            source: io::Error::other(e.to_string()),
                        }
                    };

                    tracing::warn!(path = %path.display(), "skipping unreadable entry: {}", error);
                    events.send(Event::Scan(ScanEvent::Error {
                        path,
                        message: error.to_string(),
                    }));
                    result.errors.push(error);
                    continue;
                }
            };

            if !entry.file_type().is_file() || !self.filter.should_include(entry.path()) {
                continue;
            }

            let size = match entry.metadata() {
                Ok(metadata) => metadata.len(),
                Err(e) => {
                    let error = ScanError::ReadDirectory {
                        path: entry.path().to_path_buf(),
                        source: io::Error::other(e.to_string()),
                    };
                    tracing::warn!("{}", error);
                    events.send(Event::Scan(ScanEvent::Error {
                        path: entry.path().to_path_buf(),
                        message: error.to_string(),
                    }));
                    result.errors.push(error);
                    continue;
                }
            };

            let extension = dotted_extension(entry.path()).unwrap_or_default();
            *result.extension_counts.entry(extension.clone()).or_insert(0) += 1;

            let file = MediaFile {
                path: entry.path().to_path_buf(),
                kind: MediaKind::from_extension(&extension),
                extension,
                size,
            };

            events.send(Event::Scan(ScanEvent::FileFound {
                path: file.path.clone(),
                files_found: result.files.len() + 1,
            }));
            result.files.push(file);
        }

        tracing::debug!(
            root = %root.display(),
            files = result.files.len(),
            errors = result.errors.len(),
            "scan finished"
        );
        events.send(Event::Scan(ScanEvent::Completed {
            total_files: result.files.len(),
            cancelled: result.cancelled,
        }));

        Ok(result)
    }
}

impl MediaScanner for WalkDirScanner {
    fn scan(&self, root: &Path) -> Result<ScanResult, ScanError> {
        self.walk(root, &null_sender())
    }

    fn scan_with_events(
        &self,
        root: &Path,
        events: &EventSender,
    ) -> Result<ScanResult, ScanError> {
        self.walk(root, events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventChannel;
    use std::fs::{self, File};
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(&[0xFF, 0xD8, 0xFF, 0xE0]).unwrap();
        path
    }

    #[test]
    fn scan_empty_directory_returns_empty_vec() {
        let temp_dir = TempDir::new().unwrap();
        let scanner = WalkDirScanner::new(ScanConfig::default());

        let result = scanner.scan(temp_dir.path()).unwrap();

        assert!(result.files.is_empty());
        assert!(result.errors.is_empty());
        assert!(!result.cancelled);
    }

    #[test]
    fn scan_filters_by_selected_extensions() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "a.jpg");
        touch(temp_dir.path(), "b.JPG");
        touch(temp_dir.path(), "c.mp4");
        touch(temp_dir.path(), "notes.txt");

        let config = ScanConfig {
            extensions: Some(vec![".jpg".to_string()]),
            ..Default::default()
        };
        let result = WalkDirScanner::new(config).scan(temp_dir.path()).unwrap();

        assert_eq!(result.files.len(), 2);
        assert!(result.files.iter().all(|f| f.extension == ".jpg"));
        assert_eq!(result.extension_counts.get(".jpg"), Some(&2));
    }

    #[test]
    fn scan_traverses_nested_directories_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("2019").join("trip");
        fs::create_dir_all(&nested).unwrap();
        touch(temp_dir.path(), "z.jpg");
        touch(&nested, "a.mov");

        let result = WalkDirScanner::new(ScanConfig::default())
            .scan(temp_dir.path())
            .unwrap();

        assert_eq!(result.files.len(), 2);
        assert!(result.files[0].path.ends_with("2019/trip/a.mov"));
        assert_eq!(result.files[0].kind, MediaKind::Video);
        assert!(result.files[1].path.ends_with("z.jpg"));
        assert_eq!(result.files[1].size, 4);
    }

    #[test]
    fn scan_can_skip_hidden_directories() {
        let temp_dir = TempDir::new().unwrap();
        let hidden = temp_dir.path().join(".thumbnails");
        fs::create_dir_all(&hidden).unwrap();
        touch(&hidden, "thumb.jpg");
        touch(temp_dir.path(), "visible.jpg");

        let all = WalkDirScanner::new(ScanConfig::default())
            .scan(temp_dir.path())
            .unwrap();
        assert_eq!(all.files.len(), 2);

        let config = ScanConfig {
            include_hidden: false,
            ..Default::default()
        };
        let visible = WalkDirScanner::new(config).scan(temp_dir.path()).unwrap();
        assert_eq!(visible.files.len(), 1);
        assert!(visible.files[0].path.ends_with("visible.jpg"));
    }

    #[test]
    fn scan_nonexistent_directory_returns_error() {
        let scanner = WalkDirScanner::new(ScanConfig::default());
        let result = scanner.scan(Path::new("/nonexistent/path/12345"));

        assert!(matches!(result, Err(ScanError::DirectoryNotFound { .. })));
    }

    #[test]
    fn cancelled_scan_returns_partial_result() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "a.jpg");
        touch(temp_dir.path(), "b.jpg");

        let token = CancellationToken::new();
        token.cancel();
        let scanner = WalkDirScanner::new(ScanConfig::default()).with_cancellation(token);

        let result = scanner.scan(temp_dir.path()).unwrap();
        assert!(result.cancelled);
        assert!(result.files.is_empty());
    }

    #[test]
    fn scan_reports_found_files_as_events() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "a.jpg");

        let (sender, receiver) = EventChannel::new();
        WalkDirScanner::new(ScanConfig::default())
            .scan_with_events(temp_dir.path(), &sender)
            .unwrap();
        drop(sender);

        let events: Vec<_> = receiver.iter().collect();
        assert!(matches!(events.first(), Some(Event::Scan(ScanEvent::Started { .. }))));
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::Scan(ScanEvent::FileFound { files_found: 1, .. }))));
        assert!(matches!(
            events.last(),
            Some(Event::Scan(ScanEvent::Completed { total_files: 1, cancelled: false }))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn symlink_loop_is_recorded_and_walk_continues() {
        let temp_dir = TempDir::new().unwrap();
        let sub = temp_dir.path().join("sub");
        fs::create_dir_all(&sub).unwrap();
        touch(temp_dir.path(), "a.jpg");
        touch(&sub, "b.jpg");
        std::os::unix::fs::symlink(temp_dir.path(), sub.join("back")).unwrap();
        touch(temp_dir.path(), "z.mp4");

        let config = ScanConfig {
            follow_symlinks: true,
            ..Default::default()
        };
        let (sender, receiver) = EventChannel::new();
        let result = WalkDirScanner::new(config)
            .scan_with_events(temp_dir.path(), &sender)
            .unwrap();
        drop(sender);

        let names: Vec<_> = result
            .files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.jpg", "b.jpg", "z.mp4"]);
        assert!(matches!(
            result.errors.as_slice(),
            [ScanError::ReadDirectory { path, .. }] if path.ends_with("sub/back")
        ));
        assert!(receiver
            .iter()
            .any(|e| matches!(e, Event::Scan(ScanEvent::Error { .. }))));
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_subtree_is_recorded_and_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let locked = temp_dir.path().join("locked");
        fs::create_dir_all(&locked).unwrap();
        touch(&locked, "secret.jpg");
        touch(temp_dir.path(), "open.jpg");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Root ignores permission bits; nothing to assert in that case
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let result = WalkDirScanner::new(ScanConfig::default())
            .scan(temp_dir.path())
            .unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(result.files.len(), 1);
        assert!(result.files[0].path.ends_with("open.jpg"));
        assert!(matches!(
            result.errors.as_slice(),
            [ScanError::PermissionDenied { .. }]
        ));
    }
}
