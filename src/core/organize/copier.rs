//! Copying a file into the destination tree.

use filetime::FileTime;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;

/// Copies one file; the target name is already known to be free.
pub trait FileCopier: Send + Sync {
    fn copy(&self, from: &Path, to: &Path) -> io::Result<u64>;
}

/// Byte copy into a newly created file, then the source's access and
/// modification times are restored.
///
/// The target is opened with `create_new`, so a file that appeared after the
/// name was picked fails with `AlreadyExists` instead of being overwritten.
/// Failing to restore the times is only logged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreservingCopier;

impl FileCopier for PreservingCopier {
    fn copy(&self, from: &Path, to: &Path) -> io::Result<u64> {
        let mut source = File::open(from)?;
        let mut target = OpenOptions::new().write(true).create_new(true).open(to)?;

        let bytes = match io::copy(&mut source, &mut target) {
            Ok(bytes) => bytes,
            Err(e) => {
                drop(target);
                if let Err(cleanup) = fs::remove_file(to) {
                    tracing::warn!(
                        path = %to.display(),
                        "could not remove partial copy: {}",
                        cleanup
                    );
                }
                return Err(e);
            }
        };
        drop(target);

        match source.metadata() {
            Ok(metadata) => {
                let accessed = FileTime::from_last_access_time(&metadata);
                let modified = FileTime::from_last_modification_time(&metadata);
                if let Err(e) = fs::set_permissions(to, metadata.permissions()) {
                    tracing::debug!(path = %to.display(), "could not copy permissions: {}", e);
                }
                if let Err(e) = filetime::set_file_times(to, accessed, modified) {
                    tracing::debug!(path = %to.display(), "could not restore timestamps: {}", e);
                }
            }
            Err(e) => {
                tracing::debug!(path = %from.display(), "could not read timestamps: {}", e);
            }
        }

        Ok(bytes)
    }
}
