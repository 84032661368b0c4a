//! Summary of an organized destination tree.

use super::types::YearStats;
use crate::error::ScanError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use walkdir::WalkDir;

/// What is currently in the destination
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyReport {
    pub total_files: usize,
    pub total_bytes: u64,
    /// Keyed by the top-level folder name (normally the year)
    pub by_year: BTreeMap<String, YearStats>,
}

/// Count files and bytes under `root`, grouped by top-level folder.
///
/// Files directly in `root` count toward the totals only. Unreadable
/// entries are skipped.
pub fn verify_destination(root: &Path) -> Result<VerifyReport, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::DirectoryNotFound {
            path: root.to_path_buf(),
        });
    }

    let mut report = VerifyReport::default();

    for entry in WalkDir::new(root).min_depth(1).into_iter() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("verify: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
        report.total_files += 1;
        report.total_bytes += size;

        if entry.depth() < 2 {
            continue;
        }
        let top = entry
            .path()
            .strip_prefix(root)
            .ok()
            .and_then(|rel| rel.components().next())
            .map(|c| c.as_os_str().to_string_lossy().into_owned());
        if let Some(top) = top {
            let stats = report.by_year.entry(top).or_default();
            stats.count += 1;
            stats.total_bytes += size;
        }
    }

    Ok(report)
}
