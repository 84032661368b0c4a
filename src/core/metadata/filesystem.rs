//! Filesystem timestamps, the last resort.

use super::DateStrategy;
use chrono::{DateTime, Local, NaiveDateTime, Utc};
use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Earlier of creation and modification time, in local time.
///
/// Platforms without a creation time fall back to modification time alone.
/// Fails when the file cannot be stat'ed or the time is out of range.
pub struct FilesystemStrategy;

impl DateStrategy for FilesystemStrategy {
    fn name(&self) -> &'static str {
        "filesystem"
    }

    fn extract(&self, path: &Path) -> Option<NaiveDateTime> {
        let metadata = fs::metadata(path).ok()?;
        let modified = metadata.modified().ok();
        let created = metadata.created().ok();

        let earliest = match (created, modified) {
            (Some(c), Some(m)) => c.min(m),
            (Some(t), None) | (None, Some(t)) => t,
            (None, None) => return None,
        };

        local_datetime(earliest)
    }
}

/// `None` when `time` lies outside the range chrono can represent
fn local_datetime(time: SystemTime) -> Option<NaiveDateTime> {
    let (secs, nanos) = match time.duration_since(UNIX_EPOCH) {
        Ok(after) => (i64::try_from(after.as_secs()).ok()?, after.subsec_nanos()),
        Err(e) => {
            let before = e.duration();
            let secs = i64::try_from(before.as_secs()).ok()?;
            match before.subsec_nanos() {
                0 => (-secs, 0),
                n => ((-secs).checked_sub(1)?, 1_000_000_000 - n),
            }
        }
    };

    let utc = DateTime::<Utc>::from_timestamp(secs, nanos)?;
    Some(utc.with_timezone(&Local).naive_local())
}
