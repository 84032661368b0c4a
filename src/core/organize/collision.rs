//! Picking a destination name that is not already taken.

use crate::error::OrganizeError;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Highest numeric suffix tried before giving up
pub const MAX_COLLISION_SUFFIX: usize = 10_000;

/// First free name among `candidate`, `stem_1.ext`, `stem_2.ext`, ...
///
/// `is_taken` decides whether a name is free. Returns `candidate` unchanged
/// when it is free.
pub fn resolve_collision<F>(candidate: &Path, is_taken: F) -> Result<PathBuf, OrganizeError>
where
    F: Fn(&Path) -> bool,
{
    if !is_taken(candidate) {
        return Ok(candidate.to_path_buf());
    }

    let stem = candidate
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_default();
    let extension = candidate.extension();

    for counter in 1..=MAX_COLLISION_SUFFIX {
        let mut name = stem.clone();
        name.push(format!("_{}", counter));
        if let Some(ext) = extension {
            name.push(".");
            name.push(ext);
        }

        let path = candidate.with_file_name(name);
        if !is_taken(&path) {
            return Ok(path);
        }
    }

    Err(OrganizeError::CollisionLimit {
        path: candidate.to_path_buf(),
        limit: MAX_COLLISION_SUFFIX,
    })
}

/// Something already sits at `path` (a dangling symlink counts)
pub fn occupied_on_disk(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Tracks names handed out during a run.
///
/// A name is taken when it exists on disk or was claimed earlier in the
/// run, so a dry run picks the same suffixes a real run would.
#[derive(Debug, Default)]
pub struct CollisionResolver {
    claimed: HashSet<PathBuf>,
}

impl CollisionResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Free name for `candidate`; does not claim it
    pub fn resolve(&self, candidate: &Path) -> Result<PathBuf, OrganizeError> {
        resolve_collision(candidate, |p| {
            self.claimed.contains(p) || occupied_on_disk(p)
        })
    }

    /// Mark `path` as used by this run
    pub fn claim(&mut self, path: PathBuf) {
        self.claimed.insert(path);
    }
}
