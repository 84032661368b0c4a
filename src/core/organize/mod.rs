//! # Organize Module
//!
//! Copies media files into a dated folder tree.
//!
//! ## Flow
//! 1. [`BatchOrganizer`] scans each source folder
//! 2. [`OrganizationRunner`] resolves a date for every file
//! 3. [`PathPlanner`] turns the date into `year/month/day` segments
//! 4. [`CollisionResolver`] picks a free name, then the file is copied
//!
//! Sources are never modified and existing destination files are never
//! overwritten.

mod batch;
mod collision;
mod copier;
mod planner;
mod runner;
mod types;
mod verify;

pub use batch::BatchOrganizer;
pub use collision::{occupied_on_disk, resolve_collision, CollisionResolver, MAX_COLLISION_SUFFIX};
pub use copier::{FileCopier, PreservingCopier};
pub use planner::PathPlanner;
pub use runner::OrganizationRunner;
pub use types::*;
pub use verify::{verify_destination, VerifyReport};
