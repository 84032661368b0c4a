//! # Core Module
//!
//! The GUI-agnostic media sorting engine.
//!
//! ## Modules
//! - `scanner` - Discovers media files in directories
//! - `metadata` - Resolves a capture date through an ordered fallback chain
//! - `organize` - Plans destination paths and copies files into them
//! - `cancel` - Cooperative cancellation shared with the caller

pub mod cancel;
pub mod metadata;
pub mod organize;
pub mod scanner;

// Re-export commonly used types
pub use cancel::CancellationToken;
pub use metadata::{DateResolver, DateSource, ToolCapabilities};
pub use organize::{
    BatchOrganizer, NamingMode, MonthLanguage, OrganizationRunner, OrganizeConfig,
    OrganizeReport, RunStatistics, SortGranularity,
};
pub use scanner::{MediaFile, MediaKind, ScanConfig, WalkDirScanner};
