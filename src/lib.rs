//! # Media Sorter
//!
//! Sorts photos and videos into date-based folders using the best capture
//! date each file can offer.
//!
//! ## Core Philosophy
//! - **Never overwrite** - Name clashes get a numeric suffix, originals are only copied
//! - **Best available date** - EXIF, then container metadata, then exiftool, then the filesystem
//! - **Keep going** - One bad file never stops the run
//!
//! ## Layout
//! - `core` - scanning, date resolution and organization; no terminal I/O
//! - `events` - progress messages for whatever front end is listening
//! - `error` - scan and organize errors
//!
//! The `media-sorter` binary adds the command-line front end on top.

pub mod core;
pub mod error;
pub mod events;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{MediaSorterError, Result};

/// Install a stderr `tracing` subscriber.
///
/// Called once by the binary. `default_directive` applies when `RUST_LOG`
/// is not set.
pub fn init_tracing(default_directive: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    // A second call (e.g. from tests) keeps the first subscriber
    let _ = tracing::subscriber::set_global_default(subscriber);
}
