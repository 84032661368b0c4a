//! # Metadata Module
//!
//! Resolves the capture date of a media file through an ordered chain of
//! strategies. The first strategy that returns a date wins; a strategy that
//! fails (unreadable file, missing tag, tool missing or timing out) is
//! treated as "no result" and the next one is tried.
//!
//! ## Default Order
//! 1. `Exif` - DateTimeOriginal, DateTimeDigitized, DateTime (images)
//! 2. `Container` - MP4/MOV movie, user-data and track headers (videos)
//! 3. `ExternalTool` - exiftool, only when the startup probe found it
//! 4. `Filesystem` - earlier of creation and modification time

mod container;
mod embedded;
mod exiftool;
mod filesystem;

pub use container::{read_container_metadata, ContainerStrategy};
pub use embedded::{parse_exif_datetime, ExifStrategy};
pub use exiftool::{ExifTool, ExternalToolStrategy, ToolCapabilities, DEFAULT_TOOL_TIMEOUT};
pub use filesystem::FilesystemStrategy;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Where a capture date came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateSource {
    Exif,
    Container,
    ExternalTool,
    Filesystem,
}

impl DateSource {
    /// Fixed priority used when nothing is preferred
    pub const DEFAULT_ORDER: [DateSource; 4] = [
        DateSource::Exif,
        DateSource::Container,
        DateSource::ExternalTool,
        DateSource::Filesystem,
    ];

    /// Default order with `preferred` moved to the front
    pub fn order_preferring(preferred: Option<DateSource>) -> Vec<DateSource> {
        let mut order = Self::DEFAULT_ORDER.to_vec();
        if let Some(first) = preferred {
            order.retain(|s| *s != first);
            order.insert(0, first);
        }
        order
    }
}

impl fmt::Display for DateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateSource::Exif => write!(f, "exif"),
            DateSource::Container => write!(f, "container"),
            DateSource::ExternalTool => write!(f, "exiftool"),
            DateSource::Filesystem => write!(f, "filesystem"),
        }
    }
}

/// One way of finding a capture date.
///
/// Implementations never fail loudly: anything that goes wrong is `None`.
pub trait DateStrategy: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Extract a date, or `None` if this strategy has nothing to offer
    fn extract(&self, path: &Path) -> Option<NaiveDateTime>;
}

/// Ordered fallback chain of [`DateStrategy`]s.
///
/// Holds no mutable state; resolving the same file twice does the same work twice.
pub struct DateResolver {
    strategies: Vec<Box<dyn DateStrategy>>,
}

impl DateResolver {
    /// Default chain. The external tool is included only if `tools` found it.
    pub fn new(tools: &ToolCapabilities) -> Self {
        Self::with_sources(&DateSource::DEFAULT_ORDER, tools)
    }

    /// Chain built from `sources` in the given order.
    ///
    /// `ExternalTool` is dropped when the tool is unavailable.
    pub fn with_sources(sources: &[DateSource], tools: &ToolCapabilities) -> Self {
        let strategies = sources
            .iter()
            .filter_map(|source| -> Option<Box<dyn DateStrategy>> {
                match source {
                    DateSource::Exif => Some(Box::new(ExifStrategy)),
                    DateSource::Container => Some(Box::new(ContainerStrategy)),
                    DateSource::ExternalTool => tools.exiftool.clone().map(|tool| {
                        Box::new(ExternalToolStrategy::new(tool)) as Box<dyn DateStrategy>
                    }),
                    DateSource::Filesystem => Some(Box::new(FilesystemStrategy)),
                }
            })
            .collect();
        Self { strategies }
    }

    /// Chain made of arbitrary strategies
    pub fn from_strategies(strategies: Vec<Box<dyn DateStrategy>>) -> Self {
        Self { strategies }
    }

    /// Names of the active strategies, in order
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Best available capture date for `path`
    pub fn resolve(&self, path: &Path) -> Option<NaiveDateTime> {
        self.resolve_with_source(path).map(|(date, _)| date)
    }

    /// Like [`resolve`](Self::resolve), also naming the strategy that answered
    pub fn resolve_with_source(&self, path: &Path) -> Option<(NaiveDateTime, &'static str)> {
        for strategy in &self.strategies {
            if let Some(date) = strategy.extract(path) {
                tracing::trace!(
                    path = %path.display(),
                    source = strategy.name(),
                    %date,
                    "date resolved"
                );
                return Some((date, strategy.name()));
            }
            tracing::trace!(path = %path.display(), source = strategy.name(), "no date");
        }
        tracing::debug!(path = %path.display(), "no strategy produced a date");
        None
    }
}

impl Default for DateResolver {
    fn default() -> Self {
        Self::new(&ToolCapabilities::none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{exif_jpeg, ExifDates};
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    struct Fixed(&'static str, Option<NaiveDateTime>);

    impl DateStrategy for Fixed {
        fn name(&self) -> &'static str {
            self.0
        }

        fn extract(&self, _path: &Path) -> Option<NaiveDateTime> {
            self.1
        }
    }

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn first_successful_strategy_wins() {
        let resolver = DateResolver::from_strategies(vec![
            Box::new(Fixed("first", None)),
            Box::new(Fixed("second", Some(at(2020, 1, 1)))),
            Box::new(Fixed("third", Some(at(2010, 1, 1)))),
        ]);

        let (date, source) = resolver
            .resolve_with_source(Path::new("/any"))
            .unwrap();
        assert_eq!(date, at(2020, 1, 1));
        assert_eq!(source, "second");
    }

    #[test]
    fn exhausted_chain_returns_none() {
        let resolver = DateResolver::from_strategies(vec![Box::new(Fixed("only", None))]);
        assert_eq!(resolver.resolve(Path::new("/any")), None);
    }

    #[test]
    fn default_chain_skips_missing_tool() {
        let resolver = DateResolver::new(&ToolCapabilities::none());
        assert_eq!(
            resolver.strategy_names(),
            vec!["exif", "container", "filesystem"]
        );
    }

    #[test]
    fn preferred_source_moves_to_front() {
        let order = DateSource::order_preferring(Some(DateSource::Filesystem));
        assert_eq!(
            order,
            vec![
                DateSource::Filesystem,
                DateSource::Exif,
                DateSource::Container,
                DateSource::ExternalTool,
            ]
        );
        assert_eq!(DateSource::order_preferring(None), DateSource::DEFAULT_ORDER.to_vec());
    }

    #[test]
    fn exif_date_beats_filesystem_date() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("photo.jpg");
        fs::write(
            &path,
            exif_jpeg(&ExifDates {
                original: Some("2019:08:04 09:15:00"),
                ..Default::default()
            }),
        )
        .unwrap();

        let resolver = DateResolver::default();
        let (date, source) = resolver.resolve_with_source(&path).unwrap();
        assert_eq!(date.to_string(), "2019-08-04 09:15:00");
        assert_eq!(source, "exif");
    }

    #[test]
    fn plain_file_falls_back_to_filesystem() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("scan.png");
        fs::write(&path, b"not really a png").unwrap();

        let (_, source) = DateResolver::default()
            .resolve_with_source(&path)
            .unwrap();
        assert_eq!(source, "filesystem");
    }

    #[test]
    fn missing_file_has_no_date() {
        assert_eq!(
            DateResolver::default().resolve(Path::new("/nonexistent/photo.jpg")),
            None
        );
    }
}
