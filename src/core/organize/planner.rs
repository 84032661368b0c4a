//! Destination folder layout.

use super::types::{MonthLanguage, NamingMode, SortGranularity};
use chrono::{Datelike, NaiveDate};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Dates used to render a layout preview
const SAMPLE_DATES: [(i32, u32, u32); 4] =
    [(2024, 6, 15), (2023, 12, 25), (2022, 7, 1), (2021, 3, 8)];

/// Maps a capture date to folder segments below the destination root
pub struct PathPlanner;

impl PathPlanner {
    /// Folder segments for `date`, year first.
    ///
    /// Year is four digits, month is two digits or a month name, day is
    /// always two digits.
    pub fn plan(
        date: NaiveDate,
        granularity: SortGranularity,
        naming: NamingMode,
        language: MonthLanguage,
    ) -> Vec<String> {
        let mut segments = vec![format!("{:04}", date.year())];

        if granularity >= SortGranularity::YearMonth {
            let month = match naming {
                NamingMode::Numeric => format!("{:02}", date.month()),
                NamingMode::MonthNames => language
                    .month_name(date.month())
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("{:02}", date.month())),
            };
            segments.push(month);
        }

        if granularity >= SortGranularity::YearMonthDay {
            segments.push(format!("{:02}", date.day()));
        }

        segments
    }

    /// `root/<segments>/<source file name>`, before collision handling
    pub fn destination_for(
        root: &Path,
        source: &Path,
        date: NaiveDate,
        granularity: SortGranularity,
        naming: NamingMode,
        language: MonthLanguage,
    ) -> PathBuf {
        let mut path = root.to_path_buf();
        for segment in Self::plan(date, granularity, naming, language) {
            path.push(segment);
        }
        path.push(source.file_name().unwrap_or_else(|| OsStr::new("unknown")));
        path
    }

    /// One line per sample date, segments joined with " → "
    pub fn preview(
        granularity: SortGranularity,
        naming: NamingMode,
        language: MonthLanguage,
    ) -> Vec<String> {
        SAMPLE_DATES
            .iter()
            .filter_map(|&(y, m, d)| NaiveDate::from_ymd_opt(y, m, d))
            .map(|date| Self::plan(date, granularity, naming, language).join(" → "))
            .collect()
    }
}
