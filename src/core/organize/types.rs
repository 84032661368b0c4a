//! Types for the organize module.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// How many date folders are created below the destination root
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "snake_case")]
pub enum SortGranularity {
    /// 2024/
    Year,
    /// 2024/06/
    YearMonth,
    /// 2024/06/15/
    #[default]
    YearMonthDay,
}

impl SortGranularity {
    /// From the numeric sort level: 0 = year, 1 = year/month, 2 = year/month/day
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            0 => Some(Self::Year),
            1 => Some(Self::YearMonth),
            2 => Some(Self::YearMonthDay),
            _ => None,
        }
    }
}

impl FromStr for SortGranularity {
    type Err = String;

    /// `year`, `year-month`, `year-month-day` (underscores allowed) or a level from 0 to 2
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase().replace('_', "-");
        if let Some(granularity) = name.parse::<u8>().ok().and_then(Self::from_level) {
            return Ok(granularity);
        }
        match name.as_str() {
            "year" => Ok(Self::Year),
            "year-month" => Ok(Self::YearMonth),
            "year-month-day" => Ok(Self::YearMonthDay),
            other => Err(format!("unknown sort granularity: {}", other)),
        }
    }
}

impl fmt::Display for SortGranularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Year => write!(f, "Year"),
            Self::YearMonth => write!(f, "Year/Month"),
            Self::YearMonthDay => write!(f, "Year/Month/Day"),
        }
    }
}

/// Month folder naming
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NamingMode {
    /// "06"
    #[default]
    Numeric,
    /// "June", "Junio", ...
    MonthNames,
}

impl From<bool> for NamingMode {
    fn from(use_month_names: bool) -> Self {
        if use_month_names {
            Self::MonthNames
        } else {
            Self::Numeric
        }
    }
}

/// Language of month folder names
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MonthLanguage {
    #[default]
    English,
    Spanish,
    French,
    German,
    Italian,
    Portuguese,
}

const ENGLISH: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];
const SPANISH: [&str; 12] = [
    "Enero", "Febrero", "Marzo", "Abril", "Mayo", "Junio", "Julio", "Agosto", "Septiembre",
    "Octubre", "Noviembre", "Diciembre",
];
const FRENCH: [&str; 12] = [
    "Janvier", "Février", "Mars", "Avril", "Mai", "Juin", "Juillet", "Août", "Septembre",
    "Octobre", "Novembre", "Décembre",
];
const GERMAN: [&str; 12] = [
    "Januar", "Februar", "März", "April", "Mai", "Juni", "Juli", "August", "September",
    "Oktober", "November", "Dezember",
];
const ITALIAN: [&str; 12] = [
    "Gennaio", "Febbraio", "Marzo", "Aprile", "Maggio", "Giugno", "Luglio", "Agosto",
    "Settembre", "Ottobre", "Novembre", "Dicembre",
];
const PORTUGUESE: [&str; 12] = [
    "Janeiro", "Fevereiro", "Março", "Abril", "Maio", "Junho", "Julho", "Agosto", "Setembro",
    "Outubro", "Novembro", "Dezembro",
];

impl MonthLanguage {
    pub const ALL: [MonthLanguage; 6] = [
        Self::English,
        Self::Spanish,
        Self::French,
        Self::German,
        Self::Italian,
        Self::Portuguese,
    ];

    /// Parse a language code ("spanish", "es", ...). Unknown codes mean English.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_lowercase().as_str() {
            "spanish" | "es" | "español" => Self::Spanish,
            "french" | "fr" | "français" => Self::French,
            "german" | "de" | "deutsch" => Self::German,
            "italian" | "it" | "italiano" => Self::Italian,
            "portuguese" | "pt" | "português" => Self::Portuguese,
            _ => Self::English,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::English => "english",
            Self::Spanish => "spanish",
            Self::French => "french",
            Self::German => "german",
            Self::Italian => "italian",
            Self::Portuguese => "portuguese",
        }
    }

    pub fn month_names(self) -> &'static [&'static str; 12] {
        match self {
            Self::English => &ENGLISH,
            Self::Spanish => &SPANISH,
            Self::French => &FRENCH,
            Self::German => &GERMAN,
            Self::Italian => &ITALIAN,
            Self::Portuguese => &PORTUGUESE,
        }
    }

    /// Name of `month` (1-12)
    pub fn month_name(self, month: u32) -> Option<&'static str> {
        let index = usize::try_from(month).ok()?.checked_sub(1)?;
        self.month_names().get(index).copied()
    }
}

/// Settings for one organization run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizeConfig {
    pub destination: PathBuf,
    pub granularity: SortGranularity,
    pub naming: NamingMode,
    pub language: MonthLanguage,
    /// Plan every copy but write nothing
    pub dry_run: bool,
}

impl OrganizeConfig {
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
            granularity: SortGranularity::default(),
            naming: NamingMode::default(),
            language: MonthLanguage::default(),
            dry_run: false,
        }
    }
}

/// Files and bytes placed for one year
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearStats {
    pub count: usize,
    pub total_bytes: u64,
}

/// Per-year totals of successfully placed files
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunStatistics {
    years: BTreeMap<i32, YearStats>,
}

impl RunStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one placed file of `bytes` bytes under `year`
    pub fn record(&mut self, year: i32, bytes: u64) {
        let entry = self.years.entry(year).or_default();
        entry.count += 1;
        entry.total_bytes += bytes;
    }

    /// Add `other`'s buckets to ours, summing matching years
    pub fn merge(&mut self, other: &RunStatistics) {
        for (year, stats) in &other.years {
            let entry = self.years.entry(*year).or_default();
            entry.count += stats.count;
            entry.total_bytes += stats.total_bytes;
        }
    }

    pub fn get(&self, year: i32) -> Option<&YearStats> {
        self.years.get(&year)
    }

    /// Buckets in ascending year order
    pub fn iter(&self) -> impl Iterator<Item = (i32, &YearStats)> {
        self.years.iter().map(|(year, stats)| (*year, stats))
    }

    pub fn total_files(&self) -> usize {
        self.years.values().map(|s| s.count).sum()
    }

    pub fn total_bytes(&self) -> u64 {
        self.years.values().map(|s| s.total_bytes).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }
}

/// Where one file went
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub date: NaiveDateTime,
    /// Strategy that produced the date
    pub date_source: String,
    pub size_bytes: u64,
    /// True when a numeric suffix was added to avoid a clash
    pub renamed: bool,
}

/// Outcome of a run (or of a whole batch)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrganizeReport {
    pub statistics: RunStatistics,
    /// One message per skipped file, in processing order
    pub errors: Vec<String>,
    /// Non-fatal scan problems (unreadable folders)
    pub scan_warnings: Vec<String>,
    pub placements: Vec<Placement>,
    pub total_files: usize,
    pub processed: usize,
    pub skipped: usize,
    pub dry_run: bool,
    pub cancelled: bool,
    pub duration_ms: u64,
}

impl OrganizeReport {
    /// Fold a per-folder report into a batch total
    pub fn absorb(&mut self, other: OrganizeReport) {
        self.statistics.merge(&other.statistics);
        self.errors.extend(other.errors);
        self.scan_warnings.extend(other.scan_warnings);
        self.placements.extend(other.placements);
        self.total_files += other.total_files;
        self.processed += other.processed;
        self.skipped += other.skipped;
        self.cancelled |= other.cancelled;
        self.duration_ms += other.duration_ms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn granularity_parses_names_and_levels() {
        assert_eq!("year".parse::<SortGranularity>(), Ok(SortGranularity::Year));
        assert_eq!(
            "year_month".parse::<SortGranularity>(),
            Ok(SortGranularity::YearMonth)
        );
        assert_eq!(
            "2".parse::<SortGranularity>(),
            Ok(SortGranularity::YearMonthDay)
        );
        assert!("weekly".parse::<SortGranularity>().is_err());
        assert!("3".parse::<SortGranularity>().is_err());
        assert_eq!(SortGranularity::from_level(3), None);
        assert!(SortGranularity::Year < SortGranularity::YearMonth);
    }

    #[test]
    fn unknown_language_falls_back_to_english() {
        assert_eq!(MonthLanguage::from_code("klingon"), MonthLanguage::English);
        assert_eq!(MonthLanguage::from_code("Spanish"), MonthLanguage::Spanish);
        assert_eq!(MonthLanguage::from_code(""), MonthLanguage::English);
    }

    #[test]
    fn month_names_are_one_indexed() {
        assert_eq!(MonthLanguage::Spanish.month_name(1), Some("Enero"));
        assert_eq!(MonthLanguage::English.month_name(12), Some("December"));
        assert_eq!(MonthLanguage::German.month_name(3), Some("März"));
        assert_eq!(MonthLanguage::English.month_name(0), None);
        assert_eq!(MonthLanguage::English.month_name(13), None);
    }

    #[test]
    fn every_language_round_trips_its_code() {
        for language in MonthLanguage::ALL {
            assert_eq!(MonthLanguage::from_code(language.code()), language);
        }
    }

    #[test]
    fn statistics_merge_sums_matching_years() {
        let mut a = RunStatistics::new();
        a.record(2024, 100);
        a.record(2023, 50);

        let mut b = RunStatistics::new();
        b.record(2024, 10);
        b.record(2020, 1);

        a.merge(&b);

        assert_eq!(
            a.get(2024),
            Some(&YearStats {
                count: 2,
                total_bytes: 110
            })
        );
        assert_eq!(a.get(2020).map(|s| s.count), Some(1));
        assert_eq!(a.total_files(), 4);
        assert_eq!(a.total_bytes(), 161);
        assert_eq!(
            a.iter().map(|(y, _)| y).collect::<Vec<_>>(),
            vec![2020, 2023, 2024]
        );
    }

    #[test]
    fn statistics_serialize_as_year_map() {
        let mut stats = RunStatistics::new();
        stats.record(2024, 12);
        let json = serde_json::to_string(&stats).unwrap();
        assert_eq!(json, r#"{"2024":{"count":1,"total_bytes":12}}"#);
    }
}
