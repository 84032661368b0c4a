//! Organizing several source folders into one destination.

use super::collision::CollisionResolver;
use super::runner::OrganizationRunner;
use super::types::OrganizeReport;
use crate::core::scanner::{MediaScanner, ScanConfig, WalkDirScanner};
use crate::error::OrganizeError;
use crate::events::{null_sender, BatchEvent, Event, EventSender};
use std::path::PathBuf;
use std::time::Instant;

/// Scans each folder in turn and feeds its files to one runner.
///
/// Statistics from every folder are merged into a single report. Names are
/// claimed across the whole batch, so two folders never get the same
/// destination name.
pub struct BatchOrganizer {
    scanner: Box<dyn MediaScanner>,
    runner: OrganizationRunner,
}

impl BatchOrganizer {
    /// Walk folders with `scan_config`, sharing the runner's cancellation token
    pub fn new(scan_config: ScanConfig, runner: OrganizationRunner) -> Self {
        let scanner =
            WalkDirScanner::new(scan_config).with_cancellation(runner.cancellation().clone());
        Self::with_scanner(Box::new(scanner), runner)
    }

    pub fn with_scanner(scanner: Box<dyn MediaScanner>, runner: OrganizationRunner) -> Self {
        Self { scanner, runner }
    }

    pub fn runner(&self) -> &OrganizationRunner {
        &self.runner
    }

    pub fn run(&self, folders: &[PathBuf]) -> Result<OrganizeReport, OrganizeError> {
        self.run_with_events(folders, &null_sender())
    }

    /// A folder that cannot be scanned is reported and skipped; only an
    /// unusable destination aborts the batch.
    pub fn run_with_events(
        &self,
        folders: &[PathBuf],
        events: &EventSender,
    ) -> Result<OrganizeReport, OrganizeError> {
        let start = Instant::now();
        let cancel = self.runner.cancellation();
        let mut collisions = CollisionResolver::new();
        let mut report = OrganizeReport {
            dry_run: self.runner.config().dry_run,
            ..Default::default()
        };

        self.runner.prepare_destination()?;

        for (index, folder) in folders.iter().enumerate() {
            if cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }

            tracing::info!(
                folder = %folder.display(),
                index,
                total = folders.len(),
                "processing folder"
            );
            events.send(Event::Batch(BatchEvent::FolderStarted {
                folder_index: index,
                total_folders: folders.len(),
                folder_path: folder.clone(),
            }));

            let scan = match self.scanner.scan_with_events(folder, events) {
                Ok(scan) => scan,
                Err(e) => {
                    let message = format!("Error processing folder {}: {}", folder.display(), e);
                    tracing::warn!("{}", message);
                    report.errors.push(message);
                    continue;
                }
            };

            report
                .scan_warnings
                .extend(scan.errors.iter().map(|e| e.to_string()));

            if scan.cancelled {
                report.cancelled = true;
                break;
            }

            if scan.files.is_empty() {
                tracing::info!(folder = %folder.display(), "no media files");
                continue;
            }

            let folder_report = self
                .runner
                .run_claiming(&scan.files, events, &mut collisions)?;
            let cancelled = folder_report.cancelled;
            report.absorb(folder_report);
            if cancelled {
                break;
            }
        }

        report.duration_ms = start.elapsed().as_millis() as u64;

        events.send(Event::Batch(BatchEvent::Completed {
            statistics: report.statistics.clone(),
        }));

        Ok(report)
    }
}
