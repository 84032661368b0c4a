//! Runs an organization pass over a list of files.

use super::collision::CollisionResolver;
use super::copier::{FileCopier, PreservingCopier};
use super::planner::PathPlanner;
use super::types::*;
use crate::core::cancel::CancellationToken;
use crate::core::metadata::DateResolver;
use crate::core::scanner::MediaFile;
use crate::error::OrganizeError;
use crate::events::{null_sender, Event, EventSender, OrganizeEvent, OrganizeProgress};
use chrono::Datelike;
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

/// Resolves a date for each file and copies it into the dated folder tree.
///
/// Per-file failures are recorded in the report and the run moves on. Only
/// an unusable destination root aborts the run.
pub struct OrganizationRunner {
    config: OrganizeConfig,
    resolver: DateResolver,
    copier: Box<dyn FileCopier>,
    cancel: CancellationToken,
}

impl OrganizationRunner {
    pub fn new(config: OrganizeConfig, resolver: DateResolver) -> Self {
        Self {
            config,
            resolver,
            copier: Box::new(PreservingCopier),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_copier(mut self, copier: impl FileCopier + 'static) -> Self {
        self.copier = Box::new(copier);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn config(&self) -> &OrganizeConfig {
        &self.config
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Create the destination root. Nothing is created in a dry run.
    pub fn prepare_destination(&self) -> Result<(), OrganizeError> {
        if self.config.dry_run {
            return Ok(());
        }
        fs::create_dir_all(&self.config.destination).map_err(|source| {
            OrganizeError::DestinationUnavailable {
                path: self.config.destination.clone(),
                source,
            }
        })
    }

    pub fn run(&self, files: &[MediaFile]) -> Result<OrganizeReport, OrganizeError> {
        self.run_with_events(files, &null_sender())
    }

    pub fn run_with_events(
        &self,
        files: &[MediaFile],
        events: &EventSender,
    ) -> Result<OrganizeReport, OrganizeError> {
        let mut collisions = CollisionResolver::new();
        self.run_claiming(files, events, &mut collisions)
    }

    /// Run with a caller-owned set of claimed names, so several runs into the
    /// same destination never hand out the same name twice.
    pub(crate) fn run_claiming(
        &self,
        files: &[MediaFile],
        events: &EventSender,
        collisions: &mut CollisionResolver,
    ) -> Result<OrganizeReport, OrganizeError> {
        let start = Instant::now();
        self.prepare_destination()?;

        let total = files.len();
        let mut report = OrganizeReport {
            total_files: total,
            dry_run: self.config.dry_run,
            ..Default::default()
        };
        let mut created_dirs: HashSet<PathBuf> = HashSet::new();

        tracing::info!(
            total,
            dry_run = self.config.dry_run,
            destination = %self.config.destination.display(),
            "organize started"
        );
        events.send(Event::Organize(OrganizeEvent::Started {
            total_files: total,
            dry_run: self.config.dry_run,
        }));

        for (i, file) in files.iter().enumerate() {
            if self.cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }

            let destination = match self.place(file, collisions, &mut created_dirs) {
                Ok(placement) => {
                    report
                        .statistics
                        .record(placement.date.year(), placement.size_bytes);
                    report.processed += 1;
                    let relative = placement
                        .destination
                        .strip_prefix(&self.config.destination)
                        .map(|p| p.to_path_buf())
                        .unwrap_or_else(|_| placement.destination.clone());
                    report.placements.push(placement);
                    Some(relative)
                }
                Err(message) => {
                    tracing::warn!("{}", message);
                    events.send(Event::Organize(OrganizeEvent::FileError {
                        path: file.path.clone(),
                        message: message.clone(),
                    }));
                    report.errors.push(message);
                    report.skipped += 1;
                    None
                }
            };

            events.send(Event::Organize(OrganizeEvent::Progress(OrganizeProgress {
                processed: i + 1,
                total,
                current_file: file.file_name(),
                destination,
            })));
        }

        report.duration_ms = start.elapsed().as_millis() as u64;

        if report.cancelled {
            tracing::info!(processed = report.processed, "organize cancelled");
            events.send(Event::Organize(OrganizeEvent::Cancelled {
                processed: report.processed,
            }));
        } else {
            tracing::info!(
                processed = report.processed,
                skipped = report.skipped,
                duration_ms = report.duration_ms,
                "organize completed"
            );
            events.send(Event::Organize(OrganizeEvent::Completed {
                processed: report.processed,
                skipped: report.skipped,
            }));
        }

        Ok(report)
    }

    /// Date, plan, free name, copy. The error is the message for the report.
    fn place(
        &self,
        file: &MediaFile,
        collisions: &mut CollisionResolver,
        created_dirs: &mut HashSet<PathBuf>,
    ) -> Result<Placement, String> {
        let (date, source) = self
            .resolver
            .resolve_with_source(&file.path)
            .ok_or_else(|| format!("No date found for {}", file.path.display()))?;

        let candidate = PathPlanner::destination_for(
            &self.config.destination,
            &file.path,
            date.date(),
            self.config.granularity,
            self.config.naming,
            self.config.language,
        );
        let destination = collisions
            .resolve(&candidate)
            .map_err(|e| format!("Error processing {}: {}", file.path.display(), e))?;

        if !self.config.dry_run {
            if let Some(parent) = destination.parent() {
                if !created_dirs.contains(parent) {
                    fs::create_dir_all(parent).map_err(|source| {
                        let err = OrganizeError::CreateDirectory {
                            path: parent.to_path_buf(),
                            source,
                        };
                        format!("Error processing {}: {}", file.path.display(), err)
                    })?;
                    created_dirs.insert(parent.to_path_buf());
                }
            }

            self.copier
                .copy(&file.path, &destination)
                .map_err(|source| {
                    let err = OrganizeError::Copy {
                        from: file.path.clone(),
                        to: destination.clone(),
                        source,
                    };
                    format!("Error processing {}: {}", file.path.display(), err)
                })?;
        }

        tracing::debug!(
            from = %file.path.display(),
            to = %destination.display(),
            date_source = source,
            "placed"
        );
        collisions.claim(destination.clone());

        Ok(Placement {
            source: file.path.clone(),
            renamed: destination != candidate,
            destination,
            date,
            date_source: source.to_string(),
            size_bytes: file.size,
        })
    }
}
