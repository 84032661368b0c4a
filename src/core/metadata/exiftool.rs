//! Dates read by the external `exiftool` program.
//!
//! The tool is probed once at startup ([`ToolCapabilities::probe`]) and the
//! result is passed into the resolver, so a missing tool costs one failed
//! spawn per process instead of one per file.

use super::embedded::parse_exif_datetime;
use super::DateStrategy;
use chrono::NaiveDateTime;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Upper bound on one exiftool run
pub const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(5);

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Date fields requested, highest priority first
const DATE_FIELDS: [&str; 5] = [
    "-DateTimeOriginal",
    "-CreateDate",
    "-MediaCreateDate",
    "-TrackCreateDate",
    "-FileModifyDate",
];

/// How to run exiftool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExifTool {
    pub program: PathBuf,
    pub timeout: Duration,
}

impl ExifTool {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            timeout: DEFAULT_TOOL_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Fixed argument template: values only (`-s3`), dates rendered in EXIF format
    fn date_command(&self, path: &Path) -> Command {
        let mut command = Command::new(&self.program);
        command
            .arg("-s3")
            .arg("-d")
            .arg("%Y:%m:%d %H:%M:%S")
            .args(DATE_FIELDS)
            .arg(path);
        command
    }

    /// Run exiftool on `path` and return the first date it prints
    pub fn read_date(&self, path: &Path) -> io::Result<Option<NaiveDateTime>> {
        let output = run_with_timeout(self.date_command(path), self.timeout)?;
        if !output.status.success() && output.stdout.is_empty() {
            return Err(io::Error::other(format!(
                "exiftool exited with {}",
                output.status
            )));
        }
        Ok(first_date_line(&String::from_utf8_lossy(&output.stdout)))
    }

    /// `exiftool -ver`; `Some(version)` when the tool runs
    pub fn version(&self) -> Option<String> {
        let mut command = Command::new(&self.program);
        command.arg("-ver");
        let output = run_with_timeout(command, self.timeout).ok()?;
        if !output.status.success() {
            return None;
        }
        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        (!version.is_empty()).then_some(version)
    }
}

/// External tools found at startup
#[derive(Debug, Clone, Default)]
pub struct ToolCapabilities {
    /// `None` when exiftool is not installed
    pub exiftool: Option<ExifTool>,
}

impl ToolCapabilities {
    /// No external tools
    pub fn none() -> Self {
        Self::default()
    }

    /// Look for `exiftool` on the PATH
    pub fn probe() -> Self {
        Self::probe_with(ExifTool::new("exiftool"))
    }

    /// Check whether `tool` runs; keep it only if it does
    pub fn probe_with(tool: ExifTool) -> Self {
        match tool.version() {
            Some(version) => {
                tracing::info!(program = %tool.program.display(), %version, "exiftool available");
                Self {
                    exiftool: Some(tool),
                }
            }
            None => {
                tracing::info!(program = %tool.program.display(), "exiftool not available");
                Self::none()
            }
        }
    }

    pub fn has_exiftool(&self) -> bool {
        self.exiftool.is_some()
    }
}

/// Runs exiftool for each file.
pub struct ExternalToolStrategy {
    tool: ExifTool,
}

impl ExternalToolStrategy {
    pub fn new(tool: ExifTool) -> Self {
        Self { tool }
    }
}

impl DateStrategy for ExternalToolStrategy {
    fn name(&self) -> &'static str {
        "exiftool"
    }

    fn extract(&self, path: &Path) -> Option<NaiveDateTime> {
        match self.tool.read_date(path) {
            Ok(date) => date,
            Err(e) => {
                tracing::debug!(path = %path.display(), "exiftool failed: {}", e);
                None
            }
        }
    }
}

/// First line that parses as an EXIF date
fn first_date_line(stdout: &str) -> Option<NaiveDateTime> {
    stdout.lines().find_map(parse_exif_datetime)
}

/// Spawn `command` and wait at most `timeout`; the child is killed on expiry.
///
/// Stdout is drained on a helper thread so a chatty child never blocks on a
/// full pipe while we poll.
fn run_with_timeout(mut command: Command, timeout: Duration) -> io::Result<Output> {
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()?;

    let reader = child.stdout.take().map(|mut pipe| {
        thread::spawn(move || -> io::Result<Vec<u8>> {
            let mut stdout = Vec::new();
            pipe.read_to_end(&mut stdout)?;
            Ok(stdout)
        })
    });

    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            let stdout = match reader {
                Some(handle) => handle
                    .join()
                    .map_err(|_| io::Error::other("stdout reader panicked"))??,
                None => Vec::new(),
            };
            return Ok(Output {
                status,
                stdout,
                stderr: Vec::new(),
            });
        }

        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            // Reader left detached: a grandchild may still hold the pipe open
            return Err(io::Error::new(
                io::ErrorKind::TimedOut,
                format!("timed out after {:?}", timeout),
            ));
        }

        thread::sleep(POLL_INTERVAL);
    }
}
