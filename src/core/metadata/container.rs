//! Creation dates stored in ISO base media containers (MP4, MOV, M4V, 3GP).
//!
//! Only the `moov` box is read into memory; media data is skipped with seeks.
//! The reader produces a small key/value map so the date strategy can try
//! several keys and text formats in a fixed order.

use super::DateStrategy;
use crate::core::scanner::MediaKind;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

/// Keys tried in order: movie header, user data `©day`, first track header
const DATE_KEYS: [&str; 3] = ["creation_date", "date", "creation_time"];

const DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%z",
    "%Y-%m-%dT%H:%M:%SZ",
    "%Y:%m:%d %H:%M:%S",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y:%m:%d"];

/// Largest `moov` payload read into memory
const MAX_MOOV_BYTES: u64 = 64 * 1024 * 1024;

/// Boxes that may open an ISO base media file
const LEADING_BOXES: [&[u8; 4]; 6] = [b"ftyp", b"moov", b"wide", b"free", b"skip", b"mdat"];

const DAY: [u8; 4] = [0xA9, b'd', b'a', b'y'];

/// Reads creation dates from MP4/QuickTime headers.
pub struct ContainerStrategy;

impl DateStrategy for ContainerStrategy {
    fn name(&self) -> &'static str {
        "container"
    }

    fn extract(&self, path: &Path) -> Option<NaiveDateTime> {
        if MediaKind::from_path(path) == MediaKind::Image {
            return None;
        }

        let metadata = match read_container_metadata(path) {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::trace!(path = %path.display(), "no container metadata: {}", e);
                return None;
            }
        };

        DATE_KEYS
            .iter()
            .filter_map(|key| metadata.get(*key))
            .find_map(|value| parse_metadata_date(value))
    }
}

/// Read the date entries of an ISO base media file.
///
/// Keys: `creation_date` (movie header), `creation_time` (first track
/// header), `date` (user data `©day`). Header times of zero mean "unset" and
/// are left out.
pub fn read_container_metadata(path: &Path) -> io::Result<BTreeMap<String, String>> {
    let file = File::open(path)?;
    let file_len = file.metadata()?.len();
    let mut reader = BufReader::new(file);

    let mut pos = 0u64;
    let mut first = true;
    while pos + 8 <= file_len {
        reader.seek(SeekFrom::Start(pos))?;
        let mut head = [0u8; 8];
        reader.read_exact(&mut head)?;
        let kind: [u8; 4] = [head[4], head[5], head[6], head[7]];

        if first && !LEADING_BOXES.contains(&&kind) {
            return Err(invalid("not an ISO base media file"));
        }
        first = false;

        let (header_len, size) = match u32::from_be_bytes([head[0], head[1], head[2], head[3]]) {
            0 => (8, file_len - pos),
            1 => {
                let mut large = [0u8; 8];
                reader.read_exact(&mut large)?;
                (16, u64::from_be_bytes(large))
            }
            n => (8, u64::from(n)),
        };
        if size < header_len {
            return Err(invalid("box size smaller than its header"));
        }

        if &kind == b"moov" {
            let payload_len = size - header_len;
            if payload_len > MAX_MOOV_BYTES {
                return Err(invalid("moov box too large"));
            }
            let mut payload = vec![0u8; payload_len as usize];
            reader.read_exact(&mut payload)?;
            return Ok(parse_moov(&payload));
        }

        pos = pos.saturating_add(size);
    }

    Err(io::Error::new(io::ErrorKind::NotFound, "no moov box"))
}

fn parse_moov(payload: &[u8]) -> BTreeMap<String, String> {
    let mut entries = BTreeMap::new();

    for (kind, body) in child_boxes(payload) {
        match &kind {
            b"mvhd" => {
                if let Some(date) = header_creation_time(body) {
                    entries.insert("creation_date".to_string(), format_date(date));
                }
            }
            b"trak" if !entries.contains_key("creation_time") => {
                let tkhd = child_boxes(body).find(|(k, _)| k == b"tkhd");
                if let Some(date) = tkhd.and_then(|(_, b)| header_creation_time(b)) {
                    entries.insert("creation_time".to_string(), format_date(date));
                }
            }
            b"udta" => {
                if let Some(day) = user_data_day(body) {
                    entries.insert("date".to_string(), day);
                }
            }
            b"meta" => {
                if let Some(day) = item_list_day(body) {
                    entries.entry("date".to_string()).or_insert(day);
                }
            }
            _ => {}
        }
    }

    entries
}

/// Iterate over `(kind, payload)` of the boxes packed in `data`.
/// Stops at the first malformed header.
fn child_boxes<'a>(data: &'a [u8]) -> impl Iterator<Item = ([u8; 4], &'a [u8])> + 'a {
    let mut rest = data;
    std::iter::from_fn(move || {
        if rest.len() < 8 {
            return None;
        }
        let size = u32::from_be_bytes([rest[0], rest[1], rest[2], rest[3]]) as usize;
        let kind = [rest[4], rest[5], rest[6], rest[7]];
        let size = if size == 0 { rest.len() } else { size };
        if size < 8 || size > rest.len() {
            return None;
        }
        let body = &rest[8..size];
        rest = &rest[size..];
        Some((kind, body))
    })
}

/// Creation time of an `mvhd` or `tkhd` full box
fn header_creation_time(body: &[u8]) -> Option<NaiveDateTime> {
    let version = *body.first()?;
    let seconds = if version == 1 {
        u64::from_be_bytes(body.get(4..12)?.try_into().ok()?)
    } else {
        u64::from(u32::from_be_bytes(body.get(4..8)?.try_into().ok()?))
    };
    if seconds == 0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1904, 1, 1)?.and_hms_opt(0, 0, 0)?;
    epoch.checked_add_signed(Duration::try_seconds(i64::try_from(seconds).ok()?)?)
}

/// QuickTime user data text: u16 length, u16 language, text
fn user_data_day(udta: &[u8]) -> Option<String> {
    if let Some((_, body)) = child_boxes(udta).find(|(k, _)| *k == DAY) {
        let len = u16::from_be_bytes([*body.first()?, *body.get(1)?]) as usize;
        let text = body.get(4..4 + len)?;
        return non_empty(String::from_utf8_lossy(text).into_owned());
    }
    child_boxes(udta)
        .find(|(k, _)| k == b"meta")
        .and_then(|(_, body)| item_list_day(body))
}

/// iTunes-style `meta/ilst/©day/data`
fn item_list_day(meta: &[u8]) -> Option<String> {
    // MP4 `meta` is a full box (4 bytes of version/flags); QuickTime's is not
    let find_ilst = |data: &[u8]| {
        child_boxes(data)
            .find(|(k, _)| k == b"ilst")
            .map(|(_, b)| b.to_vec())
    };
    let ilst = meta
        .get(4..)
        .and_then(|data| find_ilst(data))
        .or_else(|| find_ilst(meta))?;

    let (_, day) = child_boxes(&ilst).find(|(k, _)| *k == DAY)?;
    let (_, data) = child_boxes(day).find(|(k, _)| k == b"data")?;
    // data payload: 4 bytes type, 4 bytes locale, then the value
    non_empty(String::from_utf8_lossy(data.get(8..)?).into_owned())
}

fn non_empty(s: String) -> Option<String> {
    let trimmed = s.trim_matches(|c: char| c == '\0' || c.is_whitespace());
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn format_date(date: NaiveDateTime) -> String {
    date.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Try every known text format on a metadata value
fn parse_metadata_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATE_FORMATS.iter().find_map(|fmt| {
                NaiveDate::parse_from_str(value, fmt)
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
        })
}

fn invalid(message: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message.to_string())
}
