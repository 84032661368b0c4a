//! EXIF capture dates embedded in image files.

use super::DateStrategy;
use crate::core::scanner::MediaKind;
use ::exif::{In, Reader, Tag, Value};
use chrono::NaiveDateTime;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// EXIF text format: "YYYY:MM:DD HH:MM:SS"
const EXIF_DATETIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Tags tried in order: when the shutter fired, when it was digitized,
/// when the file was last changed by the camera or an editor.
const DATE_TAGS: [Tag; 3] = [Tag::DateTimeOriginal, Tag::DateTimeDigitized, Tag::DateTime];

/// Reads EXIF date tags with kamadak-exif.
///
/// Videos are skipped; any other type is handed to the EXIF reader, which
/// understands JPEG, TIFF (and TIFF-based raw), HEIF, PNG and WebP.
pub struct ExifStrategy;

impl DateStrategy for ExifStrategy {
    fn name(&self) -> &'static str {
        "exif"
    }

    fn extract(&self, path: &Path) -> Option<NaiveDateTime> {
        if MediaKind::from_path(path) == MediaKind::Video {
            return None;
        }

        let file = File::open(path).ok()?;
        let mut reader = BufReader::new(file);
        let exif = Reader::new().read_from_container(&mut reader).ok()?;

        DATE_TAGS.iter().find_map(|tag| {
            let field = exif.get_field(*tag, In::PRIMARY)?;
            ascii_value(&field.value).and_then(parse_exif_datetime)
        })
    }
}

/// Parse an EXIF date string, tolerating NUL padding and surrounding quotes
pub fn parse_exif_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim_matches(|c: char| c == '\0' || c == '"' || c.is_whitespace());
    NaiveDateTime::parse_from_str(s, EXIF_DATETIME_FORMAT).ok()
}

fn ascii_value(value: &Value) -> Option<&str> {
    match value {
        Value::Ascii(vec) => vec.first().and_then(|bytes| std::str::from_utf8(bytes).ok()),
        _ => None,
    }
}
