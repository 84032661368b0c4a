//! Builders for tiny media files with known metadata.

use chrono::NaiveDate;

/// EXIF date tags to embed; each value must be longer than three characters
#[derive(Default)]
pub struct ExifDates {
    pub original: Option<&'static str>,
    pub digitized: Option<&'static str>,
    pub modified: Option<&'static str>,
}

/// A JPEG that is only SOI, an APP1 EXIF segment and EOI.
pub fn exif_jpeg(dates: &ExifDates) -> Vec<u8> {
    let tiff = exif_tiff(dates);
    let mut out = vec![0xFF, 0xD8, 0xFF, 0xE1];
    out.extend_from_slice(&((2 + 6 + tiff.len()) as u16).to_be_bytes());
    out.extend_from_slice(b"Exif\0\0");
    out.extend_from_slice(&tiff);
    out.extend_from_slice(&[0xFF, 0xD9]);
    out
}

/// Little-endian TIFF: IFD0 holds DateTime and the Exif pointer, the Exif
/// IFD holds DateTimeOriginal and DateTimeDigitized.
fn exif_tiff(dates: &ExifDates) -> Vec<u8> {
    let ifd0_tags: Vec<(u16, &str)> = dates.modified.map(|d| (0x0132, d)).into_iter().collect();
    let exif_tags: Vec<(u16, &str)> = [(0x9003, dates.original), (0x9004, dates.digitized)]
        .into_iter()
        .filter_map(|(tag, d)| d.map(|d| (tag, d)))
        .collect();

    let ifd_size = |entries: usize| 2 + 12 * entries + 4;
    let ifd0_offset = 8;
    let exif_offset = ifd0_offset + ifd_size(ifd0_tags.len() + 1);
    let data_offset = exif_offset + ifd_size(exif_tags.len());

    let mut out = b"II*\0".to_vec();
    out.extend_from_slice(&(ifd0_offset as u32).to_le_bytes());
    let mut data = Vec::new();

    let mut ascii_entry = |out: &mut Vec<u8>, tag: u16, text: &str| {
        out.extend_from_slice(&tag.to_le_bytes());
        out.extend_from_slice(&2u16.to_le_bytes());
        out.extend_from_slice(&((text.len() + 1) as u32).to_le_bytes());
        out.extend_from_slice(&((data_offset + data.len()) as u32).to_le_bytes());
        data.extend_from_slice(text.as_bytes());
        data.push(0);
    };

    out.extend_from_slice(&((ifd0_tags.len() + 1) as u16).to_le_bytes());
    for (tag, text) in &ifd0_tags {
        ascii_entry(&mut out, *tag, text);
    }
    out.extend_from_slice(&0x8769u16.to_le_bytes());
    out.extend_from_slice(&4u16.to_le_bytes());
    out.extend_from_slice(&1u32.to_le_bytes());
    out.extend_from_slice(&(exif_offset as u32).to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());

    out.extend_from_slice(&(exif_tags.len() as u16).to_le_bytes());
    for (tag, text) in &exif_tags {
        ascii_entry(&mut out, *tag, text);
    }
    out.extend_from_slice(&0u32.to_le_bytes());

    out.extend_from_slice(&data);
    out
}

/// Seconds since 1904-01-01, the ISO base media epoch
pub fn mac_seconds(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> u32 {
    let epoch = NaiveDate::from_ymd_opt(1904, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let at = NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, s)
        .unwrap();
    (at - epoch).num_seconds() as u32
}

pub fn bmff_box(kind: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut out = ((8 + payload.len()) as u32).to_be_bytes().to_vec();
    out.extend_from_slice(kind);
    out.extend_from_slice(payload);
    out
}

/// Minimal MP4: ftyp, moov (mvhd, trak/tkhd, udta/©day) and an empty mdat.
pub fn mp4_with_dates(movie: Option<u32>, track: Option<u32>, day: Option<&str>) -> Vec<u8> {
    let mut ftyp = b"isom".to_vec();
    ftyp.extend_from_slice(&0x200u32.to_be_bytes());
    ftyp.extend_from_slice(b"isomiso2mp41");

    let header = |size: usize, created: u32| {
        let mut payload = vec![0u8; size];
        payload[4..8].copy_from_slice(&created.to_be_bytes());
        payload[8..12].copy_from_slice(&created.to_be_bytes());
        payload
    };

    let mut mvhd = header(100, movie.unwrap_or(0));
    mvhd[12..16].copy_from_slice(&1000u32.to_be_bytes());
    let mut moov = bmff_box(b"mvhd", &mvhd);
    moov.extend(bmff_box(b"trak", &bmff_box(b"tkhd", &header(84, track.unwrap_or(0)))));

    if let Some(day) = day {
        let mut text = (day.len() as u16).to_be_bytes().to_vec();
        text.extend_from_slice(&0x55C4u16.to_be_bytes());
        text.extend_from_slice(day.as_bytes());
        moov.extend(bmff_box(b"udta", &bmff_box(&[0xA9, b'd', b'a', b'y'], &text)));
    }

    let mut out = bmff_box(b"ftyp", &ftyp);
    out.extend(bmff_box(b"moov", &moov));
    out.extend(bmff_box(b"mdat", &[]));
    out
}
