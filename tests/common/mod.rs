//! Tiny media files with known dates, shared by the integration tests.

#![allow(dead_code)]

use chrono::NaiveDate;

/// JPEG holding only an EXIF segment with DateTimeOriginal set to `original`
pub fn exif_jpeg(original: &str) -> Vec<u8> {
    // TIFF header, IFD0 with one Exif pointer, Exif IFD with one ASCII tag
    let data_offset: u32 = 8 + 18 + 18;
    let mut tiff = b"II*\0".to_vec();
    tiff.extend_from_slice(&8u32.to_le_bytes());

    tiff.extend_from_slice(&1u16.to_le_bytes());
    tiff.extend_from_slice(&0x8769u16.to_le_bytes());
    tiff.extend_from_slice(&4u16.to_le_bytes());
    tiff.extend_from_slice(&1u32.to_le_bytes());
    tiff.extend_from_slice(&26u32.to_le_bytes());
    tiff.extend_from_slice(&0u32.to_le_bytes());

    tiff.extend_from_slice(&1u16.to_le_bytes());
    tiff.extend_from_slice(&0x9003u16.to_le_bytes());
    tiff.extend_from_slice(&2u16.to_le_bytes());
    tiff.extend_from_slice(&((original.len() + 1) as u32).to_le_bytes());
    tiff.extend_from_slice(&data_offset.to_le_bytes());
    tiff.extend_from_slice(&0u32.to_le_bytes());

    tiff.extend_from_slice(original.as_bytes());
    tiff.push(0);

    let mut out = vec![0xFF, 0xD8, 0xFF, 0xE1];
    out.extend_from_slice(&((2 + 6 + tiff.len()) as u16).to_be_bytes());
    out.extend_from_slice(b"Exif\0\0");
    out.extend_from_slice(&tiff);
    out.extend_from_slice(&[0xFF, 0xD9]);
    out
}

fn bmff_box(kind: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut out = ((8 + payload.len()) as u32).to_be_bytes().to_vec();
    out.extend_from_slice(kind);
    out.extend_from_slice(payload);
    out
}

/// MP4 whose movie header says it was created at `y-m-d 12:00:00`
pub fn mp4_created(y: i32, m: u32, d: u32) -> Vec<u8> {
    let epoch = NaiveDate::from_ymd_opt(1904, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let at = NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();
    let seconds = (at - epoch).num_seconds() as u32;

    let mut mvhd = vec![0u8; 100];
    mvhd[4..8].copy_from_slice(&seconds.to_be_bytes());
    mvhd[8..12].copy_from_slice(&seconds.to_be_bytes());
    mvhd[12..16].copy_from_slice(&1000u32.to_be_bytes());

    let mut ftyp = b"isom".to_vec();
    ftyp.extend_from_slice(&0x200u32.to_be_bytes());
    ftyp.extend_from_slice(b"isommp41");

    let mut out = bmff_box(b"ftyp", &ftyp);
    out.extend(bmff_box(b"moov", &bmff_box(b"mvhd", &mvhd)));
    out.extend(bmff_box(b"mdat", &[]));
    out
}
