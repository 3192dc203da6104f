#![allow(dead_code)]

use std::path::Path;

use image::{ImageFormat, RgbaImage};

pub const RGB_WIDTH: u16 = 2;
pub const RGB_HEIGHT: u16 = 2;

/// Red, green, blue, red.
pub const RGBR: [u8; 16] = [
    255, 0, 0, 255, //
    0, 255, 0, 255, //
    0, 0, 255, 255, //
    255, 0, 0, 255, //
];

/// 16x16 gray ramp: every pixel its own color, 256 in total.
pub fn gradient() -> Vec<u8> {
    (0..=255u8).flat_map(|i| [i, i, i, 255]).collect()
}

/// `count` distinct opaque RGBA colors laid out in a single row.
pub fn distinct_colors(count: usize) -> Vec<u8> {
    (0..count)
        .flat_map(|i| [(i % 256) as u8, (i / 256) as u8, 0x40, 255])
        .collect()
}

pub fn write_png(path: &Path, width: u32, height: u32, rgba: Vec<u8>) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    RgbaImage::from_raw(width, height, rgba)
        .expect("buffer matches dimensions")
        .save_with_format(path, ImageFormat::Png)
        .unwrap();
}

/// Hand-assembles an XYZ1 file around an arbitrary decompressed payload.
pub fn xyz_file(width: u16, height: u16, payload: &[u8]) -> Vec<u8> {
    let mut bytes = b"XYZ1".to_vec();
    bytes.extend_from_slice(&width.to_le_bytes());
    bytes.extend_from_slice(&height.to_le_bytes());
    bytes.extend_from_slice(&lib_xyz::compression::deflate::deflate(payload).unwrap());
    bytes
}
