mod common;

use common::{distinct_colors, gradient, RGBR};
use lib_xyz::compression::{compress, decompress};

#[test]
fn test_comp_decomp_rgbr() {
    let compressed = compress(&RGBR, 4).unwrap();
    assert_eq!(compressed.used_colors, 3);
    assert!(!compressed.data.is_empty());

    let payload = decompress(&compressed.data, 4).unwrap();
    assert_eq!(payload.indices, vec![0, 1, 2, 0]);
    assert_eq!(&payload.palette[..3], &[[255, 0, 0], [0, 255, 0], [0, 0, 255]]);
}

#[test]
fn test_comp_decomp_repeating_color() {
    let rgba_data = vec![255, 0, 0, 255].repeat(64 * 64);

    let compressed = compress(&rgba_data, 4).unwrap();
    // Single color should result in very good compression
    assert!(compressed.data.len() < rgba_data.len() / 16);

    let payload = decompress(&compressed.data, 64 * 64).unwrap();
    assert!(payload.indices.iter().all(|&i| i == 0));
    assert_eq!(payload.palette[0], [255, 0, 0]);
}

#[test]
fn test_comp_decomp_gradients() {
    let compressed = compress(&gradient(), 4).unwrap();
    assert_eq!(compressed.used_colors, 256);

    let payload = decompress(&compressed.data, 256).unwrap();
    let expected: Vec<u8> = (0..=255).collect();
    assert_eq!(payload.indices, expected);
}

#[test]
fn test_decompress_ignores_trailing_payload() {
    let compressed = compress(&distinct_colors(8), 4).unwrap();
    let payload = decompress(&compressed.data, 4).unwrap();
    assert_eq!(payload.indices, vec![0, 1, 2, 3]);
}
