use log::{debug, error, info};
use thiserror::Error;

use super::format::Header;
use crate::compression::{compress, CompressionError};

#[derive(Error, Debug)]
pub enum EncodingError {
    #[error("Pixel data length mismatch: expected {expected} bytes, got {found}")]
    PixelDataMismatch { expected: usize, found: usize },
    #[error("Failed to compress image data: {0}")]
    CompressionFailed(#[from] CompressionError),
    #[error("Failed to serialize header: {0}")]
    HeaderSerialization(#[from] bincode::Error),
}

/// Encodes an RGBA buffer into XYZ1 bytes. Alpha is dropped.
pub fn encode(width: u16, height: u16, rgba_data: &[u8]) -> Result<Vec<u8>, EncodingError> {
    encode_pixels(width, height, rgba_data, 4)
}

/// Encodes a row-major RGB (`channels == 3`) or RGBA (`channels == 4`) buffer.
///
/// The whole file is assembled in memory; nothing is returned on failure.
pub fn encode_pixels(
    width: u16,
    height: u16,
    pixels: &[u8],
    channels: usize,
) -> Result<Vec<u8>, EncodingError> {
    info!("Starting encoding");

    let expected = width as usize * height as usize * channels;
    if pixels.len() != expected {
        error!(
            "Pixel buffer holds {} bytes, {}x{}x{} needs {}",
            pixels.len(),
            width,
            height,
            channels,
            expected
        );
        return Err(EncodingError::PixelDataMismatch {
            expected,
            found: pixels.len(),
        });
    }

    // Step 1: Palette, index plane and deflate
    let compressed = compress(pixels, channels)?;
    debug!(
        "Image data compressed successfully with {} palette colors",
        compressed.used_colors
    );

    // Step 2: Header followed by the block
    let header = Header::new(width, height);
    let mut encoded_data = bincode::serialize(&header)?;
    debug!(
        "Header written: magic {:?}, width {}, height {}",
        header.magic, width, height
    );

    encoded_data.reserve(compressed.data.len());
    encoded_data.extend_from_slice(&compressed.data);

    info!(
        "Encoding process completed successfully: {} bytes",
        encoded_data.len()
    );
    Ok(encoded_data)
}
