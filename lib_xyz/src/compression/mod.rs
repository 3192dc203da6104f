pub mod deflate;
pub mod palette;

use std::io;

use log::{debug, info};
use palette::{PaletteError, Rgb};
use thiserror::Error;

use crate::constants::{PALETTE_BYTES, PALETTE_ENTRIES, PALETTE_ENTRY_SIZE};

#[derive(Error, Debug)]
pub enum CompressionError {
    #[error("Palette building failed: {0}")]
    PaletteFailed(#[from] PaletteError),
    #[error("Deflate compression failed: {0}")]
    DeflateFailed(#[source] io::Error),
}

#[derive(Error, Debug)]
pub enum DecompressionError {
    #[error("Inflate failed: {0}")]
    InflateFailed(#[source] io::Error),
    #[error("Truncated palette: expected 768 bytes, found {found}")]
    TruncatedPalette { found: usize },
    #[error("Truncated pixel data: expected {expected} index bytes, found {found}")]
    TruncatedIndices { expected: usize, found: usize },
}

/// Output of [`compress`]: the zlib block plus what went into it.
pub struct CompressionResult {
    pub used_colors: usize,
    pub data: Vec<u8>,
}

/// The decompressed block: a full 256-entry palette and the index plane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PalettePayload {
    pub palette: Vec<Rgb>,
    pub indices: Vec<u8>,
}

pub fn compress(pixels: &[u8], channels: usize) -> Result<CompressionResult, CompressionError> {
    info!("Starting compression");
    debug!("Input data length: {}, channels: {}", pixels.len(), channels);

    // Step 1: Palette + index plane
    let indexed = palette::build_palette(pixels, channels)?;
    debug!(
        "Palette built: {} unique colors, {} indices",
        indexed.used,
        indexed.indices.len()
    );

    // Step 2: Raw payload, palette first
    let mut payload = Vec::with_capacity(PALETTE_BYTES + indexed.indices.len());
    for color in &indexed.palette {
        payload.extend_from_slice(color);
    }
    payload.extend_from_slice(&indexed.indices);
    debug!("Payload assembled: {} bytes", payload.len());

    // Step 3: Deflate
    let data = deflate::deflate(&payload).map_err(CompressionError::DeflateFailed)?;
    debug!("Deflate: {} -> {} bytes", payload.len(), data.len());

    info!("Compression completed successfully");
    Ok(CompressionResult {
        used_colors: indexed.used,
        data,
    })
}

/// Inflates a block and splits it into the palette and `pixel_count` indices.
/// Inflation stops once palette and index plane are out; anything the stream
/// holds past that is never decompressed.
pub fn decompress(block: &[u8], pixel_count: usize) -> Result<PalettePayload, DecompressionError> {
    info!("Starting decompression");
    debug!("Compressed block length: {}", block.len());

    let needed = PALETTE_BYTES.saturating_add(pixel_count);
    let payload =
        deflate::inflate_bounded(block, needed).map_err(DecompressionError::InflateFailed)?;
    debug!("Inflated payload: {} bytes", payload.len());

    if payload.len() < PALETTE_BYTES {
        return Err(DecompressionError::TruncatedPalette {
            found: payload.len(),
        });
    }
    let (palette_bytes, rest) = payload.split_at(PALETTE_BYTES);

    if rest.len() < pixel_count {
        return Err(DecompressionError::TruncatedIndices {
            expected: pixel_count,
            found: rest.len(),
        });
    }

    let palette: Vec<Rgb> = palette_bytes
        .chunks_exact(PALETTE_ENTRY_SIZE)
        .map(|c| [c[0], c[1], c[2]])
        .collect();
    debug_assert_eq!(palette.len(), PALETTE_ENTRIES);

    info!("Decompression completed successfully");
    Ok(PalettePayload {
        palette,
        indices: rest[..pixel_count].to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compress_payload_layout() {
        let pixels = vec![9, 8, 7, 255, 1, 2, 3, 255];
        let result = compress(&pixels, 4).unwrap();
        assert_eq!(result.used_colors, 2);

        let payload = deflate::inflate(&result.data).unwrap();
        assert_eq!(payload.len(), PALETTE_BYTES + 2);
        assert_eq!(&payload[..6], &[9, 8, 7, 1, 2, 3]);
        assert!(payload[6..PALETTE_BYTES].iter().all(|&b| b == 0));
        assert_eq!(&payload[PALETTE_BYTES..], &[0, 1]);
    }

    #[test]
    fn test_decompress_short_palette() {
        let block = deflate::deflate(&[0u8; 100]).unwrap();
        let result = decompress(&block, 0);
        assert!(matches!(
            result,
            Err(DecompressionError::TruncatedPalette { found: 100 })
        ));
    }

    #[test]
    fn test_decompress_short_indices() {
        let block = deflate::deflate(&[0u8; PALETTE_BYTES + 3]).unwrap();
        let result = decompress(&block, 4);
        assert!(matches!(
            result,
            Err(DecompressionError::TruncatedIndices {
                expected: 4,
                found: 3
            })
        ));
    }

    #[test]
    fn test_decompress_bounded_by_pixel_count() {
        let mut raw = vec![0u8; PALETTE_BYTES + 1];
        raw.extend(std::iter::repeat(1u8).take(16 * 1024 * 1024));
        let block = deflate::deflate(&raw).unwrap();

        let payload = decompress(&block, 1).unwrap();
        assert_eq!(payload.indices, vec![0]);
        assert_eq!(payload.palette.len(), PALETTE_ENTRIES);
    }

    #[test]
    fn test_decompress_corrupt_block() {
        let result = decompress(&[0xde, 0xad, 0xbe, 0xef], 1);
        assert!(matches!(result, Err(DecompressionError::InflateFailed(_))));
    }
}
