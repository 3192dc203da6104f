use std::collections::HashMap;

use thiserror::Error;

use crate::constants::PALETTE_ENTRIES;

/// A palette entry. Alpha never takes part in color identity.
pub type Rgb = [u8; 3];

const OPAQUE: u8 = u8::MAX;

#[derive(Error, Debug)]
pub enum PaletteError {
    #[error("Unsupported channel count: {0} (expected 3 or 4)")]
    UnsupportedChannelCount(usize),
    #[error("Invalid pixel data length: expected multiple of {1} bytes, got {0}")]
    InvalidPixelDataLength(usize, usize),
    #[error("Image has more than 256 colors (attempted to add color #{0})")]
    TooManyColors(usize),
}

#[derive(Error, Debug)]
pub enum PaletteExpansionError {
    #[error("Invalid palette index: {0} exceeds palette size of {1}")]
    InvalidPaletteIndex(usize, usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedPixels {
    /// Always `PALETTE_ENTRIES` long; slots past `used` are black padding.
    pub palette: Vec<Rgb>,
    /// Number of distinct colors found in the source.
    pub used: usize,
    /// One palette index per pixel, row-major.
    pub indices: Vec<u8>,
}

/// Builds a first-occurrence ordered palette from interleaved RGB or RGBA pixels.
///
/// # Parameters
/// - `pixels`: row-major pixel data, `channels` bytes per pixel.
/// - `channels`: 3 for RGB, 4 for RGBA. The alpha byte is ignored.
///
/// # Returns
/// The padded 256-entry palette, the count of real colors and one index per pixel.
///
/// # Errors
/// - `PaletteError::UnsupportedChannelCount` if `channels` is neither 3 nor 4
/// - `PaletteError::InvalidPixelDataLength` if the buffer isn't a whole number of pixels
/// - `PaletteError::TooManyColors` as soon as a 257th distinct color shows up
pub fn build_palette(pixels: &[u8], channels: usize) -> Result<IndexedPixels, PaletteError> {
    if channels != 3 && channels != 4 {
        return Err(PaletteError::UnsupportedChannelCount(channels));
    }
    if pixels.len() % channels != 0 {
        return Err(PaletteError::InvalidPixelDataLength(pixels.len(), channels));
    }

    let mut color_to_index: HashMap<Rgb, u8> = HashMap::new();
    let mut palette: Vec<Rgb> = Vec::with_capacity(PALETTE_ENTRIES);
    let mut indices = Vec::with_capacity(pixels.len() / channels);

    for pixel in pixels.chunks_exact(channels) {
        let key = [pixel[0], pixel[1], pixel[2]];

        let index = match color_to_index.get(&key) {
            Some(&index) => index,
            None => {
                if palette.len() >= PALETTE_ENTRIES {
                    return Err(PaletteError::TooManyColors(palette.len() + 1));
                }
                let index = palette.len() as u8;
                palette.push(key);
                color_to_index.insert(key, index);
                index
            }
        };
        indices.push(index);
    }

    let used = palette.len();
    palette.resize(PALETTE_ENTRIES, [0, 0, 0]);

    Ok(IndexedPixels {
        palette,
        used,
        indices,
    })
}

/// Expands palette indices into opaque RGBA pixel data.
///
/// # Errors
/// - `PaletteExpansionError::InvalidPaletteIndex` if an index points past the palette
pub fn expand_to_rgba(palette: &[Rgb], indices: &[u8]) -> Result<Vec<u8>, PaletteExpansionError> {
    let mut rgba = Vec::with_capacity(indices.len() * 4);

    for &index in indices {
        let index = index as usize;
        let [r, g, b] = *palette
            .get(index)
            .ok_or(PaletteExpansionError::InvalidPaletteIndex(index, palette.len()))?;
        rgba.extend_from_slice(&[r, g, b, OPAQUE]);
    }

    Ok(rgba)
}
