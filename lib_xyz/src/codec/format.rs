use serde::{Deserialize, Serialize};

use crate::compression::palette::{expand_to_rgba, PaletteExpansionError, Rgb};
use crate::constants::MAGIC_HEADER;

/// Fixed leading bytes of every XYZ file.
///
/// Serialized with bincode's default options: fixed-width little-endian
/// integers, arrays without a length prefix. That gives exactly
/// `magic | width | height` in 8 bytes.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub magic: [u8; 4],
    pub width: u16,
    pub height: u16,
}

impl Header {
    pub const MAGIC_SIZE: usize = 4;
    pub const WIDTH_HEIGHT_SIZE: usize = std::mem::size_of::<u16>();
    pub const SIZE: usize = Self::MAGIC_SIZE + 2 * Self::WIDTH_HEIGHT_SIZE;

    pub fn new(width: u16, height: u16) -> Self {
        Self {
            magic: MAGIC_HEADER,
            width,
            height,
        }
    }
}

/// A decoded XYZ image: dimensions, the full 256-entry palette and the index plane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XyzImage {
    pub width: u16,
    pub height: u16,
    pub palette: Vec<Rgb>,
    pub indices: Vec<u8>,
}

impl XyzImage {
    pub fn new(width: u16, height: u16, palette: Vec<Rgb>, indices: Vec<u8>) -> Self {
        Self {
            width,
            height,
            palette,
            indices,
        }
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Color at (x, y), or `None` outside the image.
    pub fn pixel(&self, x: u16, y: u16) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = *self.indices.get(y as usize * self.width as usize + x as usize)?;
        self.palette.get(index as usize).copied()
    }

    /// Reconstructs the pixel buffer as RGBA with every alpha byte at 255.
    pub fn to_rgba(&self) -> Result<Vec<u8>, PaletteExpansionError> {
        expand_to_rgba(&self.palette, &self.indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_wire_layout() {
        let bytes = bincode::serialize(&Header::new(0x0102, 0x0304)).unwrap();
        assert_eq!(bytes, vec![b'X', b'Y', b'Z', b'1', 0x02, 0x01, 0x04, 0x03]);
        assert_eq!(bytes.len(), Header::SIZE);
    }

    #[test]
    fn test_header_parse() {
        let header: Header = bincode::deserialize(b"XYZ1\x10\x00\x20\x00").unwrap();
        assert_eq!(header, Header::new(16, 32));
    }

    #[test]
    fn test_pixel_lookup() {
        let mut palette = vec![[0, 0, 0]; 256];
        palette[1] = [10, 20, 30];
        let image = XyzImage::new(2, 1, palette, vec![0, 1]);
        assert_eq!(image.pixel(1, 0), Some([10, 20, 30]));
        assert_eq!(image.pixel(2, 0), None);
        assert_eq!(image.pixel(0, 1), None);
    }
}
