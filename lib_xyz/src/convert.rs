use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::Path;

use image::{ImageError, ImageFormat, ImageReader, RgbaImage};
use log::{debug, info, warn};
use thiserror::Error;

use crate::codec::decoder::DecodeError;
use crate::codec::encoder::EncodingError;
use crate::codec::{decode, encode};
use crate::compression::palette::{PaletteError, PaletteExpansionError};
use crate::compression::CompressionError;
use crate::constants::{FILE_EXT, PNG_EXT, PNG_TO_XYZ_OUTPUT, XYZ_TO_PNG_OUTPUT};

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Image is too large for the XYZ format: {width}x{height} (max 65535x65535)")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("Pixel buffer does not match {width}x{height}")]
    BufferMismatch { width: u32, height: u32 },

    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error(transparent)]
    Decoding(#[from] DecodeError),

    #[error(transparent)]
    Expansion(#[from] PaletteExpansionError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Image processing error: {0}")]
    Image(#[from] ImageError),
}

/// Coarse classification of a per-file failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    TooManyColors,
    UnsupportedFormat,
    CorruptData,
    IoError,
    InvalidInput,
}

impl ConvertError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConvertError::Encoding(EncodingError::CompressionFailed(
                CompressionError::PaletteFailed(PaletteError::TooManyColors(_)),
            )) => ErrorKind::TooManyColors,
            ConvertError::Encoding(EncodingError::CompressionFailed(
                CompressionError::DeflateFailed(_),
            )) => ErrorKind::IoError,
            ConvertError::Encoding(_) => ErrorKind::InvalidInput,
            ConvertError::Decoding(DecodeError::UnsupportedFormat(_)) => ErrorKind::UnsupportedFormat,
            ConvertError::Decoding(_) | ConvertError::Expansion(_) => ErrorKind::CorruptData,
            ConvertError::Io(_) | ConvertError::Image(ImageError::IoError(_)) => ErrorKind::IoError,
            ConvertError::Image(_)
            | ConvertError::DimensionsTooLarge { .. }
            | ConvertError::BufferMismatch { .. } => ErrorKind::InvalidInput,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    PngToXyz,
    XyzToPng,
}

impl Direction {
    pub fn source_extension(self) -> &'static str {
        match self {
            Direction::PngToXyz => PNG_EXT,
            Direction::XyzToPng => FILE_EXT,
        }
    }

    pub fn target_extension(self) -> &'static str {
        match self {
            Direction::PngToXyz => FILE_EXT,
            Direction::XyzToPng => PNG_EXT,
        }
    }

    pub fn default_output_folder(self) -> &'static str {
        match self {
            Direction::PngToXyz => PNG_TO_XYZ_OUTPUT,
            Direction::XyzToPng => XYZ_TO_PNG_OUTPUT,
        }
    }

    /// Case-insensitive check of `path`'s extension against the source format.
    pub fn accepts(self, path: &Path) -> bool {
        path.extension()
            .and_then(OsStr::to_str)
            .is_some_and(|ext| ext.eq_ignore_ascii_case(self.source_extension()))
    }

    pub fn convert(self, input: &Path, output: &Path) -> Result<(), ConvertError> {
        match self {
            Direction::PngToXyz => convert_png_to_xyz(input, output),
            Direction::XyzToPng => convert_xyz_to_png(input, output),
        }
    }
}

/// Result of one file conversion as the batch layer reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub success: bool,
    pub error: Option<String>,
}

impl From<Result<(), ConvertError>> for FileOutcome {
    fn from(result: Result<(), ConvertError>) -> Self {
        match result {
            Ok(()) => FileOutcome {
                success: true,
                error: None,
            },
            Err(e) => FileOutcome {
                success: false,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Converts one file and folds any failure into a [`FileOutcome`].
pub fn convert_file(direction: Direction, input: &Path, output: &Path) -> FileOutcome {
    let result = direction.convert(input, output);
    if let Err(ref e) = result {
        warn!("{} failed ({:?}): {}", input.display(), e.kind(), e);
    }
    result.into()
}

/// Loads any container the `image` crate understands as 8-bit RGBA.
/// The format is sniffed from the file contents, not the extension.
pub fn decode_image(path: &Path) -> Result<RgbaImage, ConvertError> {
    let image = ImageReader::open(path)?.with_guessed_format()?.decode()?;
    Ok(image.to_rgba8())
}

pub fn encode_image(buffer: &RgbaImage, path: &Path) -> Result<(), ConvertError> {
    create_parent_dirs(path)?;
    buffer.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

pub fn convert_png_to_xyz(input: &Path, output: &Path) -> Result<(), ConvertError> {
    info!("Converting {} -> {}", input.display(), output.display());

    let rgba = decode_image(input)?;
    let (width, height) = rgba.dimensions();
    let (Ok(w), Ok(h)) = (u16::try_from(width), u16::try_from(height)) else {
        return Err(ConvertError::DimensionsTooLarge { width, height });
    };

    // Fully encoded before the destination is touched
    let encoded = encode(w, h, rgba.as_raw())?;
    debug!("Encoded {} bytes", encoded.len());

    write_output(output, &encoded)?;
    Ok(())
}

pub fn convert_xyz_to_png(input: &Path, output: &Path) -> Result<(), ConvertError> {
    info!("Converting {} -> {}", input.display(), output.display());

    let bytes = fs::read(input)?;
    let xyz = decode(&bytes)?;
    let rgba = xyz.to_rgba()?;

    let (width, height) = (u32::from(xyz.width), u32::from(xyz.height));
    let buffer = RgbaImage::from_raw(width, height, rgba)
        .ok_or(ConvertError::BufferMismatch { width, height })?;

    encode_image(&buffer, output)
}

/// Creates missing parent directories, then writes `data` in one call.
pub fn write_output(path: &Path, data: &[u8]) -> io::Result<()> {
    create_parent_dirs(path)?;
    fs::write(path, data)
}

fn create_parent_dirs(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}
