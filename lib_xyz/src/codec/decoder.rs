use log::{debug, error, info};
use thiserror::Error;

use super::format::{Header, XyzImage};
use crate::compression::{decompress, DecompressionError};
use crate::constants::MAGIC_HEADER;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Unsupported file format: {}", escape_bytes(.0))]
    UnsupportedFormat(Vec<u8>),
    #[error("Truncated header: expected 8 bytes, found {0}")]
    TruncatedHeader(usize),
    #[error("Failed to parse header: {0}")]
    HeaderParsingFailed(#[from] bincode::Error),
    #[error("Decompression failed: {0}")]
    DecompressionFailed(#[from] DecompressionError),
}

fn escape_bytes(bytes: &[u8]) -> String {
    let escaped: String = bytes
        .iter()
        .flat_map(|&b| std::ascii::escape_default(b))
        .map(char::from)
        .collect();
    format!("b\"{escaped}\"")
}

pub fn decode(encoded_data: &[u8]) -> Result<XyzImage, DecodeError> {
    // Check the magic number before anything else
    let magic_len = encoded_data.len().min(Header::MAGIC_SIZE);
    if encoded_data[..magic_len] != MAGIC_HEADER {
        error!("Invalid magic number: {:?}", &encoded_data[..magic_len]);
        return Err(DecodeError::UnsupportedFormat(
            encoded_data[..magic_len].to_vec(),
        ));
    }
    debug!("Magic number validated successfully");

    if encoded_data.len() < Header::SIZE {
        error!("Header cut short at {} bytes", encoded_data.len());
        return Err(DecodeError::TruncatedHeader(encoded_data.len()));
    }
    let header: Header = bincode::deserialize(&encoded_data[..Header::SIZE])?;
    debug!(
        "Image dimensions read: width={} height={}",
        header.width, header.height
    );

    // The remaining data is the compressed palette + index block
    let block = &encoded_data[Header::SIZE..];
    debug!("Compressed data length: {}", block.len());

    let pixel_count = header.width as usize * header.height as usize;
    let payload = decompress(block, pixel_count)?;
    info!("Decompression successful");

    Ok(XyzImage::new(
        header.width,
        header.height,
        payload.palette,
        payload.indices,
    ))
}
