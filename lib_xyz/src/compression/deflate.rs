use std::io::{self, Write};

use flate2::write::ZlibEncoder;
use flate2::{Compression, Decompress, FlushDecompress, Status};

const INFLATE_CHUNK: usize = 16 * 1024;

/// Compresses `data` into a single zlib stream at the default level.
pub fn deflate(data: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

/// Inflates a complete zlib stream.
///
/// Corrupt input is `InvalidData`; a stream that runs out before its end marker
/// is `UnexpectedEof`. Bytes after the end marker are ignored.
pub fn inflate(data: &[u8]) -> io::Result<Vec<u8>> {
    inflate_bounded(data, usize::MAX)
}

/// Inflates at most `limit` bytes of a zlib stream.
///
/// Stops as soon as `limit` bytes are out; the rest of the stream is never
/// decompressed, so memory stays within `limit` plus one chunk. A stream that
/// ends or breaks before `limit` fails the same way as [`inflate`].
pub fn inflate_bounded(data: &[u8], limit: usize) -> io::Result<Vec<u8>> {
    let mut decompress = Decompress::new(true);
    let mut out = Vec::with_capacity(INFLATE_CHUNK.min(limit));

    loop {
        if out.len() >= limit {
            out.truncate(limit);
            return Ok(out);
        }
        if out.len() == out.capacity() {
            out.reserve_exact(INFLATE_CHUNK.min(limit - out.len()));
        }

        let before_in = decompress.total_in();
        let before_out = decompress.total_out();
        let status = decompress
            .decompress_vec(&data[before_in as usize..], &mut out, FlushDecompress::None)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        if status == Status::StreamEnd {
            return Ok(out);
        }

        // Room left in `out` and nothing moved: input ran dry mid-stream.
        if decompress.total_in() == before_in && decompress.total_out() == before_out {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "zlib stream ended before its end marker",
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deflate_empty() {
        let compressed = deflate(&[]).unwrap();
        assert!(!compressed.is_empty());
        assert!(inflate(&compressed).unwrap().is_empty());
    }

    #[test]
    fn test_deflate_repeated_bytes_shrink() {
        let data = vec![7u8; 4096];
        let compressed = deflate(&data).unwrap();
        assert!(compressed.len() < data.len() / 10);
        assert_eq!(inflate(&compressed).unwrap(), data);
    }

    #[test]
    fn test_inflate_garbage() {
        assert!(inflate(b"definitely not zlib").is_err());
    }

    #[test]
    fn test_inflate_truncated_stream() {
        let data: Vec<u8> = (0..=255).cycle().take(2000).collect();
        let compressed = deflate(&data).unwrap();
        let truncated = &compressed[..compressed.len() / 2];
        assert!(inflate(truncated).is_err());
    }

    #[test]
    fn test_inflate_empty_input() {
        let err = inflate(&[]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_inflate_bounded_stops_at_limit() {
        let data = vec![0u8; 8 * 1024 * 1024];
        let compressed = deflate(&data).unwrap();

        let out = inflate_bounded(&compressed, 1000).unwrap();
        assert_eq!(out.len(), 1000);
        assert!(out.capacity() <= 1000 + INFLATE_CHUNK);
    }

    #[test]
    fn test_inflate_bounded_short_stream() {
        let compressed = deflate(&[5u8; 10]).unwrap();
        assert_eq!(inflate_bounded(&compressed, 1000).unwrap(), vec![5u8; 10]);
    }

    #[test]
    fn test_inflate_large_output() {
        let data: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
        let compressed = deflate(&data).unwrap();
        assert_eq!(inflate(&compressed).unwrap(), data);
    }
}
