pub const FILE_EXT: &str = "xyz";
pub const PNG_EXT: &str = "png";

pub const MAGIC_HEADER: [u8; 4] = *b"XYZ1";

/// Number of palette entries stored on the wire, used or not.
pub const PALETTE_ENTRIES: usize = 256;
/// Bytes per palette entry (R, G, B).
pub const PALETTE_ENTRY_SIZE: usize = 3;
pub const PALETTE_BYTES: usize = PALETTE_ENTRIES * PALETTE_ENTRY_SIZE;

pub const PNG_TO_XYZ_OUTPUT: &str = "PNG2XYZ_Output";
pub const XYZ_TO_PNG_OUTPUT: &str = "XYZ2PNG_Output";

/// How many error lines a batch summary prints before collapsing the rest.
pub const SUMMARY_ERROR_LIMIT: usize = 5;
