pub mod batch;
pub mod codec;
pub mod compression;
pub mod constants;
pub mod convert;

use log::*;
use std::io::Write;

pub use crate::batch::{convert_files, convert_folder, BatchReport, Progress};
pub use crate::convert::{convert_file, ConvertError, Direction, ErrorKind, FileOutcome};
pub use crate::codec::format::XyzImage;
pub use crate::codec::{decode, encode};

/// Routes `log` output from the codec and the CLI to stderr.
pub fn init_logging(level: LevelFilter) {
    env_logger::Builder::new()
        .target(env_logger::Target::Stderr)
        .filter(Some("lib_xyz"), level)
        .filter(Some("xyz_convert"), level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}:{}] {}",
                record.level(),
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .init();
}
