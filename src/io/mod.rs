//! Composable byte-level I/O used by the container parser.

mod dynamic_buf_reader;
mod read;

pub use dynamic_buf_reader::DynamicBufReader;
pub use read::ReadBuffer;
