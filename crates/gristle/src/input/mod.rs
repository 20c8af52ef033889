//! Input handling: records and the multi-file stream that yields them.

mod record;
mod splitter;
mod stream;

pub use record::Record;
pub use stream::{InputSource, InputStream};
