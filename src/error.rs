use std::io;
use std::path::PathBuf;

use rustc_serialize::json::EncoderError;
use thiserror::Error;

pub type Result<T> = ::std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),

    /// The posts file exists but does not hold a JSON array of posts.
    #[error("storage file {} is corrupt: {message}", path.display())]
    StorageCorrupt { path: PathBuf, message: String },

    #[error("could not encode posts: {0}")]
    Encode(#[from] EncoderError),

    #[error("no post with id {0}")]
    NotFound(u64),

    /// A required field was missing or blank.
    #[error("field `{0}` is required")]
    Validation(&'static str),
}
