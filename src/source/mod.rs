mod chunk;

pub use chunk::{CHUNK_SIZE, Chunk, ChunkSource, chunk_count};

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("cannot stat {}: {source}", path.display())]
    Stat {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{} is a directory", .0.display())]
    NotAFile(PathBuf),
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("read failed at offset {offset:#X}: {source}")]
    Read {
        offset: u64,
        source: std::io::Error,
    },
}
