mod capture;

pub use capture::CaptureFileSource;

use thiserror::Error;

/// Byte-stream input for the analysis pipeline.
///
/// `Ok(None)` is end of capture. Chunk boundaries are arbitrary; the framer
/// produces the same packet sequence regardless of how the stream is cut.
pub trait ChunkSource {
    fn next_chunk(&mut self) -> Result<Option<Vec<u8>>, SourceError>;
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
