use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use super::{ChunkSource, SourceError};

const READ_CHUNK_SIZE: usize = 4096;

/// Capture file source: a raw dump of the serial byte stream, read in
/// fixed-size chunks.
///
/// The file carries no container format of its own; framing is recovered
/// from the stream itself, so a capture truncated mid-packet is still
/// readable up to its last complete packet.
pub struct CaptureFileSource {
    file: File,
}

impl CaptureFileSource {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path)?;
        Ok(Self { file })
    }
}

impl ChunkSource for CaptureFileSource {
    fn next_chunk(&mut self) -> Result<Option<Vec<u8>>, SourceError> {
        let mut chunk = vec![0u8; READ_CHUNK_SIZE];
        loop {
            match self.file.read(&mut chunk) {
                Ok(0) => return Ok(None),
                Ok(read) => {
                    chunk.truncate(read);
                    return Ok(Some(chunk));
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(SourceError::Io(err)),
            }
        }
    }
}
