use super::layout;
use super::reader::HeaderReader;

/// One framed unit: an 8-byte header followed by a variable-length payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// Protocol version tag, passed through unexamined.
    pub version: u8,
    /// Stream type discriminant (see `layout::STREAM_*`).
    pub stream_type: u8,
    /// Exactly the header-declared number of payload bytes.
    pub payload: Vec<u8>,
}

/// Resynchronizing stream framer.
///
/// Feed raw transport bytes with [`FrameBuffer::feed`] and drain complete
/// packets with [`FrameBuffer::try_read_packet`]; `None` means more data is
/// needed. The framer never blocks, never fails, and never returns a packet
/// it cannot fill completely. Bytes preceding a magic match are discarded
/// silently; the discard is observable through [`FrameBuffer::resyncs`] and
/// [`FrameBuffer::discarded_bytes`] without affecting decode results.
///
/// # Examples
/// ```
/// use aerscope_core::FrameBuffer;
///
/// let mut framer = FrameBuffer::new();
/// framer.feed(b"AERS\x01\x02\x04\x00\x01\x01\x02\x03");
/// let packet = framer.try_read_packet().expect("complete packet");
/// assert_eq!(packet.version, 1);
/// assert_eq!(packet.stream_type, 2);
/// assert_eq!(packet.payload, [0x01, 0x01, 0x02, 0x03]);
/// assert!(framer.try_read_packet().is_none());
/// ```
#[derive(Debug, Default)]
pub struct FrameBuffer {
    buf: Vec<u8>,
    resyncs: u64,
    discarded_bytes: u64,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append newly-received transport bytes. An empty slice is a no-op.
    pub fn feed(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Extract the next complete packet, or `None` if more data is needed.
    ///
    /// Scans for the magic from the start of the buffer on every call, so
    /// framing recovers after lost, duplicated, or corrupted bytes. When no
    /// magic is present, at most [`layout::MAGIC_SCAN_RETAIN`] trailing
    /// bytes are kept so a magic split across reads still matches.
    pub fn try_read_packet(&mut self) -> Option<Packet> {
        let start = match find_magic(&self.buf) {
            Some(start) => start,
            None => {
                if self.buf.len() > layout::MAGIC_SCAN_RETAIN {
                    let dropped = self.buf.len() - layout::MAGIC_SCAN_RETAIN;
                    self.buf.drain(..dropped);
                    self.resyncs += 1;
                    self.discarded_bytes += dropped as u64;
                }
                return None;
            }
        };

        if start > 0 {
            self.buf.drain(..start);
            self.resyncs += 1;
            self.discarded_bytes += start as u64;
        }

        let header = parse_header(&self.buf)?;
        let total = layout::HEADER_LEN + header.length as usize;
        if self.buf.len() < total {
            return None;
        }

        let payload = self.buf[layout::HEADER_LEN..total].to_vec();
        self.buf.drain(..total);
        Some(Packet {
            version: header.version,
            stream_type: header.stream_type,
            payload,
        })
    }

    /// Bytes currently buffered (unconsumed tail plus any in-flight header).
    pub fn buffered_len(&self) -> usize {
        self.buf.len()
    }

    /// Number of calls that discarded bytes to regain framing.
    pub fn resyncs(&self) -> u64 {
        self.resyncs
    }

    /// Total bytes discarded during resynchronization.
    pub fn discarded_bytes(&self) -> u64 {
        self.discarded_bytes
    }
}

struct PacketHeader {
    version: u8,
    stream_type: u8,
    length: u16,
}

/// Parse the fixed header at the start of `buf`; `None` while incomplete.
/// The caller guarantees `buf` starts with the magic.
fn parse_header(buf: &[u8]) -> Option<PacketHeader> {
    let reader = HeaderReader::new(buf);
    debug_assert!(reader.starts_with_magic());
    let version = reader.read_u8(layout::VERSION_OFFSET)?;
    let stream_type = reader.read_u8(layout::TYPE_OFFSET)?;
    let length = reader.read_u16_le(layout::LENGTH_RANGE)?;
    Some(PacketHeader {
        version,
        stream_type,
        length,
    })
}

fn find_magic(buf: &[u8]) -> Option<usize> {
    buf.windows(layout::MAGIC.len())
        .position(|window| window == layout::MAGIC)
}
