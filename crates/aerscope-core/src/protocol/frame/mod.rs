//! AERS stream framing.
//!
//! The framer turns an unbounded, incrementally-arriving byte stream into a
//! sequence of complete packets. It scans for the 4-byte magic on every
//! call, so a corrupted or truncated header never wedges the stream: bytes
//! preceding the next magic are discarded silently and counted, and at most
//! 3 trailing bytes are retained when no magic is present (enough to catch
//! a magic sequence split across two reads).
//!
//! A header-declared length is consumed on faith; there is no checksum in
//! the wire format, so a corrupted in-range length desynchronizes the
//! stream until the byte sequence contains the magic again.
//!
//! Version française (résumé):
//! Le trameur recherche le magique à chaque appel et rejette en silence les
//! octets qui le précèdent (resynchronisation comptée). Au plus 3 octets
//! sont conservés quand le magique est absent. La longueur d'en-tête est
//! consommée sans validation, faute de somme de contrôle dans le format.

pub mod encoder;
pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use encoder::encode_packet;
pub use error::FrameError;
pub use layout::{
    STREAM_EVENT_BIN, STREAM_LOG_TEXT, STREAM_MARKER, STREAM_RAW_BIN, stream_type_name,
};
pub use parser::{FrameBuffer, Packet};
