//! Event record decoding for EVENT_BIN payloads.
//!
//! A payload is a run of fixed-format records, each tagged by a leading
//! type byte. Decoding stops at the first unrecognized tag (its length is
//! unknown, so scanning on would desynchronize record boundaries) and at a
//! truncated trailing record; both halts are reported alongside the records
//! decoded so far, as partial success rather than an error.
//!
//! Records with the active flag clear are consumed from the stream but not
//! yielded; they carry no defined consumer behavior.

pub mod encoder;
pub mod layout;
pub mod parser;
pub mod reader;

pub use encoder::encode_event_record;
pub use parser::{DecodedRecords, EventRecord, RecordHalt, decode_event_records};
