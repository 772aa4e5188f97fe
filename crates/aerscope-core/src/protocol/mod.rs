//! Wire decoding modules.
//!
//! Each layer follows the same structure:
//! - `layout`: byte offsets, ranges, and discriminants (source of truth)
//! - `reader`: safe byte access and wire conventions
//! - `parser`: domain-level decoding (no scattered byte indexing)
//! - `error`: explicit, actionable errors
//!
//! Parsers are pure and contain no I/O; sources and analysis layers handle
//! file access and aggregation. The framer is the only stateful piece, and
//! its state is exactly the unconsumed byte buffer plus resync counters.

pub mod frame;
pub mod records;
