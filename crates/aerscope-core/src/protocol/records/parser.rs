use super::layout;
use super::reader::RecordReader;

/// One decoded cell-activation event.
///
/// `row` and `col` are raw wire bytes (0-255); the addressable matrix is
/// 32x32, so consumers range-check before indexing. The decoder itself is
/// agnostic of grid size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventRecord {
    /// Record without a timestamp (rec_type 1).
    WithoutTimestamp { row: u8, col: u8, active: bool },
    /// Record carrying the emitter's cycle counter (rec_type 2).
    WithTicks {
        row: u8,
        col: u8,
        active: bool,
        ticks: u32,
    },
}

impl EventRecord {
    /// `(row, col)` regardless of variant.
    pub fn cell(&self) -> (u8, u8) {
        match *self {
            EventRecord::WithoutTimestamp { row, col, .. } => (row, col),
            EventRecord::WithTicks { row, col, .. } => (row, col),
        }
    }

    /// Tick counter, when the record carries one.
    pub fn ticks(&self) -> Option<u32> {
        match *self {
            EventRecord::WithoutTimestamp { .. } => None,
            EventRecord::WithTicks { ticks, .. } => Some(ticks),
        }
    }
}

/// Why decoding stopped before the end of the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordHalt {
    /// A tag with unknown record length; scanning on would desynchronize
    /// record boundaries, so the rest of the payload is abandoned.
    UnknownRecordType { rec_type: u8, offset: usize },
    /// The trailing record's declared length exceeds the remaining bytes.
    /// The producer may have been cut by its own frame boundary; this is
    /// "no more complete records", not an error.
    TruncatedRecord { rec_type: u8, offset: usize },
}

/// Result of decoding one EVENT_BIN payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedRecords {
    /// Active (ON) records, in payload order.
    pub records: Vec<EventRecord>,
    /// Complete records consumed with the active flag clear.
    pub off_records: u64,
    /// Set when decoding stopped before the payload end.
    pub halt: Option<RecordHalt>,
}

impl DecodedRecords {
    /// Complete records consumed, ON and OFF.
    pub fn records_total(&self) -> u64 {
        self.records.len() as u64 + self.off_records
    }
}

/// Decode one payload into its ON event records.
///
/// The sequence is finite and self-contained: one call decodes one payload
/// once, with no state carried across payloads.
///
/// # Examples
/// ```
/// use aerscope_core::{EventRecord, decode_event_records};
///
/// let decoded = decode_event_records(&[0x01, 0x01, 0x02, 0x03]);
/// assert_eq!(
///     decoded.records,
///     [EventRecord::WithoutTimestamp { row: 2, col: 3, active: true }]
/// );
/// assert!(decoded.halt.is_none());
/// ```
pub fn decode_event_records(payload: &[u8]) -> DecodedRecords {
    let mut records = Vec::new();
    let mut off_records = 0u64;
    let mut halt = None;
    let mut cursor = 0usize;

    while cursor < payload.len() {
        let rec_type = payload[cursor];
        let rec_len = match rec_type {
            layout::REC_WITHOUT_TIMESTAMP => layout::REC_WITHOUT_TIMESTAMP_LEN,
            layout::REC_WITH_TICKS => layout::REC_WITH_TICKS_LEN,
            rec_type => {
                halt = Some(RecordHalt::UnknownRecordType {
                    rec_type,
                    offset: cursor,
                });
                break;
            }
        };
        if cursor + rec_len > payload.len() {
            halt = Some(RecordHalt::TruncatedRecord {
                rec_type,
                offset: cursor,
            });
            break;
        }

        let reader = RecordReader::new(&payload[cursor..cursor + rec_len]);
        if reader.is_active() {
            let record = match rec_type {
                layout::REC_WITHOUT_TIMESTAMP => EventRecord::WithoutTimestamp {
                    row: reader.row(),
                    col: reader.col(),
                    active: true,
                },
                _ => EventRecord::WithTicks {
                    row: reader.row(),
                    col: reader.col(),
                    active: true,
                    ticks: reader.ticks(),
                },
            };
            records.push(record);
        } else {
            off_records += 1;
        }
        cursor += rec_len;
    }

    DecodedRecords {
        records,
        off_records,
        halt,
    }
}

#[cfg(test)]
mod tests {
    use super::{EventRecord, RecordHalt, decode_event_records};

    #[test]
    fn decodes_record_without_timestamp() {
        let decoded = decode_event_records(&[0x01, 0x01, 0x02, 0x03]);
        assert_eq!(
            decoded.records,
            [EventRecord::WithoutTimestamp {
                row: 2,
                col: 3,
                active: true
            }]
        );
        assert_eq!(decoded.off_records, 0);
        assert!(decoded.halt.is_none());
    }

    #[test]
    fn record_with_active_flag_clear_is_consumed_but_not_yielded() {
        let decoded = decode_event_records(&[0x01, 0x00, 0x02, 0x03]);
        assert!(decoded.records.is_empty());
        assert_eq!(decoded.off_records, 1);
        assert!(decoded.halt.is_none());
        assert_eq!(decoded.records_total(), 1);
    }

    #[test]
    fn decodes_record_with_ticks() {
        let decoded = decode_event_records(&[0x02, 0x01, 0x05, 0x06, 0xE8, 0x03, 0x00, 0x00]);
        assert_eq!(
            decoded.records,
            [EventRecord::WithTicks {
                row: 5,
                col: 6,
                active: true,
                ticks: 1000
            }]
        );
    }

    #[test]
    fn unknown_record_type_stops_decoding() {
        let decoded = decode_event_records(&[0x01, 0x01, 0x02, 0x03, 99, 0x01, 0x07, 0x08]);
        assert_eq!(decoded.records.len(), 1);
        assert_eq!(
            decoded.halt,
            Some(RecordHalt::UnknownRecordType {
                rec_type: 99,
                offset: 4
            })
        );
    }

    #[test]
    fn truncated_trailing_record_stops_decoding() {
        let decoded = decode_event_records(&[0x01, 0x01, 0x02, 0x03, 0x02, 0x01, 0x05]);
        assert_eq!(decoded.records.len(), 1);
        assert_eq!(
            decoded.halt,
            Some(RecordHalt::TruncatedRecord {
                rec_type: 0x02,
                offset: 4
            })
        );
    }

    #[test]
    fn mixed_records_decode_in_payload_order() {
        let mut payload = Vec::new();
        payload.extend_from_slice(&[0x02, 0x01, 0x05, 0x06, 0xE8, 0x03, 0x00, 0x00]);
        payload.extend_from_slice(&[0x01, 0x00, 0x09, 0x09]);
        payload.extend_from_slice(&[0x01, 0x01, 0x02, 0x03]);

        let decoded = decode_event_records(&payload);
        assert_eq!(decoded.records.len(), 2);
        assert_eq!(decoded.records[0].ticks(), Some(1000));
        assert_eq!(decoded.records[1].cell(), (2, 3));
        assert_eq!(decoded.off_records, 1);
        assert_eq!(decoded.records_total(), 3);
        assert!(decoded.halt.is_none());
    }

    #[test]
    fn empty_payload_yields_nothing() {
        let decoded = decode_event_records(&[]);
        assert!(decoded.records.is_empty());
        assert!(decoded.halt.is_none());
    }
}
