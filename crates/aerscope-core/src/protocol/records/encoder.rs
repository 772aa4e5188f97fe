use super::layout;
use super::parser::EventRecord;

/// Encode one event record into its wire bytes.
///
/// Mirrors the firmware's record emission; used for fixture generation and
/// round-trip tests. Inactive records encode with the active flag clear
/// (the decoder consumes them without yielding).
pub fn encode_event_record(record: &EventRecord) -> Vec<u8> {
    match *record {
        EventRecord::WithoutTimestamp { row, col, active } => {
            vec![
                layout::REC_WITHOUT_TIMESTAMP,
                if active { layout::FLAG_ACTIVE } else { 0 },
                row,
                col,
            ]
        }
        EventRecord::WithTicks {
            row,
            col,
            active,
            ticks,
        } => {
            let mut bytes = vec![
                layout::REC_WITH_TICKS,
                if active { layout::FLAG_ACTIVE } else { 0 },
                row,
                col,
            ];
            bytes.extend_from_slice(&ticks.to_le_bytes());
            bytes
        }
    }
}

#[cfg(test)]
mod tests {
    use super::encode_event_record;
    use crate::protocol::records::parser::{EventRecord, decode_event_records};

    #[test]
    fn active_records_round_trip() {
        let records = [
            EventRecord::WithoutTimestamp {
                row: 2,
                col: 3,
                active: true,
            },
            EventRecord::WithTicks {
                row: 31,
                col: 0,
                active: true,
                ticks: 0xDEAD_BEEF,
            },
        ];

        let mut payload = Vec::new();
        for record in &records {
            payload.extend_from_slice(&encode_event_record(record));
        }

        let decoded = decode_event_records(&payload);
        assert_eq!(decoded.records, records);
        assert!(decoded.halt.is_none());
    }

    #[test]
    fn inactive_record_encodes_with_flag_clear() {
        let bytes = encode_event_record(&EventRecord::WithoutTimestamp {
            row: 1,
            col: 2,
            active: false,
        });
        assert_eq!(bytes, [0x01, 0x00, 0x01, 0x02]);
    }
}
