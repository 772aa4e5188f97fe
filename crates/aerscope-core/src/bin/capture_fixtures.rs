use std::fs;
use std::path::{Path, PathBuf};

use aerscope_core::{
    EventRecord, STREAM_EVENT_BIN, STREAM_LOG_TEXT, STREAM_MARKER, encode_event_record,
    encode_packet,
};

const PROTOCOL_VERSION: u8 = 1;

fn main() -> Result<(), String> {
    let root = PathBuf::from("captures");
    write_capture(&root.join("clean.aers"), clean_stream()?)?;
    write_capture(&root.join("noisy.aers"), noisy_stream()?)?;
    write_capture(&root.join("mixed.aers"), mixed_stream()?)?;
    Ok(())
}

/// A diagonal sweep of tick-stamped ON events, one record per packet, the
/// way the firmware emits them.
fn clean_stream() -> Result<Vec<u8>, String> {
    let mut stream = Vec::new();
    for n in 0..32u8 {
        let record = EventRecord::WithTicks {
            row: n,
            col: n,
            active: true,
            ticks: 1_000 * (n as u32 + 1),
        };
        stream.extend_from_slice(&event_packet(&[record])?);
    }
    Ok(stream)
}

/// Valid packets separated by transport noise; exercises resynchronization.
fn noisy_stream() -> Result<Vec<u8>, String> {
    let mut stream = Vec::new();
    stream.extend_from_slice(b"\x00\xFF\x13\x37 line noise");
    stream.extend_from_slice(&event_packet(&[EventRecord::WithoutTimestamp {
        row: 2,
        col: 3,
        active: true,
    }])?);
    stream.extend_from_slice(b"AE\x00partial magic");
    stream.extend_from_slice(&event_packet(&[EventRecord::WithTicks {
        row: 30,
        col: 1,
        active: true,
        ticks: 42_000,
    }])?);
    Ok(stream)
}

/// All stream types plus an OFF record and an unknown record tag.
fn mixed_stream() -> Result<Vec<u8>, String> {
    let mut stream = Vec::new();
    stream.extend_from_slice(&packet(STREAM_MARKER, b"boot")?);
    stream.extend_from_slice(&packet(STREAM_LOG_TEXT, b"sensor ready")?);
    stream.extend_from_slice(&event_packet(&[
        EventRecord::WithTicks {
            row: 5,
            col: 6,
            active: true,
            ticks: 1_000,
        },
        EventRecord::WithoutTimestamp {
            row: 7,
            col: 7,
            active: false,
        },
        EventRecord::WithoutTimestamp {
            row: 2,
            col: 3,
            active: true,
        },
    ])?);

    let mut tail = encode_event_record(&EventRecord::WithoutTimestamp {
        row: 9,
        col: 9,
        active: true,
    });
    tail.extend_from_slice(&[99, 0x01, 0x00, 0x00]); // unknown tag truncates here
    stream.extend_from_slice(&packet(STREAM_EVENT_BIN, &tail)?);
    Ok(stream)
}

fn event_packet(records: &[EventRecord]) -> Result<Vec<u8>, String> {
    let mut payload = Vec::new();
    for record in records {
        payload.extend_from_slice(&encode_event_record(record));
    }
    packet(STREAM_EVENT_BIN, &payload)
}

fn packet(stream_type: u8, payload: &[u8]) -> Result<Vec<u8>, String> {
    encode_packet(PROTOCOL_VERSION, stream_type, payload)
        .map_err(|err| format!("encode failed: {}", err))
}

fn write_capture(path: &Path, bytes: Vec<u8>) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|err| format!("failed to create {}: {}", parent.display(), err))?;
    }
    fs::write(path, bytes).map_err(|err| format!("failed to write {}: {}", path.display(), err))?;
    println!("wrote {}", path.display());
    Ok(())
}
