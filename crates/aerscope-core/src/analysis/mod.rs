use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;

use crate::protocol::frame::{FrameBuffer, layout};
use crate::protocol::records::{RecordHalt, decode_event_records};
use crate::source::{CaptureFileSource, ChunkSource, SourceError};
use crate::{CaptureSummary, EventTotals, PacketTypeCounts, Report, make_stub_report};

mod cells;
pub mod presence;

use cells::{CellStats, WarningCounts, add_on_event, build_cell_summaries, build_warnings};
use presence::{GRID_COLS, GRID_ROWS};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}

/// Analyze one capture file into a deterministic report.
pub fn analyze_capture_file(path: &Path) -> Result<Report, AnalysisError> {
    let source = CaptureFileSource::open(path)?;
    analyze_source(path, source)
}

/// Analyze an arbitrary chunk source. `path` is used for report metadata
/// only; the bytes come from `source`.
pub fn analyze_source<S: ChunkSource>(
    path: &Path,
    mut source: S,
) -> Result<Report, AnalysisError> {
    let mut framer = FrameBuffer::new();
    let mut packets_total = 0u64;
    let mut payload_bytes_total = 0u64;
    let mut type_counts = PacketTypeCounts::default();
    let mut events = EventTotals::default();
    let mut cell_stats: HashMap<(u8, u8), CellStats> = HashMap::new();
    let mut warning_counts = WarningCounts::default();

    while let Some(chunk) = source.next_chunk()? {
        framer.feed(&chunk);
        while let Some(packet) = framer.try_read_packet() {
            packets_total += 1;
            payload_bytes_total += packet.payload.len() as u64;
            count_stream_type(&mut type_counts, packet.stream_type);
            if packet.stream_type == layout::STREAM_EVENT_BIN {
                ingest_event_payload(
                    &packet.payload,
                    &mut events,
                    &mut cell_stats,
                    &mut warning_counts,
                );
            }
        }
    }

    warning_counts.resyncs = framer.resyncs();

    let mut report = make_stub_report(&path.display().to_string(), path.metadata()?.len());
    report.capture_summary = Some(CaptureSummary {
        packets_total,
        payload_bytes_total,
        packets_by_type: type_counts,
        resyncs: framer.resyncs(),
        discarded_bytes: framer.discarded_bytes(),
        trailing_bytes: framer.buffered_len() as u64,
    });
    report.events = events;
    report.cells = build_cell_summaries(cell_stats);
    report.warnings = build_warnings(&warning_counts);
    Ok(report)
}

fn count_stream_type(counts: &mut PacketTypeCounts, stream_type: u8) {
    match stream_type {
        layout::STREAM_LOG_TEXT => counts.log_text += 1,
        layout::STREAM_EVENT_BIN => counts.event_bin += 1,
        layout::STREAM_RAW_BIN => counts.raw_bin += 1,
        layout::STREAM_MARKER => counts.marker += 1,
        _ => counts.other += 1,
    }
}

fn ingest_event_payload(
    payload: &[u8],
    totals: &mut EventTotals,
    cell_stats: &mut HashMap<(u8, u8), CellStats>,
    warnings: &mut WarningCounts,
) {
    let decoded = decode_event_records(payload);
    totals.records_total += decoded.records_total();
    totals.off_records += decoded.off_records;
    totals.on_events += decoded.records.len() as u64;

    for record in &decoded.records {
        let (row, col) = record.cell();
        match record.ticks() {
            Some(ticks) => {
                totals.with_ticks += 1;
                if totals.ticks_first.is_none() {
                    totals.ticks_first = Some(ticks);
                }
                totals.ticks_last = Some(ticks);
            }
            None => totals.without_timestamp += 1,
        }
        if (row as usize) < GRID_ROWS && (col as usize) < GRID_COLS {
            add_on_event(cell_stats, row, col, record.ticks());
        } else {
            totals.out_of_range += 1;
            warnings.out_of_range += 1;
        }
    }

    match decoded.halt {
        Some(RecordHalt::UnknownRecordType { .. }) => warnings.unknown_record_type += 1,
        Some(RecordHalt::TruncatedRecord { .. }) => warnings.truncated_records += 1,
        None => {}
    }
}
