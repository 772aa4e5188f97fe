//! Aerscope core library for offline AERS capture analysis.
//!
//! This crate implements the decoding pipeline used by the CLI: chunk
//! sources feed a resynchronizing stream framer, whose packets drive the
//! event-record decoder (layout/reader/parser) and the aggregation layer,
//! producing a deterministic report. Parsing is byte-oriented and
//! side-effect free; all I/O is isolated in `source` modules. Wire
//! conventions are captured in layout and reader modules so parsers stay
//! minimal and consistent with the firmware.
//!
//! Invariants:
//! - Report outputs are deterministic and stable across runs.
//! - The framer yields the identical packet sequence for any chunking of
//!   the same byte stream.
//! - Decode anomalies (resyncs, unknown record types, truncated records,
//!   out-of-range coordinates) are aggregated as warnings, never errors.
//!
//! Version française (résumé):
//! Cette crate fournit le cœur d'analyse hors ligne : sources -> trameur ->
//! décodeur d'enregistrements -> rapport déterministe. Les E/S restent dans
//! `source`, les conventions du format binaire dans `layout` et `reader`.
//! Garanties : même séquence de paquets quel que soit le découpage des
//! octets, anomalies agrégées en avertissements, ordre stable du rapport.
//!
//! # Examples
//! ```no_run
//! use std::path::Path;
//!
//! use aerscope_core::analyze_capture_file;
//!
//! let report = analyze_capture_file(Path::new("capture.aers"))?;
//! println!("report version: {}", report.report_version);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};

mod analysis;
mod protocol;
mod source;

pub use analysis::presence::{GRID_COLS, GRID_ROWS, PresenceGrid};
pub use analysis::{AnalysisError, analyze_capture_file, analyze_source};
pub use protocol::frame::{
    FrameBuffer, FrameError, Packet, STREAM_EVENT_BIN, STREAM_LOG_TEXT, STREAM_MARKER,
    STREAM_RAW_BIN, encode_packet, stream_type_name,
};
pub use protocol::records::{
    DecodedRecords, EventRecord, RecordHalt, decode_event_records, encode_event_record,
};
pub use source::{CaptureFileSource, ChunkSource, SourceError};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;
/// Default timestamp used when the caller does not stamp the report.
pub const DEFAULT_GENERATED_AT: &str = "1970-01-01T00:00:00Z";

/// Aggregated analysis report with deterministic ordering.
///
/// # Examples
/// ```
/// use aerscope_core::make_stub_report;
///
/// let report = make_stub_report("capture.aers", 123);
/// assert_eq!(report.report_version, aerscope_core::REPORT_VERSION);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Report schema version (not the wire protocol version).
    pub report_version: u32,
    /// Tool identification metadata.
    pub tool: ToolInfo,
    /// RFC3339 timestamp representing the report generation time.
    pub generated_at: String,

    /// Input capture metadata.
    pub input: InputInfo,

    /// Framing-level capture summary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture_summary: Option<CaptureSummary>,
    /// Event record totals across all EVENT_BIN payloads.
    pub events: EventTotals,
    /// Per-cell summaries, sorted by `(row, col)`.
    pub cells: Vec<CellSummary>,
    /// Decode warnings, sorted by id; empty for a clean stream.
    pub warnings: Vec<StreamWarning>,
}

/// Tool metadata embedded in reports.
///
/// # Examples
/// ```
/// use aerscope_core::ToolInfo;
///
/// let tool = ToolInfo {
///     name: "aerscope".to_string(),
///     version: "0.1.0".to_string(),
/// };
/// assert_eq!(tool.name, "aerscope");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Tool name (e.g., "aerscope").
    pub name: String,
    /// Tool version (semver).
    pub version: String,
}

/// Input capture metadata embedded in reports.
///
/// # Examples
/// ```
/// use aerscope_core::InputInfo;
///
/// let input = InputInfo {
///     path: "capture.aers".to_string(),
///     bytes: 1024,
/// };
/// assert_eq!(input.bytes, 1024);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInfo {
    /// Input path as provided to the analyzer.
    pub path: String,
    /// Input size in bytes.
    pub bytes: u64,
}

/// Framing-level summary for one capture.
///
/// # Examples
/// ```
/// use aerscope_core::{CaptureSummary, PacketTypeCounts};
///
/// let summary = CaptureSummary {
///     packets_total: 10,
///     payload_bytes_total: 80,
///     packets_by_type: PacketTypeCounts::default(),
///     resyncs: 0,
///     discarded_bytes: 0,
///     trailing_bytes: 0,
/// };
/// assert_eq!(summary.packets_total, 10);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureSummary {
    /// Total packets extracted from the capture.
    pub packets_total: u64,
    /// Sum of payload lengths across all packets.
    pub payload_bytes_total: u64,
    /// Packet counts per stream type discriminant.
    pub packets_by_type: PacketTypeCounts,
    /// Number of reads that discarded bytes to regain framing.
    pub resyncs: u64,
    /// Total bytes discarded during resynchronization.
    pub discarded_bytes: u64,
    /// Unconsumed bytes left in the framer at end of capture.
    pub trailing_bytes: u64,
}

/// Packet counts keyed by stream type.
///
/// Types outside the defined discriminants are counted under `other` and
/// otherwise passed through unexamined.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PacketTypeCounts {
    /// LOG_TEXT packets (UTF-8 text payloads).
    pub log_text: u64,
    /// EVENT_BIN packets (binary event records).
    pub event_bin: u64,
    /// RAW_BIN packets (arbitrary binary payloads).
    pub raw_bin: u64,
    /// MARKER packets (small text markers).
    pub marker: u64,
    /// Packets with an unrecognized type discriminant.
    pub other: u64,
}

/// Event record totals across all EVENT_BIN payloads.
///
/// # Examples
/// ```
/// use aerscope_core::EventTotals;
///
/// let events = EventTotals::default();
/// assert_eq!(events.on_events, 0);
/// assert!(events.ticks_first.is_none());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventTotals {
    /// Complete records consumed (ON and OFF).
    pub records_total: u64,
    /// Records with the active flag set.
    pub on_events: u64,
    /// Records consumed with the active flag clear (never yielded).
    pub off_records: u64,
    /// ON events carrying a tick counter.
    pub with_ticks: u64,
    /// ON events without a timestamp.
    pub without_timestamp: u64,
    /// ON events whose coordinates fall outside the 32x32 grid.
    pub out_of_range: u64,
    /// Tick counter of the first tick-stamped ON event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticks_first: Option<u32>,
    /// Tick counter of the last tick-stamped ON event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticks_last: Option<u32>,
}

/// Per-cell activation summary.
///
/// # Examples
/// ```
/// use aerscope_core::CellSummary;
///
/// let cell = CellSummary {
///     row: 2,
///     col: 3,
///     on_events: 1,
///     first_ticks: None,
///     last_ticks: None,
/// };
/// assert_eq!((cell.row, cell.col), (2, 3));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellSummary {
    /// Row index in `[0, 32)`.
    pub row: u8,
    /// Column index in `[0, 32)`.
    pub col: u8,
    /// Number of ON events observed for this cell.
    pub on_events: u64,
    /// Tick counter of the first tick-stamped ON event for this cell.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_ticks: Option<u32>,
    /// Tick counter of the last tick-stamped ON event for this cell.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_ticks: Option<u32>,
}

/// Single aggregated decode warning.
///
/// # Examples
/// ```
/// use aerscope_core::StreamWarning;
///
/// let warning = StreamWarning {
///     id: "AER-RESYNC".to_string(),
///     message: "framing lost; bytes discarded before next magic".to_string(),
///     count: 2,
/// };
/// assert_eq!(warning.count, 2);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamWarning {
    /// Stable warning identifier (e.g., `AER-UNKNOWN-REC-TYPE`).
    pub id: String,
    /// Human-readable message explaining the warning.
    pub message: String,
    /// Number of occurrences aggregated into this warning.
    pub count: u64,
}

/// Build a stub report with base fields filled and empty aggregates.
///
/// # Examples
/// ```
/// use aerscope_core::make_stub_report;
///
/// let report = make_stub_report("capture.aers", 123);
/// assert_eq!(report.report_version, aerscope_core::REPORT_VERSION);
/// assert!(report.cells.is_empty());
/// ```
pub fn make_stub_report(input_path: &str, input_bytes: u64) -> Report {
    Report {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "aerscope".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        generated_at: DEFAULT_GENERATED_AT.to_string(),
        input: InputInfo {
            path: input_path.to_string(),
            bytes: input_bytes,
        },
        capture_summary: None,
        events: EventTotals::default(),
        cells: vec![],
        warnings: vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_omits_optional_fields_when_none() {
        let report = Report {
            report_version: REPORT_VERSION,
            tool: ToolInfo {
                name: "aerscope".to_string(),
                version: "0.1.0".to_string(),
            },
            generated_at: DEFAULT_GENERATED_AT.to_string(),
            input: InputInfo {
                path: "capture.aers".to_string(),
                bytes: 1,
            },
            capture_summary: Some(CaptureSummary {
                packets_total: 1,
                payload_bytes_total: 4,
                packets_by_type: PacketTypeCounts {
                    event_bin: 1,
                    ..PacketTypeCounts::default()
                },
                resyncs: 0,
                discarded_bytes: 0,
                trailing_bytes: 0,
            }),
            events: EventTotals {
                records_total: 1,
                on_events: 1,
                without_timestamp: 1,
                ..EventTotals::default()
            },
            cells: vec![CellSummary {
                row: 2,
                col: 3,
                on_events: 1,
                first_ticks: None,
                last_ticks: None,
            }],
            warnings: vec![],
        };

        let value = serde_json::to_value(&report).expect("report json");
        let events = &value["events"];
        assert!(events.get("ticks_first").is_none());
        assert!(events.get("ticks_last").is_none());

        let cell = &value["cells"][0];
        assert!(cell.get("first_ticks").is_none());
        assert!(cell.get("last_ticks").is_none());
    }

    #[test]
    fn stub_report_has_empty_aggregates() {
        let report = make_stub_report("capture.aers", 7);
        assert!(report.capture_summary.is_none());
        assert_eq!(report.events.records_total, 0);
        assert!(report.cells.is_empty());
        assert!(report.warnings.is_empty());
        assert_eq!(report.generated_at, DEFAULT_GENERATED_AT);
    }
}
