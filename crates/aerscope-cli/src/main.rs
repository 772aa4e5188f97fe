use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use glob::glob;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use aerscope_core::{
    CaptureFileSource, ChunkSource, EventRecord, FrameBuffer, GRID_COLS, GRID_ROWS, Packet,
    PresenceGrid, Report, STREAM_EVENT_BIN, STREAM_LOG_TEXT, STREAM_MARKER, decode_event_records,
};

#[derive(Parser, Debug)]
#[command(name = "aerscope")]
#[command(version)]
#[command(
    about = "Offline-first analyzer for AERS sensor stream captures (32x32 AER matrix).",
    long_about = None,
    after_help = "Examples:\n  aerscope capture analyse capture.aers -o report.json\n  aerscope capture analyze capture.aers --stdout --pretty\n  aerscope capture events capture.aers --show-ticks\n  aerscope capture grid capture.aers --decay-ticks 200000"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Operations on AERS capture files (offline-first).
    Capture {
        #[command(subcommand)]
        command: CaptureCommands,
    },
}

#[derive(Subcommand, Debug)]
enum CaptureCommands {
    /// Analyse a capture file and generate a versioned JSON report.
    #[command(alias = "analyze")]
    #[command(
        after_help = "Examples:\n  aerscope capture analyse capture.aers -o report.json\n  aerscope capture analyze capture.aers --stdout --compact"
    )]
    Analyse {
        /// Path to a .aers capture file
        input: PathBuf,

        /// Output report path (JSON)
        #[arg(short = 'o', long, required_unless_present = "stdout")]
        report: Option<PathBuf>,

        /// Write JSON report to stdout
        #[arg(long, conflicts_with = "report")]
        stdout: bool,

        /// Pretty-print JSON output
        #[arg(long, conflicts_with = "compact")]
        pretty: bool,

        /// Compact JSON output (default)
        #[arg(long)]
        compact: bool,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,

        /// Exit with a non-zero code if decode warnings are present
        #[arg(long)]
        strict: bool,

        /// List decode warnings after analysis
        #[arg(long)]
        list_warnings: bool,
    },

    /// Print decoded ON events, one line per event.
    Events {
        /// Path to a .aers capture file
        input: PathBuf,

        /// Print tick counter timestamps when present
        #[arg(long)]
        show_ticks: bool,

        /// Print non-event packets (logs/markers) too
        #[arg(long)]
        show_non_events: bool,
    },

    /// Render the capture's final presence state as an ASCII grid.
    Grid {
        /// Path to a .aers capture file
        input: PathBuf,

        /// Fade-out window in device ticks (0 = pixels persist)
        #[arg(long, default_value_t = 0)]
        decay_ticks: u32,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Capture { command } => match command {
            CaptureCommands::Analyse {
                input,
                report,
                stdout,
                pretty,
                compact,
                quiet,
                strict,
                list_warnings,
            } => cmd_capture_analyse(
                input,
                report,
                stdout,
                pretty,
                compact,
                quiet,
                strict,
                list_warnings,
            ),
            CaptureCommands::Events {
                input,
                show_ticks,
                show_non_events,
            } => cmd_capture_events(input, show_ticks, show_non_events),
            CaptureCommands::Grid { input, decay_ticks } => cmd_capture_grid(input, decay_ticks),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(err.to_string(), None)
    }
}

fn cmd_capture_analyse(
    input: PathBuf,
    report: Option<PathBuf>,
    stdout: bool,
    pretty: bool,
    compact: bool,
    quiet: bool,
    strict: bool,
    list_warnings: bool,
) -> Result<(), CliError> {
    let resolved_input = resolve_input_path(&input)?;
    validate_input_file(&resolved_input)?;
    let input_abs = fs::canonicalize(&resolved_input)
        .with_context(|| format!("Failed to resolve input path: {}", resolved_input.display()))?;
    let report = if stdout {
        None
    } else {
        Some(report.ok_or_else(|| {
            CliError::new(
                "missing output path",
                Some("use -o/--report or --stdout".to_string()),
            )
        })?)
    };

    if let Some(report_path) = report.as_ref() {
        let report_abs = report_path
            .parent()
            .map(|parent| {
                if parent.as_os_str().is_empty() {
                    fs::canonicalize(".")
                } else {
                    fs::canonicalize(parent)
                }
            })
            .transpose()
            .with_context(|| format!("Failed to resolve output path: {}", report_path.display()))?;
        if let Some(report_dir) = report_abs {
            let report_target = report_dir.join(
                report_path
                    .file_name()
                    .ok_or_else(|| anyhow::anyhow!("Invalid report path"))?,
            );
            if report_target == input_abs {
                return Err(CliError::new(
                    format!(
                        "report path must differ from input: {}",
                        report_path.display()
                    ),
                    Some("choose a different output path".to_string()),
                ));
            }
        }
    }

    let mut rep = aerscope_core::analyze_capture_file(&resolved_input)
        .context("AERS capture analysis failed")?;
    stamp_generated_at(&mut rep);
    let json = serialize_report(&rep, pretty, compact)?;

    if stdout {
        print!("{}", json);
        if list_warnings && !quiet {
            print_warnings(&rep);
        }
        if strict && !rep.warnings.is_empty() {
            return Err(CliError::new(
                "decode warnings detected",
                Some("use --list-warnings to inspect".to_string()),
            ));
        }
        return Ok(());
    }

    let report = report.expect("report required when not using stdout");
    if let Some(parent) = report.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }

    fs::write(&report, json)
        .with_context(|| format!("Failed to write report: {}", report.display()))?;

    if list_warnings && !quiet {
        print_warnings(&rep);
    }
    if !quiet {
        eprintln!("OK: report written -> {}", report.display());
    }
    if strict && !rep.warnings.is_empty() {
        return Err(CliError::new(
            "decode warnings detected",
            Some("use --list-warnings to inspect".to_string()),
        ));
    }
    Ok(())
}

fn cmd_capture_events(
    input: PathBuf,
    show_ticks: bool,
    show_non_events: bool,
) -> Result<(), CliError> {
    let resolved_input = resolve_input_path(&input)?;
    validate_input_file(&resolved_input)?;

    for_each_packet(&resolved_input, |packet| {
        if packet.stream_type == STREAM_EVENT_BIN {
            let decoded = decode_event_records(&packet.payload);
            for record in &decoded.records {
                match record {
                    EventRecord::WithoutTimestamp { row, col, .. } => {
                        println!("ON  row={:02} col={:02}", row, col);
                    }
                    EventRecord::WithTicks {
                        row, col, ticks, ..
                    } => {
                        if show_ticks {
                            println!("ON  row={:02} col={:02}  ticks={}", row, col, ticks);
                        } else {
                            println!("ON  row={:02} col={:02}", row, col);
                        }
                    }
                }
            }
            if let Some(aerscope_core::RecordHalt::UnknownRecordType { rec_type, .. }) =
                decoded.halt
            {
                eprintln!(
                    "warn: unknown event record type {}; payload_len={}",
                    rec_type,
                    packet.payload.len()
                );
            }
        } else if show_non_events {
            if packet.stream_type == STREAM_LOG_TEXT || packet.stream_type == STREAM_MARKER {
                let text = String::from_utf8_lossy(&packet.payload);
                println!("[type={} ver={}] {}", packet.stream_type, packet.version, text);
            } else {
                println!(
                    "[type={} ver={}] {}",
                    packet.stream_type,
                    packet.version,
                    hex_string(&packet.payload)
                );
            }
        }
    })
}

fn cmd_capture_grid(input: PathBuf, decay_ticks: u32) -> Result<(), CliError> {
    let resolved_input = resolve_input_path(&input)?;
    validate_input_file(&resolved_input)?;

    let mut grid = PresenceGrid::new();
    // Device ticks map 1:1 onto the grid's monotonic axis; untimestamped
    // records reuse the latest tick seen so mixed streams still replay.
    let mut clock = Duration::ZERO;
    for_each_packet(&resolved_input, |packet| {
        if packet.stream_type != STREAM_EVENT_BIN {
            return;
        }
        for record in &decode_event_records(&packet.payload).records {
            let (row, col) = record.cell();
            if let Some(ticks) = record.ticks() {
                clock = Duration::from_micros(ticks as u64);
            }
            grid.record_active(row, col, clock);
        }
    })?;

    let decay = Duration::from_micros(decay_ticks as u64);
    let now = clock;
    let mut lit = 0u32;
    for row in 0..GRID_ROWS {
        let mut line = String::with_capacity(GRID_COLS);
        for col in 0..GRID_COLS {
            let intensity = grid.intensity(row as u8, col as u8, now, decay);
            line.push(intensity_char(intensity));
            if intensity > 0.0 {
                lit += 1;
            }
        }
        println!("{}", line);
    }
    eprintln!("{} cells lit", lit);
    Ok(())
}

fn intensity_char(intensity: f32) -> char {
    if intensity <= 0.0 {
        '.'
    } else if intensity <= 0.25 {
        ':'
    } else if intensity <= 0.5 {
        '+'
    } else if intensity <= 0.75 {
        '*'
    } else {
        '#'
    }
}

fn hex_string(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn for_each_packet(
    input: &Path,
    mut handle: impl FnMut(&Packet),
) -> Result<(), CliError> {
    let mut source = CaptureFileSource::open(input)
        .with_context(|| format!("Failed to open capture: {}", input.display()))?;
    let mut framer = FrameBuffer::new();
    loop {
        let chunk = source
            .next_chunk()
            .with_context(|| format!("Failed to read capture: {}", input.display()))?;
        let chunk = match chunk {
            Some(chunk) => chunk,
            None => break,
        };
        framer.feed(&chunk);
        while let Some(packet) = framer.try_read_packet() {
            handle(&packet);
        }
    }
    Ok(())
}

fn stamp_generated_at(report: &mut Report) {
    if let Ok(now) = OffsetDateTime::now_utc().format(&Rfc3339) {
        report.generated_at = now;
    }
}

fn serialize_report(rep: &Report, pretty: bool, compact: bool) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    if pretty {
        serde_json::to_string_pretty(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn print_warnings(rep: &Report) {
    eprintln!("Decode warnings:");
    for warning in &rep.warnings {
        eprintln!("  {} ({})", warning.id, warning.count);
    }
}

fn validate_input_file(input: &PathBuf) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("use a .aers capture file".to_string()),
        ));
    }
    let meta = fs::metadata(input)
        .with_context(|| format!("Failed to read input file: {}", input.display()))?;
    if !meta.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("use a .aers capture file".to_string()),
        ));
    }
    let ext = input
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if ext != "aers" {
        return Err(CliError::new(
            format!("unsupported input format '{}'", input.display()),
            Some("expected a .aers capture file".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &PathBuf) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.clone());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.is_empty() {
        return Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern; expected a .aers capture".to_string()),
        ));
    }
    if matches.len() > 1 {
        let hint = "pass a single capture file, or run once per file".to_string();
        let mut message = format!(
            "multiple files match pattern '{}' ({} matches)",
            pattern,
            matches.len()
        );
        let listed = matches.iter().take(3).collect::<Vec<_>>();
        if !listed.is_empty() {
            let mut details = String::new();
            details.push_str("; matches: ");
            details.push_str(
                &listed
                    .into_iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            );
            if matches.len() > 3 {
                details.push_str(", ...");
            }
            message.push_str(&details);
        }
        return Err(CliError::new(message, Some(hint)));
    }

    Ok(matches.remove(0))
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
