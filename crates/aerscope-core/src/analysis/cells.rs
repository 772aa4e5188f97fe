use std::collections::HashMap;

use crate::{CellSummary, StreamWarning};

#[derive(Debug, Default)]
pub(crate) struct CellStats {
    pub on_events: u64,
    pub first_ticks: Option<u32>,
    pub last_ticks: Option<u32>,
}

pub(crate) fn add_on_event(
    stats: &mut HashMap<(u8, u8), CellStats>,
    row: u8,
    col: u8,
    ticks: Option<u32>,
) {
    let entry = stats.entry((row, col)).or_default();
    entry.on_events += 1;
    if let Some(ticks) = ticks {
        if entry.first_ticks.is_none() {
            entry.first_ticks = Some(ticks);
        }
        entry.last_ticks = Some(ticks);
    }
}

pub(crate) fn build_cell_summaries(stats: HashMap<(u8, u8), CellStats>) -> Vec<CellSummary> {
    let mut cells: Vec<CellSummary> = stats
        .into_iter()
        .map(|((row, col), stats)| CellSummary {
            row,
            col,
            on_events: stats.on_events,
            first_ticks: stats.first_ticks,
            last_ticks: stats.last_ticks,
        })
        .collect();

    cells.sort_by(|a, b| a.row.cmp(&b.row).then_with(|| a.col.cmp(&b.col)));
    cells
}

#[derive(Debug, Default)]
pub(crate) struct WarningCounts {
    pub resyncs: u64,
    pub unknown_record_type: u64,
    pub truncated_records: u64,
    pub out_of_range: u64,
}

pub(crate) fn build_warnings(counts: &WarningCounts) -> Vec<StreamWarning> {
    let entries = [
        (
            "AER-RESYNC",
            "framing lost; bytes discarded before next magic",
            counts.resyncs,
        ),
        (
            "AER-UNKNOWN-REC-TYPE",
            "unrecognized record type; rest of payload abandoned",
            counts.unknown_record_type,
        ),
        (
            "AER-TRUNCATED-RECORD",
            "payload ended inside a record",
            counts.truncated_records,
        ),
        (
            "AER-OUT-OF-RANGE",
            "event coordinates outside the 32x32 matrix",
            counts.out_of_range,
        ),
    ];

    let mut warnings: Vec<StreamWarning> = entries
        .into_iter()
        .filter(|(_, _, count)| *count > 0)
        .map(|(id, message, count)| StreamWarning {
            id: id.to_string(),
            message: message.to_string(),
            count,
        })
        .collect();

    warnings.sort_by(|a, b| a.id.cmp(&b.id));
    warnings
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::{WarningCounts, add_on_event, build_cell_summaries, build_warnings};

    #[test]
    fn summaries_are_sorted_by_row_then_col() {
        let mut stats = HashMap::new();
        add_on_event(&mut stats, 5, 1, None);
        add_on_event(&mut stats, 0, 9, Some(40));
        add_on_event(&mut stats, 0, 2, None);
        add_on_event(&mut stats, 0, 9, Some(70));

        let cells = build_cell_summaries(stats);
        let order: Vec<(u8, u8)> = cells.iter().map(|c| (c.row, c.col)).collect();
        assert_eq!(order, [(0, 2), (0, 9), (5, 1)]);

        let busy = &cells[1];
        assert_eq!(busy.on_events, 2);
        assert_eq!(busy.first_ticks, Some(40));
        assert_eq!(busy.last_ticks, Some(70));
    }

    #[test]
    fn ticks_bounds_ignore_untimestamped_events() {
        let mut stats = HashMap::new();
        add_on_event(&mut stats, 1, 1, None);
        add_on_event(&mut stats, 1, 1, Some(10));
        add_on_event(&mut stats, 1, 1, None);

        let cells = build_cell_summaries(stats);
        assert_eq!(cells[0].on_events, 3);
        assert_eq!(cells[0].first_ticks, Some(10));
        assert_eq!(cells[0].last_ticks, Some(10));
    }

    #[test]
    fn warnings_skip_zero_counts_and_sort_by_id() {
        let counts = WarningCounts {
            resyncs: 2,
            unknown_record_type: 1,
            truncated_records: 0,
            out_of_range: 3,
        };

        let warnings = build_warnings(&counts);
        let ids: Vec<&str> = warnings.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(
            ids,
            ["AER-OUT-OF-RANGE", "AER-RESYNC", "AER-UNKNOWN-REC-TYPE"]
        );
        assert_eq!(warnings[1].count, 2);
    }

    #[test]
    fn clean_stream_has_no_warnings() {
        assert!(build_warnings(&WarningCounts::default()).is_empty());
    }
}
