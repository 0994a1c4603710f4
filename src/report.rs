use crate::query::{Operation, Outcome};
use crate::swing::Swing;

/// One line of the search report.
///
/// `start` and `end` are the lowest and highest index of the window,
/// whichever direction the search ran in. A backward search reports the
/// index where it entered the run, which is the window's `end` here.
/// `start_time` is the time stamp at `start`.
///
/// Single-match searches without a match produce a row with `start == -1`
/// and no end or time.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ReportRow {
    pub file: String,
    pub operation: &'static str,
    pub start: i64,
    pub end: Option<usize>,
    pub start_time: Option<f64>,
    pub error: Option<String>,
}

/// Turns a search outcome into report rows.
///
/// `Outcome::Index` always yields exactly one row. `Outcome::Windows`
/// yields one row per window, or none when the list is empty.
///
/// # Arguments
/// * `file` - Name of the recording the search ran on.
/// * `operation` - The search that produced `outcome`.
/// * `swing` - The recording, used to look up start times.
/// * `win_length` - Window length of the search.
/// * `outcome` - What the search found.
pub fn rows_for_outcome(
    file: &str,
    operation: Operation,
    swing: &Swing,
    win_length: i64,
    outcome: &Outcome,
) -> Vec<ReportRow> {
    match outcome {
        Outcome::Index(Some(found)) => {
            let (start, end) = window_bounds(*found, win_length as usize, operation.is_backward());
            vec![ReportRow {
                file: file.to_string(),
                operation: operation.name(),
                start: start as i64,
                end: Some(end),
                start_time: swing.time_at(start),
                error: None,
            }]
        }
        Outcome::Index(None) => vec![ReportRow {
            file: file.to_string(),
            operation: operation.name(),
            start: -1,
            end: None,
            start_time: None,
            error: None,
        }],
        Outcome::Windows(windows) => windows
            .iter()
            .map(|window| ReportRow {
                file: file.to_string(),
                operation: operation.name(),
                start: window.start as i64,
                end: Some(window.end),
                start_time: swing.time_at(window.start),
                error: None,
            })
            .collect(),
    }
}

/// Lowest and highest index of the window a single-match search found at `found`.
fn window_bounds(found: usize, win_length: usize, backward: bool) -> (usize, usize) {
    if backward {
        ((found + 1).saturating_sub(win_length), found)
    } else {
        (found, found + win_length.saturating_sub(1))
    }
}

/// Row recording that a file could not be searched.
pub fn error_row(file: &str, operation: Operation, error: &anyhow::Error) -> ReportRow {
    ReportRow {
        file: file.to_string(),
        operation: operation.name(),
        start: -1,
        end: None,
        start_time: None,
        error: Some(format!("{:#}", error)),
    }
}

/// Writes `rows` as CSV with a header line.
///
/// # Arguments
/// * `writer` - Destination, e.g. a file or stdout.
/// * `rows` - Rows to write, in order.
///
/// # Returns
/// * `anyhow::Result<()>` - Success or a serialization/I/O error.
pub fn write_report<W: std::io::Write>(writer: W, rows: &[ReportRow]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    anyhow::Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{ChannelCondition, Query, Threshold};
    use crate::search::{Range, Window};
    use crate::swing::Channel;

    fn swing() -> Swing {
        "0.00,1,0,0,0,0,0\n0.01,1,0,0,0,0,0\n0.02,1,0,0,0,0,0\n".parse().unwrap()
    }

    #[test]
    fn missing_match_writes_sentinel_row() {
        let rows = rows_for_outcome("a.csv", Operation::AboveValue, &swing(), 1, &Outcome::Index(None));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].start, -1);
        assert_eq!(rows[0].end, None);
    }

    #[test]
    fn windows_carry_start_times() {
        let outcome = Outcome::Windows(vec![Window { start: 0, end: 1 }, Window { start: 1, end: 2 }]);
        let rows = rows_for_outcome("a.csv", Operation::MultiWithinRange, &swing(), 2, &outcome);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].start_time, Some(0.01));
        assert_eq!(rows[1].end, Some(2));
    }

    #[test]
    fn backward_match_reports_window_below_found_index() {
        let rows = rows_for_outcome("a.csv", Operation::BackWithinRange, &swing(), 2, &Outcome::Index(Some(2)));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].start, 1);
        assert_eq!(rows[0].end, Some(2));
        assert_eq!(rows[0].start_time, Some(0.01));
    }

    #[test]
    fn backward_search_at_last_sample_stays_in_bounds() {
        let swing = swing();
        let outcome = Query {
            operation: Operation::BackWithinRange,
            conditions: vec![ChannelCondition {
                channel: Channel::AccelX,
                threshold: Threshold::Within(Range::new(0.0, 2.0)),
            }],
            index_begin: None,
            index_end: None,
            win_length: 2,
        }
        .run(&swing)
        .unwrap();
        assert_eq!(outcome, Outcome::Index(Some(2)));

        let rows = rows_for_outcome("a.csv", Operation::BackWithinRange, &swing, 2, &outcome);
        assert_eq!(rows[0].start, 1);
        assert_eq!(rows[0].end, Some(2));
        assert!(rows[0].end.unwrap() < swing.len());
    }

    #[test]
    fn report_has_header_and_rows() {
        let rows = rows_for_outcome("a.csv", Operation::AboveValue, &swing(), 2, &Outcome::Index(Some(1)));
        let mut out = Vec::new();
        write_report(&mut out, &rows).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "file,operation,start,end,start_time,error\na.csv,above,1,2,0.01,\n");
    }
}
