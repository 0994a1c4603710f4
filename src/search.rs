//! Continuity searches over swing channels.
//!
//! Each search validates its whole request first, then hands a per-sample
//! predicate to [`scan::scan`]. Threshold comparisons are strict, so a value
//! equal to a threshold never qualifies.
//!
//! Index ranges follow one convention for all searches:
//! * forward searches visit `index_begin..index_end` (end exclusive);
//! * backward searches visit `index_begin` down to `index_end` exclusive,
//!   where `index_end == -1` searches through index 0.
//!
//! Single-match searches return `None` when no window qualifies.

use crate::error::SearchResult;
use crate::scan::{self, Direction, MatchPolicy};
use crate::validate::{self, Problems};

/// A qualifying window, `end` inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Window {
    pub start: usize,
    pub end: usize,
}

impl Window {
    fn from_start(start: usize, win_length: usize) -> Self {
        Window {
            start,
            end: start + win_length - 1,
        }
    }
}

/// Lower and upper bound for a within-range search, both exclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub lo: f64,
    pub hi: f64,
}

impl Range {
    pub fn new(lo: f64, hi: f64) -> Self {
        Range { lo, hi }
    }

    fn contains(&self, value: f64) -> bool {
        value > self.lo && value < self.hi
    }
}

fn validate_request(
    channels: &[&[f64]],
    index_begin: i64,
    index_end: i64,
    win_length: i64,
    direction: Direction,
    ranges: &[Range],
) -> SearchResult<()> {
    let mut problems = Problems::new();
    validate::check_channel_lengths(&mut problems, channels);
    let data_length = channels.first().map_or(0, |c| c.len());
    validate::check_indices(&mut problems, index_begin, index_end, data_length, direction);
    validate::check_win_length(&mut problems, win_length, index_begin, index_end);
    for (n, range) in ranges.iter().enumerate() {
        validate::check_thresholds(&mut problems, range.lo, range.hi, n + 1);
    }
    problems.into_result()
}

/// Finds the first index from which `data` stays above `threshold` for
/// `win_length` consecutive samples.
///
/// # Arguments
/// * `data` - Channel values.
/// * `index_begin` - First index searched.
/// * `index_end` - Exclusive end of the search.
/// * `threshold` - Values must be strictly greater.
/// * `win_length` - Required run length.
///
/// # Returns
/// * `SearchResult<Option<usize>>` - Start of the first window, `None` if there is none.
///
/// # Errors
/// * `SearchError::InvalidParameters` listing every bad parameter.
pub fn search_continuity_above_value(
    data: &[f64],
    index_begin: i64,
    index_end: i64,
    threshold: f64,
    win_length: i64,
) -> SearchResult<Option<usize>> {
    let channels = [data];
    validate_request(&channels, index_begin, index_end, win_length, Direction::Forward, &[])?;
    tracing::debug!(index_begin, index_end, threshold, win_length, "Searching continuity above value");

    let found = scan::scan(
        &channels,
        index_begin,
        index_end,
        win_length as usize,
        Direction::Forward,
        MatchPolicy::Single,
        |sample| sample[0] > threshold,
    );
    Ok(found.first().copied())
}

/// Searches backwards from `index_begin` for `win_length` consecutive
/// samples strictly between `threshold_lo` and `threshold_hi`.
///
/// The returned index is the window's highest index, i.e. where the run
/// was entered while walking backwards. The window nearest `index_begin`
/// wins.
///
/// # Errors
/// * `SearchError::InvalidParameters` listing every bad parameter.
pub fn back_search_continuity_within_range(
    data: &[f64],
    index_begin: i64,
    index_end: i64,
    threshold_lo: f64,
    threshold_hi: f64,
    win_length: i64,
) -> SearchResult<Option<usize>> {
    let channels = [data];
    let range = Range::new(threshold_lo, threshold_hi);
    validate_request(&channels, index_begin, index_end, win_length, Direction::Backward, &[range])?;
    tracing::debug!(
        index_begin,
        index_end,
        threshold_lo,
        threshold_hi,
        win_length,
        "Back searching continuity within range"
    );

    let found = scan::scan(
        &channels,
        index_begin,
        index_end,
        win_length as usize,
        Direction::Backward,
        MatchPolicy::Single,
        |sample| range.contains(sample[0]),
    );
    Ok(found.first().copied())
}

/// Like [`search_continuity_above_value`], but both channels must be above
/// their own threshold at every index of the window.
///
/// # Errors
/// * `SearchError::InvalidParameters` listing every bad parameter, including
///   channels of different lengths.
pub fn search_continuity_above_value_two_signals(
    data1: &[f64],
    data2: &[f64],
    index_begin: i64,
    index_end: i64,
    threshold1: f64,
    threshold2: f64,
    win_length: i64,
) -> SearchResult<Option<usize>> {
    let channels = [data1, data2];
    validate_request(&channels, index_begin, index_end, win_length, Direction::Forward, &[])?;
    tracing::debug!(
        index_begin,
        index_end,
        threshold1,
        threshold2,
        win_length,
        "Searching continuity above value on two signals"
    );

    let found = scan::scan(
        &channels,
        index_begin,
        index_end,
        win_length as usize,
        Direction::Forward,
        MatchPolicy::Single,
        |sample| sample[0] > threshold1 && sample[1] > threshold2,
    );
    Ok(found.first().copied())
}

/// Forward search over any number of channels, each held strictly inside
/// its own range for `win_length` consecutive samples.
///
/// `ranges[k]` applies to `channels[k]`; the counts must match.
///
/// # Errors
/// * `SearchError::InvalidParameters` listing every bad parameter.
pub fn search_continuity_within_ranges(
    channels: &[&[f64]],
    ranges: &[Range],
    index_begin: i64,
    index_end: i64,
    win_length: i64,
) -> SearchResult<Option<usize>> {
    let mut problems = Problems::new();
    validate::check_threshold_count(&mut problems, ranges.len(), channels.len());
    if let Err(err) = validate_request(channels, index_begin, index_end, win_length, Direction::Forward, ranges) {
        for problem in err.problems() {
            problems.push(problem.clone());
        }
    }
    problems.into_result()?;
    tracing::debug!(
        channels = channels.len(),
        index_begin,
        index_end,
        win_length,
        "Searching continuity within ranges"
    );

    let found = scan::scan(
        channels,
        index_begin,
        index_end,
        win_length as usize,
        Direction::Forward,
        MatchPolicy::Single,
        |sample| sample.iter().zip(ranges).all(|(value, range)| range.contains(*value)),
    );
    Ok(found.first().copied())
}

/// Lists every window of `win_length` samples strictly between
/// `threshold_lo` and `threshold_hi`.
///
/// A qualifying run of `L` samples yields `L - win_length + 1` overlapping
/// windows, in increasing order of start.
///
/// # Returns
/// * `SearchResult<Vec<Window>>` - All windows; empty if there are none.
///
/// # Errors
/// * `SearchError::InvalidParameters` listing every bad parameter.
pub fn search_multi_continuity_within_range(
    data: &[f64],
    index_begin: i64,
    index_end: i64,
    threshold_lo: f64,
    threshold_hi: f64,
    win_length: i64,
) -> SearchResult<Vec<Window>> {
    let channels = [data];
    let range = Range::new(threshold_lo, threshold_hi);
    validate_request(&channels, index_begin, index_end, win_length, Direction::Forward, &[range])?;
    tracing::debug!(
        index_begin,
        index_end,
        threshold_lo,
        threshold_hi,
        win_length,
        "Searching all continuity windows within range"
    );

    let win_length = win_length as usize;
    let windows = scan::scan(
        &channels,
        index_begin,
        index_end,
        win_length,
        Direction::Forward,
        MatchPolicy::Multi,
        |sample| range.contains(sample[0]),
    )
    .into_iter()
    .map(|start| Window::from_start(start, win_length))
    .collect();
    Ok(windows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;

    const WAVE: [f64; 9] = [-2.0, -1.0, 0.0, 1.0, 2.0, 1.0, 0.0, -1.0, -2.0];

    #[test]
    fn above_value_finds_first_positive() {
        assert_eq!(search_continuity_above_value(&WAVE, 0, 9, 0.0, 1), Ok(Some(3)));
    }

    #[test]
    fn above_value_is_strict() {
        assert_eq!(search_continuity_above_value(&WAVE, 0, 9, 1.0, 1), Ok(Some(4)));
    }

    #[test]
    fn above_value_without_match_is_none() {
        assert_eq!(search_continuity_above_value(&WAVE, 0, 9, 5.0, 1), Ok(None));
    }

    #[test]
    fn above_value_respects_window_length() {
        assert_eq!(search_continuity_above_value(&WAVE, 0, 9, 0.0, 3), Ok(Some(3)));
        assert_eq!(search_continuity_above_value(&WAVE, 0, 9, 0.0, 4), Ok(None));
    }

    #[test]
    fn above_value_rejects_window_of_full_range() {
        let err = search_continuity_above_value(&WAVE, 0, 9, 0.0, 9).unwrap_err();
        assert_eq!(err.problems().len(), 1);
    }

    #[test]
    fn above_value_reports_all_problems() {
        let err = search_continuity_above_value(&WAVE, -1, 20, 0.0, 0).unwrap_err();
        let SearchError::InvalidParameters { problems } = err;
        assert_eq!(problems.len(), 3);
    }

    #[test]
    fn back_search_reports_window_nearest_begin() {
        // -1 < v < 2 from the top: 8 fails, 7 fails, 6 passes
        assert_eq!(back_search_continuity_within_range(&WAVE, 8, -1, -1.0, 2.0, 1), Ok(Some(6)));
        // runs within (-1.5, 1.5): 7..=5 walking down
        assert_eq!(back_search_continuity_within_range(&WAVE, 8, -1, -1.5, 1.5, 3), Ok(Some(7)));
    }

    #[test]
    fn back_search_reaches_index_zero() {
        let data = [0.5, 5.0, 5.0, 5.0];
        assert_eq!(back_search_continuity_within_range(&data, 3, -1, 0.0, 1.0, 1), Ok(Some(0)));
        assert_eq!(back_search_continuity_within_range(&data, 3, 0, 0.0, 1.0, 1), Ok(None));
    }

    #[test]
    fn back_search_rejects_inverted_thresholds() {
        let err = back_search_continuity_within_range(&WAVE, 8, -1, 1.0, 0.0, 1).unwrap_err();
        assert!(err.problems()[0].starts_with("thresholdLo (1) is greater than thresholdHi (0)"));
    }

    #[test]
    fn two_signals_need_both_above() {
        let data2 = [9.0, 9.0, 9.0, -9.0, 9.0, 9.0, 9.0, 9.0, 9.0];
        assert_eq!(
            search_continuity_above_value_two_signals(&WAVE, &data2, 0, 9, 0.0, 0.0, 1),
            Ok(Some(4))
        );
        assert_eq!(
            search_continuity_above_value_two_signals(&WAVE, &data2, 0, 9, 0.0, 10.0, 1),
            Ok(None)
        );
    }

    #[test]
    fn two_signals_reject_unequal_lengths() {
        let short = [1.0, 2.0];
        let err = search_continuity_above_value_two_signals(&WAVE, &short, 0, 9, 0.0, 0.0, 1).unwrap_err();
        assert!(err.problems().iter().any(|p| p.starts_with("data channel 2 has 2 values")));
    }

    #[test]
    fn within_ranges_checks_every_channel() {
        let flat = [0.0; 9];
        let ranges = [Range::new(0.5, 3.0), Range::new(-1.0, 1.0)];
        assert_eq!(search_continuity_within_ranges(&[&WAVE, &flat], &ranges, 0, 9, 2), Ok(Some(3)));
    }

    #[test]
    fn within_ranges_collects_count_and_index_problems() {
        let ranges = [Range::new(0.0, 1.0)];
        let err = search_continuity_within_ranges(&[&WAVE, &WAVE], &ranges, 0, 10, 1).unwrap_err();
        assert_eq!(
            err.problems(),
            &[
                "1 threshold pairs provided for 2 data channels".to_string(),
                "indexEnd (10) is too large for number of data provided (9)".to_string(),
            ]
        );
    }

    #[test]
    fn multi_lists_every_single_sample_window() {
        let windows = search_multi_continuity_within_range(&WAVE, 0, 9, -1.0, 2.0, 1).unwrap();
        let expected: Vec<Window> = [2, 3, 5, 6].iter().map(|&i| Window { start: i, end: i }).collect();
        assert_eq!(windows, expected);
    }

    #[test]
    fn multi_windows_overlap_within_run() {
        let windows = search_multi_continuity_within_range(&WAVE, 0, 9, -1.5, 2.5, 3).unwrap();
        // run 1..=7 has length 7 -> 5 windows
        assert_eq!(windows.len(), 5);
        assert_eq!(windows[0], Window { start: 1, end: 3 });
        assert_eq!(windows[4], Window { start: 5, end: 7 });
        assert!(windows.windows(2).all(|w| w[0].start < w[1].start));
    }

    #[test]
    fn multi_without_match_is_empty() {
        assert_eq!(search_multi_continuity_within_range(&WAVE, 0, 9, 5.0, 6.0, 1), Ok(Vec::new()));
    }

    #[test]
    fn repeated_search_is_identical() {
        let first = search_multi_continuity_within_range(&WAVE, 0, 9, -1.5, 2.5, 2);
        let second = search_multi_continuity_within_range(&WAVE, 0, 9, -1.5, 2.5, 2);
        assert_eq!(first, second);
    }
}
