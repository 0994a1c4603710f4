//! Parameter checks run before every scan.
//!
//! Checks never stop at the first violation. Each one appends to a shared
//! [`Problems`] list, and the caller turns the list into a single
//! [`SearchError::InvalidParameters`] at the end.

use crate::error::{SearchError, SearchResult};
use crate::scan::Direction;

/// Accumulated violation messages for one request.
#[derive(Debug, Default)]
pub struct Problems {
    problems: Vec<String>,
}

impl Problems {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, problem: impl Into<String>) {
        self.problems.push(problem.into());
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    /// `Ok(())` when nothing was recorded, otherwise one error listing everything.
    pub fn into_result(self) -> SearchResult<()> {
        if self.problems.is_empty() {
            return Ok(());
        }
        tracing::debug!(problems = ?self.problems, "Rejected search parameters");
        Err(SearchError::InvalidParameters {
            problems: self.problems,
        })
    }
}

/// Every channel must be as long as the first one.
pub fn check_channel_lengths(problems: &mut Problems, channels: &[&[f64]]) {
    let Some(first) = channels.first() else {
        problems.push("no data channels provided");
        return;
    };
    if first.is_empty() {
        problems.push("data channel 1 is empty");
    }
    for (n, channel) in channels.iter().enumerate().skip(1) {
        if channel.len() != first.len() {
            problems.push(format!(
                "data channel {} has {} values but data channel 1 has {}",
                n + 1,
                channel.len(),
                first.len()
            ));
        }
    }
}

/// Checks scan bounds for `direction` against `data_length` samples.
///
/// Forward: `0 <= begin < end <= data_length`.
/// Backward: `-1 <= end < begin < data_length`.
pub fn check_indices(
    problems: &mut Problems,
    index_begin: i64,
    index_end: i64,
    data_length: usize,
    direction: Direction,
) {
    let len = data_length as i64;

    if index_begin < 0 {
        problems.push(format!("indexBegin ({}) is negative", index_begin));
    }
    if index_begin >= len {
        problems.push(format!(
            "indexBegin ({}) is too large for number of data provided ({})",
            index_begin, data_length
        ));
    }

    match direction {
        Direction::Forward => {
            if index_end < 0 {
                problems.push(format!("indexEnd ({}) is negative", index_end));
            }
            if index_end > len {
                problems.push(format!(
                    "indexEnd ({}) is too large for number of data provided ({})",
                    index_end, data_length
                ));
            }
            if index_begin >= index_end {
                problems.push(format!(
                    "indexBegin ({}) is not less than indexEnd ({})",
                    index_begin, index_end
                ));
            }
        }
        Direction::Backward => {
            if index_end < -1 {
                problems.push(format!("indexEnd ({}) is less than -1", index_end));
            }
            if index_end >= len - 1 {
                problems.push(format!(
                    "indexEnd ({}) is too large for a backward search over number of data provided ({})",
                    index_end, data_length
                ));
            }
            if index_begin <= index_end {
                problems.push(format!(
                    "indexBegin ({}) is not greater than indexEnd ({})",
                    index_begin, index_end
                ));
            }
        }
    }
}

/// The window must be positive and shorter than the scanned range.
pub fn check_win_length(problems: &mut Problems, win_length: i64, index_begin: i64, index_end: i64) {
    let range_length = index_end.abs_diff(index_begin);

    if win_length <= 0 {
        problems.push(format!("winLength ({}) is not positive", win_length));
    } else if win_length as u64 >= range_length {
        problems.push(format!(
            "winLength ({}) is too large for the searched range length ({})",
            win_length, range_length
        ));
    }
}

/// `lo` must not exceed `hi`. NaN bounds never pass.
pub fn check_thresholds(problems: &mut Problems, threshold_lo: f64, threshold_hi: f64, channel_no: usize) {
    if !(threshold_lo <= threshold_hi) {
        problems.push(format!(
            "thresholdLo ({}) is greater than thresholdHi ({}) for data channel {}",
            threshold_lo, threshold_hi, channel_no
        ));
    }
}

pub fn check_threshold_count(problems: &mut Problems, threshold_count: usize, channel_count: usize) {
    if threshold_count != channel_count {
        problems.push(format!(
            "{} threshold pairs provided for {} data channels",
            threshold_count, channel_count
        ));
    }
}
