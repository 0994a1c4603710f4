//! A fully described search, ready to run against any loaded swing.

use crate::error::SearchResult;
use crate::scan::Direction;
use crate::search::{self, Range, Window};
use crate::swing::{Channel, Swing};
use crate::validate::{self, Problems};

/// The searches available from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    AboveValue,
    BackWithinRange,
    AboveValueTwoSignals,
    WithinRanges,
    MultiWithinRange,
}

impl Operation {
    pub const NAMES: [&'static str; 5] = [
        "above",
        "back-within",
        "above-two",
        "within-ranges",
        "multi-within",
    ];

    pub fn name(self) -> &'static str {
        match self {
            Operation::AboveValue => "above",
            Operation::BackWithinRange => "back-within",
            Operation::AboveValueTwoSignals => "above-two",
            Operation::WithinRanges => "within-ranges",
            Operation::MultiWithinRange => "multi-within",
        }
    }

    pub fn is_backward(self) -> bool {
        self == Operation::BackWithinRange
    }

    pub fn direction(self) -> Direction {
        if self.is_backward() {
            Direction::Backward
        } else {
            Direction::Forward
        }
    }

    /// Exact number of channel conditions the operation takes; `None` for any number.
    pub fn channel_count(self) -> Option<usize> {
        match self {
            Operation::AboveValueTwoSignals => Some(2),
            Operation::WithinRanges => None,
            _ => Some(1),
        }
    }

    /// Whether conditions are open ranges rather than single thresholds.
    pub fn uses_ranges(self) -> bool {
        !matches!(self, Operation::AboveValue | Operation::AboveValueTwoSignals)
    }
}

impl std::str::FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "above" => Ok(Operation::AboveValue),
            "back-within" => Ok(Operation::BackWithinRange),
            "above-two" => Ok(Operation::AboveValueTwoSignals),
            "within-ranges" => Ok(Operation::WithinRanges),
            "multi-within" => Ok(Operation::MultiWithinRange),
            other => Err(format!(
                "Unknown operation '{}'. Available: {}",
                other,
                Operation::NAMES.join(", ")
            )),
        }
    }
}

/// Per-channel threshold: a single lower bound or an open range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Threshold {
    Above(f64),
    Within(Range),
}

/// One channel and the threshold it is tested against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelCondition {
    pub channel: Channel,
    pub threshold: Threshold,
}

/// Result of running a [`Query`].
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Single-match searches; `None` when nothing qualified.
    Index(Option<usize>),
    Windows(Vec<Window>),
}

/// A search request independent of any particular recording.
///
/// Missing bounds are filled in from the swing at run time: forward
/// searches cover `[0, len)`, backward searches `[len - 1, -1)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub operation: Operation,
    pub conditions: Vec<ChannelCondition>,
    pub index_begin: Option<i64>,
    pub index_end: Option<i64>,
    pub win_length: i64,
}

impl Query {
    /// Resolves the search bounds for a swing of `len` samples.
    pub fn bounds(&self, len: usize) -> (i64, i64) {
        let len = len as i64;
        if self.operation.is_backward() {
            (self.index_begin.unwrap_or(len - 1), self.index_end.unwrap_or(-1))
        } else {
            (self.index_begin.unwrap_or(0), self.index_end.unwrap_or(len))
        }
    }

    /// Runs the search against `swing`.
    ///
    /// # Errors
    /// * `SearchError::InvalidParameters` when the query does not fit the
    ///   operation or the swing. Wrong number or kind of channel conditions
    ///   are reported together with any bad bounds or window length.
    pub fn run(&self, swing: &Swing) -> SearchResult<Outcome> {
        let (begin, end) = self.bounds(swing.len());
        let win = self.win_length;

        let mut problems = Problems::new();
        let (thresholds, ranges) = self.split_thresholds(&mut problems);
        if !problems.is_empty() {
            validate::check_indices(&mut problems, begin, end, swing.len(), self.operation.direction());
            validate::check_win_length(&mut problems, win, begin, end);
            for (n, condition) in self.conditions.iter().enumerate() {
                if let Threshold::Within(range) = condition.threshold {
                    validate::check_thresholds(&mut problems, range.lo, range.hi, n + 1);
                }
            }
        }
        problems.into_result()?;

        // condition counts and kinds are checked above
        let channels: Vec<&[f64]> = self.conditions.iter().map(|c| swing.channel(c.channel)).collect();
        match self.operation {
            Operation::AboveValue => {
                search::search_continuity_above_value(channels[0], begin, end, thresholds[0], win).map(Outcome::Index)
            }
            Operation::BackWithinRange => search::back_search_continuity_within_range(
                channels[0],
                begin,
                end,
                ranges[0].lo,
                ranges[0].hi,
                win,
            )
            .map(Outcome::Index),
            Operation::AboveValueTwoSignals => search::search_continuity_above_value_two_signals(
                channels[0],
                channels[1],
                begin,
                end,
                thresholds[0],
                thresholds[1],
                win,
            )
            .map(Outcome::Index),
            Operation::WithinRanges => {
                search::search_continuity_within_ranges(&channels, &ranges, begin, end, win).map(Outcome::Index)
            }
            Operation::MultiWithinRange => search::search_multi_continuity_within_range(
                channels[0],
                begin,
                end,
                ranges[0].lo,
                ranges[0].hi,
                win,
            )
            .map(Outcome::Windows),
        }
    }

    /// Separates single thresholds from ranges, recording every condition
    /// that does not fit the operation.
    fn split_thresholds(&self, problems: &mut Problems) -> (Vec<f64>, Vec<Range>) {
        let name = self.operation.name();
        match self.operation.channel_count() {
            Some(expected) if self.conditions.len() != expected => problems.push(format!(
                "operation {} needs {} channel condition(s), got {}",
                name,
                expected,
                self.conditions.len()
            )),
            None if self.conditions.is_empty() => {
                problems.push(format!("operation {} needs at least one channel condition", name))
            }
            _ => {}
        }

        let mut thresholds = Vec::new();
        let mut ranges = Vec::new();
        for (n, condition) in self.conditions.iter().enumerate() {
            match (self.operation.uses_ranges(), condition.threshold) {
                (false, Threshold::Above(value)) => thresholds.push(value),
                (true, Threshold::Within(range)) => ranges.push(range),
                (false, Threshold::Within(_)) => problems.push(format!(
                    "operation {} needs a single threshold for data channel {}",
                    name,
                    n + 1
                )),
                (true, Threshold::Above(_)) => problems.push(format!(
                    "operation {} needs a threshold range for data channel {}",
                    name,
                    n + 1
                )),
            }
        }
        (thresholds, ranges)
    }
}
