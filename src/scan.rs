//! Run-length scanning shared by every continuity search.
//!
//! The scan walks an index range one step at a time, evaluates a predicate
//! against the values of all supplied channels at each index, and tracks the
//! current unbroken run of successes. Callers validate the range before
//! scanning; the loop itself cannot fail.

/// Order in which indices are visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Increasing indices, `begin` inclusive to `end` exclusive.
    Forward,
    /// Decreasing indices, `begin` inclusive down to `end` exclusive.
    /// `end == -1` scans through index 0.
    Backward,
}

impl Direction {
    pub fn step(self) -> i64 {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }
}

/// What to report once a run reaches the window length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPolicy {
    /// Stop at the first qualifying window.
    Single,
    /// Report every window start inside every qualifying run.
    Multi,
}

/// Scans `channels` from `begin` towards `end` for runs of at least
/// `win_length` consecutive samples accepted by `predicate`.
///
/// The predicate receives one value per channel, in the order the channels
/// were supplied. A run's start is its first index in scan order, so a
/// backward run starts at its highest index.
///
/// # Arguments
/// * `channels` - Equal-length channel slices, all indexable over the range.
/// * `begin` - First index visited.
/// * `end` - Exclusive bound in the scan direction.
/// * `win_length` - Minimum run length, at least 1.
/// * `direction` - Step direction.
/// * `policy` - Single or multi match.
/// * `predicate` - Per-sample test; must not depend on scan state.
///
/// # Returns
/// * `Vec<usize>` - Window starts in scan order. Empty when nothing qualifies;
///   at most one entry under [`MatchPolicy::Single`].
pub fn scan<P>(
    channels: &[&[f64]],
    begin: i64,
    end: i64,
    win_length: usize,
    direction: Direction,
    policy: MatchPolicy,
    predicate: P,
) -> Vec<usize>
where
    P: Fn(&[f64]) -> bool,
{
    let step = direction.step();
    let mut sample = vec![0.0; channels.len()];
    let mut matches = Vec::new();

    let mut run_start = 0i64;
    let mut run_length = 0usize;

    let mut i = begin;
    while i != end {
        let index = i as usize;
        for (value, channel) in sample.iter_mut().zip(channels) {
            *value = channel[index];
        }

        if predicate(&sample) {
            if run_length == 0 {
                run_start = i;
            }
            run_length += 1;

            if run_length == win_length {
                tracing::trace!(start = run_start, "Window found");
                matches.push(run_start as usize);
                match policy {
                    MatchPolicy::Single => return matches,
                    MatchPolicy::Multi => {
                        // slide: the next index that passes completes the next window
                        run_start += step;
                        run_length -= 1;
                    }
                }
            }
        } else {
            run_length = 0;
        }

        i += step;
    }

    matches
}
