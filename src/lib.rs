//! Continuity window search over swing sensor recordings.
//!
//! A [`Swing`] holds one recording (time, accelerometer x/y/z, gyroscope
//! x/y/z) column by column. The functions in [`search`] look for runs of
//! consecutive samples that satisfy a threshold condition for at least a
//! given number of samples, which is how phases of a swing such as the
//! start of the backswing or the moment of impact are located.

pub mod batch;
pub mod cli;
pub mod error;
pub mod logging;
pub mod query;
pub mod report;
pub mod scan;
pub mod search;
pub mod swing;
pub mod validate;

pub use error::{SearchError, SearchResult, SwingDataError};
pub use query::{Operation, Outcome, Query};
pub use search::{
    Range, Window, back_search_continuity_within_range, search_continuity_above_value,
    search_continuity_above_value_two_signals, search_continuity_within_ranges,
    search_multi_continuity_within_range,
};
pub use swing::{Channel, Swing};
