//! Error types for swing loading and continuity searches.

/// Raised by the search operations before any scanning takes place.
///
/// Every violated constraint of a request is collected into `problems`,
/// so one failed call reports all of its bad parameters at once.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SearchError {
    #[error("Invalid search parameters: [{}]", problems.join(", "))]
    InvalidParameters { problems: Vec<String> },
}

impl SearchError {
    /// All violation messages carried by the error.
    pub fn problems(&self) -> &[String] {
        match self {
            Self::InvalidParameters { problems } => problems,
        }
    }
}

/// Raised while turning a tabular source into a [`crate::swing::Swing`].
///
/// The search engine never produces or inspects these.
#[derive(Debug, thiserror::Error)]
pub enum SwingDataError {
    #[error("Swing data could not be read: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed swing row: {0}")]
    Csv(#[from] csv::Error),

    #[error("Swing data is empty")]
    Empty,

    #[error("Channel {channel} has {actual} samples, expected {expected}")]
    UnequalChannels {
        channel: String,
        expected: usize,
        actual: usize,
    },
}

pub type SearchResult<T> = Result<T, SearchError>;
