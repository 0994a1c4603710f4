use crate::logging::LoggingConfig;
use crate::query::{ChannelCondition, Operation, Query, Threshold};
use crate::search::Range;
use crate::swing::Channel;

/// Structure representing command-line arguments.
#[derive(Debug)]
pub struct Args {
    pub input: std::path::PathBuf,
    pub output: Option<std::path::PathBuf>,
    pub threads: Option<usize>,
    pub query: Query,
    pub logging: LoggingConfig,
}

/// Builds the clap command.
///
/// Thresholds pair with channels by position: the first `--threshold`
/// (or `--lo`/`--hi`) applies to the first `--channel`, and so on.
pub fn command() -> clap::Command {
    clap::Command::new("swing-search")
        .version("0.2.0")
        .about("Find continuity windows in swing sensor recordings")
        .arg(
            clap::Arg::new("input")
                .short('i')
                .long("input")
                .help("Path to a swing CSV file or a directory of CSV files")
                .required(true)
                .num_args(1),
        )
        .arg(
            clap::Arg::new("output")
                .short('o')
                .long("output")
                .help("Write the CSV report to this file instead of stdout")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("threads")
                .short('t')
                .long("threads")
                .help("Number of threads to use (default: all available)")
                .num_args(1)
                .value_parser(clap::builder::ValueParser::new(parse_usize_positive)),
        )
        .arg(
            clap::Arg::new("operation")
                .long("op")
                .help("Search to run")
                .required(true)
                .num_args(1)
                .value_parser(Operation::NAMES),
        )
        .arg(
            clap::Arg::new("channel")
                .short('c')
                .long("channel")
                .help("Channel to search: time, ax, ay, az, gx, gy, gz (repeatable)")
                .required(true)
                .action(clap::ArgAction::Append)
                .value_parser(clap::builder::ValueParser::new(parse_channel)),
        )
        .arg(
            clap::Arg::new("threshold")
                .long("threshold")
                .help("Values must be strictly above this (one per channel)")
                .action(clap::ArgAction::Append)
                .allow_negative_numbers(true)
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(
            clap::Arg::new("lo")
                .long("lo")
                .help("Exclusive lower bound of the range (one per channel)")
                .action(clap::ArgAction::Append)
                .allow_negative_numbers(true)
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(
            clap::Arg::new("hi")
                .long("hi")
                .help("Exclusive upper bound of the range (one per channel)")
                .action(clap::ArgAction::Append)
                .allow_negative_numbers(true)
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(
            clap::Arg::new("begin")
                .short('b')
                .long("begin")
                .help("First index searched (default: 0, or last index for back-within)")
                .num_args(1)
                .allow_negative_numbers(true)
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            clap::Arg::new("end")
                .short('e')
                .long("end")
                .help("Exclusive end index (default: length, or -1 for back-within)")
                .num_args(1)
                .allow_negative_numbers(true)
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            clap::Arg::new("win_length")
                .short('w')
                .long("win-length")
                .help("Number of consecutive samples that must satisfy the condition")
                .required(true)
                .num_args(1)
                .allow_negative_numbers(true)
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            clap::Arg::new("log_level")
                .long("log-level")
                .help("Log filter, overridden by RUST_LOG")
                .num_args(1)
                .default_value("warn"),
        )
        .arg(
            clap::Arg::new("log_json")
                .long("log-json")
                .help("Emit logs as JSON")
                .action(clap::ArgAction::SetTrue),
        )
}

impl Args {
    /// Parses the process arguments, exiting with usage on clap errors.
    ///
    /// # Errors
    /// * If thresholds do not line up with the channels of the chosen operation.
    pub fn parse() -> anyhow::Result<Self> {
        Self::from_matches(&command().get_matches())
    }

    /// Builds `Args` from already parsed matches.
    pub fn from_matches(matches: &clap::ArgMatches) -> anyhow::Result<Self> {
        let input = matches
            .get_one::<String>("input")
            .ok_or_else(|| anyhow::anyhow!("Missing --input"))?;
        let operation: Operation = matches
            .get_one::<String>("operation")
            .ok_or_else(|| anyhow::anyhow!("Missing --op"))?
            .parse()
            .map_err(anyhow::Error::msg)?;
        let win_length = *matches
            .get_one::<i64>("win_length")
            .ok_or_else(|| anyhow::anyhow!("Missing --win-length"))?;

        let channels: Vec<Channel> = values(matches, "channel");
        let conditions = build_conditions(
            operation,
            &channels,
            &values(matches, "threshold"),
            &values(matches, "lo"),
            &values(matches, "hi"),
        )?;

        Ok(Args {
            input: std::path::PathBuf::from(input),
            output: matches.get_one::<String>("output").map(std::path::PathBuf::from),
            threads: matches.get_one::<usize>("threads").cloned(),
            query: Query {
                operation,
                conditions,
                index_begin: matches.get_one::<i64>("begin").cloned(),
                index_end: matches.get_one::<i64>("end").cloned(),
                win_length,
            },
            logging: LoggingConfig {
                level: matches
                    .get_one::<String>("log_level")
                    .cloned()
                    .unwrap_or_else(|| LoggingConfig::default().level),
                json: matches.get_flag("log_json"),
            },
        })
    }
}

fn values<T: Clone + Send + Sync + 'static>(matches: &clap::ArgMatches, id: &str) -> Vec<T> {
    matches
        .get_many::<T>(id)
        .map(|v| v.cloned().collect())
        .unwrap_or_default()
}

/// Pairs channels with thresholds for `operation`, reporting every mismatch.
fn build_conditions(
    operation: Operation,
    channels: &[Channel],
    thresholds: &[f64],
    lows: &[f64],
    highs: &[f64],
) -> anyhow::Result<Vec<ChannelCondition>> {
    let mut problems = Vec::new();

    if let Some(expected) = operation.channel_count() {
        if channels.len() != expected {
            problems.push(format!(
                "{} expects {} channel(s), got {}",
                operation.name(),
                expected,
                channels.len()
            ));
        }
    }

    let uses_ranges = operation.uses_ranges();
    if uses_ranges {
        if lows.len() != channels.len() || highs.len() != channels.len() {
            problems.push(format!(
                "{} expects one --lo and one --hi per channel ({}), got {} and {}",
                operation.name(),
                channels.len(),
                lows.len(),
                highs.len()
            ));
        }
        if !thresholds.is_empty() {
            problems.push(format!("{} takes --lo/--hi, not --threshold", operation.name()));
        }
    } else {
        if thresholds.len() != channels.len() {
            problems.push(format!(
                "{} expects one --threshold per channel ({}), got {}",
                operation.name(),
                channels.len(),
                thresholds.len()
            ));
        }
        if !lows.is_empty() || !highs.is_empty() {
            problems.push(format!("{} takes --threshold, not --lo/--hi", operation.name()));
        }
    }

    if !problems.is_empty() {
        return Err(anyhow::anyhow!("Invalid arguments: {}", problems.join("; ")));
    }

    let conditions = channels
        .iter()
        .enumerate()
        .map(|(n, &channel)| ChannelCondition {
            channel,
            threshold: if uses_ranges {
                Threshold::Within(Range::new(lows[n], highs[n]))
            } else {
                Threshold::Above(thresholds[n])
            },
        })
        .collect();
    Ok(conditions)
}

fn parse_channel(s: &str) -> Result<Channel, String> {
    s.parse()
}

/// Validates that the number of threads is a positive integer.
///
/// # Arguments
/// * `s` - String representation of the number of threads.
///
/// # Returns
/// * `Result<usize>` - Validated number of threads.
fn parse_usize_positive(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("Must be a positive integer".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(format!("Not a valid number: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> anyhow::Result<Args> {
        let matches = command().try_get_matches_from(std::iter::once("swing-search").chain(args.iter().copied()))?;
        Args::from_matches(&matches)
    }

    #[test]
    fn parses_back_search_with_negative_end() {
        let args = parse(&[
            "-i", "swing.csv", "--op", "back-within", "-c", "ax", "--lo", "-1.5", "--hi", "2", "-b", "100", "-e",
            "-1", "-w", "3",
        ])
        .unwrap();
        assert_eq!(args.query.operation, Operation::BackWithinRange);
        assert_eq!(args.query.index_begin, Some(100));
        assert_eq!(args.query.index_end, Some(-1));
        assert_eq!(
            args.query.conditions,
            vec![ChannelCondition {
                channel: Channel::AccelX,
                threshold: Threshold::Within(Range::new(-1.5, 2.0)),
            }]
        );
        assert_eq!(args.logging.level, "warn");
    }

    #[test]
    fn pairs_thresholds_with_channels() {
        let args = parse(&[
            "-i", "dir", "--op", "above-two", "-c", "ax", "-c", "gy", "--threshold", "0.5", "--threshold", "-2",
            "-w", "4", "-t", "2",
        ])
        .unwrap();
        assert_eq!(args.threads, Some(2));
        assert_eq!(args.query.conditions[1].channel, Channel::GyroY);
        assert_eq!(args.query.conditions[1].threshold, Threshold::Above(-2.0));
    }

    #[test]
    fn reports_every_argument_mismatch() {
        let err = parse(&["-i", "x", "--op", "above-two", "-c", "ax", "--lo", "0", "-w", "1"]).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("expects 2 channel(s), got 1"), "{message}");
        assert!(message.contains("expects one --threshold per channel"), "{message}");
        assert!(message.contains("takes --threshold, not --lo/--hi"), "{message}");
    }

    #[test]
    fn rejects_unknown_channel() {
        assert!(parse(&["-i", "x", "--op", "above", "-c", "mx", "--threshold", "0", "-w", "1"]).is_err());
    }

    #[test]
    fn rejects_zero_threads() {
        assert!(parse(&["-i", "x", "--op", "above", "-c", "ax", "--threshold", "0", "-w", "1", "-t", "0"]).is_err());
    }
}
