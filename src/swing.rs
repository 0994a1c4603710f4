use crate::error::SwingDataError;

/// Number of channels recorded for every sample.
pub const CHANNEL_COUNT: usize = 7;

/// One sensor axis of a swing recording, in column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Time,
    AccelX,
    AccelY,
    AccelZ,
    GyroX,
    GyroY,
    GyroZ,
}

impl Channel {
    pub const ALL: [Channel; CHANNEL_COUNT] = [
        Channel::Time,
        Channel::AccelX,
        Channel::AccelY,
        Channel::AccelZ,
        Channel::GyroX,
        Channel::GyroY,
        Channel::GyroZ,
    ];

    /// Zero-based column position in the source rows.
    pub fn column(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Channel::Time => "time",
            Channel::AccelX => "ax",
            Channel::AccelY => "ay",
            Channel::AccelZ => "az",
            Channel::GyroX => "gx",
            Channel::GyroY => "gy",
            Channel::GyroZ => "gz",
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "time" | "t" => Ok(Channel::Time),
            "ax" | "accel_x" => Ok(Channel::AccelX),
            "ay" | "accel_y" => Ok(Channel::AccelY),
            "az" | "accel_z" => Ok(Channel::AccelZ),
            "gx" | "gyro_x" => Ok(Channel::GyroX),
            "gy" | "gyro_y" => Ok(Channel::GyroY),
            "gz" | "gyro_z" => Ok(Channel::GyroZ),
            other => Err(format!(
                "Unknown channel '{}'. Available: time, ax, ay, az, gx, gy, gz",
                other
            )),
        }
    }
}

/// Represents a single row of a swing recording.
///
/// Rows carry no header; fields are matched by position.
#[derive(Debug, serde::Deserialize)]
struct SwingRecord {
    time: f64,
    accel_x: f64,
    accel_y: f64,
    accel_z: f64,
    gyro_x: f64,
    gyro_y: f64,
    gyro_z: f64,
}

impl SwingRecord {
    fn values(&self) -> [f64; CHANNEL_COUNT] {
        [
            self.time,
            self.accel_x,
            self.accel_y,
            self.accel_z,
            self.gyro_x,
            self.gyro_y,
            self.gyro_z,
        ]
    }
}

/// A swing recording held column by column.
///
/// All channels share the same non-zero length and are never modified
/// after construction, so one `Swing` can back any number of concurrent
/// searches.
#[derive(Debug, Clone, PartialEq)]
pub struct Swing {
    columns: [Vec<f64>; CHANNEL_COUNT],
}

impl Swing {
    /// Builds a swing from already separated channel columns.
    ///
    /// # Errors
    /// * `SwingDataError::Empty` if the columns hold no samples.
    /// * `SwingDataError::UnequalChannels` if any column length differs from the time column.
    pub fn from_columns(columns: [Vec<f64>; CHANNEL_COUNT]) -> Result<Self, SwingDataError> {
        let expected = columns[0].len();
        if expected == 0 {
            return Err(SwingDataError::Empty);
        }
        for channel in Channel::ALL {
            let actual = columns[channel.column()].len();
            if actual != expected {
                return Err(SwingDataError::UnequalChannels {
                    channel: channel.to_string(),
                    expected,
                    actual,
                });
            }
        }
        Ok(Swing { columns })
    }

    /// Reads headerless comma-separated rows of seven numeric fields.
    ///
    /// Column order is time, accelerometer x/y/z, gyroscope x/y/z.
    /// Whitespace around fields is ignored.
    ///
    /// # Arguments
    /// * `reader` - Any byte source holding the rows.
    ///
    /// # Returns
    /// * `Result<Swing, SwingDataError>` - The loaded swing or the first row that failed.
    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self, SwingDataError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut columns: [Vec<f64>; CHANNEL_COUNT] = Default::default();
        for result in reader.deserialize::<SwingRecord>() {
            let record = result?;
            for (column, value) in columns.iter_mut().zip(record.values()) {
                column.push(value);
            }
        }

        let swing = Self::from_columns(columns)?;
        tracing::debug!(samples = swing.len(), "Loaded swing");
        Ok(swing)
    }

    /// Loads a swing file through a read-only memory map.
    ///
    /// # Arguments
    /// * `path` - Path to the CSV recording.
    ///
    /// # Returns
    /// * `Result<Swing, SwingDataError>` - The loaded swing or an I/O/parse error.
    pub fn from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self, SwingDataError> {
        let file = std::fs::File::open(path.as_ref())?;
        let mmap = unsafe { memmap2::Mmap::map(&file)? };
        Self::from_reader(&mmap[..])
    }

    /// Number of samples in every channel.
    pub fn len(&self) -> usize {
        self.columns[0].len()
    }

    /// Always false; a swing holds at least one sample.
    pub fn is_empty(&self) -> bool {
        self.columns[0].is_empty()
    }

    pub fn channel(&self, channel: Channel) -> &[f64] {
        &self.columns[channel.column()]
    }

    /// Time stamp recorded at `index`, if it exists.
    pub fn time_at(&self, index: usize) -> Option<f64> {
        self.channel(Channel::Time).get(index).copied()
    }
}

impl std::str::FromStr for Swing {
    type Err = SwingDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_reader(s.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROWS: &str = "\
0,1.0,2.0,3.0,4.0,5.0,6.0
1, -1.5, 0.25, 9.81, 0.0, 0.1, -0.1
2,2,2,2,2,2,2
";

    #[test]
    fn loads_columns_in_row_order() {
        let swing: Swing = ROWS.parse().unwrap();
        assert_eq!(swing.len(), 3);
        assert_eq!(swing.channel(Channel::Time), &[0.0, 1.0, 2.0]);
        assert_eq!(swing.channel(Channel::AccelX), &[1.0, -1.5, 2.0]);
        assert_eq!(swing.channel(Channel::AccelZ), &[3.0, 9.81, 2.0]);
        assert_eq!(swing.channel(Channel::GyroZ), &[6.0, -0.1, 2.0]);
        assert_eq!(swing.time_at(1), Some(1.0));
        assert_eq!(swing.time_at(3), None);
    }

    #[test]
    fn empty_source_is_rejected() {
        let err = "".parse::<Swing>().unwrap_err();
        assert!(matches!(err, SwingDataError::Empty));
    }

    #[test]
    fn unparsable_field_is_rejected() {
        let err = "0,1,2,3,4,5,six\n".parse::<Swing>().unwrap_err();
        assert!(matches!(err, SwingDataError::Csv(_)));
    }

    #[test]
    fn short_row_is_rejected() {
        let err = "0,1,2,3,4,5,6\n1,2,3\n".parse::<Swing>().unwrap_err();
        assert!(matches!(err, SwingDataError::Csv(_)));
    }

    #[test]
    fn from_columns_requires_equal_lengths() {
        let mut columns: [Vec<f64>; CHANNEL_COUNT] = Default::default();
        for column in columns.iter_mut() {
            column.extend([0.0, 1.0]);
        }
        columns[Channel::GyroY.column()].pop();

        let err = Swing::from_columns(columns).unwrap_err();
        match err {
            SwingDataError::UnequalChannels {
                channel,
                expected,
                actual,
            } => {
                assert_eq!(channel, "gy");
                assert_eq!(expected, 2);
                assert_eq!(actual, 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn channel_names_parse_both_forms() {
        assert_eq!("ax".parse::<Channel>(), Ok(Channel::AccelX));
        assert_eq!("Gyro_Z".parse::<Channel>(), Ok(Channel::GyroZ));
        assert!("mag_x".parse::<Channel>().is_err());
    }
}
