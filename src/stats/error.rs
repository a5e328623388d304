#[derive(Debug, Clone, PartialEq)]
pub enum WindowError {
    /// Timestamp is ahead of the buffer's clock.
    FutureTimestamp { timestamp: i64, now: i64 },
    InvalidBucketDuration(String),
    InvalidBucketCount(usize),
    /// `bucket_duration * bucket_count` does not fit in i64 milliseconds.
    WindowTooLong,
}

impl std::fmt::Display for WindowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WindowError::FutureTimestamp { timestamp, now } => write!(
                f,
                "Timestamp {} is {}ms ahead of the buffer clock ({})",
                timestamp,
                timestamp - now,
                now
            ),
            WindowError::InvalidBucketDuration(msg) => {
                write!(f, "Invalid bucket duration: {}", msg)
            }
            WindowError::InvalidBucketCount(count) => {
                write!(f, "Invalid bucket count: {} (must be > 0)", count)
            }
            WindowError::WindowTooLong => write!(f, "Window length overflows i64 milliseconds"),
        }
    }
}

impl std::error::Error for WindowError {}
