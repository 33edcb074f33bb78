use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

const SECONDS_PER_DAY: u64 = 60 * 60 * 24;
const SECONDS_PER_HOUR: u64 = 60 * 60;
const SECONDS_PER_MINUTE: u64 = 60;

/// Components in the order they have to appear: (unit, factor, inclusive limit).
const COMPONENTS: [(char, u64, u64); 4] = [
    ('d', SECONDS_PER_DAY, 365),
    ('h', SECONDS_PER_HOUR, 23),
    ('m', SECONDS_PER_MINUTE, 59),
    ('s', 1, 59),
];

/// Largest duration the human readable grammar can express.
pub const MAX_EXPRESSIBLE_SECONDS: u64 =
    365 * SECONDS_PER_DAY + 23 * SECONDS_PER_HOUR + 59 * SECONDS_PER_MINUTE + 59;

static DURATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:(\d+)d)?\s*(?:(\d+)h)?\s*(?:(\d+)m)?\s*(?:(\d+)s)?\s*$")
        .expect("duration pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationError {
    #[error("'{0}' is not a duration like 2d3h4m5s")]
    Malformed(String),

    #[error("{value}{unit} is out of range (maximum is {max}{unit})")]
    OutOfRange { unit: char, value: u64, max: u64 },
}

/// Convert a number of seconds into a human readable string like `1d 2h 3m 4s`.
/// Zero components are left out, so zero seconds give an empty string.
pub fn seconds_to_human(seconds: u64) -> String {
    let days = seconds / SECONDS_PER_DAY;
    let hours = seconds % SECONDS_PER_DAY / SECONDS_PER_HOUR;
    let minutes = seconds % SECONDS_PER_HOUR / SECONDS_PER_MINUTE;
    let secs = seconds % SECONDS_PER_MINUTE;

    [(days, 'd'), (hours, 'h'), (minutes, 'm'), (secs, 's')]
        .iter()
        .filter(|(value, _)| *value > 0)
        .map(|(value, unit)| format!("{value}{unit}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse a human readable duration (`2d3h4m5s`, `1h 30m`, ...) into seconds.
///
/// Every component is optional but the order d, h, m, s is mandatory and the
/// whole input has to be consumed. An empty string is zero seconds.
pub fn human_to_seconds(text: &str) -> Result<u64, DurationError> {
    let captures = DURATION_PATTERN
        .captures(text)
        .ok_or_else(|| DurationError::Malformed(text.to_string()))?;

    let mut total = 0;
    for (index, (unit, factor, max)) in COMPONENTS.iter().enumerate() {
        let Some(digits) = captures.get(index + 1) else {
            continue;
        };

        // digits that do not even fit into u64 are certainly out of range
        let value = digits.as_str().parse::<u64>().unwrap_or(u64::MAX);
        if value > *max {
            return Err(DurationError::OutOfRange {
                unit: *unit,
                value,
                max: *max,
            });
        }
        total += value * factor;
    }

    Ok(total)
}

/// True when the text is accepted by [`human_to_seconds`].
pub fn is_valid_human_duration(text: &str) -> bool {
    human_to_seconds(text).is_ok()
}
