use std::time::Duration;

/// Parse a whole number of seconds into a `Duration`. Zero and unparseable values yield `None`.
pub fn parse_seconds(value: &str) -> Option<Duration> {
    value.trim().parse::<u64>().ok().filter(|s| *s > 0).map(Duration::from_secs)
}
