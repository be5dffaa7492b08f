//! Time label formatting.

/// Formats milliseconds as `m:ss`.
///
/// Minutes are not padded and never roll over into hours, so an 80 minute
/// track shows `80:00`.
pub fn format_time(ms: u64) -> String {
    let total_secs = ms / 1000;
    let minutes = total_secs / 60;
    let seconds = total_secs - minutes * 60;
    format!("{minutes}:{seconds:02}")
}
