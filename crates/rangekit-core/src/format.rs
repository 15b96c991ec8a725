//! Display formatting for widget values.

/// Format seconds as `m:ss`, the way media players show playback time.
///
/// Negative and non-finite inputs show as `0:00`.
pub fn format_time(seconds: f64) -> String {
    let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    let total = seconds.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Number of decimal places needed to show multiples of `step`.
pub fn decimals_for_step(step: f64) -> usize {
    if !step.is_finite() || step <= 0.0 {
        return 0;
    }
    let text = format!("{:.10}", step);
    match text.split_once('.') {
        Some((_, frac)) => frac.trim_end_matches('0').len(),
        None => 0,
    }
}

/// Format a value with as many decimals as its step needs.
pub fn format_value(value: f64, step: f64) -> String {
    format!("{:.*}", decimals_for_step(step), value)
}
