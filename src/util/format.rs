//! Number formatting utilities.

/// Metric suffixes, one per power of 1000 above the base unit.
const METRIC_SUFFIXES: [&str; 6] = ["k", "M", "G", "T", "P", "E"];

/// Format a count with a thousands delimiter between digit groups.
#[must_use]
pub fn format_delimited(value: u64, delimiter: &str) -> String {
    let digits = value.to_string();
    let len = digits.len();
    let mut out = String::with_capacity(len + (len / 3) * delimiter.len());

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(delimiter);
        }
        out.push(ch);
    }

    out
}

/// Format a count with a metric suffix, truncated to one decimal.
///
/// A trailing `.0` is dropped, so `1000` renders as `1k` and `1250` as `1.2k`.
#[must_use]
pub fn format_metric(value: u64) -> String {
    if value < 1_000 {
        return value.to_string();
    }

    let mut divisor: u64 = 1_000;
    let mut suffix = METRIC_SUFFIXES[0];
    for next in &METRIC_SUFFIXES[1..] {
        match divisor.checked_mul(1_000) {
            Some(bigger) if value >= bigger => {
                divisor = bigger;
                suffix = next;
            }
            _ => break,
        }
    }

    let major = value / divisor;
    let minor = (value % divisor) / (divisor / 10);
    if minor == 0 {
        format!("{major}{suffix}")
    } else {
        format!("{major}.{minor}{suffix}")
    }
}
