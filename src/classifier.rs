use crate::models::Priority;

/// Lowest recovery probability classified as `High`.
pub const HIGH_PRIORITY_THRESHOLD: f64 = 0.70;

/// Lowest recovery probability classified as `Medium`.
///
/// The old batch preparation pipeline started Medium at 0.40; the serving
/// threshold below is the only one used anywhere in this crate.
pub const MEDIUM_PRIORITY_THRESHOLD: f64 = 0.30;

/// Maps a recovery probability to its priority label.
///
/// `p >= 0.70` is High, `0.30 <= p < 0.70` is Medium, anything else
/// (including NaN) is Low.
pub fn classify(probability: f64) -> Priority {
    if probability >= HIGH_PRIORITY_THRESHOLD {
        Priority::High
    } else if probability >= MEDIUM_PRIORITY_THRESHOLD {
        Priority::Medium
    } else {
        Priority::Low
    }
}

/// Classifies a probability that is still raw text.
///
/// Text that does not parse as a number is Low; this never fails.
pub fn classify_raw(raw: &str) -> Priority {
    raw.trim()
        .parse::<f64>()
        .map(classify)
        .unwrap_or(Priority::Low)
}
