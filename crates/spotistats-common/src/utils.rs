//! Unit conversions used by the exporters.

/// Milliseconds per minute.
pub const MS_PER_MINUTE: f64 = 60_000.0;

/// Milliseconds per hour.
pub const MS_PER_HOUR: f64 = 3_600_000.0;

/// Converts milliseconds to fractional minutes.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn ms_to_minutes(ms: u64) -> f64 {
    ms as f64 / MS_PER_MINUTE
}

/// Converts milliseconds to fractional hours.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn ms_to_hours(ms: u64) -> f64 {
    ms as f64 / MS_PER_HOUR
}

/// Rounds half away from zero to `decimals` places.
#[must_use]
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(i32::try_from(decimals).unwrap_or(i32::MAX));
    (value * factor).round() / factor
}

/// `part / whole`, or 0 when `whole` is 0.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn ratio(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}
