//! Per-frame loudness computation feeding the UI telemetry stream.
//!
//! RMS amplitude → decibels → a bounded display scale. The mapping is a
//! deliberately lossy perceptual compression, not a calibrated loudness
//! standard; the breakpoints are kept exact for compatibility with
//! existing consumers.

/// Practical dynamic-range ceiling in dB used to normalize the scale.
const DB_CEILING: f64 = 90.3;

/// Compute the display loudness of one PCM frame.
///
/// Each signed sample is normalized to `[-1, 1]`, the mean square is
/// taken over the frame, `rms = sqrt(mean_square)`, `db = 20·log10(rms)`.
/// A silent frame (NaN / -inf dB) lands on the 0.1 floor.
pub fn level(samples: &[i16]) -> f64 {
    let mut sum = 0.0;
    for &raw in samples {
        let sample = raw as f64 / 32768.0;
        sum += sample * sample;
    }
    let rms = (sum / samples.len() as f64).sqrt();

    let mut db = 20.0 * rms.log10();
    if db.is_nan() {
        db = 0.0;
    }
    map_to_display(db)
}

/// Fold a dB value into the bounded display range.
///
/// `v = db / 90.3`; negative values are shifted up by 1.0 (below-range
/// values fold into the low end rather than clipping to zero); rounded to
/// 2 decimals; then `< 0.1` clamps to the floor, `< 0.32` is halved to
/// compress the quiet range, and anything else passes through.
fn map_to_display(db: f64) -> f64 {
    if db == f64::MAX || db == f64::MIN {
        return 0.5;
    }
    let mut value = db / DB_CEILING;
    if value < 0.0 {
        value += 1.0;
    }
    let value = (value * 100.0).round() / 100.0;
    if value < 0.1 {
        0.1
    } else if value < 0.32 {
        value / 2.0
    } else {
        value
    }
}
