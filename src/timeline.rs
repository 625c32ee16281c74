use chrono::{DateTime, Duration, Utc};

use crate::error::{DigitrackError, Result};
use crate::events::{read_start_time, EVENTS_EXTENSION};
use crate::types::SidecarSource;

/// 每个样本占用的整数纳秒：毫秒周期乘以1e6再取整
fn step_nanos(sampling_rate: f64) -> Result<i64> {
    if !sampling_rate.is_finite() || sampling_rate <= 0.0 {
        return Err(DigitrackError::InvalidSamplingRate(sampling_rate));
    }
    Ok((1000.0 / sampling_rate * 1e6).round() as i64)
}

fn project(start: DateTime<Utc>, step_ns: i64, n_samples: usize) -> Vec<DateTime<Utc>> {
    (0..n_samples)
        .map(|i| start + Duration::nanoseconds(step_ns * i as i64))
        .collect()
}

/// Duration of one sample at `sampling_rate`.
///
/// # Errors
///
/// * `DigitrackError::InvalidSamplingRate` - rate is zero, negative, NaN
///   or infinite
///
/// # Examples
///
/// ```rust
/// use chrono::Duration;
/// use digitrack::sample_interval;
///
/// let step = sample_interval(250.0)?;
/// assert_eq!(step, Duration::nanoseconds(4_000_000));
/// # Ok::<(), digitrack::DigitrackError>(())
/// ```
pub fn sample_interval(sampling_rate: f64) -> Result<Duration> {
    Ok(Duration::nanoseconds(step_nanos(sampling_rate)?))
}

/// Builds the absolute timestamp of every sample in a recording.
///
/// The vector has exactly `n_samples` entries; entry `i` is
/// `start + i × interval`, so the sequence is strictly increasing and its
/// first entry equals `start`. The projection is closed-form per sample,
/// not an accumulating loop, so no rounding error builds up over long
/// recordings.
///
/// # Examples
///
/// ```rust
/// use chrono::{Duration, TimeZone, Utc};
/// use digitrack::timestamp_vector;
///
/// let start = Utc.with_ymd_and_hms(2021, 1, 1, 2, 0, 0).unwrap();
/// let stamps = timestamp_vector(start, 5, 250.0)?;
///
/// assert_eq!(stamps.len(), 5);
/// assert_eq!(stamps[0], start);
/// assert_eq!(stamps[4] - stamps[0], Duration::milliseconds(16));
/// # Ok::<(), digitrack::DigitrackError>(())
/// ```
pub fn timestamp_vector(
    start: DateTime<Utc>,
    n_samples: usize,
    sampling_rate: f64,
) -> Result<Vec<DateTime<Utc>>> {
    let step_ns = step_nanos(sampling_rate)?;
    Ok(project(start, step_ns, n_samples))
}

/// Reads the start time from an `.evx` sidecar and builds the full
/// per-sample timestamp vector.
///
/// The sampling rate is validated and the sidecar resolved before
/// anything is parsed, so an invalid rate or an ambiguous source fails
/// even for `n_samples == 0`; the XML itself is only parsed when at least
/// one timestamp is needed.
///
/// # Errors
///
/// Everything [`read_start_time`](crate::read_start_time) can raise, plus
/// `DigitrackError::InvalidSamplingRate`.
///
/// # Examples
///
/// ```rust
/// use chrono::{Duration, TimeZone, Utc};
/// use digitrack::{synthesize_timestamps, SidecarSource};
///
/// # digitrack::doctest_utils::write_events_sidecar(
/// #     "doc_timeline.evx", 1_609_459_200_000_000, "2021-01-01T00:00:00+02:00")?;
/// let stamps = synthesize_timestamps(&SidecarSource::detect("doc_timeline.evx"), 5, 250.0)?;
///
/// assert_eq!(stamps[0], Utc.with_ymd_and_hms(2021, 1, 1, 2, 0, 0).unwrap());
/// assert_eq!(stamps[1] - stamps[0], Duration::milliseconds(4));
/// # std::fs::remove_file("doc_timeline.evx").ok();
/// # Ok::<(), digitrack::DigitrackError>(())
/// ```
pub fn synthesize_timestamps(
    source: &SidecarSource,
    n_samples: usize,
    sampling_rate: f64,
) -> Result<Vec<DateTime<Utc>>> {
    let step_ns = step_nanos(sampling_rate)?;
    let path = source.locate(EVENTS_EXTENSION)?;

    if n_samples == 0 {
        return Ok(Vec::new());
    }

    let start = read_start_time(&SidecarSource::File(path))?.start();
    Ok(project(start, step_ns, n_samples))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_step_rounding() {
        // 250 Hz → 4 ms整
        assert_eq!(step_nanos(250.0).unwrap(), 4_000_000);
        // 249.938… Hz does not divide 1 s evenly; the step rounds
        let step = step_nanos(249.93896484375).unwrap();
        assert_eq!(step, 4_000_977);
    }

    #[test]
    fn test_invalid_rates() {
        for rate in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            let err = step_nanos(rate).unwrap_err();
            assert!(matches!(err, DigitrackError::InvalidSamplingRate(_)));
        }
    }

    #[test]
    fn test_projection_is_strictly_increasing() {
        let start = Utc.with_ymd_and_hms(2021, 1, 1, 2, 0, 0).unwrap();
        let stamps = timestamp_vector(start, 1000, 249.93896484375).unwrap();
        assert_eq!(stamps.len(), 1000);
        assert_eq!(stamps[0], start);
        assert!(stamps.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_degenerate_lengths() {
        let start = Utc.with_ymd_and_hms(2021, 1, 1, 2, 0, 0).unwrap();
        assert!(timestamp_vector(start, 0, 250.0).unwrap().is_empty());
        assert_eq!(timestamp_vector(start, 1, 250.0).unwrap(), vec![start]);
    }
}
