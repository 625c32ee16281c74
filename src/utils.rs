use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};

use crate::error::{DigitrackError, Result};

/// 将微秒UNIX时间戳转换为UTC时间
pub fn utc_from_micros(micros: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_micros(micros).ok_or_else(|| {
        DigitrackError::MalformedSidecar(format!(
            "epoch microseconds out of range: {micros}"
        ))
    })
}

/// Splits a DigiTrack wall-clock stamp into its naive datetime and its
/// whole-hour UTC offset.
///
/// Stamps look like `2017-11-16T10:33:12.099+01:00`; some firmware
/// revisions separate date and time with a space instead of `T`. Only
/// whole hours of the offset are significant (the recorder runs on CET or
/// CEST) and offsets west of UTC never occur in these exports, so a stamp
/// without a `+` marker is rejected.
pub fn parse_offset_datetime(raw: &str) -> Result<(NaiveDateTime, i64)> {
    if !raw.contains('+') {
        return Err(DigitrackError::OffsetParse(raw.to_string()));
    }

    let parsed = DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%:z"))
        .map_err(|e| {
            DigitrackError::MalformedSidecar(format!("bad wall-clock stamp '{raw}': {e}"))
        })?;

    let offset_hours = i64::from(parsed.offset().local_minus_utc()) / 3600;
    Ok((parsed.naive_local(), offset_hours))
}

/// Normalizes a stamped value to an absolute UTC time.
///
/// DigiTrack's offset is additive: the absolute time is the stamped value
/// interpreted as UTC, shifted *forward* by the recorded offset.
pub fn apply_additive_offset(stamped: DateTime<Utc>, offset_hours: i64) -> DateTime<Utc> {
    stamped + Duration::hours(offset_hours)
}

/// UTC-localizes a naive wall-clock value, then applies the additive
/// offset.
pub fn normalize_wall_clock(naive: NaiveDateTime, offset_hours: i64) -> DateTime<Utc> {
    apply_additive_offset(Utc.from_utc_datetime(&naive), offset_hours)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_utc_from_micros() {
        let t = utc_from_micros(1_609_459_200_000_000).unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap());
        assert!(utc_from_micros(i64::MAX).is_err());
    }

    #[test]
    fn test_parse_offset_datetime() {
        let (naive, hours) = parse_offset_datetime("2017-11-16T10:33:12.099+01:00").unwrap();
        assert_eq!(hours, 1);
        assert_eq!(naive.hour(), 10);
        assert_eq!(naive.and_utc().timestamp_subsec_millis(), 99);

        // 有些固件版本用空格分隔日期和时间
        let (naive, hours) = parse_offset_datetime("2021-01-01 00:00:00+02:00").unwrap();
        assert_eq!(hours, 2);
        assert_eq!(naive.hour(), 0);
    }

    #[test]
    fn test_offset_minutes_are_ignored() {
        let (_, hours) = parse_offset_datetime("2021-06-01T12:00:00+05:30").unwrap();
        assert_eq!(hours, 5);
    }

    #[test]
    fn test_missing_plus_marker() {
        let err = parse_offset_datetime("2021-01-01T00:00:00-03:00").unwrap_err();
        assert!(matches!(err, DigitrackError::OffsetParse(_)));

        let err = parse_offset_datetime("2021-01-01T00:00:00").unwrap_err();
        assert!(matches!(err, DigitrackError::OffsetParse(_)));
    }

    #[test]
    fn test_garbage_stamp() {
        let err = parse_offset_datetime("yesterday+ish").unwrap_err();
        assert!(matches!(err, DigitrackError::MalformedSidecar(_)));
    }

    #[test]
    fn test_additive_normalization() {
        let naive = NaiveDateTime::parse_from_str("2021-01-01T00:00:00", "%Y-%m-%dT%H:%M:%S")
            .unwrap();
        let normalized = normalize_wall_clock(naive, 2);
        assert_eq!(normalized, Utc.with_ymd_and_hms(2021, 1, 1, 2, 0, 0).unwrap());
    }
}
