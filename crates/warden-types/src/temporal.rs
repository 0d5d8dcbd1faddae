use chrono::{DateTime, Duration, SecondsFormat, Utc};

/// Render a timestamp the way event records and signal payloads store it:
/// RFC 3339, millisecond precision, `Z` suffix (`2025-01-01T00:00:00.000Z`).
///
/// Event hashes cover the timestamp *string*, so this format is part of the
/// record contract.
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Signed milliseconds elapsed from `earlier` to `later`.
///
/// Negative when `later` precedes `earlier` (clock skew).
pub fn millis_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> i64 {
    later.signed_duration_since(earlier).num_milliseconds()
}

/// A configured millisecond count as a signed value, saturating at `i64::MAX`.
pub fn saturating_millis(ms: u64) -> i64 {
    i64::try_from(ms).unwrap_or(i64::MAX)
}

/// A configured millisecond count as a [`Duration`], saturating at the
/// largest representable span.
pub fn millis_duration(ms: u64) -> Duration {
    Duration::try_milliseconds(saturating_millis(ms)).unwrap_or(Duration::MAX)
}

/// `at + ms`, clamped to the latest representable instant.
pub fn deadline_after(at: DateTime<Utc>, ms: u64) -> DateTime<Utc> {
    at.checked_add_signed(millis_duration(ms))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
