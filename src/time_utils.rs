// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.

use chrono::{DateTime, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Row timestamp (`created_at` / `updated_at`) with microsecond precision,
/// matching what the hosted database returns for `timestamptz` columns.
pub fn row_timestamp(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formats_use_z_suffix() {
        let date = DateTime::from_timestamp(1_704_103_200, 123_456_000).unwrap();
        assert_eq!(format_utc_rfc3339(date), "2024-01-01T10:00:00Z");
        assert_eq!(row_timestamp(date), "2024-01-01T10:00:00.123456Z");
    }
}
