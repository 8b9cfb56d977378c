//! Timestamp formats used by the signing schemes.
//!
//! All formatting is done in UTC with fixed English month and day names, so
//! the output never depends on the host locale.

use chrono::{DateTime, Utc};

/// Format as ISO 8601 basic, e.g. `20130524T000000Z` (`x-amz-date`).
#[must_use]
pub fn iso8601_basic(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Format the date part used in the credential scope, e.g. `20130524`.
#[must_use]
pub fn date_stamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y%m%d").to_string()
}

/// Format as RFC 1123 in GMT, e.g. `Tue, 15 Nov 1994 08:12:31 GMT` (`Date`).
#[must_use]
pub fn rfc1123(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_should_format_all_three_styles() {
        let ts = Utc.with_ymd_and_hms(1994, 11, 15, 8, 12, 31).unwrap();
        assert_eq!(iso8601_basic(&ts), "19941115T081231Z");
        assert_eq!(date_stamp(&ts), "19941115");
        assert_eq!(rfc1123(&ts), "Tue, 15 Nov 1994 08:12:31 GMT");
    }

    #[test]
    fn test_should_zero_pad_single_digit_days() {
        let ts = Utc.with_ymd_and_hms(2013, 5, 4, 0, 0, 0).unwrap();
        assert_eq!(rfc1123(&ts), "Sat, 04 May 2013 00:00:00 GMT");
        assert_eq!(iso8601_basic(&ts), "20130504T000000Z");
    }
}
