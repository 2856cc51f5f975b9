use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Utc};

/// Unix seconds at midnight UTC of `date`
pub fn day_start_timestamp(date: NaiveDate) -> i64 {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
        .timestamp()
}

/// Parse a `YYYY-MM-DD` calendar date
pub fn parse_since_date(input: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
}

/// Default start of the analysis window: the first day of the current month
pub fn first_day_of_month(today: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap_or(today)
}

/// Human description of a transfer time, e.g.
/// `3 hours, 5 minutes ago • 02 Jan 2024 (10:00 UTC)`
pub fn relative_age(timestamp: i64, now: DateTime<Utc>) -> String {
    let Some(at) = Utc.timestamp_opt(timestamp, 0).single() else {
        return format!("unknown time ({})", timestamp);
    };

    let minutes = (now - at).num_seconds().div_euclid(60);
    let hours = minutes.div_euclid(60);
    let rem_minutes = minutes.rem_euclid(60);

    let mut parts = Vec::new();
    if hours > 0 {
        parts.push(format!("{} hours", hours));
    }
    if rem_minutes > 0 || hours == 0 {
        parts.push(format!("{} minutes", rem_minutes));
    }

    format!(
        "{} ago • {}",
        parts.join(", "),
        at.format("%d %b %Y (%H:%M UTC)")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_start_timestamp() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(day_start_timestamp(date), 1_704_067_200);

        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        assert_eq!(day_start_timestamp(epoch), 0);
    }

    #[test]
    fn test_parse_since_date() {
        assert_eq!(
            parse_since_date(" 2024-03-15 ").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
        );
        assert!(parse_since_date("15/03/2024").is_err());
        assert!(parse_since_date("2024-02-30").is_err());
    }

    #[test]
    fn test_first_day_of_month() {
        let today = NaiveDate::from_ymd_opt(2024, 7, 19).unwrap();
        assert_eq!(
            first_day_of_month(today),
            NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()
        );
    }

    #[test]
    fn test_relative_age() {
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 13, 5, 0).unwrap();
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 10, 0, 0).unwrap();
        assert_eq!(
            relative_age(at.timestamp(), now),
            "3 hours, 5 minutes ago • 02 Jan 2024 (10:00 UTC)"
        );

        let exact_hours = Utc.with_ymd_and_hms(2024, 1, 2, 11, 5, 0).unwrap();
        assert_eq!(
            relative_age(exact_hours.timestamp(), now),
            "2 hours ago • 02 Jan 2024 (11:05 UTC)"
        );

        assert_eq!(
            relative_age(now.timestamp() - 30, now),
            "0 minutes ago • 02 Jan 2024 (13:04 UTC)"
        );
    }
}
