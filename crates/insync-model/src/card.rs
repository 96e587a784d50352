//! Display labels for scenario cards

use crate::types::{Scenario, UserId};
use chrono::{DateTime, Datelike, NaiveDateTime, Timelike, Utc};

const MINUTES_IN_DAY: i64 = 1_440;
const MINUTES_IN_MONTH: i64 = 43_200;

/// Author label: "You" for the viewer's own scenarios
#[must_use]
pub fn author_label<'a>(scenario: &'a Scenario, viewer: Option<&UserId>) -> &'a str {
    match viewer {
        Some(v) if v.as_str() == scenario.author_id => "You",
        _ => &scenario.author_name,
    }
}

/// Parse a server timestamp
///
/// Accepts RFC 3339, naive ISO 8601 (read as UTC) and epoch milliseconds.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    raw.parse::<i64>()
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
}

/// Relative label for a scenario's creation time, e.g. "3 days ago"
#[must_use]
pub fn created_at_label(scenario: &Scenario, now: DateTime<Utc>) -> Option<String> {
    let created = parse_timestamp(&scenario.created_at)?;
    Some(format!("{} ago", distance_phrase(created, now)))
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit}")
    } else {
        format!("{n} {unit}s")
    }
}

/// Integer division rounding half up
fn round_div(n: i64, d: i64) -> i64 {
    (n + d / 2) / d
}

/// Whole calendar months from `earlier` to `later`
fn calendar_months(earlier: DateTime<Utc>, later: DateTime<Utc>) -> i64 {
    let mut months = i64::from(later.year() - earlier.year()) * 12
        + i64::from(later.month()) - i64::from(earlier.month());
    let position = |t: DateTime<Utc>| (t.day(), t.num_seconds_from_midnight(), t.nanosecond());
    if position(later) < position(earlier) {
        months -= 1;
    }
    months.max(0)
}

/// Distance phrase between two instants, using the date-fns
/// `formatDistance` thresholds. Future timestamps read as "now".
fn distance_phrase(created: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let created = created.min(now);
    let minutes = round_div((now - created).num_seconds(), 60);
    match minutes {
        0 => "less than a minute".to_string(),
        m if m < 45 => plural(m, "minute"),
        m if m < 90 => "about 1 hour".to_string(),
        m if m < MINUTES_IN_DAY => format!("about {}", plural(round_div(m, 60), "hour")),
        m if m < 2_520 => "1 day".to_string(),
        m if m < MINUTES_IN_MONTH => plural(round_div(m, MINUTES_IN_DAY), "day"),
        m if m < 2 * MINUTES_IN_MONTH => {
            format!("about {}", plural(round_div(m, MINUTES_IN_MONTH), "month"))
        }
        m => {
            let months = calendar_months(created, now);
            if months < 12 {
                return plural(round_div(m, MINUTES_IN_MONTH), "month");
            }
            let years = months / 12;
            match months % 12 {
                r if r < 3 => format!("about {}", plural(years, "year")),
                r if r < 9 => format!("over {}", plural(years, "year")),
                _ => format!("almost {}", plural(years + 1, "year")),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ProjectId, ScenarioId};
    use chrono::{Duration, TimeZone};

    fn scenario() -> Scenario {
        Scenario::new(
            ScenarioId::new("S1").unwrap(),
            ProjectId::new("P1").unwrap(),
            "Login",
        )
        .with_author("user_1", "Ada")
    }

    #[test]
    fn author_label_for_viewer() {
        let s = scenario();
        assert_eq!(author_label(&s, Some(&UserId::new("user_1").unwrap())), "You");
        assert_eq!(author_label(&s, Some(&UserId::new("user_2").unwrap())), "Ada");
        assert_eq!(author_label(&s, None), "Ada");
    }

    #[test]
    fn parses_supported_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2024-05-01T10:00:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01T10:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01T10:00:00.000"), Some(expected));
        assert_eq!(
            parse_timestamp(&expected.timestamp_millis().to_string()),
            Some(expected)
        );
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn created_at_label_phrases() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let label = |ago: Duration| {
            let s = scenario().with_created_at((now - ago).to_rfc3339());
            created_at_label(&s, now).unwrap()
        };

        assert_eq!(label(Duration::seconds(10)), "less than a minute ago");
        assert_eq!(label(Duration::minutes(5)), "5 minutes ago");
        assert_eq!(label(Duration::minutes(60)), "about 1 hour ago");
        assert_eq!(label(Duration::hours(2)), "about 2 hours ago");
        assert_eq!(label(Duration::hours(30)), "1 day ago");
        assert_eq!(label(Duration::days(3)), "3 days ago");
        assert_eq!(label(Duration::days(40)), "about 1 month ago");
    }

    #[test]
    fn created_at_label_rounds_minutes_before_thresholds() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let label = |ago: Duration| {
            let s = scenario().with_created_at((now - ago).to_rfc3339());
            created_at_label(&s, now).unwrap()
        };

        assert_eq!(label(Duration::seconds(29)), "less than a minute ago");
        assert_eq!(label(Duration::seconds(30)), "1 minute ago");
        assert_eq!(label(Duration::seconds(44 * 60 + 29)), "44 minutes ago");
        assert_eq!(label(Duration::seconds(44 * 60 + 40)), "about 1 hour ago");
        assert_eq!(label(Duration::minutes(89)), "about 1 hour ago");
        assert_eq!(label(Duration::minutes(90)), "about 2 hours ago");
        assert_eq!(label(Duration::hours(-2)), "less than a minute ago");
    }

    #[test]
    fn created_at_label_months_and_years() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let label = |y, m, d| {
            let created = Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap();
            let s = scenario().with_created_at(created.to_rfc3339());
            created_at_label(&s, now).unwrap()
        };

        assert_eq!(label(2024, 1, 1), "5 months ago");
        assert_eq!(label(2023, 6, 1), "about 1 year ago");
        assert_eq!(label(2023, 1, 1), "over 1 year ago");
        assert_eq!(label(2022, 7, 15), "almost 2 years ago");
        assert_eq!(label(2022, 6, 1), "about 2 years ago");
    }

    #[test]
    fn created_at_label_missing_timestamp() {
        assert_eq!(created_at_label(&scenario(), Utc::now()), None);
    }
}
