use chrono::NaiveDate;

/// `125 -> "2h 5m"`, `60 -> "1h"`, `45 -> "45m"`; zero or absent is omitted.
pub fn format_runtime(minutes: Option<u32>) -> Option<String> {
    let minutes = minutes.filter(|m| *m > 0)?;
    let hours = minutes / 60;
    let rest = minutes % 60;
    let formatted = match (hours, rest) {
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}m"),
    };
    Some(formatted)
}

/// TV runtime comes from the first entry of the episode runtime list.
pub fn format_episode_runtime(runtimes: &[u32]) -> Option<String> {
    format_runtime(runtimes.first().copied())
}

pub fn extract_year(date: Option<&str>) -> Option<String> {
    let date = date?.trim();
    date.get(..4).map(|s| s.to_string())
}

/// `"2024-03-05" -> "March 5, 2024"`. Unparseable dates come back as-is.
pub fn format_long_date(date: Option<&str>) -> Option<String> {
    let date = date?.trim();
    if date.is_empty() {
        return None;
    }
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(d) => Some(d.format("%B %-d, %Y").to_string()),
        Err(_) => Some(date.to_string()),
    }
}

/// One decimal, omitted for unrated entries.
pub fn format_rating(vote_average: f64) -> Option<String> {
    if vote_average > 0.0 {
        Some(format!("{vote_average:.1}"))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_runtime_segments() {
        assert_eq!(format_runtime(Some(125)).as_deref(), Some("2h 5m"));
        assert_eq!(format_runtime(Some(60)).as_deref(), Some("1h"));
        assert_eq!(format_runtime(Some(45)).as_deref(), Some("45m"));
        assert_eq!(format_runtime(Some(0)), None);
        assert_eq!(format_runtime(None), None);
    }

    #[test]
    fn episode_runtime_uses_first_entry() {
        assert_eq!(format_episode_runtime(&[42, 60]).as_deref(), Some("42m"));
        assert_eq!(format_episode_runtime(&[]), None);
        assert_eq!(format_episode_runtime(&[0, 30]), None);
    }

    #[test]
    fn year_is_first_four_chars() {
        assert_eq!(extract_year(Some("1999-03-31")).as_deref(), Some("1999"));
        assert_eq!(extract_year(Some("20")), None);
        assert_eq!(extract_year(None), None);
    }

    #[test]
    fn long_dates() {
        assert_eq!(
            format_long_date(Some("2024-03-05")).as_deref(),
            Some("March 5, 2024")
        );
        assert_eq!(format_long_date(Some("soon")).as_deref(), Some("soon"));
        assert_eq!(format_long_date(Some("")), None);
    }

    #[test]
    fn ratings() {
        assert_eq!(format_rating(7.349).as_deref(), Some("7.3"));
        assert_eq!(format_rating(0.0), None);
    }
}
