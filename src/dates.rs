use chrono::{NaiveDate, NaiveDateTime};

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Interprets one of the opaque date strings carried by schedule entities.
///
/// Accepts `YYYY-MM-DD HH:MM` (the usual export form), the same with seconds,
/// and a bare `YYYY-MM-DD` which is read as midnight. Anything else is `None`.
pub fn parse_xer_datetime(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(input, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

pub(crate) fn parse_optional(input: Option<&str>) -> Option<NaiveDateTime> {
    input.and_then(parse_xer_datetime)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_export_minute_precision() {
        let parsed = parse_xer_datetime("2024-03-01 08:00").unwrap();
        assert_eq!(parsed.to_string(), "2024-03-01 08:00:00");
    }

    #[test]
    fn bare_date_is_midnight() {
        let parsed = parse_xer_datetime("2024-03-01").unwrap();
        assert_eq!(parsed.to_string(), "2024-03-01 00:00:00");
    }

    #[test]
    fn garbage_is_none() {
        assert!(parse_xer_datetime("next tuesday").is_none());
        assert!(parse_xer_datetime("").is_none());
    }
}
