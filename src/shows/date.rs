use std::sync::OnceLock;

use regex::Regex;

use crate::models::ShowDate;

// Optional alphabetic tag ("gd"), optional "19", then YY-M[M]-D[D]. The
// search is unanchored so ISO timestamps and identifier-style strings both
// match on their first date-looking fragment.
fn date_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"(?:[A-Za-z]+)?(?:19)?(\d{2})-(\d{1,2})-(\d{1,2})").ok())
        .as_ref()
}

/// Normalizes a loosely formatted show date to `YYYY-MM-DD`.
///
/// Two-digit years always land in the 1900s. Returns `None` when nothing in
/// the input looks like a date.
pub fn normalize_date(raw: &str) -> Option<ShowDate> {
    let caps = date_pattern()?.captures(raw)?;
    let year = format!("19{}", &caps[1]);
    Some(ShowDate::from_parts(&year, &caps[2], &caps[3]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(raw: &str) -> Option<String> {
        normalize_date(raw).map(|d| d.as_str().to_string())
    }

    #[test]
    fn accepts_documented_forms() {
        assert_eq!(norm("1977-04-23").as_deref(), Some("1977-04-23"));
        assert_eq!(norm("77-04-23").as_deref(), Some("1977-04-23"));
        assert_eq!(norm("gd77-04-23").as_deref(), Some("1977-04-23"));
        assert_eq!(norm("gd1977-04-23").as_deref(), Some("1977-04-23"));
    }

    #[test]
    fn finds_date_inside_timestamps_and_identifiers() {
        assert_eq!(norm("1972-08-27T00:00:00Z").as_deref(), Some("1972-08-27"));
        assert_eq!(
            norm("gd72-08-27.sbd.hollister.174.sbeok.shnf").as_deref(),
            Some("1972-08-27")
        );
    }

    #[test]
    fn pads_single_digit_month_and_day() {
        assert_eq!(norm("69-2-7").as_deref(), Some("1969-02-07"));
    }

    #[test]
    fn two_digit_years_stay_in_the_1900s() {
        assert_eq!(norm("gd03-01-02").as_deref(), Some("1903-01-02"));
    }

    #[test]
    fn undatable_input_returns_none() {
        for raw in ["", "unknown", "1977/05/08", "May 8, 1977", "77-05"] {
            assert_eq!(norm(raw), None, "{raw:?} should be undatable");
        }
    }

    #[test]
    fn output_is_always_canonical() {
        for raw in ["gd65-12-4", "1990-3-29", "xx88-07-04", "95-07-09"] {
            let date = norm(raw).unwrap();
            let parts: Vec<_> = date.split('-').collect();
            assert_eq!(parts.len(), 3);
            assert_eq!(parts[0].len(), 4);
            assert!(parts[0].starts_with("19"));
            assert_eq!(parts[1].len(), 2);
            assert_eq!(parts[2].len(), 2);
        }
    }
}
