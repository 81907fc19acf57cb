//! Date-range planning for issue downloads.
//!
//! Both range bounds arrive as compact `YYYYMMDD` strings. Expansion is
//! a pure computation: bad input or an inverted range yields an empty
//! plan, which the caller treats as "nothing to do" and reports before
//! any network activity happens.

use chrono::NaiveDate;

/// The single accepted format for range bounds, e.g. `20230501`.
pub const DATE_FORMAT: &str = "%Y%m%d";

/// Expand an inclusive `[begin, end]` pair into every calendar day in
/// ascending order.
///
/// Returns an empty vector when either bound fails to parse or when
/// `begin > end`.
pub fn expand_date_range(begin: &str, end: &str) -> Vec<NaiveDate> {
    let (Ok(begin), Ok(end)) = (
        NaiveDate::parse_from_str(begin, DATE_FORMAT),
        NaiveDate::parse_from_str(end, DATE_FORMAT),
    ) else {
        return Vec::new();
    };
    if begin > end {
        return Vec::new();
    }

    let mut days = Vec::new();
    let mut day = begin;
    while day <= end {
        days.push(day);
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }
    days
}

/// Month key a day's articles accumulate under, e.g. `202305`.
pub fn month_key(day: NaiveDate) -> String {
    day.format("%Y%m").to_string()
}

/// File name the batch for a month key is persisted as, e.g. `2023-05.json`.
pub fn month_file_name(key: &str) -> String {
    format!("{}-{}.json", &key[..4], &key[4..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_inclusive_range() {
        let days = expand_date_range("20230501", "20230503");
        assert_eq!(days.len(), 3);
        assert_eq!(days[0], NaiveDate::from_ymd_opt(2023, 5, 1).unwrap());
        assert_eq!(days[2], NaiveDate::from_ymd_opt(2023, 5, 3).unwrap());
        assert!(days.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_expand_single_day() {
        let days = expand_date_range("20230501", "20230501");
        assert_eq!(days, vec![NaiveDate::from_ymd_opt(2023, 5, 1).unwrap()]);
    }

    #[test]
    fn test_expand_counts_match_day_arithmetic() {
        let begin = NaiveDate::from_ymd_opt(2023, 12, 20).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let days = expand_date_range("20231220", "20240110");
        assert_eq!(days.len() as i64, (end - begin).num_days() + 1);
        assert_eq!(days.first().copied(), Some(begin));
        assert_eq!(days.last().copied(), Some(end));
    }

    #[test]
    fn test_expand_crosses_leap_day() {
        let days = expand_date_range("20240228", "20240301");
        assert_eq!(days.len(), 3);
        assert_eq!(days[1], NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn test_inverted_range_is_empty() {
        assert!(expand_date_range("20230502", "20230501").is_empty());
    }

    #[test]
    fn test_unparsable_input_is_empty() {
        assert!(expand_date_range("2023-05-01", "20230503").is_empty());
        assert!(expand_date_range("20230501", "not a date").is_empty());
        assert!(expand_date_range("20231301", "20231302").is_empty());
    }

    #[test]
    fn test_month_key_and_file_name() {
        let day = NaiveDate::from_ymd_opt(2023, 5, 7).unwrap();
        let key = month_key(day);
        assert_eq!(key, "202305");
        assert_eq!(month_file_name(&key), "2023-05.json");
    }
}
