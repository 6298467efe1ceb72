//! Date helpers shared by the monthly generators.

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime};
use rand::Rng;

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Same month as `month`, on `day` (clamped to the last valid day).
pub fn on_day(month: NaiveDate, day: u32) -> NaiveDate {
    let mut day = day.clamp(1, 31);
    loop {
        if let Some(date) = month.with_day(day) {
            return date;
        }
        day -= 1;
    }
}

/// First day of every month from `start`'s month through `end`'s month.
pub fn month_starts(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut months = Vec::new();
    let mut cursor = first_of_month(start);
    while cursor <= end {
        months.push(cursor);
        match cursor.checked_add_months(Months::new(1)) {
            Some(next) => cursor = next,
            None => break,
        }
    }
    months
}

pub fn years_before(date: NaiveDate, years: u32) -> NaiveDate {
    date.checked_sub_months(Months::new(years * 12))
        .unwrap_or(date)
}

/// Uniform date in `[start, end]`, both inclusive.
pub fn random_date(rng: &mut impl Rng, start: NaiveDate, end: NaiveDate) -> NaiveDate {
    let days = (end - start).num_days();
    if days <= 0 {
        return start;
    }
    start + Duration::days(rng.random_range(0..=days))
}

/// Uniform instant in `[start 00:00, end 00:00)` at second resolution.
pub fn random_instant(rng: &mut impl Rng, start: NaiveDate, end: NaiveDate) -> NaiveDateTime {
    let start = midnight(start);
    let seconds = (midnight(end) - start).num_seconds();
    if seconds <= 0 {
        return start;
    }
    start + Duration::seconds(rng.random_range(0..seconds))
}

pub fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_starts_include_cutoff_month() {
        let months = month_starts(date(2025, 2, 1), date(2026, 2, 15));
        assert_eq!(months.len(), 13);
        assert_eq!(months.first(), Some(&date(2025, 2, 1)));
        assert_eq!(months.last(), Some(&date(2026, 2, 1)));
    }

    #[test]
    fn on_day_clamps_short_months() {
        assert_eq!(on_day(date(2025, 2, 1), 31), date(2025, 2, 28));
        assert_eq!(on_day(date(2025, 3, 1), 10), date(2025, 3, 10));
    }

    #[test]
    fn random_dates_stay_in_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let (start, end) = (date(2024, 11, 1), date(2025, 1, 31));
        for _ in 0..500 {
            let value = random_date(&mut rng, start, end);
            assert!(value >= start && value <= end);
            let instant = random_instant(&mut rng, start, end);
            assert!(instant >= midnight(start) && instant < midnight(end));
        }
    }
}
