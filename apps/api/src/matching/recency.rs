use chrono::{Datelike, NaiveDate};

/// Factor used when a candidate never recorded a last-used date.
pub const NEUTRAL_RECENCY: f64 = 0.5;

/// (max whole months elapsed, factor), smallest window first.
const RECENCY_WINDOWS: &[(u32, f64)] = &[(3, 1.0), (12, 0.9), (24, 0.7), (36, 0.5), (60, 0.3)];

/// Factor for anything older than the last window.
const STALE_RECENCY: f64 = 0.1;

/// Step-decay multiplier for how long ago a skill was last used.
/// Non-increasing in elapsed time; always one of 1.0, 0.9, 0.7, 0.5, 0.3, 0.1.
pub fn recency_factor(last_used: Option<NaiveDate>, today: NaiveDate) -> f64 {
    let Some(last_used) = last_used else {
        return NEUTRAL_RECENCY;
    };
    let months = whole_months_between(last_used, today);
    RECENCY_WINDOWS
        .iter()
        .find(|(max_months, _)| months <= *max_months)
        .map(|(_, factor)| *factor)
        .unwrap_or(STALE_RECENCY)
}

/// Whole calendar months between two dates, in either order.
/// A month only counts once its day-of-month has been reached.
pub fn whole_months_between(a: NaiveDate, b: NaiveDate) -> u32 {
    let (start, end) = if a <= b { (a, b) } else { (b, a) };
    let years = end.year() - start.year();
    let months = end.month() as i32 - start.month() as i32;
    let mut total = years * 12 + months;
    if end.day() < start.day() {
        total -= 1;
    }
    total.max(0) as u32
}
