use chrono::{Datelike, Months, NaiveDate};

/// Snaps a date to the first day of its month. Every schedule is keyed on
/// month starts so that the three series join exactly.
pub(crate) fn first_of_month(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).expect("day 1 exists in every month")
}

/// First-of-month date `months_ahead` whole months after `anchor`'s month.
pub(crate) fn month_start(anchor: NaiveDate, months_ahead: u32) -> NaiveDate {
    first_of_month(anchor)
        .checked_add_months(Months::new(months_ahead))
        .expect("schedule dates stay within the calendar range")
}
