use chrono::NaiveDate;

use super::dates::month_start;
use super::error::{ScheduleError, check_non_negative};
use super::types::RentRow;

/// Terms of a rental with a fixed 12-month lease that re-prices annually.
#[derive(Debug, Clone)]
pub struct RentTerms {
    pub monthly_rent: f64,
    pub annual_increase_pct: f64,
    pub term_years: u32,
    pub start_date: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct RentSchedule {
    monthly_rent: f64,
    annual_rate: f64,
    periods: u32,
    start_date: NaiveDate,
}

impl RentSchedule {
    pub fn new(terms: RentTerms) -> Result<Self, ScheduleError> {
        check_non_negative("monthly_rent", terms.monthly_rent)?;
        check_non_negative("annual_rent_increase_pct", terms.annual_increase_pct)?;
        if terms.term_years == 0 {
            return Err(ScheduleError::ZeroTerm);
        }

        Ok(Self {
            monthly_rent: terms.monthly_rent,
            annual_rate: terms.annual_increase_pct / 100.0,
            periods: terms.term_years * 12,
            start_date: terms.start_date,
        })
    }

    /// Rent for 0-based month `month`. The increase applies once per
    /// elapsed full year, not monthly, and rounds UP to the next whole
    /// currency unit so the cost series never understates.
    pub fn rent_at(&self, month: u32) -> f64 {
        let elapsed_years = month / 12;
        (self.monthly_rent * (1.0 + self.annual_rate).powi(elapsed_years as i32)).ceil()
    }

    /// `term_months + 1` rows, aligned with the mortgage table's inclusive
    /// month-zero row.
    pub fn schedule(&self) -> Vec<RentRow> {
        (0..=self.periods)
            .map(|month| RentRow {
                date: month_start(self.start_date, month),
                rent_cost: self.rent_at(month),
            })
            .collect()
    }
}
