use chrono::NaiveDate;

use super::dates::month_start;
use super::error::{ScheduleError, check_non_negative};
use super::types::{IncomeRow, round2};

/// Net monthly income with an annual raise, stepped once per elapsed full
/// year like the rent series. Optional context column in the comparison.
#[derive(Debug, Clone)]
pub struct IncomeTerms {
    pub monthly_net_income: f64,
    pub annual_growth_pct: f64,
    pub term_years: u32,
    pub start_date: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct IncomeSchedule {
    monthly_net_income: f64,
    annual_rate: f64,
    periods: u32,
    start_date: NaiveDate,
}

impl IncomeSchedule {
    pub fn new(terms: IncomeTerms) -> Result<Self, ScheduleError> {
        check_non_negative("monthly_net_income", terms.monthly_net_income)?;
        check_non_negative("annual_income_growth_pct", terms.annual_growth_pct)?;
        if terms.term_years == 0 {
            return Err(ScheduleError::ZeroTerm);
        }

        Ok(Self {
            monthly_net_income: terms.monthly_net_income,
            annual_rate: terms.annual_growth_pct / 100.0,
            periods: terms.term_years * 12,
            start_date: terms.start_date,
        })
    }

    pub fn income_at(&self, month: u32) -> f64 {
        let elapsed_years = month / 12;
        round2(self.monthly_net_income * (1.0 + self.annual_rate).powi(elapsed_years as i32))
    }

    /// `term_months + 1` rows so the inner join with the other schedules
    /// keeps the full horizon.
    pub fn schedule(&self) -> Vec<IncomeRow> {
        (0..=self.periods)
            .map(|month| IncomeRow {
                date: month_start(self.start_date, month),
                monthly_income: self.income_at(month),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 9, 1).expect("valid test date")
    }

    #[test]
    fn raises_apply_once_per_elapsed_year() {
        let schedule = IncomeSchedule::new(IncomeTerms {
            monthly_net_income: 5_000.0,
            annual_growth_pct: 3.0,
            term_years: 2,
            start_date: start(),
        })
        .expect("valid terms");

        assert_eq!(schedule.income_at(0), 5_000.0);
        assert_eq!(schedule.income_at(11), 5_000.0);
        assert_eq!(schedule.income_at(12), 5_150.0);
        assert_eq!(schedule.income_at(24), 5_304.5);
    }

    #[test]
    fn row_count_matches_the_inclusive_horizon() {
        let rows = IncomeSchedule::new(IncomeTerms {
            monthly_net_income: 4_200.0,
            annual_growth_pct: 0.0,
            term_years: 5,
            start_date: start(),
        })
        .expect("valid terms")
        .schedule();

        assert_eq!(rows.len(), 61);
        assert!(rows.iter().all(|row| row.monthly_income == 4_200.0));
    }

    #[test]
    fn rejects_negative_income() {
        let err = IncomeSchedule::new(IncomeTerms {
            monthly_net_income: -1.0,
            annual_growth_pct: 0.0,
            term_years: 1,
            start_date: start(),
        })
        .expect_err("must reject");
        assert_eq!(
            err,
            ScheduleError::Negative {
                name: "monthly_net_income"
            }
        );
    }
}
