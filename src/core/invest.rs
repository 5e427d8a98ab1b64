use chrono::NaiveDate;

use super::dates::month_start;
use super::error::{ScheduleError, check_non_negative};
use super::types::{InvestmentRow, round2};

/// Terms of the invest-the-difference alternative: the would-be down
/// payment and one-time fees go in up front, and every month renting
/// comes out cheaper than owning, the gap is contributed too.
#[derive(Debug, Clone)]
pub struct InvestmentTerms {
    pub initial_investment: f64,
    pub annual_growth_pct: f64,
    pub term_years: u32,
    pub start_date: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct InvestmentSchedule {
    initial_investment: f64,
    monthly_rate: f64,
    periods: u32,
    start_date: NaiveDate,
}

impl InvestmentSchedule {
    pub fn new(terms: InvestmentTerms) -> Result<Self, ScheduleError> {
        check_non_negative("initial_investment", terms.initial_investment)?;
        check_non_negative("annual_investment_growth_pct", terms.annual_growth_pct)?;
        if terms.term_years == 0 {
            return Err(ScheduleError::ZeroTerm);
        }

        Ok(Self {
            initial_investment: terms.initial_investment,
            monthly_rate: terms.annual_growth_pct / 12.0 / 100.0,
            periods: terms.term_years * 12,
            start_date: terms.start_date,
        })
    }

    pub fn term_months(&self) -> u32 {
        self.periods
    }

    /// Monthly compounding over the two pre-aligned driver series. Each
    /// series must hold exactly `term_months() + 1` entries, one per row of
    /// this schedule; anything else is an alignment bug upstream and is
    /// rejected rather than truncated.
    ///
    /// Contributions land at the start of the month and earn that whole
    /// month's interest.
    pub fn schedule(
        &self,
        monthly_rents: &[f64],
        total_home_costs: &[f64],
    ) -> Result<Vec<InvestmentRow>, ScheduleError> {
        let expected = self.periods as usize + 1;
        if monthly_rents.len() != expected || total_home_costs.len() != expected {
            return Err(ScheduleError::SeriesLengthMismatch {
                expected,
                rents: monthly_rents.len(),
                home_costs: total_home_costs.len(),
            });
        }

        let mut rows = Vec::with_capacity(expected);
        let mut balance = self.initial_investment;
        for (month, (rent, home)) in monthly_rents
            .iter()
            .zip(total_home_costs.iter())
            .enumerate()
        {
            let contribution = (home - rent).max(0.0);
            let starting_balance = balance;
            let base = balance + contribution;
            let interest = round2(base * self.monthly_rate);
            balance = base + interest;

            rows.push(InvestmentRow {
                date: month_start(self.start_date, month as u32),
                starting_balance,
                contribution,
                interest_earned: interest,
                ending_balance: balance,
            });
        }

        Ok(rows)
    }
}
