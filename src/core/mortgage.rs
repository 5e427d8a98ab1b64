use chrono::NaiveDate;

use super::dates::month_start;
use super::error::{ScheduleError, check_non_negative};
use super::types::{MortgageRow, round2};

/// Terms of a fixed-rate amortizing loan on an appreciating home.
#[derive(Debug, Clone)]
pub struct MortgageTerms {
    pub home_price: f64,
    pub down_payment: f64,
    pub pmi_monthly: f64,
    pub other_monthly_fees: f64,
    pub annual_rate_pct: f64,
    pub term_years: u32,
    pub annual_appreciation_pct: f64,
    pub start_date: NaiveDate,
}

/// Level-payment amortization generator. Pure: the same terms always
/// produce the same table.
#[derive(Debug, Clone)]
pub struct MortgageSchedule {
    home_price: f64,
    loan_amount: f64,
    pmi_monthly: f64,
    other_monthly_fees: f64,
    monthly_rate: f64,
    monthly_appreciation: f64,
    periods: u32,
    start_date: NaiveDate,
}

impl MortgageSchedule {
    pub fn new(terms: MortgageTerms) -> Result<Self, ScheduleError> {
        check_non_negative("home_price", terms.home_price)?;
        check_non_negative("down_payment", terms.down_payment)?;
        check_non_negative("pmi_monthly", terms.pmi_monthly)?;
        check_non_negative("other_monthly_fees", terms.other_monthly_fees)?;
        check_non_negative("loan_rate_pct", terms.annual_rate_pct)?;
        check_non_negative("annual_appreciation_pct", terms.annual_appreciation_pct)?;
        if terms.term_years == 0 {
            return Err(ScheduleError::ZeroTerm);
        }
        if terms.down_payment > terms.home_price {
            return Err(ScheduleError::DownPaymentExceedsPrice {
                down_payment: terms.down_payment,
                home_price: terms.home_price,
            });
        }

        Ok(Self {
            home_price: terms.home_price,
            loan_amount: terms.home_price - terms.down_payment,
            pmi_monthly: terms.pmi_monthly,
            other_monthly_fees: terms.other_monthly_fees,
            monthly_rate: terms.annual_rate_pct / 12.0 / 100.0,
            monthly_appreciation: terms.annual_appreciation_pct / 12.0 / 100.0,
            periods: terms.term_years * 12,
            start_date: terms.start_date,
        })
    }

    pub fn loan_amount(&self) -> f64 {
        self.loan_amount
    }

    pub fn term_months(&self) -> u32 {
        self.periods
    }

    /// Equal Monthly Installment: the constant payment amortizing the loan
    /// over the full term, via the closed-form annuity formula. The
    /// zero-rate branch avoids the 0/0 in the formula.
    pub fn monthly_payment(&self) -> f64 {
        let n = self.periods as f64;
        let r = self.monthly_rate;
        if r == 0.0 {
            return round2(self.loan_amount / n);
        }
        let growth = (1.0 + r).powi(self.periods as i32);
        round2(self.loan_amount * r * growth / (growth - 1.0))
    }

    /// Month-by-month amortization table, `term_months() + 1` rows.
    /// Period 0 is the synthetic month-zero row.
    ///
    /// When the payment does not cover the interest due, the principal
    /// portion floors at zero and the balance stalls instead of growing;
    /// true negative amortization is deliberately not modeled.
    pub fn schedule(&self) -> Vec<MortgageRow> {
        let emi = self.monthly_payment();
        // PMI cancels permanently once the balance falls to 80% of the
        // original purchase price; later value drops never reinstate it.
        let pmi_cancel_threshold = 0.80 * self.home_price;

        let mut balance = self.loan_amount;
        let mut home_value = self.home_price;
        let mut pmi_active = true;
        let mut cumulative_interest = 0.0;
        let mut cumulative_principal = 0.0;
        let mut cumulative_pmi = 0.0;
        let mut cumulative_other = 0.0;

        let mut rows = Vec::with_capacity(self.periods as usize + 1);
        rows.push(MortgageRow {
            date: month_start(self.start_date, 0),
            outstanding_balance: balance,
            payment_amount: 0.0,
            interest_payment: 0.0,
            principal_payment: 0.0,
            pmi_payment: 0.0,
            other_fees_payment: 0.0,
            total_monthly_payment: 0.0,
            cumulative_interest: 0.0,
            cumulative_principal: 0.0,
            cumulative_pmi: 0.0,
            cumulative_total: 0.0,
            home_value,
            home_equity: home_value - balance,
        });

        for period in 1..=self.periods {
            let interest = round2(balance * self.monthly_rate);
            let principal = (emi - interest).max(0.0);
            balance = (balance - principal).max(0.0);
            home_value = round2(home_value * (1.0 + self.monthly_appreciation));

            if pmi_active && balance <= pmi_cancel_threshold {
                pmi_active = false;
            }
            let pmi = if pmi_active { self.pmi_monthly } else { 0.0 };

            cumulative_interest += interest;
            cumulative_principal += principal;
            cumulative_pmi += pmi;
            cumulative_other += self.other_monthly_fees;

            rows.push(MortgageRow {
                date: month_start(self.start_date, period),
                outstanding_balance: balance,
                payment_amount: emi,
                interest_payment: interest,
                principal_payment: principal,
                pmi_payment: pmi,
                other_fees_payment: self.other_monthly_fees,
                total_monthly_payment: emi + pmi + self.other_monthly_fees,
                cumulative_interest,
                cumulative_principal,
                cumulative_pmi,
                cumulative_total: cumulative_interest
                    + cumulative_principal
                    + cumulative_pmi
                    + cumulative_other,
                home_value,
                home_equity: home_value - balance,
            });
        }

        rows
    }
}
