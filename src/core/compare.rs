use std::collections::HashMap;

use chrono::NaiveDate;

use super::dates::first_of_month;
use super::error::ScheduleError;
use super::income::{IncomeSchedule, IncomeTerms};
use super::invest::{InvestmentSchedule, InvestmentTerms};
use super::mortgage::{MortgageSchedule, MortgageTerms};
use super::rent::{RentSchedule, RentTerms};
use super::types::{
    ComparisonResult, ComparisonRow, IncomeRow, Inputs, InvestmentRow, MortgageRow, RentRow,
    Summary, Verdict,
};

/// Runs the full buy-vs-rent comparison: rent and mortgage schedules first
/// (independent), then the investment schedule fed by both, then an inner
/// join of every series on the date key. Pure and stateless; identical
/// inputs always produce an identical result.
pub fn run_comparison(inputs: &Inputs) -> Result<ComparisonResult, ScheduleError> {
    let start_date = first_of_month(inputs.start_date);

    let mortgage = MortgageSchedule::new(MortgageTerms {
        home_price: inputs.home_price,
        down_payment: inputs.down_payment,
        pmi_monthly: inputs.pmi_monthly,
        other_monthly_fees: inputs.other_monthly_fees,
        annual_rate_pct: inputs.loan_rate_pct,
        term_years: inputs.loan_term_years,
        annual_appreciation_pct: inputs.annual_appreciation_pct,
        start_date,
    })?;
    let rent = RentSchedule::new(RentTerms {
        monthly_rent: inputs.monthly_rent,
        annual_increase_pct: inputs.annual_rent_increase_pct,
        term_years: inputs.loan_term_years,
        start_date,
    })?;
    // Skipping the purchase frees the down payment and the one-time fees
    // for the market instead.
    let investment = InvestmentSchedule::new(InvestmentTerms {
        initial_investment: inputs.down_payment + inputs.upfront_home_fees,
        annual_growth_pct: inputs.annual_investment_growth_pct,
        term_years: inputs.loan_term_years,
        start_date,
    })?;

    log::debug!(
        "running comparison over {} months from {start_date}",
        mortgage.term_months()
    );

    let mortgage_rows = mortgage.schedule();
    let rent_rows = rent.schedule();

    let rents: Vec<f64> = rent_rows.iter().map(|row| row.rent_cost).collect();
    let home_costs: Vec<f64> = mortgage_rows
        .iter()
        .map(|row| row.total_monthly_payment)
        .collect();
    let investment_rows = investment.schedule(&rents, &home_costs)?;

    let income_rows = match inputs.monthly_net_income {
        Some(monthly_net_income) => Some(
            IncomeSchedule::new(IncomeTerms {
                monthly_net_income,
                annual_growth_pct: inputs.annual_income_growth_pct,
                term_years: inputs.loan_term_years,
                start_date,
            })?
            .schedule(),
        ),
        None => None,
    };

    let rows = merge(&mortgage_rows, &rent_rows, &investment_rows, &income_rows);
    let last = rows.last().ok_or(ScheduleError::EmptyComparison)?;
    let summary = Summary {
        final_home_equity: last.home_equity,
        final_investment_balance: last.investment_ending_balance,
        difference: last.home_equity - last.investment_ending_balance,
        verdict: Verdict::from_final_values(last.home_equity, last.investment_ending_balance),
    };

    Ok(ComparisonResult { summary, rows })
}

/// Inner join on the date key: a month appears in the output only when
/// every source series has it. With the shared start date the prefixes
/// align, so the result has `min(len)` rows.
fn merge(
    mortgage_rows: &[MortgageRow],
    rent_rows: &[RentRow],
    investment_rows: &[InvestmentRow],
    income_rows: &Option<Vec<IncomeRow>>,
) -> Vec<ComparisonRow> {
    let rent_by_date: HashMap<NaiveDate, &RentRow> =
        rent_rows.iter().map(|row| (row.date, row)).collect();
    let investment_by_date: HashMap<NaiveDate, &InvestmentRow> =
        investment_rows.iter().map(|row| (row.date, row)).collect();
    let income_by_date: Option<HashMap<NaiveDate, &IncomeRow>> = income_rows
        .as_ref()
        .map(|rows| rows.iter().map(|row| (row.date, row)).collect());

    let mut rows = Vec::with_capacity(mortgage_rows.len());
    for mortgage in mortgage_rows {
        let Some(rent) = rent_by_date.get(&mortgage.date) else {
            continue;
        };
        let Some(investment) = investment_by_date.get(&mortgage.date) else {
            continue;
        };
        let monthly_income = match &income_by_date {
            Some(by_date) => match by_date.get(&mortgage.date) {
                Some(income) => Some(income.monthly_income),
                None => continue,
            },
            None => None,
        };

        rows.push(ComparisonRow {
            date: mortgage.date,
            rent_cost: rent.rent_cost,
            outstanding_balance: mortgage.outstanding_balance,
            payment_amount: mortgage.payment_amount,
            interest_payment: mortgage.interest_payment,
            principal_payment: mortgage.principal_payment,
            pmi_payment: mortgage.pmi_payment,
            other_fees_payment: mortgage.other_fees_payment,
            total_monthly_payment: mortgage.total_monthly_payment,
            cumulative_interest: mortgage.cumulative_interest,
            cumulative_principal: mortgage.cumulative_principal,
            cumulative_pmi: mortgage.cumulative_pmi,
            cumulative_total: mortgage.cumulative_total,
            home_value: mortgage.home_value,
            home_equity: mortgage.home_equity,
            investment_starting_balance: investment.starting_balance,
            investment_contribution: investment.contribution,
            investment_interest_earned: investment.interest_earned,
            investment_ending_balance: investment.ending_balance,
            monthly_income,
        });
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Months};
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    fn sample_inputs() -> Inputs {
        Inputs {
            home_price: 450_000.0,
            down_payment: 90_000.0,
            pmi_monthly: 0.0,
            other_monthly_fees: 0.0,
            loan_rate_pct: 4.5,
            loan_term_years: 30,
            annual_appreciation_pct: 3.0,
            upfront_home_fees: 4_500.0,
            annual_investment_growth_pct: 8.5,
            monthly_rent: 1_500.0,
            annual_rent_increase_pct: 2.0,
            monthly_net_income: None,
            annual_income_growth_pct: 0.0,
            start_date: NaiveDate::from_ymd_opt(2026, 9, 15).expect("valid test date"),
        }
    }

    #[test]
    fn merged_table_covers_the_inclusive_horizon_with_contiguous_months() {
        let result = run_comparison(&sample_inputs()).expect("valid inputs");
        assert_eq!(result.rows.len(), 361);

        let start = NaiveDate::from_ymd_opt(2026, 9, 1).expect("valid test date");
        assert_eq!(result.rows[0].date, start);
        for pair in result.rows.windows(2) {
            assert_eq!(pair[1].date, pair[0].date + Months::new(1));
        }
    }

    #[test]
    fn start_date_is_snapped_to_the_first_of_the_month() {
        let result = run_comparison(&sample_inputs()).expect("valid inputs");
        assert_eq!(result.rows[0].date.day0(), 0);
    }

    #[test]
    fn merged_row_carries_values_from_every_source() {
        let inputs = sample_inputs();
        let result = run_comparison(&inputs).expect("valid inputs");

        let first = &result.rows[0];
        assert_eq!(first.rent_cost, 1_500.0);
        assert_eq!(first.outstanding_balance, 360_000.0);
        assert_eq!(first.home_value, 450_000.0);
        assert_eq!(first.investment_starting_balance, 94_500.0);
        assert!(first.monthly_income.is_none());

        // Month 1: rent beats the mortgage payment, so the gap is invested.
        let second = &result.rows[1];
        assert_eq!(
            second.investment_contribution,
            (second.total_monthly_payment - second.rent_cost).max(0.0)
        );
    }

    #[test]
    fn summary_reflects_the_last_row() {
        let result = run_comparison(&sample_inputs()).expect("valid inputs");
        let last = result.rows.last().expect("non-empty");

        assert_eq!(result.summary.final_home_equity, last.home_equity);
        assert_eq!(
            result.summary.final_investment_balance,
            last.investment_ending_balance
        );
        assert_eq!(
            result.summary.difference,
            last.home_equity - last.investment_ending_balance
        );
        assert_eq!(
            result.summary.verdict,
            Verdict::from_final_values(last.home_equity, last.investment_ending_balance)
        );
    }

    #[test]
    fn income_column_appears_only_when_requested() {
        let mut inputs = sample_inputs();
        inputs.monthly_net_income = Some(6_000.0);
        inputs.annual_income_growth_pct = 3.0;

        let result = run_comparison(&inputs).expect("valid inputs");
        assert_eq!(result.rows.len(), 361);
        assert_eq!(result.rows[0].monthly_income, Some(6_000.0));
        assert_eq!(result.rows[12].monthly_income, Some(6_180.0));

        let json = serde_json::to_string(&result.rows[0]).expect("row serializes");
        assert!(json.contains("\"monthlyIncome\""));

        let without = run_comparison(&sample_inputs()).expect("valid inputs");
        let json = serde_json::to_string(&without.rows[0]).expect("row serializes");
        assert!(!json.contains("\"monthlyIncome\""));
    }

    #[test]
    fn invalid_inputs_are_rejected_with_a_tagged_error() {
        let mut inputs = sample_inputs();
        inputs.down_payment = inputs.home_price + 1.0;
        assert!(matches!(
            run_comparison(&inputs),
            Err(ScheduleError::DownPaymentExceedsPrice { .. })
        ));

        let mut inputs = sample_inputs();
        inputs.loan_term_years = 0;
        assert_eq!(run_comparison(&inputs), Err(ScheduleError::ZeroTerm));

        let mut inputs = sample_inputs();
        inputs.monthly_rent = f64::NAN;
        assert_eq!(
            run_comparison(&inputs),
            Err(ScheduleError::NonFinite {
                name: "monthly_rent"
            })
        );
    }

    #[test]
    fn identical_inputs_yield_identical_output() {
        let inputs = sample_inputs();
        let first = run_comparison(&inputs).expect("valid inputs");
        let second = run_comparison(&inputs).expect("valid inputs");

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).expect("result serializes"),
            serde_json::to_string(&second).expect("result serializes")
        );
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(24))]

        #[test]
        fn prop_merge_keeps_every_date_present_in_all_sources(
            price in 100_000u32..800_000,
            down_pct in 0u32..60,
            rate_bp in 0u32..1_200,
            term_years in 1u32..31,
            rent in 500u32..4_000,
            growth_bp in 0u32..1_200
        ) {
            let price = price as f64;
            let inputs = Inputs {
                home_price: price,
                down_payment: price * down_pct as f64 / 100.0,
                pmi_monthly: 300.0,
                other_monthly_fees: 150.0,
                loan_rate_pct: rate_bp as f64 / 100.0,
                loan_term_years: term_years,
                annual_appreciation_pct: 3.0,
                upfront_home_fees: 2_000.0,
                annual_investment_growth_pct: growth_bp as f64 / 100.0,
                monthly_rent: rent as f64,
                annual_rent_increase_pct: 2.0,
                monthly_net_income: None,
                annual_income_growth_pct: 0.0,
                start_date: NaiveDate::from_ymd_opt(2026, 9, 1).expect("valid test date"),
            };

            let result = run_comparison(&inputs).expect("valid inputs");
            prop_assert_eq!(result.rows.len(), term_years as usize * 12 + 1);
            for pair in result.rows.windows(2) {
                prop_assert!(pair[0].date < pair[1].date);
            }
        }
    }
}
