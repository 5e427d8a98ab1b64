use chrono::NaiveDate;
use serde::Serialize;

/// Full parameter set for one buy-vs-rent comparison, as supplied by the
/// presentation layer. Rates are annual percentages (4.5 means 4.5%/year);
/// each schedule derives its own monthly fraction.
#[derive(Debug, Clone)]
pub struct Inputs {
    pub home_price: f64,
    pub down_payment: f64,
    pub pmi_monthly: f64,
    pub other_monthly_fees: f64,
    pub loan_rate_pct: f64,
    pub loan_term_years: u32,
    pub annual_appreciation_pct: f64,
    pub upfront_home_fees: f64,
    pub annual_investment_growth_pct: f64,
    pub monthly_rent: f64,
    pub annual_rent_increase_pct: f64,
    /// When present, a monthly net-income series is merged into the output
    /// for affordability context.
    pub monthly_net_income: Option<f64>,
    pub annual_income_growth_pct: f64,
    /// Anchor month for every schedule; snapped to the first of its month.
    pub start_date: NaiveDate,
}

/// One month of the amortization table. Period 0 is the synthetic
/// month-zero row: full principal outstanding, no payments.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MortgageRow {
    pub date: NaiveDate,
    pub outstanding_balance: f64,
    pub payment_amount: f64,
    pub interest_payment: f64,
    pub principal_payment: f64,
    pub pmi_payment: f64,
    pub other_fees_payment: f64,
    pub total_monthly_payment: f64,
    pub cumulative_interest: f64,
    pub cumulative_principal: f64,
    pub cumulative_pmi: f64,
    pub cumulative_total: f64,
    pub home_value: f64,
    pub home_equity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RentRow {
    pub date: NaiveDate,
    pub rent_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentRow {
    pub date: NaiveDate,
    /// Prior month's ending balance; the raw initial investment in month 0.
    pub starting_balance: f64,
    /// Cash freed up by renting instead of buying this month, never negative.
    pub contribution: f64,
    pub interest_earned: f64,
    pub ending_balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeRow {
    pub date: NaiveDate,
    pub monthly_income: f64,
}

/// One row of the merged comparison table: the inner join of the rent,
/// mortgage, and investment series on the date key, plus the optional
/// income column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRow {
    pub date: NaiveDate,
    pub rent_cost: f64,
    pub outstanding_balance: f64,
    pub payment_amount: f64,
    pub interest_payment: f64,
    pub principal_payment: f64,
    pub pmi_payment: f64,
    pub other_fees_payment: f64,
    pub total_monthly_payment: f64,
    pub cumulative_interest: f64,
    pub cumulative_principal: f64,
    pub cumulative_pmi: f64,
    pub cumulative_total: f64,
    pub home_value: f64,
    pub home_equity: f64,
    pub investment_starting_balance: f64,
    pub investment_contribution: f64,
    pub investment_interest_earned: f64,
    pub investment_ending_balance: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_income: Option<f64>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Home,
    Investing,
    Tie,
}

impl Verdict {
    pub fn from_final_values(home_equity: f64, investment_balance: f64) -> Self {
        if home_equity > investment_balance {
            Verdict::Home
        } else if investment_balance > home_equity {
            Verdict::Investing
        } else {
            Verdict::Tie
        }
    }
}

/// Headline metrics taken from the last merged row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub final_home_equity: f64,
    pub final_investment_balance: f64,
    /// Signed: positive favors buying, negative favors renting-and-investing.
    pub difference: f64,
    pub verdict: Verdict,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub summary: Summary,
    pub rows: Vec<ComparisonRow>,
}

/// Rounds to 2 decimal places, the resolution every monetary column is
/// reported at.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
