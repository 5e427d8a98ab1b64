//! Buy-vs-rent comparison engine: three monthly schedule generators and
//! the orchestrator that joins them into one table.

mod compare;
mod dates;
mod error;
mod income;
mod invest;
mod mortgage;
mod rent;
mod types;

pub use compare::run_comparison;
pub use error::ScheduleError;
pub use income::{IncomeSchedule, IncomeTerms};
pub use invest::{InvestmentSchedule, InvestmentTerms};
pub use mortgage::{MortgageSchedule, MortgageTerms};
pub use rent::{RentSchedule, RentTerms};
pub use types::{
    ComparisonResult, ComparisonRow, IncomeRow, Inputs, InvestmentRow, MortgageRow, RentRow,
    Summary, Verdict,
};
