use thiserror::Error;

/// Validation and alignment failures raised at the boundary of the
/// comparison engine. There is no partial-failure mode: either the full
/// schedule set is produced or one of these is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScheduleError {
    #[error("{name} must be a finite number")]
    NonFinite { name: &'static str },

    #[error("{name} must be >= 0")]
    Negative { name: &'static str },

    #[error("loan term must be at least one year")]
    ZeroTerm,

    #[error("down payment ({down_payment}) cannot exceed home price ({home_price})")]
    DownPaymentExceedsPrice { down_payment: f64, home_price: f64 },

    #[error(
        "driver series must each have {expected} rows, got {rents} rent rows \
         and {home_costs} home cost rows"
    )]
    SeriesLengthMismatch {
        expected: usize,
        rents: usize,
        home_costs: usize,
    },

    #[error("comparison produced no rows")]
    EmptyComparison,
}

/// Rejects NaN/infinite and negative values with the offending parameter name.
pub(crate) fn check_non_negative(name: &'static str, value: f64) -> Result<(), ScheduleError> {
    if !value.is_finite() {
        return Err(ScheduleError::NonFinite { name });
    }
    if value < 0.0 {
        return Err(ScheduleError::Negative { name });
    }
    Ok(())
}
