//! Absence percentage computation.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{ReportError, ReportResult};

/// Computes `absent_count / total_employees * 100`, rounded to two decimals.
///
/// Rounds halves away from zero, matching the warehouse's `ROUND(x, 2)`.
/// Fails fast with [`ReportError::EmptyPopulation`] when the population is
/// zero; a percentage over nobody is a precondition failure, not `NaN` and
/// not a silent zero.
pub fn absence_percentage(absent_count: usize, total_employees: usize) -> ReportResult<Decimal> {
    if total_employees == 0 {
        return Err(ReportError::EmptyPopulation);
    }

    let ratio = Decimal::from(absent_count as u64) * Decimal::from(100)
        / Decimal::from(total_employees as u64);
    Ok(ratio.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}
