//! Overdue sweep over committed loans
//!
//! Recomputing overdue flags and reading them are separate steps. A sweep
//! re-checks every current loan against a date; queries only read the flags
//! left by the last sweep. Books and members are never touched: a member's
//! overdue status is derived from their loans when asked.

use chrono::NaiveDate;

use crate::error::Result;
use crate::loan::{Loan, LoanIndex, OverdueCheck};

/// Re-check every current loan as of `as_of`
///
/// Returns how many loans are overdue after the sweep.
pub fn update_overdue_status(index: &mut LoanIndex, as_of: NaiveDate) -> Result<usize> {
    let mut overdue = 0;
    for loan in index.iter_mut().filter(|loan| loan.is_current()) {
        if loan.check_overdue(as_of)? {
            overdue += 1;
        }
    }
    Ok(overdue)
}

/// Loans flagged overdue by the last sweep, in id order
pub fn find_overdue_loans(index: &LoanIndex) -> Vec<&Loan> {
    index.iter().filter(|loan| loan.is_overdue()).collect()
}
