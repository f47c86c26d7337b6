//! Loans and the committed-loan index
//!
//! A loan records one book lent to one member between a borrow date and a due
//! date. Loans start `Pending` inside a member's pending list and only affect
//! books and members once committed:
//!
//! ```text
//! Pending --commit(id)--> Current --complete--> Complete
//! ```
//!
//! Committed loans live in the [`LoanIndex`]. Books and members refer to them
//! by [`LoanId`] only.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::ids::{BookId, LoanId, MemberId};

// =============================================================================
// Loan State
// =============================================================================

/// Lifecycle state of a loan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanState {
    /// Staged in a pending list, not yet binding
    #[default]
    Pending,
    /// Committed; the book is out with the borrower
    Current,
    /// Book came back or was written off
    Complete,
}

impl fmt::Display for LoanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoanState::Pending => write!(f, "pending"),
            LoanState::Current => write!(f, "current"),
            LoanState::Complete => write!(f, "complete"),
        }
    }
}

// =============================================================================
// Overdue capability
// =============================================================================

/// Something whose overdue status can be recomputed and read back
pub trait OverdueCheck {
    /// Recompute the overdue flag as of `as_of` and return it
    fn check_overdue(&mut self, as_of: NaiveDate) -> Result<bool>;

    /// The flag as of the last check
    fn is_overdue(&self) -> bool;
}

/// Due date for a loan of `period_days` starting on `borrow_date`
pub fn due_date_for(borrow_date: NaiveDate, period_days: u32) -> NaiveDate {
    borrow_date + Duration::days(i64::from(period_days))
}

// =============================================================================
// Loan
// =============================================================================

/// One book lent to one member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    /// Assigned when the loan is committed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<LoanId>,
    book: BookId,
    borrower: MemberId,
    borrow_date: NaiveDate,
    due_date: NaiveDate,
    overdue: bool,
    state: LoanState,
}

impl Loan {
    /// Create a pending loan
    pub fn new(
        book: BookId,
        borrower: MemberId,
        borrow_date: NaiveDate,
        due_date: NaiveDate,
    ) -> Result<Self> {
        if due_date < borrow_date {
            return Err(Error::InvalidArgument(format!(
                "due date {due_date} is before borrow date {borrow_date}"
            )));
        }

        Ok(Self {
            id: None,
            book,
            borrower,
            borrow_date,
            due_date,
            overdue: false,
            state: LoanState::Pending,
        })
    }

    /// Committed id; `None` while pending
    pub fn id(&self) -> Option<LoanId> {
        self.id
    }

    pub fn book(&self) -> BookId {
        self.book
    }

    pub fn borrower(&self) -> MemberId {
        self.borrower
    }

    pub fn borrow_date(&self) -> NaiveDate {
        self.borrow_date
    }

    pub fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    pub fn state(&self) -> LoanState {
        self.state
    }

    pub fn is_current(&self) -> bool {
        self.state == LoanState::Current
    }

    /// Make the loan binding under its final id
    pub fn commit(&mut self, id: LoanId) -> Result<()> {
        self.expect_state(LoanState::Pending, "commit")?;
        self.id = Some(id);
        self.state = LoanState::Current;
        Ok(())
    }

    /// Close a current loan
    pub fn complete(&mut self) -> Result<()> {
        self.expect_state(LoanState::Current, "complete")?;
        self.state = LoanState::Complete;
        Ok(())
    }

    /// Whole days past the due date as of `as_of` (0 if not late)
    pub fn days_overdue(&self, as_of: NaiveDate) -> i64 {
        (as_of - self.due_date).num_days().max(0)
    }

    /// Fine accrued for returning on `as_of`
    pub fn fine_due(&self, as_of: NaiveDate, fine_per_day: f64) -> f64 {
        self.days_overdue(as_of) as f64 * fine_per_day
    }

    fn expect_state(&self, expected: LoanState, operation: &str) -> Result<()> {
        if self.state == expected {
            return Ok(());
        }
        Err(Error::InvalidState(format!(
            "cannot {operation} {} loan of {}",
            self.state, self.book
        )))
    }
}

impl OverdueCheck for Loan {
    fn check_overdue(&mut self, as_of: NaiveDate) -> Result<bool> {
        self.expect_state(LoanState::Current, "check overdue status of")?;
        self.overdue = as_of > self.due_date;
        Ok(self.overdue)
    }

    fn is_overdue(&self) -> bool {
        self.overdue
    }
}

// =============================================================================
// Loan Index (global committed loans)
// =============================================================================

/// Every committed loan that has not been discharged, keyed by id
#[derive(Debug, Clone, Default)]
pub struct LoanIndex {
    loans: BTreeMap<LoanId, Loan>,
}

impl LoanIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a committed loan
    pub fn insert(&mut self, loan: Loan) -> Result<LoanId> {
        let id = loan.id().ok_or_else(|| {
            Error::InvalidState(format!("loan of {} has not been committed", loan.book()))
        })?;
        if self.loans.contains_key(&id) {
            return Err(Error::InvalidState(format!("{id} is already indexed")));
        }
        self.loans.insert(id, loan);
        Ok(id)
    }

    pub fn get(&self, id: LoanId) -> Option<&Loan> {
        self.loans.get(&id)
    }

    pub fn get_mut(&mut self, id: LoanId) -> Option<&mut Loan> {
        self.loans.get_mut(&id)
    }

    pub fn contains(&self, id: LoanId) -> bool {
        self.loans.contains_key(&id)
    }

    /// Drop a loan from the index
    pub fn remove(&mut self, id: LoanId) -> Option<Loan> {
        self.loans.remove(&id)
    }

    /// All indexed loans in id order
    pub fn iter(&self) -> impl Iterator<Item = &Loan> {
        self.loans.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Loan> {
        self.loans.values_mut()
    }

    /// Loans still out with their borrowers
    pub fn current(&self) -> impl Iterator<Item = &Loan> {
        self.iter().filter(|loan| loan.is_current())
    }

    pub fn len(&self) -> usize {
        self.loans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loans.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================
