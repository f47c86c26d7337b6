//! Members: held loans, fines and borrowing eligibility
//!
//! A member may borrow while they hold fewer loans than the loan limit and
//! owe no more than the fine limit. Eligibility is never stored; it is derived
//! from the held loans, balance and limits every time it is read, so it always
//! reflects the last mutation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::ids::{LoanId, MemberId};
use crate::loan::OverdueCheck;

/// Default number of loans a member may hold at once
pub const LOAN_LIMIT: usize = 5;

/// Default fine balance above which borrowing stops
pub const FINE_LIMIT: f64 = 10.0;

// =============================================================================
// Member State
// =============================================================================

/// Whether a member may take out new loans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberState {
    BorrowingAllowed,
    BorrowingDisallowed,
}

impl fmt::Display for MemberState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberState::BorrowingAllowed => write!(f, "borrowing_allowed"),
            MemberState::BorrowingDisallowed => write!(f, "borrowing_disallowed"),
        }
    }
}

/// Loan and fine ceilings applied to a member
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BorrowingLimits {
    pub loan_limit: usize,
    pub fine_limit: f64,
}

impl Default for BorrowingLimits {
    fn default() -> Self {
        Self {
            loan_limit: LOAN_LIMIT,
            fine_limit: FINE_LIMIT,
        }
    }
}

impl BorrowingLimits {
    /// Eligibility for a member holding `loans` loans and owing `fines`
    pub fn state_for(&self, loans: usize, fines: f64) -> MemberState {
        if loans >= self.loan_limit || fines > self.fine_limit {
            MemberState::BorrowingDisallowed
        } else {
            MemberState::BorrowingAllowed
        }
    }
}

// =============================================================================
// Member
// =============================================================================

/// A registered borrower
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    id: MemberId,
    first_name: String,
    last_name: String,
    contact_phone: String,
    email_address: String,
    #[serde(default)]
    loans: Vec<LoanId>,
    #[serde(default)]
    fines: f64,
    #[serde(default)]
    limits: BorrowingLimits,
}

impl Member {
    /// Create a member with the default limits
    ///
    /// All contact fields are required; a blank one is rejected.
    pub fn new(
        id: MemberId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        contact_phone: impl Into<String>,
        email_address: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            id,
            first_name: required(first_name.into(), "first name")?,
            last_name: required(last_name.into(), "last name")?,
            contact_phone: required(contact_phone.into(), "contact phone")?,
            email_address: required(email_address.into(), "email address")?,
            loans: Vec::new(),
            fines: 0.0,
            limits: BorrowingLimits::default(),
        })
    }

    /// Apply non-default limits
    pub fn with_limits(mut self, limits: BorrowingLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn id(&self) -> MemberId {
        self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn contact_phone(&self) -> &str {
        &self.contact_phone
    }

    pub fn email_address(&self) -> &str {
        &self.email_address
    }

    pub fn limits(&self) -> BorrowingLimits {
        self.limits
    }

    /// Held loans in the order they were added
    pub fn loans(&self) -> &[LoanId] {
        &self.loans
    }

    pub fn holds(&self, loan: LoanId) -> bool {
        self.loans.contains(&loan)
    }

    pub fn fine_amount(&self) -> f64 {
        self.fines
    }

    /// Current borrowing eligibility
    pub fn state(&self) -> MemberState {
        self.limits.state_for(self.loans.len(), self.fines)
    }

    pub fn can_borrow(&self) -> bool {
        self.state() == MemberState::BorrowingAllowed
    }

    /// Loans that can still be added before the loan limit is reached
    pub fn remaining_loan_capacity(&self) -> usize {
        self.limits.loan_limit.saturating_sub(self.loans.len())
    }

    pub fn has_reached_loan_limit(&self) -> bool {
        self.loans.len() >= self.limits.loan_limit
    }

    pub fn has_fines_payable(&self) -> bool {
        self.fines > 0.0
    }

    pub fn has_reached_fine_limit(&self) -> bool {
        self.fines > self.limits.fine_limit
    }

    /// True if any held loan was flagged overdue by its last check
    ///
    /// `lookup` resolves a held loan id; ids it cannot resolve are skipped.
    pub fn has_overdue_loans<'a, L, F>(&self, lookup: F) -> bool
    where
        L: OverdueCheck + 'a,
        F: Fn(LoanId) -> Option<&'a L>,
    {
        self.loans
            .iter()
            .filter_map(|id| lookup(*id))
            .any(|loan| loan.is_overdue())
    }

    /// Take on a loan
    pub fn add_loan(&mut self, loan: LoanId) -> Result<()> {
        if !self.can_borrow() {
            return Err(Error::InvalidState(format!(
                "{} may not borrow ({} loans held, {:.2} in fines)",
                self.id,
                self.loans.len(),
                self.fines
            )));
        }
        if self.holds(loan) {
            return Err(Error::InvalidArgument(format!(
                "{} already holds {loan}",
                self.id
            )));
        }
        self.loans.push(loan);
        Ok(())
    }

    /// Give up a held loan
    pub fn remove_loan(&mut self, loan: LoanId) -> Result<()> {
        let position = self
            .loans
            .iter()
            .position(|held| *held == loan)
            .ok_or_else(|| {
                Error::InvalidArgument(format!("{} does not hold {loan}", self.id))
            })?;
        self.loans.remove(position);
        Ok(())
    }

    /// Charge a fine
    pub fn add_fine(&mut self, amount: f64) -> Result<()> {
        self.fines = self.balance_after_fine(amount)?;
        Ok(())
    }

    /// Balance the member would owe after being charged `amount`
    ///
    /// Fails without touching the balance if `amount` is invalid or the sum
    /// is no longer a finite number.
    pub fn balance_after_fine(&self, amount: f64) -> Result<f64> {
        validate_amount(amount)?;
        let balance = self.fines + amount;
        if !balance.is_finite() {
            return Err(Error::InvalidArgument(format!(
                "{} cannot be charged {amount}: balance would overflow",
                self.id
            )));
        }
        Ok(balance)
    }

    /// Pay towards the balance; overpayment leaves it at zero
    pub fn pay_fine(&mut self, amount: f64) -> Result<()> {
        validate_amount(amount)?;
        self.fines = (self.fines - amount).max(0.0);
        Ok(())
    }
}

fn required(value: String, field: &str) -> Result<String> {
    if value.trim().is_empty() {
        return Err(Error::InvalidArgument(format!("member {field} is required")));
    }
    Ok(value)
}

fn validate_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::InvalidArgument(format!(
            "fine amount must be a non-negative number, got {amount}"
        )));
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
