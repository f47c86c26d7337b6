//! Books and their availability lifecycle
//!
//! A book is one physical copy in the collection. Its state tracks whether
//! the copy can be lent:
//!
//! ```text
//! Available --borrow--> OnLoan --return--> Available
//!                              --return(damaged)--> Damaged --repair--> Available
//!                              --lose--> Lost
//! Available | Damaged --dispose--> Disposed
//! ```
//!
//! `Lost` and `Disposed` are terminal. While `OnLoan` the book holds the id of
//! its current loan and nothing else does.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::ids::{BookId, LoanId};

// =============================================================================
// Book State
// =============================================================================

/// Availability of a physical copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookState {
    /// On the shelf and lendable
    #[default]
    Available,
    /// Lent out under a current loan
    OnLoan,
    /// Returned damaged, waiting for repair
    Damaged,
    /// Reported lost while on loan
    Lost,
    /// Withdrawn from the collection
    Disposed,
}

impl BookState {
    /// No transition leaves this state
    pub fn is_terminal(&self) -> bool {
        matches!(self, BookState::Lost | BookState::Disposed)
    }
}

impl fmt::Display for BookState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookState::Available => write!(f, "available"),
            BookState::OnLoan => write!(f, "on_loan"),
            BookState::Damaged => write!(f, "damaged"),
            BookState::Lost => write!(f, "lost"),
            BookState::Disposed => write!(f, "disposed"),
        }
    }
}

// =============================================================================
// Book
// =============================================================================

/// A physical copy in the collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    id: BookId,
    author: String,
    title: String,
    call_number: String,
    state: BookState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    loan: Option<LoanId>,
}

impl Book {
    /// Create an available book
    ///
    /// Every descriptive field is required; a blank one is rejected.
    pub fn new(
        id: BookId,
        author: impl Into<String>,
        title: impl Into<String>,
        call_number: impl Into<String>,
    ) -> Result<Self> {
        let author = required(author.into(), "author")?;
        let title = required(title.into(), "title")?;
        let call_number = required(call_number.into(), "call number")?;

        Ok(Self {
            id,
            author,
            title,
            call_number,
            state: BookState::Available,
            loan: None,
        })
    }

    pub fn id(&self) -> BookId {
        self.id
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn call_number(&self) -> &str {
        &self.call_number
    }

    pub fn state(&self) -> BookState {
        self.state
    }

    /// The current loan; `Some` exactly when the book is on loan
    pub fn loan(&self) -> Option<LoanId> {
        self.loan
    }

    /// Lend the book under `loan`
    pub fn borrow(&mut self, loan: LoanId) -> Result<()> {
        self.expect_state(&[BookState::Available], "borrow")?;
        self.state = BookState::OnLoan;
        self.loan = Some(loan);
        Ok(())
    }

    /// Take the book back, marking it damaged if needed
    pub fn return_book(&mut self, damaged: bool) -> Result<()> {
        self.expect_state(&[BookState::OnLoan], "return")?;
        self.loan = None;
        self.state = if damaged {
            BookState::Damaged
        } else {
            BookState::Available
        };
        Ok(())
    }

    /// Record the book as lost by its borrower
    pub fn lose(&mut self) -> Result<()> {
        self.expect_state(&[BookState::OnLoan], "lose")?;
        self.loan = None;
        self.state = BookState::Lost;
        Ok(())
    }

    /// Put a damaged book back into circulation
    pub fn repair(&mut self) -> Result<()> {
        self.expect_state(&[BookState::Damaged], "repair")?;
        self.state = BookState::Available;
        Ok(())
    }

    /// Withdraw the book; an active loan must be resolved first
    pub fn dispose(&mut self) -> Result<()> {
        self.expect_state(&[BookState::Available, BookState::Damaged], "dispose")?;
        self.state = BookState::Disposed;
        Ok(())
    }

    fn expect_state(&self, allowed: &[BookState], operation: &str) -> Result<()> {
        if allowed.contains(&self.state) {
            return Ok(());
        }
        Err(Error::InvalidState(format!(
            "cannot {operation} {} while it is {}",
            self.id, self.state
        )))
    }
}

fn required(value: String, field: &str) -> Result<String> {
    if value.trim().is_empty() {
        return Err(Error::InvalidArgument(format!("book {field} is required")));
    }
    Ok(value)
}

// =============================================================================
// Tests
// =============================================================================
