//! Per-member staging of pending loans
//!
//! A librarian opens a pending list for a member, stages one loan per book,
//! then commits the batch through [`crate::library::Library`]. Staged loans
//! stay `Pending` and touch neither books nor members until then.
//!
//! Each member has at most one open list. Within a list a book can be staged
//! only once, so a committed batch never contains the same copy twice.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::ids::{BookId, MemberId};
use crate::loan::Loan;

/// Open pending lists keyed by member
#[derive(Debug, Clone, Default)]
pub struct PendingLists {
    lists: HashMap<MemberId, Vec<Loan>>,
}

impl PendingLists {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open an empty list for `member`, discarding anything already staged
    ///
    /// Returns how many staged loans were discarded.
    pub fn open(&mut self, member: MemberId) -> usize {
        self.lists
            .insert(member, Vec::new())
            .map_or(0, |previous| previous.len())
    }

    pub fn is_open(&self, member: MemberId) -> bool {
        self.lists.contains_key(&member)
    }

    /// True if `book` is staged in `member`'s list
    pub fn is_staged(&self, member: MemberId, book: BookId) -> bool {
        self.lists
            .get(&member)
            .is_some_and(|list| list.iter().any(|loan| loan.book() == book))
    }

    /// Add a pending loan to its borrower's list
    pub fn stage(&mut self, loan: Loan) -> Result<&Loan> {
        let member = loan.borrower();
        let book = loan.book();
        if self.is_staged(member, book) {
            return Err(Error::InvalidState(format!(
                "{book} is already staged for {member}"
            )));
        }

        let list = self.list_mut(member)?;
        list.push(loan);
        list.last()
            .ok_or_else(|| Error::InvalidState(format!("pending list for {member} is empty")))
    }

    /// Staged loans in staging order
    pub fn get(&self, member: MemberId) -> Result<&[Loan]> {
        self.lists
            .get(&member)
            .map(Vec::as_slice)
            .ok_or_else(|| no_pending_list(member))
    }

    /// Discard staged loans; the list stays open
    pub fn clear(&mut self, member: MemberId) -> Result<usize> {
        let list = self.list_mut(member)?;
        let discarded = list.len();
        list.clear();
        Ok(discarded)
    }

    /// Remove and return every staged loan; the list stays open
    pub fn take(&mut self, member: MemberId) -> Result<Vec<Loan>> {
        let list = self.list_mut(member)?;
        Ok(std::mem::take(list))
    }

    fn list_mut(&mut self, member: MemberId) -> Result<&mut Vec<Loan>> {
        self.lists
            .get_mut(&member)
            .ok_or_else(|| no_pending_list(member))
    }
}

fn no_pending_list(member: MemberId) -> Error {
    Error::InvalidState(format!("no pending list for {member}"))
}
