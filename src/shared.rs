//! Thread-safe handle to a [`Library`]
//!
//! Every call takes the library lock for its whole duration, so a commit,
//! sweep or discharge is seen by other callers either completely or not at
//! all.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::NaiveDate;

use crate::error::{Error, Result};
use crate::events::{Event, EventSink};
use crate::ids::{BookId, LoanId, MemberId};
use crate::library::Library;
use crate::loan::Loan;

/// Cloneable, lock-serialised access to one library
#[derive(Debug, Clone, Default)]
pub struct SharedLibrary {
    inner: Arc<Mutex<Library>>,
}

impl SharedLibrary {
    pub fn new(library: Library) -> Self {
        Self {
            inner: Arc::new(Mutex::new(library)),
        }
    }

    /// Run `f` with exclusive access to the library
    pub fn with<T>(&self, f: impl FnOnce(&mut Library) -> Result<T>) -> Result<T> {
        let mut guard = self.lock()?;
        f(&mut guard)
    }

    /// Run a read-only `f` under the lock
    pub fn read<T>(&self, f: impl FnOnce(&Library) -> T) -> Result<T> {
        let guard = self.lock()?;
        Ok(f(&guard))
    }

    pub fn create_new_pending_list(&self, member: MemberId) -> Result<()> {
        self.with(|library| library.create_new_pending_list(member))
    }

    pub fn create_pending_loan(
        &self,
        member: MemberId,
        book: BookId,
        borrow_date: NaiveDate,
        due_date: NaiveDate,
    ) -> Result<Loan> {
        self.with(|library| library.create_pending_loan(member, book, borrow_date, due_date))
    }

    pub fn stage_loan(&self, member: MemberId, book: BookId, borrow_date: NaiveDate) -> Result<Loan> {
        self.with(|library| library.stage_loan(member, book, borrow_date))
    }

    /// Snapshot of the loans staged for `member`
    pub fn get_pending_list(&self, member: MemberId) -> Result<Vec<Loan>> {
        self.with(|library| library.get_pending_list(member).map(<[Loan]>::to_vec))
    }

    pub fn clear_pending_loans(&self, member: MemberId) -> Result<()> {
        self.with(|library| library.clear_pending_loans(member))
    }

    pub fn commit_pending_loans(&self, member: MemberId) -> Result<Vec<LoanId>> {
        self.with(|library| library.commit_pending_loans(member))
    }

    pub fn update_overdue_status(&self, as_of: NaiveDate) -> Result<usize> {
        self.with(|library| library.update_overdue_status(as_of))
    }

    /// Snapshot of the loans flagged by the last sweep
    pub fn find_overdue_loans(&self) -> Result<Vec<Loan>> {
        self.read(|library| library.find_overdue_loans().into_iter().cloned().collect())
    }

    pub fn member_has_overdue_loans(&self, member: MemberId) -> Result<bool> {
        self.with(|library| library.member_has_overdue_loans(member))
    }

    pub fn discharge_loan(&self, loan: LoanId, as_of: NaiveDate, damaged: bool) -> Result<Loan> {
        self.with(|library| library.discharge_loan(loan, as_of, damaged))
    }

    pub fn report_lost(&self, loan: LoanId, as_of: NaiveDate) -> Result<Loan> {
        self.with(|library| library.report_lost(loan, as_of))
    }

    pub fn drain_events(&self) -> Result<Vec<Event>> {
        self.with(|library| Ok(library.drain_events()))
    }

    pub fn flush_events(&self, sink: &mut EventSink) -> Result<usize> {
        self.with(|library| library.flush_events(sink))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Library>> {
        self.inner.lock().map_err(|_| Error::LockPoisoned)
    }
}
