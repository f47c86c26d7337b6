//! The library: catalog, members, loans and the pending-loan protocol
//!
//! [`Library`] owns every book, member and committed loan, the open pending
//! lists and the id allocators. All cross-entity operations go through it so
//! a book, its loan and its borrower never disagree:
//!
//! 1. `create_new_pending_list(member)` opens a staging list
//! 2. `create_pending_loan(member, book, ..)` stages one pending loan per book
//! 3. `commit_pending_loans(member)` turns the batch into current loans
//! 4. `update_overdue_status(date)` sweeps current loans
//! 5. `discharge_loan(loan, ..)` or `report_lost(loan, ..)` ends a loan
//!
//! Every state change is also appended to an in-memory event journal, see
//! [`Library::drain_events`] and [`Library::flush_events`].

use chrono::NaiveDate;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::book::{Book, BookState};
use crate::catalog::{BookCatalog, MemberRegistry};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::events::{Event, EventKind, EventSink};
use crate::ids::{BookId, IdAllocator, LoanId, MemberId};
use crate::loan::{due_date_for, Loan, LoanIndex};
use crate::member::Member;
use crate::overdue;
use crate::pending::PendingLists;

/// How a loan ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Returned { damaged: bool },
    Lost,
}

/// In-memory library state and the operations over it
#[derive(Debug, Default)]
pub struct Library {
    config: Config,
    books: BookCatalog,
    members: MemberRegistry,
    loans: LoanIndex,
    pending: PendingLists,
    book_ids: IdAllocator,
    member_ids: IdAllocator,
    loan_ids: IdAllocator,
    journal: Vec<Event>,
}

impl Library {
    /// Create an empty library governed by `config`
    pub fn new(config: Config) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // =========================================================================
    // Books
    // =========================================================================

    /// Catalogue a new book copy
    pub fn add_book(
        &mut self,
        author: impl Into<String>,
        title: impl Into<String>,
        call_number: impl Into<String>,
    ) -> Result<BookId> {
        let book = Book::new(self.book_ids.peek()?, author, title, call_number)?;
        let id: BookId = self.book_ids.allocate()?;
        self.books.insert(book)?;

        debug!(book = %id, "Catalogued book");
        self.record(Event::new(EventKind::BookAdded, None).with_data(json!({ "book": id })));
        Ok(id)
    }

    pub fn book(&self, id: BookId) -> Option<&Book> {
        self.books.get(id)
    }

    pub fn books(&self) -> &BookCatalog {
        &self.books
    }

    pub fn list_books(&self) -> Vec<&Book> {
        self.books.iter().collect()
    }

    pub fn find_books_by_author(&self, author: &str) -> Vec<&Book> {
        self.books.find_by_author(author).collect()
    }

    pub fn find_books_by_title(&self, title: &str) -> Vec<&Book> {
        self.books.find_by_title(title).collect()
    }

    pub fn find_books_by_author_title(&self, author: &str, title: &str) -> Vec<&Book> {
        self.books.find_by_author_title(author, title).collect()
    }

    /// Return a damaged book to circulation
    pub fn repair_book(&mut self, id: BookId) -> Result<()> {
        self.books.require_mut(id)?.repair()?;
        debug!(book = %id, "Repaired book");
        self.record(Event::new(EventKind::BookRepaired, None).with_data(json!({ "book": id })));
        Ok(())
    }

    /// Withdraw a book from the collection
    pub fn dispose_book(&mut self, id: BookId) -> Result<()> {
        self.books.require_mut(id)?.dispose()?;
        debug!(book = %id, "Disposed book");
        self.record(Event::new(EventKind::BookDisposed, None).with_data(json!({ "book": id })));
        Ok(())
    }

    // =========================================================================
    // Members
    // =========================================================================

    /// Register a new member under the configured limits
    pub fn add_member(
        &mut self,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        contact_phone: impl Into<String>,
        email_address: impl Into<String>,
    ) -> Result<MemberId> {
        let member = Member::new(
            self.member_ids.peek()?,
            first_name,
            last_name,
            contact_phone,
            email_address,
        )?
        .with_limits(self.config.limits.borrowing_limits());
        let id: MemberId = self.member_ids.allocate()?;
        self.members.insert(member)?;

        debug!(member = %id, "Registered member");
        self.record(Event::new(EventKind::MemberAdded, Some(id)));
        Ok(id)
    }

    pub fn member(&self, id: MemberId) -> Option<&Member> {
        self.members.get(id)
    }

    pub fn members(&self) -> &MemberRegistry {
        &self.members
    }

    pub fn list_members(&self) -> Vec<&Member> {
        self.members.iter().collect()
    }

    pub fn find_members_by_last_name(&self, last_name: &str) -> Vec<&Member> {
        self.members.find_by_last_name(last_name).collect()
    }

    pub fn find_members_by_email_address(&self, email_address: &str) -> Vec<&Member> {
        self.members.find_by_email_address(email_address).collect()
    }

    pub fn find_members_by_names(&self, first_name: &str, last_name: &str) -> Vec<&Member> {
        self.members.find_by_names(first_name, last_name).collect()
    }

    /// Charge a member a fine
    pub fn add_fine(&mut self, member: MemberId, amount: f64) -> Result<()> {
        self.members.require_mut(member)?.add_fine(amount)?;
        debug!(member = %member, amount, "Added fine");
        self.record(
            Event::new(EventKind::FineAdded, Some(member)).with_data(json!({ "amount": amount })),
        );
        Ok(())
    }

    /// Record a fine payment
    pub fn pay_fine(&mut self, member: MemberId, amount: f64) -> Result<()> {
        self.members.require_mut(member)?.pay_fine(amount)?;
        debug!(member = %member, amount, "Paid fine");
        self.record(
            Event::new(EventKind::FinePaid, Some(member)).with_data(json!({ "amount": amount })),
        );
        Ok(())
    }

    /// True if any loan the member holds was flagged by the last sweep
    pub fn member_has_overdue_loans(&self, member: MemberId) -> Result<bool> {
        let member = self.members.require(member)?;
        Ok(member.has_overdue_loans(|id| self.loans.get(id)))
    }

    // =========================================================================
    // Pending loans
    // =========================================================================

    /// Open an empty pending list for `member`
    ///
    /// Reopening discards whatever was staged and not committed.
    pub fn create_new_pending_list(&mut self, member: MemberId) -> Result<()> {
        self.members.require(member)?;
        let reopened = self.pending.is_open(member);
        let discarded = self.pending.open(member);

        debug!(member = %member, reopened, discarded, "Opened pending list");
        self.record(
            Event::new(EventKind::PendingListOpened, Some(member))
                .with_data(json!({ "reopened": reopened, "discarded": discarded })),
        );
        Ok(())
    }

    /// Stage a pending loan of `book` for `member`
    ///
    /// Neither the book nor the member changes until the list is committed.
    pub fn create_pending_loan(
        &mut self,
        member: MemberId,
        book: BookId,
        borrow_date: NaiveDate,
        due_date: NaiveDate,
    ) -> Result<Loan> {
        self.members.require(member)?;
        if self.books.get(book).is_none() {
            return Err(Error::InvalidArgument(format!("unknown {book}")));
        }

        let loan = Loan::new(book, member, borrow_date, due_date)?;
        let staged = self.pending.stage(loan)?.clone();

        debug!(member = %member, book = %book, due = %due_date, "Staged pending loan");
        self.record(
            Event::new(EventKind::LoanStaged, Some(member))
                .with_data(json!({ "book": book, "due_date": due_date })),
        );
        Ok(staged)
    }

    /// Stage a loan due after the configured loan period
    pub fn stage_loan(
        &mut self,
        member: MemberId,
        book: BookId,
        borrow_date: NaiveDate,
    ) -> Result<Loan> {
        let due_date = due_date_for(borrow_date, self.config.loans.period_days);
        self.create_pending_loan(member, book, borrow_date, due_date)
    }

    /// Loans staged for `member`, in staging order
    pub fn get_pending_list(&self, member: MemberId) -> Result<&[Loan]> {
        self.pending.get(member)
    }

    /// Discard staged loans; the list stays open
    pub fn clear_pending_loans(&mut self, member: MemberId) -> Result<()> {
        let discarded = self.pending.clear(member)?;

        debug!(member = %member, discarded, "Cleared pending loans");
        self.record(
            Event::new(EventKind::PendingLoansCleared, Some(member))
                .with_data(json!({ "discarded": discarded })),
        );
        Ok(())
    }

    /// Commit every loan staged for `member`
    ///
    /// The batch is checked up front: every staged book must be available and
    /// the member must be able to take the whole batch. If any check fails
    /// nothing changes and the staged loans remain. Otherwise each loan gets a
    /// fresh id, becomes current, is lent on its book, is added to the member
    /// and is indexed, and the pending list is left empty.
    pub fn commit_pending_loans(&mut self, member: MemberId) -> Result<Vec<LoanId>> {
        let staged = self.pending.get(member)?.len();
        if staged == 0 {
            debug!(member = %member, "Nothing staged to commit");
            return Ok(Vec::new());
        }

        if let Err(err) = self.check_commit(member) {
            warn!(member = %member, error = %err, "Rejected pending loan commit");
            self.record(
                Event::new(EventKind::CommitRejected, Some(member))
                    .with_data(json!({ "reason": err.to_string() })),
            );
            return Err(err);
        }

        let ids = (0..staged)
            .map(|_| self.loan_ids.allocate())
            .collect::<Result<Vec<LoanId>>>()?;

        // Checks above leave nothing below that can fail in normal operation.
        let batch = self.pending.take(member)?;
        for (mut loan, id) in batch.into_iter().zip(ids.iter().copied()) {
            loan.commit(id)?;
            self.books.require_mut(loan.book())?.borrow(id)?;
            self.members.require_mut(member)?.add_loan(id)?;
            debug!(loan = %id, book = %loan.book(), member = %member, "Committed loan");
            self.loans.insert(loan)?;
        }

        info!(member = %member, count = ids.len(), "Committed pending loans");
        self.record(
            Event::new(EventKind::LoansCommitted, Some(member)).with_data(json!({ "loans": ids })),
        );
        Ok(ids)
    }

    fn check_commit(&self, member_id: MemberId) -> Result<()> {
        let member = self.members.require(member_id)?;
        let staged = self.pending.get(member_id)?;

        if !member.can_borrow() || staged.len() > member.remaining_loan_capacity() {
            return Err(Error::InvalidState(format!(
                "{member_id} cannot take {} more loans ({} held, limit {}, {:.2} in fines)",
                staged.len(),
                member.loans().len(),
                member.limits().loan_limit,
                member.fine_amount()
            )));
        }

        for loan in staged {
            let book = self
                .books
                .get(loan.book())
                .ok_or_else(|| Error::InvalidArgument(format!("unknown {}", loan.book())))?;
            if book.state() != BookState::Available {
                return Err(Error::InvalidState(format!(
                    "{} is {} and cannot be lent",
                    book.id(),
                    book.state()
                )));
            }
        }

        Ok(())
    }

    // =========================================================================
    // Committed loans
    // =========================================================================

    pub fn loan(&self, id: LoanId) -> Option<&Loan> {
        self.loans.get(id)
    }

    pub fn loans(&self) -> &LoanIndex {
        &self.loans
    }

    /// The loan a book is currently out on
    pub fn loan_by_book(&self, book: BookId) -> Option<&Loan> {
        self.books
            .get(book)
            .and_then(Book::loan)
            .and_then(|id| self.loans.get(id))
    }

    pub fn list_loans(&self) -> Vec<&Loan> {
        self.loans.iter().collect()
    }

    pub fn find_loans_by_borrower(&self, member: MemberId) -> Vec<&Loan> {
        self.loans
            .iter()
            .filter(|loan| loan.borrower() == member)
            .collect()
    }

    pub fn find_loans_by_book_title(&self, title: &str) -> Vec<&Loan> {
        self.loans
            .iter()
            .filter(|loan| {
                self.books
                    .get(loan.book())
                    .is_some_and(|book| book.title() == title)
            })
            .collect()
    }

    /// Re-check every current loan as of `as_of`; returns how many are overdue
    pub fn update_overdue_status(&mut self, as_of: NaiveDate) -> Result<usize> {
        let overdue = overdue::update_overdue_status(&mut self.loans, as_of)?;

        info!(as_of = %as_of, overdue, "Swept loans for overdue status");
        self.record(
            Event::new(EventKind::OverdueSweep, None)
                .with_data(json!({ "as_of": as_of, "overdue": overdue })),
        );
        Ok(overdue)
    }

    /// Loans flagged overdue by the last sweep
    pub fn find_overdue_loans(&self) -> Vec<&Loan> {
        overdue::find_overdue_loans(&self.loans)
    }

    /// End a loan because its book came back on `as_of`
    ///
    /// Late returns are fined per overdue day. The loan is completed, released
    /// by its borrower and dropped from the index; the book becomes available
    /// again, or damaged.
    pub fn discharge_loan(&mut self, id: LoanId, as_of: NaiveDate, damaged: bool) -> Result<Loan> {
        self.finish_loan(id, as_of, Outcome::Returned { damaged })
    }

    /// End a loan because its book was lost
    ///
    /// The borrower pays any late fine plus the configured lost-book fee.
    pub fn report_lost(&mut self, id: LoanId, as_of: NaiveDate) -> Result<Loan> {
        self.finish_loan(id, as_of, Outcome::Lost)
    }

    fn finish_loan(&mut self, id: LoanId, as_of: NaiveDate, outcome: Outcome) -> Result<Loan> {
        let loan = self
            .loans
            .get(id)
            .ok_or_else(|| Error::InvalidArgument(format!("unknown {id}")))?;
        if !loan.is_current() {
            return Err(Error::InvalidState(format!("{id} is {}", loan.state())));
        }
        let book_id = loan.book();
        let member_id = loan.borrower();

        let mut fine = loan.fine_due(as_of, self.config.loans.fine_per_day);
        if outcome == Outcome::Lost {
            fine += self.config.loans.lost_book_fee;
        }

        let book = self
            .books
            .get(book_id)
            .ok_or_else(|| Error::InvalidArgument(format!("unknown {book_id}")))?;
        if book.loan() != Some(id) {
            return Err(Error::InvalidState(format!("{book_id} is not out on {id}")));
        }
        let member = self.members.require(member_id)?;
        if !member.holds(id) {
            return Err(Error::InvalidState(format!("{member_id} does not hold {id}")));
        }
        if fine > 0.0 || !fine.is_finite() {
            member.balance_after_fine(fine)?;
        }

        // Nothing below fails once the checks above pass.
        let mut loan = self
            .loans
            .remove(id)
            .ok_or_else(|| Error::InvalidArgument(format!("unknown {id}")))?;
        loan.complete()?;

        let member = self.members.require_mut(member_id)?;
        member.remove_loan(id)?;
        if fine > 0.0 {
            member.add_fine(fine)?;
        }

        let book = self.books.require_mut(book_id)?;
        let kind = match outcome {
            Outcome::Returned { damaged } => {
                book.return_book(damaged)?;
                EventKind::LoanDischarged
            }
            Outcome::Lost => {
                book.lose()?;
                EventKind::BookLost
            }
        };

        let book_state = book.state();

        info!(loan = %id, book = %book_id, member = %member_id, fine, "Ended loan");
        self.record(Event::new(kind, Some(member_id)).with_data(json!({
            "loan": id,
            "book": book_id,
            "book_state": book_state,
            "fine": fine,
        })));
        Ok(loan)
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Events recorded since the last drain
    pub fn events(&self) -> &[Event] {
        &self.journal
    }

    /// Take every recorded event, leaving the journal empty
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.journal)
    }

    /// Write the journal to `sink`, oldest first
    ///
    /// Written events leave the journal. If a write fails, that event and
    /// every later one stay journaled for the next flush.
    pub fn flush_events(&mut self, sink: &mut EventSink) -> Result<usize> {
        let pending = std::mem::take(&mut self.journal);
        let mut written = 0;
        for event in &pending {
            if let Err(err) = sink.emit(event) {
                warn!(written, error = %err, "Event flush interrupted");
                let mut unwritten = pending[written..].to_vec();
                unwritten.append(&mut self.journal);
                self.journal = unwritten;
                return Err(err);
            }
            written += 1;
        }
        debug!(written, "Flushed events");
        Ok(written)
    }

    fn record(&mut self, event: Event) {
        self.journal.push(event);
    }
}
