#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use circulate::{BookId, Config, Library, MemberId};

pub const AUTHOR: &str = "author";
pub const TITLE: &str = "title";
pub const CALL_NUMBER: &str = "callNumber";

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).expect("valid date")
}

pub fn days_after(date: NaiveDate, days: i64) -> NaiveDate {
    date + Duration::days(days)
}

/// A library with one member and one book
pub struct Fixture {
    pub library: Library,
    pub member: MemberId,
    pub book: BookId,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let mut library = Library::new(config);
        let member = library
            .add_member("fName", "lName", "phone", "email")
            .expect("add member");
        let book = library
            .add_book(AUTHOR, TITLE, CALL_NUMBER)
            .expect("add book");
        Self {
            library,
            member,
            book,
        }
    }

    /// Add another copy of a book with a unique call number
    pub fn add_copy(&mut self, n: usize) -> BookId {
        self.library
            .add_book(AUTHOR, TITLE, format!("{CALL_NUMBER}.{n}"))
            .expect("add copy")
    }

    /// Stage and commit one loan of `book`, due `period` days from today
    pub fn checkout(&mut self, book: BookId, period: i64) -> circulate::LoanId {
        self.library
            .create_new_pending_list(self.member)
            .expect("open pending list");
        self.library
            .create_pending_loan(self.member, book, today(), days_after(today(), period))
            .expect("stage loan");
        let ids = self
            .library
            .commit_pending_loans(self.member)
            .expect("commit");
        assert_eq!(ids.len(), 1);
        ids[0]
    }
}
