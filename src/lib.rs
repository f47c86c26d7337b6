//! circulate - Library Circulation Engine
//!
//! This library models the lending workflow of a library: books, members and
//! loans, each with an explicit lifecycle, and the pending-loan protocol that
//! stages several books for a member before committing them as one batch.
//!
//! # Core Concepts
//!
//! - **Books**: physical copies moving between available, on loan, damaged,
//!   lost and disposed
//! - **Loans**: pending, then current once committed, then complete
//! - **Members**: held loans and fines decide whether they may borrow
//! - **Pending lists**: per-member staging committed all at once
//! - **Overdue sweep**: explicit, batchable recomputation of overdue flags
//!
//! # Module Organization
//!
//! - `book`: book state machine
//! - `loan`: loan state machine, overdue capability and committed-loan index
//! - `member`: borrowing eligibility, fines and held loans
//! - `pending`: per-member pending lists
//! - `library`: the coordinator tying books, members and loans together
//! - `overdue`: overdue sweep and query
//! - `catalog`: book and member collections with lookups
//! - `shared`: mutex-serialised access for multi-threaded callers
//! - `ids`: typed identities and the id allocator
//! - `config`: configuration loading from `circulate.toml`
//! - `events`: event journal entries and JSONL sinks
//! - `error`: error types and result aliases
//! - `logging`: tracing subscriber setup

pub mod book;
pub mod catalog;
pub mod config;
pub mod error;
pub mod events;
pub mod ids;
pub mod library;
pub mod loan;
pub mod logging;
pub mod member;
pub mod overdue;
pub mod pending;
pub mod shared;

pub use book::{Book, BookState};
pub use config::Config;
pub use error::{Error, ErrorKind, Result};
pub use ids::{BookId, LoanId, MemberId};
pub use library::Library;
pub use loan::{Loan, LoanState, OverdueCheck};
pub use member::{Member, MemberState};
pub use shared::SharedLibrary;
