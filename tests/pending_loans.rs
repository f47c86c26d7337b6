mod support;

use circulate::{BookState, LoanState};
use support::{days_after, today, Fixture};

#[test]
fn new_pending_list_is_empty() {
    let mut fx = Fixture::new();
    fx.library.create_new_pending_list(fx.member).expect("open");
    let loans = fx.library.get_pending_list(fx.member).expect("list");
    assert!(loans.is_empty());
}

#[test]
fn get_pending_list_without_opening_fails() {
    let fx = Fixture::new();
    let err = fx.library.get_pending_list(fx.member).expect_err("no list");
    assert!(err.is_invalid_state());
}

#[test]
fn staging_without_pending_list_fails() {
    let mut fx = Fixture::new();
    let err = fx
        .library
        .create_pending_loan(fx.member, fx.book, today(), days_after(today(), 14))
        .expect_err("no list");
    assert!(err.is_invalid_state());
    assert!(err.to_string().contains("no pending list"));
}

#[test]
fn staging_same_book_twice_fails() {
    let mut fx = Fixture::new();
    fx.library.create_new_pending_list(fx.member).expect("open");
    fx.library
        .stage_loan(fx.member, fx.book, today())
        .expect("first stage");

    let err = fx
        .library
        .stage_loan(fx.member, fx.book, today())
        .expect_err("second stage");
    assert!(err.is_invalid_state());
    assert_eq!(fx.library.get_pending_list(fx.member).expect("list").len(), 1);
}

#[test]
fn staged_loan_is_listed_and_pending() {
    let mut fx = Fixture::new();
    fx.library.create_new_pending_list(fx.member).expect("open");
    let due = days_after(today(), fx.library.config().loans.period_days.into());
    let loan = fx
        .library
        .create_pending_loan(fx.member, fx.book, today(), due)
        .expect("stage");

    let staged = fx.library.get_pending_list(fx.member).expect("list");
    assert_eq!(staged.len(), 1);
    assert!(staged.contains(&loan));
    assert_eq!(loan.state(), LoanState::Pending);
    assert_eq!(loan.id(), None);
    assert_eq!(fx.library.book(fx.book).expect("book").state(), BookState::Available);
    assert!(fx.library.member(fx.member).expect("member").loans().is_empty());
}

#[test]
fn commit_end_to_end() {
    let mut fx = Fixture::new();
    fx.library.create_new_pending_list(fx.member).expect("open");
    fx.library
        .stage_loan(fx.member, fx.book, today())
        .expect("stage");

    let ids = fx.library.commit_pending_loans(fx.member).expect("commit");
    assert_eq!(ids.len(), 1);
    let id = ids[0];

    let loan = fx.library.loan(id).expect("indexed loan");
    assert_eq!(loan.state(), LoanState::Current);
    assert_eq!(loan.book(), fx.book);
    assert_eq!(loan.borrower(), fx.member);

    let book = fx.library.book(fx.book).expect("book");
    assert_eq!(book.state(), BookState::OnLoan);
    assert_eq!(book.loan(), Some(id));

    assert!(fx.library.member(fx.member).expect("member").holds(id));
    assert_eq!(fx.library.list_loans().len(), 1);
    assert!(fx.library.get_pending_list(fx.member).expect("list").is_empty());
}

#[test]
fn commit_empty_list_is_noop() {
    let mut fx = Fixture::new();
    fx.library.create_new_pending_list(fx.member).expect("open");
    let ids = fx.library.commit_pending_loans(fx.member).expect("commit");
    assert!(ids.is_empty());
    assert!(fx.library.list_loans().is_empty());
}

#[test]
fn commit_without_pending_list_fails() {
    let mut fx = Fixture::new();
    let err = fx
        .library
        .commit_pending_loans(fx.member)
        .expect_err("no list");
    assert!(err.is_invalid_state());
}

#[test]
fn committing_twice_commits_nothing_new() {
    let mut fx = Fixture::new();
    let id = fx.checkout(fx.book, 14);
    let again = fx.library.commit_pending_loans(fx.member).expect("commit");
    assert!(again.is_empty());
    assert_eq!(fx.library.list_loans().len(), 1);
    assert!(fx.library.loan(id).is_some());
}

#[test]
fn clear_pending_loans_keeps_list_open() {
    let mut fx = Fixture::new();
    fx.library.create_new_pending_list(fx.member).expect("open");
    let loan = fx
        .library
        .stage_loan(fx.member, fx.book, today())
        .expect("stage");
    assert_eq!(fx.library.get_pending_list(fx.member).expect("list"), &[loan.clone()]);

    fx.library.clear_pending_loans(fx.member).expect("clear");
    let staged = fx.library.get_pending_list(fx.member).expect("list");
    assert!(staged.is_empty());
    assert!(!staged.contains(&loan));

    // cleared book can be staged again
    fx.library
        .stage_loan(fx.member, fx.book, today())
        .expect("restage");
}

#[test]
fn reopening_pending_list_discards_staging() {
    let mut fx = Fixture::new();
    fx.library.create_new_pending_list(fx.member).expect("open");
    fx.library
        .stage_loan(fx.member, fx.book, today())
        .expect("stage");

    fx.library.create_new_pending_list(fx.member).expect("reopen");
    assert!(fx.library.get_pending_list(fx.member).expect("list").is_empty());
    assert!(fx.library.commit_pending_loans(fx.member).expect("commit").is_empty());
}

#[test]
fn batch_commit_assigns_increasing_ids() {
    let mut fx = Fixture::new();
    let copies: Vec<_> = (1..=3).map(|n| fx.add_copy(n)).collect();

    fx.library.create_new_pending_list(fx.member).expect("open");
    for copy in &copies {
        fx.library.stage_loan(fx.member, *copy, today()).expect("stage");
    }
    let ids = fx.library.commit_pending_loans(fx.member).expect("commit");

    assert_eq!(ids.len(), 3);
    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    for (copy, id) in copies.iter().zip(&ids) {
        assert_eq!(fx.library.loan_by_book(*copy).and_then(|loan| loan.id()), Some(*id));
    }
    assert_eq!(fx.library.member(fx.member).expect("member").loans(), &ids[..]);
}

#[test]
fn loan_ids_are_unique_across_members() {
    let mut fx = Fixture::new();
    let other = fx
        .library
        .add_member("Other", "Member", "phone", "other@example.org")
        .expect("member");
    let second_book = fx.add_copy(1);

    fx.library.create_new_pending_list(fx.member).expect("open");
    fx.library.create_new_pending_list(other).expect("open");
    fx.library.stage_loan(other, second_book, today()).expect("stage");
    fx.library.stage_loan(fx.member, fx.book, today()).expect("stage");

    let first = fx.library.commit_pending_loans(fx.member).expect("commit");
    let second = fx.library.commit_pending_loans(other).expect("commit");
    assert_ne!(first, second);
    assert!(first[0] < second[0]);
}

#[test]
fn commit_fails_whole_batch_when_book_lent_elsewhere() {
    let mut fx = Fixture::new();
    let other = fx
        .library
        .add_member("Other", "Member", "phone", "other@example.org")
        .expect("member");
    let spare = fx.add_copy(1);

    fx.library.create_new_pending_list(fx.member).expect("open");
    fx.library.stage_loan(fx.member, spare, today()).expect("stage");
    fx.library.stage_loan(fx.member, fx.book, today()).expect("stage");

    fx.library.create_new_pending_list(other).expect("open");
    fx.library.stage_loan(other, fx.book, today()).expect("stage");
    fx.library.commit_pending_loans(other).expect("commit other");

    let err = fx
        .library
        .commit_pending_loans(fx.member)
        .expect_err("book already lent");
    assert!(err.is_invalid_state());
    assert_eq!(fx.library.book(spare).expect("book").state(), BookState::Available);
    assert!(fx.library.member(fx.member).expect("member").loans().is_empty());
    assert_eq!(fx.library.get_pending_list(fx.member).expect("list").len(), 2);
}

#[test]
fn member_over_fine_limit_cannot_commit() {
    let mut fx = Fixture::new();
    let limit = fx.library.config().limits.fine_limit;
    fx.library.add_fine(fx.member, limit + 1.0).expect("fine");

    fx.library.create_new_pending_list(fx.member).expect("open");
    fx.library.stage_loan(fx.member, fx.book, today()).expect("stage");
    let err = fx
        .library
        .commit_pending_loans(fx.member)
        .expect_err("fines too high");
    assert!(err.is_invalid_state());

    fx.library.pay_fine(fx.member, limit + 1.0).expect("pay");
    assert_eq!(fx.library.commit_pending_loans(fx.member).expect("commit").len(), 1);
}
