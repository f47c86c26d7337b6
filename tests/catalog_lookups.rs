mod support;

use circulate::{Book, BookId, Library, Member, MemberId};
use support::{today, Fixture, AUTHOR, CALL_NUMBER, TITLE};

fn book_ids(books: Vec<&Book>) -> Vec<BookId> {
    books.into_iter().map(Book::id).collect()
}

fn member_ids(members: Vec<&Member>) -> Vec<MemberId> {
    members.into_iter().map(Member::id).collect()
}

#[test]
fn added_book_can_be_found() {
    let fx = Fixture::new();
    let book = fx.library.book(fx.book).expect("catalogued book");
    assert_eq!(book.author(), AUTHOR);
    assert_eq!(book.title(), TITLE);
    assert_eq!(book.call_number(), CALL_NUMBER);
    assert_eq!(book_ids(fx.library.list_books()), vec![fx.book]);
}

#[test]
fn unknown_book_is_none() {
    let fx = Fixture::new();
    assert!(fx.library.book(BookId::new(1000)).is_none());
}

#[test]
fn blank_book_fields_rejected() {
    let mut library = Library::default();
    for (author, title, call_number) in [("", TITLE, CALL_NUMBER), (AUTHOR, " ", CALL_NUMBER), (AUTHOR, TITLE, "")] {
        let err = library
            .add_book(author, title, call_number)
            .expect_err("blank field");
        assert!(err.is_invalid_argument());
    }
    assert!(library.list_books().is_empty());
}

#[test]
fn find_books_by_author_title_and_both() {
    let mut library = Library::default();
    let dispossessed = library
        .add_book("Le Guin", "The Dispossessed", "823.1")
        .expect("book");
    let lathe = library
        .add_book("Le Guin", "The Lathe of Heaven", "823.2")
        .expect("book");
    let excession = library.add_book("Banks", "Excession", "823.3").expect("book");

    assert_eq!(book_ids(library.find_books_by_author("Le Guin")), vec![dispossessed, lathe]);
    assert_eq!(book_ids(library.find_books_by_title("Excession")), vec![excession]);
    assert_eq!(
        book_ids(library.find_books_by_author_title("Le Guin", "The Lathe of Heaven")),
        vec![lathe]
    );
    assert!(library.find_books_by_author_title("Banks", "The Dispossessed").is_empty());
    assert!(library.find_books_by_author("Nobody").is_empty());
}

#[test]
fn added_member_can_be_found() {
    let mut library = Library::default();
    let ada = library
        .add_member("Ada", "Lovelace", "555-0100", "ada@example.org")
        .expect("member");
    let member = library.member(ada).expect("registered member");
    assert_eq!(member.first_name(), "Ada");
    assert_eq!(member.last_name(), "Lovelace");
    assert_eq!(member.contact_phone(), "555-0100");
    assert_eq!(member.email_address(), "ada@example.org");
    assert!(member.loans().is_empty());
    assert_eq!(member.fine_amount(), 0.0);
    assert!(library.member(MemberId::new(1000)).is_none());
}

#[test]
fn blank_member_fields_rejected() {
    let mut library = Library::default();
    let err = library
        .add_member("Ada", "", "555-0100", "ada@example.org")
        .expect_err("blank last name");
    assert!(err.is_invalid_argument());
    assert!(library.list_members().is_empty());
}

#[test]
fn find_members_by_last_name_email_and_names() {
    let mut library = Library::default();
    let ada = library
        .add_member("Ada", "Lovelace", "555-0100", "ada@example.org")
        .expect("member");
    let byron = library
        .add_member("Byron", "Lovelace", "555-0101", "byron@example.org")
        .expect("member");
    let other_ada = library
        .add_member("Ada", "Byron", "555-0102", "ada@example.org")
        .expect("member");

    assert_eq!(member_ids(library.list_members()), vec![ada, byron, other_ada]);
    assert_eq!(member_ids(library.find_members_by_last_name("Lovelace")), vec![ada, byron]);
    assert_eq!(
        member_ids(library.find_members_by_email_address("ada@example.org")),
        vec![ada, other_ada]
    );
    assert_eq!(member_ids(library.find_members_by_names("Ada", "Byron")), vec![other_ada]);
    assert!(library.find_members_by_names("Byron", "Byron").is_empty());
}

#[test]
fn loan_lookups_by_book_borrower_and_title() {
    let mut fx = Fixture::new();
    let other_title = fx
        .library
        .add_book("Banks", "Excession", "823.3")
        .expect("book");
    let other_member = fx
        .library
        .add_member("Other", "Member", "phone", "other@example.org")
        .expect("member");

    let first = fx.checkout(fx.book, 14);
    fx.library.create_new_pending_list(other_member).expect("open");
    fx.library.stage_loan(other_member, other_title, today()).expect("stage");
    let second = fx.library.commit_pending_loans(other_member).expect("commit")[0];

    assert_eq!(fx.library.loan_by_book(fx.book).and_then(|loan| loan.id()), Some(first));
    assert_eq!(fx.library.loan_by_book(other_title).and_then(|loan| loan.id()), Some(second));

    let by_borrower: Vec<_> = fx
        .library
        .find_loans_by_borrower(other_member)
        .into_iter()
        .filter_map(|loan| loan.id())
        .collect();
    assert_eq!(by_borrower, vec![second]);

    let by_title: Vec<_> = fx
        .library
        .find_loans_by_book_title(TITLE)
        .into_iter()
        .filter_map(|loan| loan.id())
        .collect();
    assert_eq!(by_title, vec![first]);
    assert!(fx.library.find_loans_by_book_title("Missing").is_empty());
    assert_eq!(fx.library.list_loans().len(), 2);
}

#[test]
fn returned_book_has_no_loan() {
    let mut fx = Fixture::new();
    let id = fx.checkout(fx.book, 14);
    fx.library.discharge_loan(id, today(), false).expect("discharge");
    assert!(fx.library.loan_by_book(fx.book).is_none());
    assert!(fx.library.find_loans_by_borrower(fx.member).is_empty());
}
