//! Book catalog and member registry
//!
//! Both are id-ordered collections with simple predicate lookups. Matching is
//! exact; there is no ranking or indexing.

use std::collections::BTreeMap;

use crate::book::Book;
use crate::error::{Error, Result};
use crate::ids::{BookId, MemberId};
use crate::member::Member;

// =============================================================================
// Book Catalog
// =============================================================================

/// Every book copy the library knows about
#[derive(Debug, Clone, Default)]
pub struct BookCatalog {
    books: BTreeMap<BookId, Book>,
}

impl BookCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a book; its id must be unused
    pub fn insert(&mut self, book: Book) -> Result<BookId> {
        let id = book.id();
        if self.books.contains_key(&id) {
            return Err(Error::InvalidArgument(format!("{id} is already catalogued")));
        }
        self.books.insert(id, book);
        Ok(id)
    }

    pub fn get(&self, id: BookId) -> Option<&Book> {
        self.books.get(&id)
    }

    /// Mutable access, failing for an unknown id
    pub fn require_mut(&mut self, id: BookId) -> Result<&mut Book> {
        self.books
            .get_mut(&id)
            .ok_or_else(|| Error::InvalidArgument(format!("unknown {id}")))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Book> {
        self.books.values()
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn find_by_author<'a, 'q>(&'a self, author: &'q str) -> impl Iterator<Item = &'a Book> + 'q
    where
        'a: 'q,
    {
        self.iter().filter(move |book| book.author() == author)
    }

    pub fn find_by_title<'a, 'q>(&'a self, title: &'q str) -> impl Iterator<Item = &'a Book> + 'q
    where
        'a: 'q,
    {
        self.iter().filter(move |book| book.title() == title)
    }

    pub fn find_by_author_title<'a, 'q>(
        &'a self,
        author: &'q str,
        title: &'q str,
    ) -> impl Iterator<Item = &'a Book> + 'q
    where
        'a: 'q,
    {
        self.iter()
            .filter(move |book| book.author() == author && book.title() == title)
    }
}

// =============================================================================
// Member Registry
// =============================================================================

/// Every registered member
#[derive(Debug, Clone, Default)]
pub struct MemberRegistry {
    members: BTreeMap<MemberId, Member>,
}

impl MemberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a member; their id must be unused
    pub fn insert(&mut self, member: Member) -> Result<MemberId> {
        let id = member.id();
        if self.members.contains_key(&id) {
            return Err(Error::InvalidArgument(format!("{id} is already registered")));
        }
        self.members.insert(id, member);
        Ok(id)
    }

    pub fn get(&self, id: MemberId) -> Option<&Member> {
        self.members.get(&id)
    }

    /// Like `get`, failing for an unknown id
    pub fn require(&self, id: MemberId) -> Result<&Member> {
        self.members
            .get(&id)
            .ok_or_else(|| Error::InvalidArgument(format!("unknown {id}")))
    }

    /// Mutable access, failing for an unknown id
    pub fn require_mut(&mut self, id: MemberId) -> Result<&mut Member> {
        self.members
            .get_mut(&id)
            .ok_or_else(|| Error::InvalidArgument(format!("unknown {id}")))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Member> {
        self.members.values()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn find_by_last_name<'a, 'q>(
        &'a self,
        last_name: &'q str,
    ) -> impl Iterator<Item = &'a Member> + 'q
    where
        'a: 'q,
    {
        self.iter().filter(move |member| member.last_name() == last_name)
    }

    pub fn find_by_email_address<'a, 'q>(
        &'a self,
        email_address: &'q str,
    ) -> impl Iterator<Item = &'a Member> + 'q
    where
        'a: 'q,
    {
        self.iter()
            .filter(move |member| member.email_address() == email_address)
    }

    pub fn find_by_names<'a, 'q>(
        &'a self,
        first_name: &'q str,
        last_name: &'q str,
    ) -> impl Iterator<Item = &'a Member> + 'q
    where
        'a: 'q,
    {
        self.iter().filter(move |member| {
            member.first_name() == first_name && member.last_name() == last_name
        })
    }
}
