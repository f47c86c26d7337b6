//! Identities for books, members and loans.
//!
//! Each kind of entity gets its own newtype so a `BookId` can never be passed
//! where a `LoanId` is expected. Ids are handed out by an [`IdAllocator`],
//! strictly increasing from 1 and never reused.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Wrap a raw id value
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }

            /// The raw id value
            pub const fn get(self) -> u32 {
                self.0
            }
        }

        impl From<u32> for $name {
            fn from(raw: u32) -> Self {
                Self(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "-{}"), self.0)
            }
        }
    };
}

entity_id!(
    /// Identity of a physical book copy
    BookId,
    "book"
);

entity_id!(
    /// Identity of a library member
    MemberId,
    "member"
);

entity_id!(
    /// Identity of a committed loan
    LoanId,
    "loan"
);

/// Monotonic id source
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    last: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out the next id
    ///
    /// Fails once the id space is exhausted rather than wrapping onto ids
    /// already in use.
    pub fn allocate<T: From<u32>>(&mut self) -> Result<T> {
        let next = self.next_raw()?;
        self.last = next;
        Ok(T::from(next))
    }

    /// The id the next `allocate` will hand out, without claiming it
    pub fn peek<T: From<u32>>(&self) -> Result<T> {
        self.next_raw().map(T::from)
    }

    fn next_raw(&self) -> Result<u32> {
        self.last
            .checked_add(1)
            .ok_or_else(|| Error::InvalidState("id space exhausted".to_string()))
    }

    /// The most recently issued raw id (0 if none yet)
    pub fn last(&self) -> u32 {
        self.last
    }
}
