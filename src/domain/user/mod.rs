//! User domain
//!
//! End-user records, the listing primitives (filters, sorting, pagination)
//! and the repository trait the directory service talks to.

mod entity;
mod query;
mod repository;

pub use entity::{NewUser, User, UserChanges};
pub use query::{
    escape_like, PageRequest, RecordScope, SortDirection, SortKey, UserFilter, UserPage, UserSort,
    UserStats, DEFAULT_PAGE_LIMIT,
};
pub use repository::UserRepository;
