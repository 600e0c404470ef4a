//! Domain layer - entities, listing rules and repository traits

pub mod admin;
pub mod error;
pub mod user;

pub use admin::{Admin, AdminChanges, AdminRepository, AdminSummary, NewAdmin};
pub use error::DomainError;
pub use user::{
    NewUser, PageRequest, RecordScope, SortDirection, SortKey, User, UserChanges, UserFilter,
    UserPage, UserRepository, UserSort, UserStats,
};
