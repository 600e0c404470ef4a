//! Administrator domain

mod entity;
mod repository;

pub use entity::{Admin, AdminChanges, AdminSummary, NewAdmin};
pub use repository::AdminRepository;
