//! Administrator infrastructure module
//!
//! Password hashing with Argon2, in-memory and PostgreSQL repositories, and
//! the admin service.

mod password;
mod postgres_repository;
mod repository;
mod service;

#[cfg(test)]
pub use password::MockPasswordHasher;
pub use password::{Argon2Hasher, PasswordHasher};
pub use postgres_repository::PostgresAdminRepository;
pub use repository::InMemoryAdminRepository;
pub use service::{AdminService, CreateAdminRequest, UpdateAdminRequest};
