//! Users Domain
//!
//! The user directory: records keyed by a unique, normalized email address.
//!
//! ```text
//! handlers    HTTP endpoints, ValidatedJson at the boundary
//!    │
//! service     validation, normalization, credential hashing
//!    │
//! repository  UserRepository trait, in-memory and PostgreSQL stores
//!    │
//! models      User, DTOs, patch semantics
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_users::{handlers, InMemoryUserRepository, UserService};
//!
//! let service = UserService::new(InMemoryUserRepository::new());
//! let router = handlers::router(service);
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;
pub mod validation;

pub use error::{UserError, UserResult};
pub use handlers::ApiDoc;
pub use models::{CreateUser, DeleteResponse, UpdateUser, User, UserResponse};
pub use postgres::PostgresUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
