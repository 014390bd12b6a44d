//! Authentication
//!
//! Password credentials, bearer access tokens, and the admin role check.

mod errors;
mod models;
mod password;
mod repository;
mod service;
mod token;

pub use errors::*;
pub use models::*;
pub use password::*;
pub use repository::PgAuthRepository;
pub use service::*;
pub use token::*;
