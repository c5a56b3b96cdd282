//! Authentication primitives for Ticketline.
//!
//! This crate owns everything identity-related that is not persistence:
//! Argon2id password hashing, HS256 bearer-token issue/verification, the
//! [`Principal`] resolved from a validated token, and credential input
//! validation. Persistence of user rows lives in `ticketline-postgres`;
//! the HTTP extractors that call into this crate live in `ticketline-web`.
//!
//! The principal is always threaded explicitly into handlers and stores as
//! a value, never looked up from ambient state.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod password;
pub mod principal;
pub mod token;
pub mod utils;

// Re-export key types for convenience
pub use error::{AuthError, Result};
pub use password::{hash_password, verify_password};
pub use principal::Principal;
pub use token::{Claims, TokenManager};
