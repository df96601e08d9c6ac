//! Session-only accounts.
//!
//! This module provides:
//! - `AccountDirectory`: registered users and the logged-in session
//! - `password_strength`: the 0-4 score shown on sign-up
//!
//! Accounts live only as long as the directory; only the last used email is
//! remembered, through the config file.

pub mod directory;
pub mod error;

pub use directory::{
    password_strength, AccountDirectory, ProfileUpdate, Registration, DEMO_EMAIL, DEMO_PASSWORD,
};
pub use error::AuthError;
