//! staffmail - staff mail API
//!
//! Folder, label and paged listings of internal staff mail, and
//! transactional resend through an external mail queue.

pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod mail;
pub mod web;

pub use config::Config;
pub use db::{Database, NewUser, User, UserRepository};
pub use error::{Result, StaffmailError};
