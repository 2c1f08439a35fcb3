//! Chyle Git - Commit retrieval for changelog generation
//!
//! This crate reads the commits between two references of a git repository
//! and exposes them as immutable [`CommitRecord`]s.

mod commits;
mod repository;
pub mod types;

pub use repository::{GitRepo, Result};
pub use types::{CommitRecord, CommitType, Signature};
