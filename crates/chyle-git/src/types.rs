//! Git types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of a commit, derived from its parent count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitType {
    /// Single parent (or root) commit
    Regular,
    /// Commit with several parents
    Merge,
}

impl CommitType {
    /// Get the commit type as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Merge => "merge",
        }
    }
}

impl std::fmt::Display for CommitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An identity and timestamp attached to a commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub name: String,
    pub email: String,
    pub date: DateTime<Utc>,
}

impl Signature {
    pub fn new(name: impl Into<String>, email: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            date,
        }
    }
}

/// An immutable commit read from history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// Commit hash (full)
    pub hash: String,
    /// Author identity
    pub author: Signature,
    /// Committer identity
    pub committer: Signature,
    /// Full commit message
    pub message: String,
    /// Number of parents
    pub parent_count: usize,
}

impl CommitRecord {
    /// Create a new single-parent commit where author and committer match
    pub fn new(hash: impl Into<String>, message: impl Into<String>, author: Signature) -> Self {
        Self {
            hash: hash.into(),
            committer: author.clone(),
            author,
            message: message.into(),
            parent_count: 1,
        }
    }

    /// Set the committer
    pub fn with_committer(mut self, committer: Signature) -> Self {
        self.committer = committer;
        self
    }

    /// Set the parent count
    pub fn with_parent_count(mut self, parent_count: usize) -> Self {
        self.parent_count = parent_count;
        self
    }

    /// Merge or regular
    pub fn commit_type(&self) -> CommitType {
        if self.parent_count > 1 {
            CommitType::Merge
        } else {
            CommitType::Regular
        }
    }
}
