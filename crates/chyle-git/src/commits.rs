//! Commit history operations

use chrono::{DateTime, TimeZone, Utc};
use git2::Sort;
use tracing::{debug, instrument};

use chyle_core::error::GitError;

use crate::repository::{GitRepo, Result};
use crate::types::{CommitRecord, Signature};

impl GitRepo {
    /// Get the commits reachable from `to` but not from `from`, newest first
    #[instrument(skip(self))]
    pub fn commits_between(&self, from: &str, to: &str) -> Result<Vec<CommitRecord>> {
        let from_commit = self.resolve_commit(from)?;
        let to_commit = self.resolve_commit(to)?;

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(to_commit.id())?;
        revwalk.hide(from_commit.id())?;

        let mut commits = Vec::new();
        for oid in revwalk {
            let commit = self.repo.find_commit(oid?)?;
            commits.push(commit_to_record(&commit)?);
        }

        if commits.is_empty() {
            return Err(GitError::NoCommits {
                from: from.to_string(),
                to: to.to_string(),
            });
        }

        debug!(count = commits.len(), "commits read");
        Ok(commits)
    }
}

fn to_datetime(hash: &str, time: git2::Time) -> Result<DateTime<Utc>> {
    Utc.timestamp_opt(time.seconds(), 0)
        .single()
        .ok_or_else(|| GitError::InvalidTimestamp {
            hash: hash.to_string(),
            seconds: time.seconds(),
        })
}

fn to_signature(
    hash: &str,
    signature: &git2::Signature<'_>,
    time: git2::Time,
) -> Result<Signature> {
    Ok(Signature::new(
        signature.name().unwrap_or("Unknown"),
        signature.email().unwrap_or("unknown@example.com"),
        to_datetime(hash, time)?,
    ))
}

/// Convert a git2 Commit to a CommitRecord
fn commit_to_record(commit: &git2::Commit<'_>) -> Result<CommitRecord> {
    let hash = commit.id().to_string();
    let author = commit.author();
    let committer = commit.committer();

    let author = to_signature(&hash, &author, author.when())?;
    let committer = to_signature(&hash, &committer, commit.time())?;

    let message = commit.message().unwrap_or_default().trim_end();
    Ok(CommitRecord::new(hash, message, author)
        .with_committer(committer)
        .with_parent_count(commit.parent_count()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::{Repository, Signature as GitSignature};
    use std::path::Path;
    use tempfile::TempDir;

    use crate::types::CommitType;

    fn commit_file(repo: &Repository, root: &Path, name: &str, message: &str) -> git2::Oid {
        let sig = GitSignature::now("Test", "test@example.com").unwrap();
        std::fs::write(root.join(name), message).unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(Path::new(name)).unwrap();
        index.write().unwrap();
        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();

        let parents: Vec<git2::Commit<'_>> = repo
            .head()
            .ok()
            .and_then(|h| h.peel_to_commit().ok())
            .into_iter()
            .collect();
        let parents: Vec<&git2::Commit<'_>> = parents.iter().collect();

        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap()
    }

    fn setup_repo_with_commits() -> (TempDir, GitRepo) {
        let temp = TempDir::new().unwrap();
        let repo = Repository::init(temp.path()).unwrap();

        commit_file(&repo, temp.path(), "a.txt", "Initial commit");
        commit_file(&repo, temp.path(), "b.txt", "feat: add b #12");
        commit_file(&repo, temp.path(), "c.txt", "fix: repair c\n\nWith a body");

        let git_repo = GitRepo::open(temp.path()).unwrap();
        (temp, git_repo)
    }

    #[test]
    fn test_commits_between() {
        let (_temp, repo) = setup_repo_with_commits();
        let commits = repo.commits_between("HEAD~2", "HEAD").unwrap();

        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].message, "fix: repair c\n\nWith a body");
        assert_eq!(commits[1].message, "feat: add b #12");
        assert_eq!(commits[0].author.name, "Test");
        assert_eq!(commits[0].commit_type(), CommitType::Regular);
    }

    #[test]
    fn test_commits_between_same_reference() {
        let (_temp, repo) = setup_repo_with_commits();
        let err = repo.commits_between("HEAD", "HEAD").unwrap_err();
        assert!(matches!(err, GitError::NoCommits { .. }));
    }

    #[test]
    fn test_commit_time_keeps_instant() {
        // 2024-03-01T14:00:00+02:00
        let time = git2::Time::new(1_709_294_400, 120);
        let date = to_datetime("abc123", time).unwrap();
        assert_eq!(date.to_rfc3339(), "2024-03-01T12:00:00+00:00");
    }

    #[test]
    fn test_commit_time_out_of_range() {
        let err = to_datetime("abc123", git2::Time::new(i64::MAX, 0)).unwrap_err();
        assert!(matches!(
            err,
            GitError::InvalidTimestamp { ref hash, seconds } if hash == "abc123" && seconds == i64::MAX
        ));
    }

    #[test]
    fn test_commits_between_unknown_reference() {
        let (_temp, repo) = setup_repo_with_commits();
        let err = repo.commits_between("v9.9.9", "HEAD").unwrap_err();
        assert!(matches!(err, GitError::ReferenceNotFound { .. }));
    }
}
