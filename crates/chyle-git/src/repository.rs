//! Git repository operations

use std::path::Path;

use git2::Repository;
use tracing::{info, instrument};

use chyle_core::error::GitError;

/// Result type for git operations
pub type Result<T> = std::result::Result<T, GitError>;

/// Git repository wrapper
pub struct GitRepo {
    pub(crate) repo: Repository,
}

impl GitRepo {
    /// Open a repository at the given path
    #[instrument(fields(path = %path.display()))]
    pub fn open(path: &Path) -> Result<Self> {
        info!(path = %path.display(), "opening git repository");
        let repo = Repository::open(path).map_err(|e| {
            if e.code() == git2::ErrorCode::NotFound {
                GitError::RepositoryNotFound(path.to_path_buf())
            } else {
                GitError::OpenFailed(e.to_string())
            }
        })?;

        Ok(Self { repo })
    }

    /// Resolve a reference (branch, tag, hash, `HEAD~2`…) to a commit
    pub fn resolve_commit(&self, reference: &str) -> Result<git2::Commit<'_>> {
        self.repo
            .revparse_single(reference)
            .and_then(|object| object.peel_to_commit())
            .map_err(|e| GitError::ReferenceNotFound {
                reference: reference.to_string(),
                reason: e.message().to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::Signature;
    use tempfile::TempDir;

    fn init_repo() -> (TempDir, GitRepo) {
        let temp = TempDir::new().unwrap();
        let repo = Repository::init(temp.path()).unwrap();
        let sig = Signature::now("Test", "test@example.com").unwrap();
        let tree_id = repo.index().unwrap().write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        repo.commit(Some("HEAD"), &sig, &sig, "Initial commit", &tree, &[])
            .unwrap();

        let repo = GitRepo::open(temp.path()).unwrap();
        (temp, repo)
    }

    #[test]
    fn test_not_a_repo() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing");
        assert!(matches!(
            GitRepo::open(&missing),
            Err(GitError::RepositoryNotFound(ref path)) if path == &missing
        ));
    }

    #[test]
    fn test_resolve_commit() {
        let (_temp, repo) = init_repo();
        let commit = repo.resolve_commit("HEAD").unwrap();
        assert_eq!(commit.summary(), Some("Initial commit"));

        let err = repo.resolve_commit("does-not-exist").unwrap_err();
        assert!(matches!(err, GitError::ReferenceNotFound { ref reference, .. } if reference == "does-not-exist"));
    }
}
