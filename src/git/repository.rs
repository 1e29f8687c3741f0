use crate::error::{PepbumpError, Result};
use git2::{Commit, ErrorCode, ObjectType, Repository as Git2Repo};
use std::cell::Cell;
use std::path::{Path, PathBuf};

// libgit2 calls the credentials callback again after each rejected attempt.
const MAX_CREDENTIAL_ATTEMPTS: usize = 4;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    /// Path of `path` relative to the working directory, as the index expects it.
    fn index_path(&self, path: &Path) -> Result<PathBuf> {
        let workdir = self
            .repo
            .workdir()
            .ok_or_else(|| PepbumpError::publish("repository has no working directory"))?;
        let workdir = workdir.canonicalize()?;
        let absolute = path.canonicalize()?;

        absolute
            .strip_prefix(&workdir)
            .map(Path::to_path_buf)
            .map_err(|_| {
                PepbumpError::publish(format!(
                    "{} is outside the repository at {}",
                    path.display(),
                    workdir.display()
                ))
            })
    }

    fn current_branch(&self) -> Result<String> {
        let head = self.repo.head()?;
        if !head.is_branch() {
            return Err(PepbumpError::publish("HEAD is detached, cannot push"));
        }
        head.shorthand()
            .map(str::to_string)
            .ok_or_else(|| PepbumpError::publish("current branch name is not valid UTF-8"))
    }

    fn head_commit(&self) -> Result<Option<Commit<'_>>> {
        match self.repo.head() {
            Ok(head) => Ok(Some(head.peel_to_commit()?)),
            Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn push_refspec(&self, remote_name: &str, refspec: &str) -> Result<()> {
        let mut remote = self.repo.find_remote(remote_name).map_err(|_| {
            PepbumpError::publish(format!("No remote named '{}' found", remote_name))
        })?;

        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(remote_callbacks());

        remote
            .push(&[refspec], Some(&mut push_options))
            .map_err(|e| {
                if e.class() == git2::ErrorClass::Net {
                    PepbumpError::publish(format!("Network error during push: {}", e))
                } else if e.class() == git2::ErrorClass::Reference {
                    PepbumpError::publish(format!("Reference error during push: {}", e))
                } else {
                    PepbumpError::publish(format!("Failed to push '{}': {}", refspec, e))
                }
            })
    }
}

/// Callbacks trying SSH keys from ~/.ssh, then the SSH agent, then default credentials.
fn remote_callbacks<'a>() -> git2::RemoteCallbacks<'a> {
    let attempts = Cell::new(0usize);
    let mut callbacks = git2::RemoteCallbacks::new();

    callbacks.credentials(move |_url, username_from_url, allowed_types| {
        attempts.set(attempts.get() + 1);
        if attempts.get() > MAX_CREDENTIAL_ATTEMPTS {
            return Err(git2::Error::from_str("authentication failed"));
        }
        let username = username_from_url.unwrap_or("git");

        if allowed_types.contains(git2::CredentialType::SSH_KEY) {
            if let Some(home) = dirs::home_dir() {
                for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                    let path = home.join(".ssh").join(key);
                    if path.exists() {
                        if let Ok(cred) = git2::Cred::ssh_key(username, None, &path, None) {
                            return Ok(cred);
                        }
                    }
                }
            }

            if let Ok(cred) = git2::Cred::ssh_key_from_agent(username) {
                return Ok(cred);
            }
        }

        git2::Cred::default()
    });

    callbacks.push_update_reference(|refname, status| match status {
        Some(status) => Err(git2::Error::from_str(&format!(
            "remote rejected {}: {}",
            refname, status
        ))),
        None => Ok(()),
    });

    callbacks
}

impl super::Repository for Git2Repository {
    fn add(&self, path: &Path) -> Result<()> {
        let relative = self.index_path(path)?;
        let mut index = self.repo.index()?;
        index.add_path(&relative)?;
        index.write()?;
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<String> {
        let mut index = self.repo.index()?;
        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;
        let signature = self.repo.signature()?;

        let parent = self.head_commit()?;
        let parents: Vec<&Commit<'_>> = parent.iter().collect();

        let oid = self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &parents,
        )?;
        Ok(oid.to_string())
    }

    fn push(&self, remote: &str) -> Result<()> {
        let branch = self.current_branch()?;
        self.push_refspec(remote, &format!("refs/heads/{0}:refs/heads/{0}", branch))
    }

    fn tag(&self, name: &str, message: &str) -> Result<()> {
        let target = self.repo.head()?.peel(ObjectType::Commit)?;
        let signature = self.repo.signature()?;

        self.repo
            .tag(name, &target, &signature, message, false)
            .map_err(|e| PepbumpError::publish(format!("Cannot create tag '{}': {}", name, e)))?;

        Ok(())
    }

    fn push_tag(&self, remote: &str, name: &str) -> Result<()> {
        self.push_refspec(remote, &format!("refs/tags/{0}:refs/tags/{0}", name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::Repository;
    use std::fs;
    use tempfile::TempDir;

    fn init_repo(dir: &Path) -> Git2Repository {
        let repo = Git2Repo::init(dir).unwrap();
        {
            let mut config = repo.config().unwrap();
            config.set_str("user.name", "Test User").unwrap();
            config.set_str("user.email", "test@example.com").unwrap();
        }
        Git2Repository::from_git2(repo)
    }

    #[test]
    fn test_add_commit_and_tag() {
        let dir = TempDir::new().unwrap();
        let repo = init_repo(dir.path());
        let file = dir.path().join("version.txt");
        fs::write(&file, "1.0.0\n").unwrap();

        repo.add(&file).unwrap();
        let first = repo.commit("Initial version").unwrap();
        assert_eq!(first.len(), 40);

        fs::write(&file, "1.1.0\n").unwrap();
        repo.add(&file).unwrap();
        repo.commit("Bump to 1.1.0").unwrap();
        repo.tag("1.1.0", "Bump to 1.1.0").unwrap();

        let inner = &repo.repo;
        let head = inner.head().unwrap().peel_to_commit().unwrap();
        assert_eq!(head.message(), Some("Bump to 1.1.0"));
        assert_eq!(head.parent_count(), 1);

        let tag_ref = inner.find_reference("refs/tags/1.1.0").unwrap();
        let tag = tag_ref.peel_to_tag().unwrap();
        assert_eq!(tag.message(), Some("Bump to 1.1.0"));
        assert_eq!(tag.target_id(), head.id());
    }

    #[test]
    fn test_add_outside_repository_fails() {
        let dir = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        let repo = init_repo(dir.path());
        let file = outside.path().join("stray.txt");
        fs::write(&file, "x").unwrap();

        let err = repo.add(&file).unwrap_err();
        assert!(err.to_string().contains("outside the repository"));
    }

    #[test]
    fn test_push_without_remote_fails() {
        let dir = TempDir::new().unwrap();
        let repo = init_repo(dir.path());
        let file = dir.path().join("a.txt");
        fs::write(&file, "a").unwrap();
        repo.add(&file).unwrap();
        repo.commit("init").unwrap();

        let err = repo.push("origin").unwrap_err();
        assert!(err.to_string().contains("No remote named 'origin'"));
    }

    #[test]
    fn test_push_to_local_bare_remote() {
        let remote_dir = TempDir::new().unwrap();
        Git2Repo::init_bare(remote_dir.path()).unwrap();

        let dir = TempDir::new().unwrap();
        let repo = init_repo(dir.path());
        repo.repo
            .remote("origin", remote_dir.path().to_str().unwrap())
            .unwrap();

        let file = dir.path().join("a.txt");
        fs::write(&file, "a").unwrap();
        repo.add(&file).unwrap();
        repo.commit("init").unwrap();
        repo.tag("0.1.0", "init").unwrap();

        repo.push("origin").unwrap();
        repo.push_tag("origin", "0.1.0").unwrap();

        let bare = Git2Repo::open_bare(remote_dir.path()).unwrap();
        assert!(bare.find_reference("refs/tags/0.1.0").is_ok());
    }
}
