//! Git operations abstraction layer
//!
//! Publishing a new version needs five operations: stage a file, commit,
//! push the current branch, create an annotated tag and push that tag.
//! They are expressed by the [Repository] trait so the orchestration can be
//! driven by the real implementation or by a mock in tests:
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: Records calls and can be told to fail
//!
//! ```rust
//! # use pepbump::git::Repository;
//! # use std::path::Path;
//! # fn example<R: Repository>(repo: &R) -> pepbump::Result<()> {
//! repo.add(Path::new("setup.py"))?;
//! repo.commit("Release 1.2.0")?;
//! repo.push("origin")?;
//! repo.tag("1.2.0", "Release 1.2.0")?;
//! repo.push_tag("origin", "1.2.0")?;
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::{GitCall, MockRepository};
pub use repository::Git2Repository;

use crate::error::Result;
use std::path::Path;

/// Version-control operations used to publish a version change
///
/// All methods return [crate::error::Result<T>]; implementations map their
/// underlying failures to [crate::error::PepbumpError].
pub trait Repository {
    /// Stage a file for the next commit
    ///
    /// # Arguments
    /// * `path` - File to stage, absolute or relative to the current directory
    fn add(&self, path: &Path) -> Result<()>;

    /// Commit the staged changes on the current branch
    ///
    /// # Returns
    /// * `Ok(String)` - Id of the new commit
    fn commit(&self, message: &str) -> Result<String>;

    /// Push the current branch to a remote
    fn push(&self, remote: &str) -> Result<()>;

    /// Create an annotated tag on HEAD
    ///
    /// # Arguments
    /// * `name` - Tag name (e.g., "1.2.0")
    /// * `message` - Tag annotation
    fn tag(&self, name: &str, message: &str) -> Result<()>;

    /// Push one tag to a remote
    fn push_tag(&self, remote: &str, name: &str) -> Result<()>;
}

impl<T: Repository + ?Sized> Repository for &T {
    fn add(&self, path: &Path) -> Result<()> {
        (**self).add(path)
    }

    fn commit(&self, message: &str) -> Result<String> {
        (**self).commit(message)
    }

    fn push(&self, remote: &str) -> Result<()> {
        (**self).push(remote)
    }

    fn tag(&self, name: &str, message: &str) -> Result<()> {
        (**self).tag(name, message)
    }

    fn push_tag(&self, remote: &str, name: &str) -> Result<()> {
        (**self).push_tag(remote, name)
    }
}
