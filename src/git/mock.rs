use crate::error::{PepbumpError, Result};
use crate::git::Repository;
use std::cell::RefCell;
use std::path::{Path, PathBuf};

/// One recorded call on a [MockRepository]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitCall {
    Add(PathBuf),
    Commit(String),
    Push(String),
    Tag { name: String, message: String },
    PushTag { remote: String, name: String },
}

impl GitCall {
    fn operation(&self) -> &'static str {
        match self {
            GitCall::Add(_) => "add",
            GitCall::Commit(_) => "commit",
            GitCall::Push(_) => "push",
            GitCall::Tag { .. } => "tag",
            GitCall::PushTag { .. } => "push_tag",
        }
    }
}

/// Mock repository for testing without actual git operations
#[derive(Debug, Default)]
pub struct MockRepository {
    calls: RefCell<Vec<GitCall>>,
    fail_on: Option<&'static str>,
}

impl MockRepository {
    /// Create a new mock repository where every operation succeeds
    pub fn new() -> Self {
        Self::default()
    }

    /// Make one operation (`"add"`, `"commit"`, `"push"`, `"tag"`, `"push_tag"`) fail.
    ///
    /// The failing call is still recorded.
    pub fn failing_on(operation: &'static str) -> Self {
        MockRepository {
            calls: RefCell::new(Vec::new()),
            fail_on: Some(operation),
        }
    }

    /// Calls received so far, in order
    pub fn calls(&self) -> Vec<GitCall> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: GitCall) -> Result<()> {
        let operation = call.operation();
        self.calls.borrow_mut().push(call);
        if self.fail_on == Some(operation) {
            return Err(PepbumpError::publish(format!("mock {} failure", operation)));
        }
        Ok(())
    }
}

impl Repository for MockRepository {
    fn add(&self, path: &Path) -> Result<()> {
        self.record(GitCall::Add(path.to_path_buf()))
    }

    fn commit(&self, message: &str) -> Result<String> {
        self.record(GitCall::Commit(message.to_string()))?;
        Ok("0".repeat(40))
    }

    fn push(&self, remote: &str) -> Result<()> {
        self.record(GitCall::Push(remote.to_string()))
    }

    fn tag(&self, name: &str, message: &str) -> Result<()> {
        self.record(GitCall::Tag {
            name: name.to_string(),
            message: message.to_string(),
        })
    }

    fn push_tag(&self, remote: &str, name: &str) -> Result<()> {
        self.record(GitCall::PushTag {
            remote: remote.to_string(),
            name: name.to_string(),
        })
    }
}
