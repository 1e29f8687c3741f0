use std::fmt;
use std::path::PathBuf;

/// Non-fatal issues met while running a command.
/// They are reported to the user; the command carries on.
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    /// The user declined to overwrite an existing file
    FileSkipped { path: PathBuf },
    /// A confirmation was needed but stdin is not a terminal
    NonInteractive { path: PathBuf },
    /// Commit, push or tag failed after local files were updated
    PublishFailed { reason: String },
    /// A managed destination does not exist and was left out of the commit
    NotStaged { path: PathBuf },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::FileSkipped { path } => {
                write!(f, "File {} was skipped", path.display())
            }
            Warning::NonInteractive { path } => {
                write!(
                    f,
                    "Not overwriting {}: confirmation needed but input is not a terminal (use --overwrite)",
                    path.display()
                )
            }
            Warning::PublishFailed { reason } => {
                write!(
                    f,
                    "Failed to publish to the remote repository: {} (local files were updated)",
                    reason
                )
            }
            Warning::NotStaged { path } => {
                write!(f, "{} does not exist and was not staged", path.display())
            }
        }
    }
}
