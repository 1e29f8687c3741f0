//! Command workflows
//!
//! Each command runs against a [Context] built once per invocation from the
//! parsed arguments and the loaded configuration. The workflows take their
//! collaborators (prompt, preview sink, repository opener) as parameters so
//! they can be driven from tests without a terminal or a git checkout.
//!
//! `bump` and `set-version` share one pipeline:
//! 1. Load and validate the store file
//! 2. Compute the new version
//! 3. Render the managed files
//! 4. Save the store file and append a history entry
//! 5. Optionally commit, push and tag

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::boundary::Warning;
use crate::config::GitConfig;
use crate::domain::{BumpLevels, Version};
use crate::error::Result;
use crate::git::Repository;
use crate::store::{self, history, HistoryEntry, HistoryLog, Record};
use crate::substitution::{self, FileOutcome, SubstitutionOptions, UpdateSummary};
use crate::ui::{Answer, Confirm, Reporter};

/// Settings shared by every command of one invocation
#[derive(Debug, Clone)]
pub struct Context {
    pub reporter: Reporter,
    /// Preview instead of writing; never publishes
    pub dry_run: bool,
    /// Replace existing files without asking
    pub overwrite: bool,
    pub store_path: PathBuf,
    pub history_path: PathBuf,
    pub version_token: String,
    pub git: GitConfig,
}

impl Context {
    /// Directory holding the store file, used to locate the git repository.
    pub fn store_dir(&self) -> &Path {
        match self.store_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }

    fn dump_options(&self, command: &str, extra: &[(&str, String)]) {
        let mut entries = vec![
            ("store", self.store_path.display().to_string()),
            ("history", self.history_path.display().to_string()),
            ("dry_run", self.dry_run.to_string()),
            ("overwrite", self.overwrite.to_string()),
            ("version_token", self.version_token.clone()),
        ];
        entries.extend(extra.iter().cloned());
        self.reporter
            .options(&format!("Options for {}:", command), &entries);
    }
}

/// Git options of a version change
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PublishOptions {
    /// Commit the changes and push the current branch
    pub git_push: bool,
    /// Also create and push a tag; only honoured with `git_push`
    pub git_tag: bool,
    /// Commit and history message; the configured default is used when absent
    pub message: Option<String>,
}

/// What happened to the store file during `init`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    Created,
    Overwritten,
    Skipped,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InitResult {
    pub store: InitOutcome,
    /// An empty history file was created
    pub history_created: bool,
    pub warnings: Vec<Warning>,
}

/// Result of the git step of a version change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// `--git-push` not given, or dry run
    NotRequested,
    Published { commit: String, tag: Option<String> },
    /// Failed after the local files were updated; see the warnings
    Failed,
}

/// Result of `bump` or `set-version`
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeResult {
    pub previous: Version,
    pub current: Version,
    pub summary: UpdateSummary,
    pub publish: PublishOutcome,
    /// Warnings from substitution and publishing, in the order they occurred
    pub warnings: Vec<Warning>,
}

/// Write a template store file and create an empty history file.
///
/// An existing store file is only replaced with `overwrite` or after
/// confirmation; a refusal skips it without failing. An existing history
/// file is never touched.
pub fn run_init(ctx: &Context, prompt: &mut dyn Confirm) -> Result<InitResult> {
    ctx.dump_options("init", &[]);
    let reporter = &ctx.reporter;
    let mut warnings = Vec::new();

    let store = if ctx.store_path.exists() && !ctx.overwrite {
        let question = format!("Overwrite existing file {}?", ctx.store_path.display());
        match prompt.confirm(&question)? {
            Answer::Yes => InitOutcome::Overwritten,
            Answer::No => {
                warnings.push(Warning::FileSkipped {
                    path: ctx.store_path.clone(),
                });
                InitOutcome::Skipped
            }
            Answer::Unavailable => {
                warnings.push(Warning::NonInteractive {
                    path: ctx.store_path.clone(),
                });
                InitOutcome::Skipped
            }
        }
    } else if ctx.store_path.exists() {
        InitOutcome::Overwritten
    } else {
        InitOutcome::Created
    };

    if store != InitOutcome::Skipped {
        store::save(&Record::template(), &ctx.store_path)?;
        reporter.success(&format!("Wrote {}", ctx.store_path.display()));
    }

    let history_created = history::ensure_exists(&ctx.history_path)?;
    if history_created {
        reporter.success(&format!("Created {}", ctx.history_path.display()));
    } else {
        reporter.debug(&format!("{} already exists", ctx.history_path.display()));
    }

    for warning in &warnings {
        reporter.warning(warning);
    }

    Ok(InitResult {
        store,
        history_created,
        warnings,
    })
}

/// Load the store file and return its version. Writes nothing.
pub fn current_version(ctx: &Context) -> Result<Version> {
    ctx.dump_options("current-version", &[]);
    Ok(store::load(&ctx.store_path)?.version)
}

/// Increment the requested levels and propagate the new version.
pub fn run_bump<R, F>(
    ctx: &Context,
    levels: &BumpLevels,
    publish: &PublishOptions,
    prompt: &mut dyn Confirm,
    preview: &mut dyn Write,
    open_repo: F,
) -> Result<ChangeResult>
where
    R: Repository,
    F: FnOnce() -> Result<R>,
{
    ctx.dump_options("bump", &[("levels", levels.names().join(", "))]);
    run_change(
        ctx,
        |current| current.increment(levels),
        &ctx.git.bump_message,
        publish,
        prompt,
        preview,
        open_repo,
    )
}

/// Replace the version with `version` and propagate it.
///
/// The argument is validated before anything is read or written.
pub fn run_set_version<R, F>(
    ctx: &Context,
    version: &str,
    publish: &PublishOptions,
    prompt: &mut dyn Confirm,
    preview: &mut dyn Write,
    open_repo: F,
) -> Result<ChangeResult>
where
    R: Repository,
    F: FnOnce() -> Result<R>,
{
    ctx.dump_options("set-version", &[("version", version.to_string())]);
    let target = Version::parse(version)?;
    run_change(
        ctx,
        |_| Ok(target),
        &ctx.git.set_message,
        publish,
        prompt,
        preview,
        open_repo,
    )
}

fn run_change<R, F>(
    ctx: &Context,
    compute: impl FnOnce(&Version) -> Result<Version>,
    default_message: &str,
    publish: &PublishOptions,
    prompt: &mut dyn Confirm,
    preview: &mut dyn Write,
    open_repo: F,
) -> Result<ChangeResult>
where
    R: Repository,
    F: FnOnce() -> Result<R>,
{
    let reporter = &ctx.reporter;
    let mut record = store::load(&ctx.store_path)?;
    let previous = record.version;
    record.version = compute(&previous)?;
    let current = record.version;
    reporter.headline(&format!("{} > {}", previous, current));

    // Opened up front so an unwritable history fails before any file is touched
    let mut history_log = if ctx.dry_run {
        None
    } else {
        Some(HistoryLog::open(&ctx.history_path)?)
    };

    let options = SubstitutionOptions {
        dry_run: ctx.dry_run,
        overwrite: ctx.overwrite,
        version_token: &ctx.version_token,
        store_path: &ctx.store_path,
    };
    let summary = substitution::apply(&record, &options, prompt, preview, reporter)?;
    let mut warnings = summary.warnings.clone();
    for warning in &warnings {
        reporter.warning(warning);
    }

    let Some(history_log) = history_log.as_mut() else {
        reporter.status(&format!(
            "Dry run: {} and {} left untouched",
            ctx.store_path.display(),
            ctx.history_path.display()
        ));
        return Ok(ChangeResult {
            previous,
            current,
            summary,
            publish: PublishOutcome::NotRequested,
            warnings,
        });
    };

    let message = publish.message.as_deref().unwrap_or(default_message);
    store::save(&record, &ctx.store_path)?;
    history_log.append(&HistoryEntry::now(&current, message))?;
    reporter.success(&format!(
        "Version {} saved ({} written, {} skipped)",
        current,
        summary.count(FileOutcome::Written),
        summary.count(FileOutcome::Skipped)
    ));

    let outcome = if publish.git_push {
        let attempt = open_repo().and_then(|repo| {
            publish_change(ctx, &repo, &record, publish.git_tag, message, &mut warnings)
        });
        match attempt {
            Ok(outcome) => outcome,
            Err(e) => {
                let warning = Warning::PublishFailed {
                    reason: e.to_string(),
                };
                reporter.warning(&warning);
                warnings.push(warning);
                PublishOutcome::Failed
            }
        }
    } else {
        PublishOutcome::NotRequested
    };

    Ok(ChangeResult {
        previous,
        current,
        summary,
        publish: outcome,
        warnings,
    })
}

/// Stage the managed destinations that exist plus the store and history
/// files, commit, push, and optionally tag.
fn publish_change<R: Repository>(
    ctx: &Context,
    repo: &R,
    record: &Record,
    tag: bool,
    message: &str,
    warnings: &mut Vec<Warning>,
) -> Result<PublishOutcome> {
    let reporter = &ctx.reporter;
    let remote = ctx.git.remote.as_str();

    for destination in record.destinations(&ctx.store_path) {
        if destination.exists() {
            repo.add(&destination)?;
        } else {
            let warning = Warning::NotStaged { path: destination };
            reporter.warning(&warning);
            warnings.push(warning);
        }
    }
    repo.add(&ctx.store_path)?;
    repo.add(&ctx.history_path)?;

    let commit = repo.commit(message)?;
    reporter.debug(&format!("Created commit {}", commit));
    repo.push(remote)?;
    reporter.success(&format!("Pushed to {}", remote));

    let tag_name = if tag {
        let name = ctx.git.tag_name(&record.version);
        repo.tag(&name, message)?;
        repo.push_tag(remote, &name)?;
        reporter.success(&format!("Tagged {} and pushed it to {}", name, remote));
        Some(name)
    } else {
        None
    };

    Ok(PublishOutcome::Published {
        commit,
        tag: tag_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PepbumpError;
    use crate::git::{GitCall, MockRepository};
    use crate::ui::{FixedAnswer, Verbosity};
    use std::fs;
    use tempfile::TempDir;

    fn context(dir: &Path) -> Context {
        Context {
            reporter: Reporter::new(Verbosity::Quiet),
            dry_run: false,
            overwrite: false,
            store_path: dir.join("pepbump.yaml"),
            history_path: dir.join("pepbump_history.txt"),
            version_token: "__package_version__".to_string(),
            git: GitConfig::default(),
        }
    }

    fn no_repo() -> Result<MockRepository> {
        Err(PepbumpError::publish("not a git repository"))
    }

    #[test]
    fn test_init_creates_store_and_history() {
        let dir = TempDir::new().unwrap();
        let ctx = context(dir.path());
        let mut prompt = FixedAnswer::new(Answer::No);

        let result = run_init(&ctx, &mut prompt).unwrap();

        assert_eq!(result.store, InitOutcome::Created);
        assert!(result.history_created);
        assert!(prompt.asked.is_empty());
        assert_eq!(store::load(&ctx.store_path).unwrap(), Record::template());
        assert_eq!(fs::read_to_string(&ctx.history_path).unwrap(), "");
    }

    #[test]
    fn test_init_refused_keeps_store() {
        let dir = TempDir::new().unwrap();
        let ctx = context(dir.path());
        fs::write(&ctx.store_path, "keep me").unwrap();
        fs::write(&ctx.history_path, "old entry\n").unwrap();
        let mut prompt = FixedAnswer::new(Answer::No);

        let result = run_init(&ctx, &mut prompt).unwrap();

        assert_eq!(result.store, InitOutcome::Skipped);
        assert!(!result.history_created);
        assert_eq!(prompt.asked.len(), 1);
        assert_eq!(fs::read_to_string(&ctx.store_path).unwrap(), "keep me");
        assert_eq!(fs::read_to_string(&ctx.history_path).unwrap(), "old entry\n");
    }

    #[test]
    fn test_set_version_with_invalid_argument_touches_nothing() {
        let dir = TempDir::new().unwrap();
        let ctx = context(dir.path());
        let mut prompt = FixedAnswer::new(Answer::Yes);
        let mut preview = Vec::new();

        let err = run_set_version(
            &ctx,
            "1.x",
            &PublishOptions::default(),
            &mut prompt,
            &mut preview,
            no_repo,
        )
        .unwrap_err();

        assert!(matches!(err, PepbumpError::InvalidVersion(_)));
        assert!(!ctx.store_path.exists());
    }

    #[test]
    fn test_publish_stages_existing_files_only() {
        let dir = TempDir::new().unwrap();
        let ctx = context(dir.path());
        let mut record = Record::template();
        record.managed_files.clear();
        record
            .managed_files
            .insert("t.txt".to_string(), "present.txt".to_string());
        record
            .managed_files
            .insert("u.txt".to_string(), "missing.txt".to_string());
        fs::write(dir.path().join("present.txt"), "x").unwrap();
        let repo = MockRepository::new();
        let mut warnings = Vec::new();

        let outcome =
            publish_change(&ctx, &repo, &record, false, "msg", &mut warnings).unwrap();

        assert!(matches!(outcome, PublishOutcome::Published { tag: None, .. }));
        assert_eq!(
            warnings,
            vec![Warning::NotStaged {
                path: dir.path().join("missing.txt")
            }]
        );
        let calls = repo.calls();
        assert_eq!(calls[0], GitCall::Add(dir.path().join("present.txt")));
        assert_eq!(calls[1], GitCall::Add(ctx.store_path.clone()));
        assert_eq!(calls[2], GitCall::Add(ctx.history_path.clone()));
        assert_eq!(calls[3], GitCall::Commit("msg".to_string()));
        assert_eq!(calls[4], GitCall::Push("origin".to_string()));
        assert_eq!(calls.len(), 5);
    }

    #[test]
    fn test_store_dir_defaults_to_current_directory() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context(dir.path());
        assert_eq!(ctx.store_dir(), dir.path());
        ctx.store_path = PathBuf::from("pepbump.yaml");
        assert_eq!(ctx.store_dir(), Path::new("."));
    }
}
