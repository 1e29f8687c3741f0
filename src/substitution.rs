//! Literal substitution of the version token and managed values into
//! template files.
//!
//! Templates are always read from their source path, never from a previous
//! output, so running an update twice yields the same bytes.

use crate::boundary::Warning;
use crate::error::{PepbumpError, Result};
use crate::store::{self, Record};
use crate::ui::{Answer, Confirm, Reporter};
use indexmap::IndexMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Token replaced by the formatted version when nothing else is configured.
pub const DEFAULT_VERSION_TOKEN: &str = "__package_version__";

/// How `apply` treats destinations
#[derive(Debug, Clone, Copy)]
pub struct SubstitutionOptions<'a> {
    /// Print rendered text instead of writing it
    pub dry_run: bool,
    /// Replace existing destinations without asking
    pub overwrite: bool,
    pub version_token: &'a str,
    /// Store file location; relative managed paths are resolved from its directory
    pub store_path: &'a Path,
}

/// What happened to one managed file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    Written,
    Skipped,
    Previewed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub template: PathBuf,
    pub destination: PathBuf,
    pub outcome: FileOutcome,
}

/// Result of one pass over the managed files
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateSummary {
    pub files: Vec<FileReport>,
    pub warnings: Vec<Warning>,
}

impl UpdateSummary {
    pub fn count(&self, outcome: FileOutcome) -> usize {
        self.files.iter().filter(|f| f.outcome == outcome).count()
    }
}

/// Replace the version token, then each managed key in insertion order.
///
/// Replacement is literal and not re-entrant: text introduced by one
/// replacement is still visible to the keys that follow it.
pub fn render(
    template: &str,
    version: &str,
    version_token: &str,
    managed_values: &IndexMap<String, String>,
) -> String {
    let mut text = if version_token.is_empty() {
        template.to_string()
    } else {
        template.replace(version_token, version)
    };
    for (key, value) in managed_values {
        if !key.is_empty() {
            text = text.replace(key.as_str(), value);
        }
    }
    text
}

/// Render every managed file of `record`.
///
/// Files are handled in mapping order and the first error stops the batch;
/// files written before it keep their new content.
///
/// # Errors
/// * `TemplateRead` - a template cannot be read
/// * `DestinationWrite` - a destination cannot be written
pub fn apply(
    record: &Record,
    options: &SubstitutionOptions<'_>,
    prompt: &mut dyn Confirm,
    preview: &mut dyn Write,
    reporter: &Reporter,
) -> Result<UpdateSummary> {
    let version = record.version.to_string();
    let mut summary = UpdateSummary::default();

    for (src, dst) in &record.managed_files {
        let template = store::resolve_path(options.store_path, src);
        let destination = store::resolve_path(options.store_path, dst);
        reporter.debug(&format!(
            "Rendering {} -> {}",
            template.display(),
            destination.display()
        ));

        let source = fs::read_to_string(&template).map_err(|e| PepbumpError::TemplateRead {
            path: template.clone(),
            source: e,
        })?;
        let text = render(&source, &version, options.version_token, &record.managed_values);

        let outcome = if options.dry_run {
            reporter.status(&format!("Preview of {}", destination.display()));
            preview.write_all(text.as_bytes())?;
            preview.flush()?;
            FileOutcome::Previewed
        } else if !options.overwrite
            && destination.exists()
            && !confirm_overwrite(&destination, prompt, &mut summary)?
        {
            reporter.debug(&format!("File {} was skipped", destination.display()));
            FileOutcome::Skipped
        } else {
            store::write_atomic(&destination, &text).map_err(|e| {
                PepbumpError::DestinationWrite {
                    path: destination.clone(),
                    source: e,
                }
            })?;
            FileOutcome::Written
        };

        summary.files.push(FileReport {
            template,
            destination,
            outcome,
        });
    }

    Ok(summary)
}

fn confirm_overwrite(
    destination: &Path,
    prompt: &mut dyn Confirm,
    summary: &mut UpdateSummary,
) -> Result<bool> {
    let question = format!("Overwrite existing file {}?", destination.display());
    match prompt.confirm(&question)? {
        Answer::Yes => Ok(true),
        Answer::No => {
            summary.warnings.push(Warning::FileSkipped {
                path: destination.to_path_buf(),
            });
            Ok(false)
        }
        Answer::Unavailable => {
            summary.warnings.push(Warning::NonInteractive {
                path: destination.to_path_buf(),
            });
            Ok(false)
        }
    }
}
