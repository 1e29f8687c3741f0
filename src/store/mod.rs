//! The managed-file store: a YAML document holding the current version,
//! the literal substitution table and the template -> destination mapping.
//!
//! ```yaml
//! version:
//!   major: 0
//!   minor: 0
//!   micro: 0
//!   a: null
//!   b: null
//!   rc: null
//!   post: null
//!   dev: null
//! managed_values:
//!   __package_name__: package name
//! managed_files:
//!   templates/setup.py: setup.py
//! ```
//!
//! Mapping order is significant and survives a load/save cycle.

pub mod history;

use crate::domain::{PreRelease, PreReleaseKind, Version};
use crate::error::{PepbumpError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub use history::{HistoryEntry, HistoryLog};

/// Top-level sections every store file must carry, non-empty.
pub const SECTIONS: [&str; 3] = ["version", "managed_values", "managed_files"];

/// Sub-fields of the `version` section.
pub const VERSION_FIELDS: [&str; 8] = ["major", "minor", "micro", "a", "b", "rc", "post", "dev"];

/// In-memory form of the store file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub version: Version,
    /// Placeholder -> replacement, applied in insertion order
    pub managed_values: IndexMap<String, String>,
    /// Template path -> destination path
    pub managed_files: IndexMap<String, String>,
}

impl Record {
    /// Starter record written by `init`.
    pub fn template() -> Self {
        let managed_values = [
            ("__package_name__", "package name"),
            ("__package_description__", "package description"),
            ("__package_url__", "package URL"),
            ("__package_licence__", "package licence"),
            ("__author_name__", "author name"),
            ("__author_email__", "author contact email"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let managed_files = [
            ("templates/setup.py", "setup.py"),
            ("templates/meta.yaml", "meta.yaml"),
            ("templates/__init__.py", "package/__init__.py"),
            ("templates/README.md", "README.md"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Record {
            version: Version::new(0, 0, 0),
            managed_values,
            managed_files,
        }
    }

    /// Destination paths, resolved against the store file location.
    pub fn destinations(&self, store_path: &Path) -> Vec<PathBuf> {
        self.managed_files
            .values()
            .map(|dst| resolve_path(store_path, dst))
            .collect()
    }
}

/// Resolve a path written in the store file.
///
/// Relative paths are taken from the directory that holds the store file.
pub fn resolve_path(store_path: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match store_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(path),
        _ => path.to_path_buf(),
    }
}

#[derive(Debug, Deserialize)]
struct RawDocument {
    version: Option<IndexMap<String, Option<u64>>>,
    managed_values: Option<IndexMap<String, serde_yaml::Value>>,
    managed_files: Option<IndexMap<String, serde_yaml::Value>>,
}

#[derive(Debug, Serialize)]
struct VersionFields {
    major: u64,
    minor: Option<u64>,
    micro: Option<u64>,
    a: Option<u64>,
    b: Option<u64>,
    rc: Option<u64>,
    post: Option<u64>,
    dev: Option<u64>,
}

impl From<&Version> for VersionFields {
    fn from(version: &Version) -> Self {
        VersionFields {
            major: version.major,
            minor: version.minor,
            micro: version.micro,
            a: version.pre_number(PreReleaseKind::Alpha),
            b: version.pre_number(PreReleaseKind::Beta),
            rc: version.pre_number(PreReleaseKind::Rc),
            post: version.post,
            dev: version.dev,
        }
    }
}

#[derive(Debug, Serialize)]
struct Document<'a> {
    version: VersionFields,
    managed_values: &'a IndexMap<String, String>,
    managed_files: &'a IndexMap<String, String>,
}

/// Load and validate a store file.
///
/// # Errors
/// * `Store` - the file cannot be read or is not valid YAML of the expected shape
/// * `MissingSection` - a top-level section is absent or empty
/// * `MissingField` - one of the eight version sub-fields is absent
/// * `InvalidVersion` - the version is not canonical or carries several pre-release tags
pub fn load(path: &Path) -> Result<Record> {
    let text = fs::read_to_string(path)
        .map_err(|e| PepbumpError::store(path, format!("cannot read file: {}", e)))?;
    parse(&text, path)
}

/// Parse store file contents; `path` is only used in error messages.
pub fn parse(text: &str, path: &Path) -> Result<Record> {
    let value: serde_yaml::Value = serde_yaml::from_str(text)
        .map_err(|e| PepbumpError::store(path, format!("invalid YAML: {}", e)))?;
    if value.is_null() {
        return Err(PepbumpError::missing_section(SECTIONS[0], path));
    }

    let raw: RawDocument = serde_yaml::from_value(value)
        .map_err(|e| PepbumpError::store(path, format!("unexpected structure: {}", e)))?;

    let version_fields = non_empty(raw.version, "version", path)?;
    let managed_values = non_empty(raw.managed_values, "managed_values", path)?;
    let managed_files = non_empty(raw.managed_files, "managed_files", path)?;

    let version = assemble_version(&version_fields, path)?;

    Ok(Record {
        version,
        managed_values: scalars_to_strings(managed_values, "managed_values", path)?,
        managed_files: scalars_to_strings(managed_files, "managed_files", path)?,
    })
}

/// Write a record to `path`, replacing the file in one step.
pub fn save(record: &Record, path: &Path) -> Result<()> {
    let text = to_yaml(record)?;
    write_atomic(path, &text)
        .map_err(|e| PepbumpError::store(path, format!("cannot write file: {}", e)))
}

/// Render a record as store file text.
pub fn to_yaml(record: &Record) -> Result<String> {
    let document = Document {
        version: VersionFields::from(&record.version),
        managed_values: &record.managed_values,
        managed_files: &record.managed_files,
    };
    serde_yaml::to_string(&document)
        .map_err(|e| PepbumpError::store("<memory>", format!("cannot serialise record: {}", e)))
}

fn non_empty<V>(
    section: Option<IndexMap<String, V>>,
    name: &str,
    path: &Path,
) -> Result<IndexMap<String, V>> {
    match section {
        Some(map) if !map.is_empty() => Ok(map),
        _ => Err(PepbumpError::missing_section(name, path)),
    }
}

fn assemble_version(fields: &IndexMap<String, Option<u64>>, path: &Path) -> Result<Version> {
    for field in VERSION_FIELDS {
        if !fields.contains_key(field) {
            return Err(PepbumpError::missing_field(field, path));
        }
    }
    let get = |name: &str| fields.get(name).copied().flatten();

    let major = get("major").ok_or_else(|| {
        PepbumpError::version(format!(
            "'major' must be set in the version section of {}",
            path.display()
        ))
    })?;

    let tags: Vec<PreRelease> = [
        (PreReleaseKind::Alpha, get("a")),
        (PreReleaseKind::Beta, get("b")),
        (PreReleaseKind::Rc, get("rc")),
    ]
    .into_iter()
    .filter_map(|(kind, number)| number.map(|n| PreRelease::new(kind, n)))
    .collect();

    if tags.len() > 1 {
        let names: Vec<String> = tags.iter().map(|t| t.to_string()).collect();
        return Err(PepbumpError::version(format!(
            "several pre-release tags set at once ({}) in {}",
            names.join(", "),
            path.display()
        )));
    }

    let version = Version {
        major,
        minor: get("minor"),
        micro: get("micro"),
        pre: tags.first().copied(),
        post: get("post"),
        dev: get("dev"),
    };
    version.validate()?;
    Ok(version)
}

fn scalars_to_strings(
    map: IndexMap<String, serde_yaml::Value>,
    section: &str,
    path: &Path,
) -> Result<IndexMap<String, String>> {
    map.into_iter()
        .map(|(key, value)| {
            let text = match value {
                serde_yaml::Value::String(s) => s,
                serde_yaml::Value::Number(n) => n.to_string(),
                serde_yaml::Value::Bool(b) => b.to_string(),
                serde_yaml::Value::Null => String::new(),
                _ => {
                    return Err(PepbumpError::store(
                        path,
                        format!("value of '{}' in section '{}' is not a scalar", key, section),
                    ))
                }
            };
            Ok((key, text))
        })
        .collect()
}

/// Replace `path` with `contents` through a temporary file in the same directory.
///
/// Missing parent directories are created. An existing file keeps its permissions.
pub(crate) fn write_atomic(path: &Path, contents: &str) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.as_file().sync_all()?;

    match fs::metadata(path) {
        Ok(meta) => fs::set_permissions(tmp.path(), meta.permissions())?,
        Err(_) => set_default_permissions(tmp.path())?,
    }

    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(unix)]
fn set_default_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn set_default_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
