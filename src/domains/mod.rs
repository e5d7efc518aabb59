//! Prefixes bare asset paths in shape files with a domain, eg. `"block/stone"` becomes
//! `"game:block/stone"`.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use indexmap::IndexSet;
use log::{info, warn};
use regex::{NoExpand, Regex};
use thiserror::Error;
use walkdir::WalkDir;

use crate::utils::glob::Glob;

pub const DEFAULT_PATTERN: &str = "../../resources/assets/*/shapes/**/*";
pub const DEFAULT_DOMAIN: &str = "game";
pub const DEFAULT_PREFIXES: [&str; 3] = ["block", "item", "entity"];

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        source: regex::Error,
    },

    #[error("Unable to access {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
}

/// A literal find-and-replace.
#[derive(Debug, Clone)]
pub struct Substitution {
    search: Regex,
    replacement: String,
}

impl Substitution {
    pub fn literal(search: &str, replacement: &str) -> Result<Self, DomainError> {
        let search = Regex::new(&regex::escape(search)).map_err(|source| DomainError::Pattern {
            pattern: search.to_string(),
            source,
        })?;

        Ok(Self {
            search,
            replacement: replacement.to_string(),
        })
    }

    /// `"<prefix>/` becomes `"<domain>:<prefix>/`. Paths that already have a domain don't match,
    /// so applying it twice changes nothing.
    pub fn add_domain(domain: &str, prefix: &str) -> Result<Self, DomainError> {
        Self::literal(&format!("\"{prefix}/"), &format!("\"{domain}:{prefix}/"))
    }

    pub fn apply(&self, text: &str) -> String {
        self.search
            .replace_all(text, NoExpand(&self.replacement))
            .into_owned()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    Updated,
    Unchanged,
    /// Not UTF-8, or not readable/writable by us.
    Skipped,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteSummary {
    pub updated: usize,
    pub unchanged: usize,
    pub skipped: usize,
}

impl RewriteSummary {
    fn record(&mut self, outcome: FileOutcome) {
        match outcome {
            FileOutcome::Updated => self.updated += 1,
            FileOutcome::Unchanged => self.unchanged += 1,
            FileOutcome::Skipped => self.skipped += 1,
        }
    }

    fn merge(&mut self, other: RewriteSummary) {
        self.updated += other.updated;
        self.unchanged += other.unchanged;
        self.skipped += other.skipped;
    }
}

fn is_skippable(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::InvalidData | io::ErrorKind::PermissionDenied
    )
}

/// Applies every substitution to one file, writing it back only if something changed.
pub fn replace_in_file<P: AsRef<Path>>(
    path: P,
    substitutions: &[Substitution],
) -> Result<FileOutcome, DomainError> {
    let path = path.as_ref();

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if is_skippable(&e) => {
            warn!("Skipped: {}", path.display());
            return Ok(FileOutcome::Skipped);
        }
        Err(source) => {
            return Err(DomainError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let new_content = substitutions
        .iter()
        .fold(content.clone(), |text, substitution| substitution.apply(&text));

    if new_content == content {
        return Ok(FileOutcome::Unchanged);
    }

    match fs::write(path, new_content) {
        Ok(()) => {
            info!("Updated: {}", path.display());
            Ok(FileOutcome::Updated)
        }
        Err(e) if is_skippable(&e) => {
            warn!("Skipped: {}", path.display());
            Ok(FileOutcome::Skipped)
        }
        Err(source) => Err(DomainError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Rewrites every file below the directories matching `folder_pattern`.
///
/// Files directly matched by the pattern are left alone, only matched directories are walked. A
/// file below two matched directories is rewritten once.
pub fn replace_in_folder(
    folder_pattern: &str,
    substitutions: &[Substitution],
) -> Result<RewriteSummary, DomainError> {
    let glob = Glob::new(folder_pattern).map_err(|source| DomainError::Pattern {
        pattern: folder_pattern.to_string(),
        source,
    })?;

    let matching_paths = glob.matching_paths();

    if matching_paths.is_empty() {
        warn!("No folders matched pattern: {folder_pattern}");
        return Ok(RewriteSummary::default());
    }

    let files: IndexSet<PathBuf> = matching_paths
        .iter()
        .filter(|path| path.is_dir())
        .flat_map(|dir| {
            WalkDir::new(dir)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.file_type().is_file())
                .map(|entry| entry.into_path())
        })
        .collect();

    let mut summary = RewriteSummary::default();

    for file in &files {
        summary.record(replace_in_file(file, substitutions)?);
    }

    Ok(summary)
}

/// Adds `domain` to every bare `prefix` path below each of `folder_patterns`.
pub fn add_domain<S: AsRef<str>, T: AsRef<str>>(
    folder_patterns: &[S],
    domain: &str,
    prefixes: &[T],
) -> Result<RewriteSummary, DomainError> {
    let substitutions = prefixes
        .iter()
        .map(|prefix| Substitution::add_domain(domain, prefix.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;

    let mut summary = RewriteSummary::default();

    for pattern in folder_patterns {
        summary.merge(replace_in_folder(pattern.as_ref(), &substitutions)?);
    }

    info!(
        "{} file{} updated, {} unchanged, {} skipped.",
        summary.updated,
        if summary.updated != 1 { "s" } else { "" },
        summary.unchanged,
        summary.skipped
    );

    Ok(summary)
}
