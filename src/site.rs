//! Site discovery and the end-to-end import run.
//!
//! The site root is the nearest directory, from the start directory upward,
//! holding the settings marker file. Pages are read from the documentation
//! directory beneath it.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::dom::ParserMode;
use crate::error::{Error, Result};
use crate::export::{OutputFormat, save};
use crate::model::ContentPage;
use crate::process::{ProcessReport, process_tree};
use crate::tree::build_tree;
use crate::util::eq_ignore_case;

pub const DEFAULT_MARKER_FILE: &str = "@N2_SiteSettings.xml";
pub const DEFAULT_DOCS_DIR: &str = "Documentation";
pub const DEFAULT_OUTPUT: &str = "n2data.xml";

/// Run-level settings.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Directory the marker search starts from.
    pub start_dir: PathBuf,
    pub marker_file: String,
    /// Documentation directory name, relative to the site root.
    pub docs_dir: String,
    /// Content file path; relative paths resolve against the working directory.
    pub output: PathBuf,
    pub format: OutputFormat,
    pub parser: ParserMode,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            start_dir: PathBuf::from("."),
            marker_file: DEFAULT_MARKER_FILE.to_string(),
            docs_dir: DEFAULT_DOCS_DIR.to_string(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            format: OutputFormat::default(),
            parser: ParserMode::default(),
        }
    }
}

/// Result of a completed import.
#[derive(Debug, Clone)]
pub struct ImportReport {
    /// Documentation directory the tree was built from.
    pub docs_dir: PathBuf,
    pub pages: Vec<ContentPage>,
    pub report: ProcessReport,
}

/// Find the documentation directory of the site enclosing `start`.
///
/// Walks from `start` toward the filesystem root and stops at the first
/// directory containing a file named `marker` (compared ignoring case).
pub fn find_site_root(start: &Path, marker: &str, docs_dir: &str) -> Result<PathBuf> {
    let start = start.canonicalize()?;
    for dir in start.ancestors() {
        if has_marker(dir, marker) {
            debug!("site root {}", dir.display());
            return Ok(dir.join(docs_dir));
        }
    }
    Err(Error::RootMarkerNotFound {
        marker: marker.to_string(),
        start,
    })
}

// Unreadable directories count as not holding the marker.
fn has_marker(dir: &Path, marker: &str) -> bool {
    let Ok(entries) = fs::read_dir(dir) else {
        return false;
    };
    entries.flatten().any(|entry| {
        entry.file_type().is_ok_and(|t| t.is_file())
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| eq_ignore_case(name, marker))
    })
}

/// Discover the site, build and populate its page tree, and write the
/// content file.
///
/// Nothing is written when a fatal error stops the run.
pub fn import_site(options: &ImportOptions) -> Result<ImportReport> {
    let docs_dir = find_site_root(&options.start_dir, &options.marker_file, &options.docs_dir)?;
    info!("Importing {}", docs_dir.display());

    let mut pages = build_tree(&docs_dir)?;
    let report = process_tree(&mut pages, options.parser)?;
    info!(
        "{} pages parsed, {} containers, {} failed",
        report.parsed,
        report.containers,
        report.failures.len()
    );

    save(&pages, &options.output, options.format)?;
    Ok(ImportReport {
        docs_dir,
        pages,
        report,
    })
}
