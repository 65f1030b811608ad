//! Populate a page tree with titles and zones.
//!
//! Pages are visited depth-first, children before their parent. Pages without
//! a backing file are left alone. A page whose file cannot be read or parsed
//! is reported and left unparsed; any other error aborts the run.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::dom::{ArenaDom, ParserMode, parse};
use crate::error::{Error, Result};
use crate::extract::extract_page;
use crate::model::ContentPage;
use crate::util::{load_text, repair_entities};

/// A page that could not be read or parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Outcome counts for one processing run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessReport {
    /// Pages whose file was parsed and extracted.
    pub parsed: usize,
    /// Pages with no backing file (directories, empty or missing paths).
    pub containers: usize,
    /// Pages left unparsed because their file could not be read or parsed.
    pub failures: Vec<PageFailure>,
}

impl ProcessReport {
    /// Total pages visited.
    pub fn visited(&self) -> usize {
        self.parsed + self.containers + self.failures.len()
    }
}

/// Depth-first page processor.
#[derive(Debug, Default)]
pub struct PageProcessor {
    parser: ParserMode,
    report: ProcessReport,
}

impl PageProcessor {
    pub fn new(parser: ParserMode) -> Self {
        Self {
            parser,
            report: ProcessReport::default(),
        }
    }

    /// Process `page` and all of its descendants in place.
    pub fn process(&mut self, page: &mut ContentPage) -> Result<()> {
        for child in &mut page.children {
            self.process(child)?;
        }

        if !page.source_path.is_file() {
            self.report.containers += 1;
            return Ok(());
        }

        let path = page.source_path.clone();
        let dom = match load_document(&path, self.parser) {
            Ok(dom) => dom,
            Err(e) if e.is_recoverable() => {
                warn!("-> {e}");
                self.report.failures.push(PageFailure {
                    path,
                    message: e.to_string(),
                });
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let content = extract_page(&dom).map_err(|e| e.in_page(&path))?;
        page.title = content.title;
        for zone in content.zones {
            page.add_zone(zone).map_err(|e| e.in_page(&path))?;
        }
        page.parsed = true;
        self.report.parsed += 1;
        Ok(())
    }

    pub fn report(&self) -> &ProcessReport {
        &self.report
    }

    pub fn into_report(self) -> ProcessReport {
        self.report
    }
}

/// Process every page of a forest.
pub fn process_tree(pages: &mut [ContentPage], parser: ParserMode) -> Result<ProcessReport> {
    let mut processor = PageProcessor::new(parser);
    for page in pages.iter_mut() {
        processor.process(page)?;
    }
    Ok(processor.into_report())
}

/// Read, repair, and parse one page file.
///
/// Read and parse failures come back as recoverable [`Error::Markup`].
pub fn load_document(path: &Path, parser: ParserMode) -> Result<ArenaDom> {
    let display_name = path
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_else(|| path.to_string_lossy());
    info!("Processing {display_name}");

    let markup_error = |message: String| Error::Markup {
        path: path.to_path_buf(),
        message,
    };

    let text = load_text(path).map_err(|e| markup_error(e.to_string()))?;
    let text = repair_entities(&text);
    if let Cow::Owned(_) = text {
        warn!("-> warning: fixing &nbsp; in {display_name}");
    }

    parse(&text, parser).map_err(|e| markup_error(e.to_string()))
}
