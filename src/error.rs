//! Error types for n2import operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building, extracting, or writing content.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[cfg(feature = "json")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported selector {selector:?}: {reason}")]
    UnsupportedSelector { selector: String, reason: &'static str },

    #[error("<{element}> has no class attribute")]
    MissingClassAttribute { element: String },

    #[error("<{element}> is missing required attribute {attribute:?}")]
    MissingAttribute {
        element: String,
        attribute: &'static str,
    },

    #[error("duplicate zone: {name}")]
    DuplicateZone { name: String },

    #[error("invalid css class: {class}")]
    InvalidPartClass { class: String },

    #[error("invalid css class: {class}")]
    InvalidAttributeClass { class: String },

    #[error("invalid value for {key}: {value:?}")]
    InvalidOption { key: String, value: String },

    #[error("ambiguous root page in {}: {}", dir.display(), join_paths(candidates))]
    AmbiguousRootPage {
        dir: PathBuf,
        candidates: Vec<PathBuf>,
    },

    #[error("{} has subdirectories but no root page", dir.display())]
    MissingRootForSubdirectories { dir: PathBuf },

    #[error("could not find {marker} in {} or any parent directory", start.display())]
    RootMarkerNotFound { marker: String, start: PathBuf },

    #[error("failed to read file {}: {message}", path.display())]
    Markup { path: PathBuf, message: String },

    #[error("invalid content file: {0}")]
    InvalidContent(String),

    #[error("{}: {source}", path.display())]
    InPage {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Whether the error only affects a single page and the run may continue.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::Markup { .. } => true,
            Error::InPage { source, .. } => source.is_recoverable(),
            _ => false,
        }
    }

    /// Attach the page being processed to this error.
    pub fn in_page(self, path: impl Into<PathBuf>) -> Self {
        Error::InPage {
            path: path.into(),
            source: Box::new(self),
        }
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, Error>;
