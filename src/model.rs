//! Content tree produced from a documentation directory.
//!
//! A [`ContentPage`] owns its child pages and its [`Zone`]s; each zone holds
//! [`Part`]s, and each part holds keyed [`PartAttribute`] markup fragments.

use std::fmt;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::util::eq_ignore_case;

/// A page in the content tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub struct ContentPage {
    /// Text of the page's first `<title>` element.
    pub title: Option<String>,
    /// Backing file or directory; empty for pure containers.
    pub source_path: PathBuf,
    /// True once the backing file has been parsed and extracted.
    pub parsed: bool,
    pub children: Vec<ContentPage>,
    pub zones: Vec<Zone>,
}

impl ContentPage {
    /// Create an unparsed page bound to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            source_path: path.into(),
            ..Self::default()
        }
    }

    /// Create a page with no backing path.
    pub fn container() -> Self {
        Self::default()
    }

    pub fn with_children(mut self, children: Vec<ContentPage>) -> Self {
        self.children = children;
        self
    }

    /// Look up a zone by name, ignoring case.
    pub fn zone(&self, name: &str) -> Option<&Zone> {
        self.zones.iter().find(|z| eq_ignore_case(&z.name, name))
    }

    /// Append a zone, rejecting names already used on this page.
    pub fn add_zone(&mut self, zone: Zone) -> Result<()> {
        if self.zone(&zone.name).is_some() {
            return Err(Error::DuplicateZone { name: zone.name });
        }
        self.zones.push(zone);
        Ok(())
    }

    /// Number of pages in this subtree, including `self`.
    pub fn page_count(&self) -> usize {
        1 + self.children.iter().map(ContentPage::page_count).sum::<usize>()
    }
}

impl fmt::Display for ContentPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.title {
            Some(title) if !title.is_empty() => write!(f, "{{{title}}}"),
            _ if !self.source_path.as_os_str().is_empty() => {
                write!(f, "{{{}}}", self.source_path.display())
            }
            _ => f.write_str("{ContentPage}"),
        }
    }
}

/// A named content region on a page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub struct Zone {
    pub name: String,
    pub parts: Vec<Part>,
}

impl Zone {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parts: Vec::new(),
        }
    }
}

/// A content block within a zone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub struct Part {
    pub properties: Vec<PartAttribute>,
}

impl Part {
    /// Look up a property value by key, ignoring case.
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| eq_ignore_case(&p.key, key))
            .map(|p| p.value.as_str())
    }
}

/// A keyed markup fragment within a part.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub struct PartAttribute {
    pub key: String,
    /// Raw inner markup with comments removed.
    pub value: String,
}

impl PartAttribute {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}
