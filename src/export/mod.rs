//! Export module for writing content trees to disk.
//!
//! Provides the `ContentExporter` trait and format-specific implementations.
//!
//! # Example
//!
//! ```no_run
//! use n2import::ContentPage;
//! use n2import::export::{ContentExporter, XmlExporter};
//! use std::fs::File;
//!
//! let pages = vec![ContentPage::new("Documentation/index.htm")];
//! let mut file = File::create("n2data.xml")?;
//! XmlExporter::new().export(&pages, &mut file)?;
//! # Ok::<(), n2import::Error>(())
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::model::ContentPage;

#[cfg(feature = "json")]
mod json;
mod xml;

#[cfg(feature = "json")]
pub use json::{JsonExporter, read_content_json};
pub use xml::{XmlConfig, XmlExporter, read_content_xml, write_content_xml};

/// Trait for exporting content trees to specific formats.
pub trait ContentExporter {
    /// Export the pages to the provided writer.
    fn export<W: Write>(&self, pages: &[ContentPage], writer: &mut W) -> Result<()>;
}

/// Serialized output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    #[default]
    Xml,
    #[cfg(feature = "json")]
    Json,
}

impl OutputFormat {
    /// Write `pages` to `writer` in this format.
    pub fn export<W: Write>(self, pages: &[ContentPage], writer: &mut W) -> Result<()> {
        match self {
            OutputFormat::Xml => XmlExporter::new().export(pages, writer),
            #[cfg(feature = "json")]
            OutputFormat::Json => JsonExporter::new().export(pages, writer),
        }
    }
}

/// Write `pages` to the file at `path`, replacing any previous content.
pub fn save(pages: &[ContentPage], path: &Path, format: OutputFormat) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    format.export(pages, &mut writer)?;
    writer.flush()?;
    info!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_save_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("n2data.xml");
        std::fs::write(&path, "stale").unwrap();

        save(&[ContentPage::container()], &path, OutputFormat::Xml).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(!written.contains("stale"));
        assert_eq!(read_content_xml(&written).unwrap(), vec![ContentPage::container()]);
    }
}
