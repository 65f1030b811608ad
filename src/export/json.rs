//! JSON content file writer.

use std::io::{Read, Write};

use super::ContentExporter;
use crate::error::Result;
use crate::model::ContentPage;

/// Exporter for pretty-printed JSON output.
#[derive(Debug, Clone, Default)]
pub struct JsonExporter;

impl JsonExporter {
    pub fn new() -> Self {
        Self
    }
}

impl ContentExporter for JsonExporter {
    fn export<W: Write>(&self, pages: &[ContentPage], writer: &mut W) -> Result<()> {
        serde_json::to_writer_pretty(&mut *writer, pages)?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Parse a JSON content file written by [`JsonExporter`].
pub fn read_content_json<R: Read>(reader: R) -> Result<Vec<ContentPage>> {
    Ok(serde_json::from_reader(reader)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Part, PartAttribute, Zone};

    #[test]
    fn test_json_round_trip() {
        let mut page = ContentPage::new("Documentation/index.htm");
        page.title = Some("Home".into());
        page.parsed = true;
        let mut zone = Zone::new("Content");
        zone.parts.push(Part {
            properties: vec![PartAttribute::new("body", "<p>]]></p>")],
        });
        page.add_zone(zone).unwrap();
        let pages = vec![page];

        let mut out = Vec::new();
        JsonExporter::new().export(&pages, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\"source_path\": \"Documentation/index.htm\""));

        assert_eq!(read_content_json(text.as_bytes()).unwrap(), pages);
    }
}
