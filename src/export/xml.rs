//! XML content file writer and reader.
//!
//! ```text
//! <pages>
//!   <page title="Home" physicalpath="Documentation/index.htm" successfullyparsed="true">
//!     <zone name="Content">
//!       <part>
//!         <property key="body">
//!           <value><![CDATA[<b>Hi</b>]]></value>
//!         </property>
//!       </part>
//!     </zone>
//!     <page ...>...</page>
//!   </page>
//! </pages>
//! ```
//!
//! Zones come before child pages. `title` is omitted only when the page has
//! none (an empty `<title>` is written as `title=""`); `physicalpath` is
//! omitted when empty. Values are written as CDATA so markup survives
//! untouched.

use std::io::Write;
use std::path::PathBuf;

use quick_xml::escape::unescape;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};

use super::ContentExporter;
use crate::error::{Error, Result};
use crate::model::{ContentPage, Part, PartAttribute, Zone};

/// Configuration for XML export.
#[derive(Debug, Clone)]
pub struct XmlConfig {
    /// Spaces per nesting level (0 = no indentation).
    pub indent: usize,
}

impl Default for XmlConfig {
    fn default() -> Self {
        Self { indent: 2 }
    }
}

/// Exporter for the XML content file.
#[derive(Debug, Clone, Default)]
pub struct XmlExporter {
    config: XmlConfig,
}

impl XmlExporter {
    /// Create a new XmlExporter with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an XmlExporter with the specified configuration.
    pub fn with_config(config: XmlConfig) -> Self {
        Self { config }
    }
}

impl ContentExporter for XmlExporter {
    fn export<W: Write>(&self, pages: &[ContentPage], writer: &mut W) -> Result<()> {
        let mut xml = if self.config.indent > 0 {
            Writer::new_with_indent(writer, b' ', self.config.indent)
        } else {
            Writer::new(writer)
        };

        xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        xml.write_event(Event::Start(BytesStart::new("pages")))?;
        for page in pages {
            write_page(&mut xml, page)?;
        }
        xml.write_event(Event::End(BytesEnd::new("pages")))?;
        xml.get_mut().write_all(b"\n")?;
        Ok(())
    }
}

/// Write `pages` as an indented XML content file.
pub fn write_content_xml<W: Write>(pages: &[ContentPage], writer: &mut W) -> Result<()> {
    XmlExporter::new().export(pages, writer)
}

fn write_page<W: Write>(xml: &mut Writer<W>, page: &ContentPage) -> Result<()> {
    let mut start = BytesStart::new("page");
    if let Some(title) = page.title.as_deref() {
        start.push_attribute(("title", title));
    }
    let path = page.source_path.to_string_lossy();
    if !path.is_empty() {
        start.push_attribute(("physicalpath", path.as_ref()));
    }
    start.push_attribute((
        "successfullyparsed",
        if page.parsed { "true" } else { "false" },
    ));

    if page.zones.is_empty() && page.children.is_empty() {
        xml.write_event(Event::Empty(start))?;
        return Ok(());
    }

    xml.write_event(Event::Start(start))?;
    for zone in &page.zones {
        write_zone(xml, zone)?;
    }
    for child in &page.children {
        write_page(xml, child)?;
    }
    xml.write_event(Event::End(BytesEnd::new("page")))?;
    Ok(())
}

fn write_zone<W: Write>(xml: &mut Writer<W>, zone: &Zone) -> Result<()> {
    let mut start = BytesStart::new("zone");
    start.push_attribute(("name", zone.name.as_str()));
    if zone.parts.is_empty() {
        xml.write_event(Event::Empty(start))?;
        return Ok(());
    }

    xml.write_event(Event::Start(start))?;
    for part in &zone.parts {
        if part.properties.is_empty() {
            xml.write_event(Event::Empty(BytesStart::new("part")))?;
            continue;
        }
        xml.write_event(Event::Start(BytesStart::new("part")))?;
        for property in &part.properties {
            let mut start = BytesStart::new("property");
            start.push_attribute(("key", property.key.as_str()));
            xml.write_event(Event::Start(start))?;
            xml.write_event(Event::Start(BytesStart::new("value")))?;
            for section in cdata_sections(&property.value) {
                xml.write_event(Event::CData(BytesCData::new(section)))?;
            }
            xml.write_event(Event::End(BytesEnd::new("value")))?;
            xml.write_event(Event::End(BytesEnd::new("property")))?;
        }
        xml.write_event(Event::End(BytesEnd::new("part")))?;
    }
    xml.write_event(Event::End(BytesEnd::new("zone")))?;
    Ok(())
}

/// Split `value` so no section contains the `]]>` terminator.
///
/// `a]]>b` becomes `a]]` and `>b`, which read back as adjacent CDATA
/// sections and concatenate to the original.
fn cdata_sections(value: &str) -> Vec<&str> {
    let mut sections = Vec::new();
    let mut rest = value;
    while let Some(pos) = rest.find("]]>") {
        sections.push(&rest[..pos + 2]);
        rest = &rest[pos + 2..];
    }
    sections.push(rest);
    sections
}

/// Element currently open while reading a content file.
enum Frame {
    Pages,
    Page(ContentPage),
    Zone(Zone),
    Part(Part),
    Property(PartAttribute),
    Value,
}

/// Parse an XML content file written by [`write_content_xml`].
pub fn read_content_xml(text: &str) -> Result<Vec<ContentPage>> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut pages = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();
    let mut seen_root = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let frame = open_frame(&e, &stack, &mut seen_root)?;
                stack.push(frame);
            }
            Event::Empty(e) => {
                let frame = open_frame(&e, &stack, &mut seen_root)?;
                close_frame(frame, &mut stack, &mut pages)?;
            }
            Event::End(_) => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| Error::InvalidContent("unbalanced closing tag".into()))?;
                close_frame(frame, &mut stack, &mut pages)?;
            }
            Event::CData(e) => {
                append_value(&mut stack, &String::from_utf8_lossy(e.as_ref()))?;
            }
            Event::Text(e) => {
                append_value(&mut stack, &String::from_utf8_lossy(e.as_ref()))?;
            }
            Event::GeneralRef(_) => {
                return Err(Error::InvalidContent(
                    "entity references are not allowed in values".into(),
                ));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root || !stack.is_empty() {
        return Err(Error::InvalidContent("missing or unclosed <pages>".into()));
    }
    Ok(pages)
}

fn open_frame(e: &BytesStart<'_>, stack: &[Frame], seen_root: &mut bool) -> Result<Frame> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let frame = match (name.as_str(), stack.last()) {
        ("pages", None) if !*seen_root => {
            *seen_root = true;
            Frame::Pages
        }
        ("page", Some(Frame::Pages | Frame::Page(_))) => {
            let parsed = match attr(e, "successfullyparsed")?.as_deref() {
                Some("true") => true,
                Some("false") | None => false,
                Some(other) => {
                    return Err(Error::InvalidContent(format!(
                        "invalid successfullyparsed value {other:?}"
                    )));
                }
            };
            Frame::Page(ContentPage {
                title: attr(e, "title")?,
                source_path: attr(e, "physicalpath")?.map(PathBuf::from).unwrap_or_default(),
                parsed,
                ..ContentPage::default()
            })
        }
        ("zone", Some(Frame::Page(_))) => Frame::Zone(Zone::new(required_attr(e, "name")?)),
        ("part", Some(Frame::Zone(_))) => Frame::Part(Part::default()),
        ("property", Some(Frame::Part(_))) => {
            Frame::Property(PartAttribute::new(required_attr(e, "key")?, String::new()))
        }
        ("value", Some(Frame::Property(_))) => Frame::Value,
        _ => {
            return Err(Error::InvalidContent(format!("unexpected <{name}>")));
        }
    };
    Ok(frame)
}

fn close_frame(frame: Frame, stack: &mut [Frame], pages: &mut Vec<ContentPage>) -> Result<()> {
    match (frame, stack.last_mut()) {
        (Frame::Page(page), Some(Frame::Pages)) => pages.push(page),
        (Frame::Page(page), Some(Frame::Page(parent))) => parent.children.push(page),
        (Frame::Zone(zone), Some(Frame::Page(page))) => page.add_zone(zone)?,
        (Frame::Part(part), Some(Frame::Zone(zone))) => zone.parts.push(part),
        (Frame::Property(property), Some(Frame::Part(part))) => part.properties.push(property),
        (Frame::Value, Some(Frame::Property(_))) | (Frame::Pages, None) => {}
        _ => return Err(Error::InvalidContent("mismatched element nesting".into())),
    }
    Ok(())
}

fn append_value(stack: &mut [Frame], text: &str) -> Result<()> {
    match stack {
        [.., Frame::Property(property), Frame::Value] => {
            property.value.push_str(text);
            Ok(())
        }
        _ => Err(Error::InvalidContent(format!(
            "unexpected text {:?}",
            text.chars().take(20).collect::<String>()
        ))),
    }
}

fn attr(e: &BytesStart<'_>, name: &str) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.key.as_ref() == name.as_bytes() {
            let raw = String::from_utf8_lossy(&attr.value);
            let value = unescape(&raw).map_err(quick_xml::Error::from)?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn required_attr(e: &BytesStart<'_>, name: &'static str) -> Result<String> {
    attr(e, name)?.ok_or_else(|| Error::MissingAttribute {
        element: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
        attribute: name,
    })
}
