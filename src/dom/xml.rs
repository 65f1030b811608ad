//! Strict XML parsing into the arena DOM.
//!
//! Pages are expected to be well-formed XHTML. Anything the XML reader
//! rejects (mismatched tags, unknown named entities, unclosed elements) is a
//! [`ParseError`] for that page.

use html5ever::{LocalName, Namespace, Prefix, QualName};
use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};

use super::ParseError;
use super::arena::{ArenaDom, Attribute, NodeId};

/// Parse XML text into an [`ArenaDom`].
pub fn parse_xml(text: &str) -> Result<ArenaDom, ParseError> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().check_end_names = true;

    let mut dom = ArenaDom::new();
    let mut stack: Vec<NodeId> = vec![dom.document()];

    loop {
        let parent = stack.last().copied().unwrap_or(dom.document());
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let id = create_element(&mut dom, &e)?;
                dom.append(parent, id);
                stack.push(id);
            }
            Ok(Event::Empty(e)) => {
                let id = create_element(&mut dom, &e)?;
                dom.append(parent, id);
            }
            Ok(Event::End(_)) => {
                if stack.len() <= 1 {
                    return Err(ParseError::new(format!(
                        "unexpected closing tag at byte {}",
                        reader.buffer_position()
                    )));
                }
                stack.pop();
            }
            Ok(Event::Text(e)) => {
                dom.append_text(parent, &String::from_utf8_lossy(e.as_ref()));
            }
            Ok(Event::CData(e)) => {
                dom.append_text(parent, &String::from_utf8_lossy(e.as_ref()));
            }
            Ok(Event::GeneralRef(e)) => {
                let entity = String::from_utf8_lossy(e.as_ref());
                let resolved = resolve_entity(&entity)
                    .ok_or_else(|| ParseError::new(format!("unknown entity &{entity};")))?;
                dom.append_text(parent, &resolved);
            }
            Ok(Event::Comment(e)) => {
                let id = dom.create_comment(String::from_utf8_lossy(e.as_ref()).into_owned());
                dom.append(parent, id);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ParseError::new(format!(
                    "{e} (at byte {})",
                    reader.error_position()
                )));
            }
            // Declarations, doctypes, and processing instructions carry no content.
            Ok(_) => {}
        }
    }

    if stack.len() > 1 {
        let open = stack
            .last()
            .and_then(|&id| dom.qualified_name(id))
            .unwrap_or_default();
        return Err(ParseError::new(format!("unclosed element <{open}>")));
    }

    Ok(dom)
}

fn create_element(dom: &mut ArenaDom, e: &BytesStart<'_>) -> Result<NodeId, ParseError> {
    let name = qual_name(e.name().as_ref());

    let mut attrs = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| ParseError::new(err.to_string()))?;
        let raw = String::from_utf8_lossy(&attr.value);
        let value = unescape(&raw).map_err(|err| ParseError::new(err.to_string()))?;
        attrs.push(Attribute {
            name: qual_name(attr.key.as_ref()),
            value: value.into_owned(),
        });
    }

    Ok(dom.create_element(name, attrs))
}

/// Split a raw `prefix:local` name into a [`QualName`].
fn qual_name(raw: &[u8]) -> QualName {
    let raw = String::from_utf8_lossy(raw);
    match raw.split_once(':') {
        Some((prefix, local)) => QualName::new(
            Some(Prefix::from(prefix)),
            Namespace::from(""),
            LocalName::from(local),
        ),
        None => QualName::new(None, Namespace::from(""), LocalName::from(raw.as_ref())),
    }
}

/// Resolve XML entity references.
fn resolve_entity(entity: &str) -> Option<String> {
    match entity {
        "apos" => return Some("'".to_string()),
        "quot" => return Some("\"".to_string()),
        "lt" => return Some("<".to_string()),
        "gt" => return Some(">".to_string()),
        "amp" => return Some("&".to_string()),
        _ => {}
    }

    if let Some(hex) = entity
        .strip_prefix("#x")
        .or_else(|| entity.strip_prefix("#X"))
    {
        u32::from_str_radix(hex, 16)
            .ok()
            .and_then(char::from_u32)
            .map(String::from)
    } else if let Some(dec) = entity.strip_prefix('#') {
        dec.parse::<u32>()
            .ok()
            .and_then(char::from_u32)
            .map(String::from)
    } else {
        None
    }
}
