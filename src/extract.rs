//! Zone, part, and attribute extraction from a parsed page.
//!
//! ```text
//! <div class="N2_Zone" id="Content">
//!   <div class="N2_Part eventDetails">
//!     <div class="N2_Attribute title">Spring <b>Meetup</b></div>
//!   </div>
//! </div>
//! ```
//!
//! yields zone `Content` with one part whose `title` property is
//! `Spring <b>Meetup</b>`.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::dom::{ArenaDom, NodeId, inner_markup};
use crate::error::{Error, Result};
use crate::model::{Part, PartAttribute, Zone};
use crate::options::DocumentOptions;
use crate::select::{ClassSelector, semantic_class};
use crate::util::eq_ignore_case;

static COMMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").expect("comment pattern is valid"));

/// Everything extracted from one page.
#[derive(Debug, Clone)]
pub struct PageContent {
    pub title: Option<String>,
    pub zones: Vec<Zone>,
    pub options: DocumentOptions,
}

/// Read the page's options, then extract its title and zones.
pub fn extract_page(dom: &ArenaDom) -> Result<PageContent> {
    let options = DocumentOptions::read(dom)?;
    let zones = extract_zones(dom, &options)?;
    Ok(PageContent {
        title: extract_title(dom),
        zones,
        options,
    })
}

/// Text of the first `<title>` element, if any.
pub fn extract_title(dom: &ArenaDom) -> Option<String> {
    dom.find_by_tag("title").map(|id| dom.text_content(id))
}

/// Extract zones, parts, and attributes in document order.
pub fn extract_zones(dom: &ArenaDom, options: &DocumentOptions) -> Result<Vec<Zone>> {
    let zone_selector = ClassSelector::compile(&options.zone_selector)?;
    let part_selector = ClassSelector::compile(&options.part_selector)?;
    let attribute_selector = ClassSelector::compile(&options.attribute_selector)?;

    let mut zones: Vec<Zone> = Vec::new();
    for zone_el in zone_selector.select(dom, dom.document())? {
        let name = dom
            .get_attr(zone_el, "id")
            .ok_or_else(|| Error::MissingAttribute {
                element: format!("div class=\"{}\"", class_of(dom, zone_el)),
                attribute: "id",
            })?;
        if zones.iter().any(|z| eq_ignore_case(&z.name, name)) {
            return Err(Error::DuplicateZone {
                name: name.to_string(),
            });
        }

        let mut zone = Zone::new(name);
        for part_el in part_selector.select(dom, zone_el)? {
            zone.parts
                .push(extract_part(dom, part_el, &part_selector, &attribute_selector)?);
        }
        zones.push(zone);
    }

    Ok(zones)
}

fn extract_part(
    dom: &ArenaDom,
    part_el: NodeId,
    part_selector: &ClassSelector,
    attribute_selector: &ClassSelector,
) -> Result<Part> {
    let class = class_of(dom, part_el);
    let part_type =
        semantic_class(class, part_selector.as_str()).ok_or_else(|| Error::InvalidPartClass {
            class: class.to_string(),
        })?;
    debug!("part type {part_type}");

    let mut part = Part::default();
    for attr_el in attribute_selector.select(dom, part_el)? {
        let class = class_of(dom, attr_el);
        let key = semantic_class(class, attribute_selector.as_str()).ok_or_else(|| {
            Error::InvalidAttributeClass {
                class: class.to_string(),
            }
        })?;
        let value = strip_comments(&inner_markup(dom, attr_el));

        debug!("=====> {part_type}.{key} = {value}");
        part.properties.push(PartAttribute::new(key, value));
    }
    Ok(part)
}

/// Remove `<!-- ... -->` spans, including ones that cross lines.
pub fn strip_comments(markup: &str) -> String {
    COMMENT_RE.replace_all(markup, "").into_owned()
}

fn class_of(dom: &ArenaDom, id: NodeId) -> &str {
    dom.get_attr(id, "class").unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{parse_html, parse_xml};

    fn page(body: &str) -> ArenaDom {
        parse_xml(&format!(
            "<html><head><title>Events</title></head><body>{body}</body></html>"
        ))
        .unwrap()
    }

    #[test]
    fn test_extract_zone_part_attribute() {
        let dom = page(
            r#"<div class="N2_Zone" id="Content">
                 <div class="N2_Part eventDetails">
                   <div class="N2_Attribute title">Spring <b>Meetup</b></div>
                   <div class="N2_Attribute when">May 4</div>
                 </div>
               </div>"#,
        );

        let content = extract_page(&dom).unwrap();
        assert_eq!(content.title.as_deref(), Some("Events"));
        assert_eq!(content.zones.len(), 1);

        let zone = &content.zones[0];
        assert_eq!(zone.name, "Content");
        assert_eq!(zone.parts.len(), 1);
        assert_eq!(
            zone.parts[0].properties,
            vec![
                PartAttribute::new("title", "Spring <b>Meetup</b>"),
                PartAttribute::new("when", "May 4"),
            ]
        );
    }

    #[test]
    fn test_comments_stripped_tags_kept() {
        let dom = page(
            r#"<div class="N2_Zone" id="Main"><div class="N2_Part text"><div class="N2_Attribute body"><b>Hi</b><!-- note -->there</div></div></div>"#,
        );
        let zones = extract_zones(&dom, &DocumentOptions::default()).unwrap();
        assert_eq!(zones[0].parts[0].properties[0].value, "<b>Hi</b>there");
    }

    #[test]
    fn test_strip_multiline_comments() {
        assert_eq!(strip_comments("a<!-- one\n two -->b<!--x-->c"), "abc");
        assert_eq!(strip_comments("no comments"), "no comments");
    }

    #[test]
    fn test_document_order() {
        let dom = page(
            r#"<div class="N2_Zone" id="A">
                 <div class="N2_Part first"><div class="N2_Attribute k">1</div></div>
                 <div class="N2_Part second">
                   <div class="N2_Attribute k">2</div>
                   <div class="N2_Attribute j">3</div>
                 </div>
               </div>
               <div class="N2_Zone" id="B"><div class="N2_Part third"><div class="N2_Attribute k">4</div></div></div>"#,
        );
        let zones = extract_zones(&dom, &DocumentOptions::default()).unwrap();

        let names: Vec<_> = zones.iter().map(|z| z.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);

        let values: Vec<_> = zones
            .iter()
            .flat_map(|z| &z.parts)
            .flat_map(|p| &p.properties)
            .map(|a| a.value.as_str())
            .collect();
        assert_eq!(values, vec!["1", "2", "3", "4"]);
        assert_eq!(zones[0].parts[1].properties[1].key, "j");
    }

    #[test]
    fn test_duplicate_zone_ids_fail() {
        let dom = page(
            r#"<div class="N2_Zone" id="Content" /><div class="N2_Zone" id="content" />"#,
        );
        let err = extract_zones(&dom, &DocumentOptions::default()).unwrap_err();
        assert!(matches!(err, Error::DuplicateZone { name } if name == "content"));
    }

    #[test]
    fn test_zone_without_id_fails() {
        let dom = page(r#"<div class="N2_Zone" />"#);
        let err = extract_zones(&dom, &DocumentOptions::default()).unwrap_err();
        assert!(matches!(err, Error::MissingAttribute { attribute: "id", .. }));
    }

    #[test]
    fn test_part_without_type_fails() {
        let dom = page(r#"<div class="N2_Zone" id="Z"><div class="N2_Part" /></div>"#);
        let err = extract_zones(&dom, &DocumentOptions::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidPartClass { class } if class == "N2_Part"));
    }

    #[test]
    fn test_part_with_two_types_fails() {
        let dom = page(r#"<div class="N2_Zone" id="Z"><div class="N2_Part a b" /></div>"#);
        let err = extract_zones(&dom, &DocumentOptions::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidPartClass { class } if class == "N2_Part a b"));
    }

    #[test]
    fn test_part_with_extra_space_fails() {
        let dom = page(r#"<div class="N2_Zone" id="Z"><div class="N2_Part  text" /></div>"#);
        let err = extract_zones(&dom, &DocumentOptions::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidPartClass { class } if class == "N2_Part  text"));

        let dom = page(
            r#"<div class="N2_Zone" id="Z"><div class="N2_Part text"><div class="N2_Attribute body ">x</div></div></div>"#,
        );
        let err = extract_zones(&dom, &DocumentOptions::default()).unwrap_err();
        assert!(
            matches!(err, Error::InvalidAttributeClass { class } if class == "N2_Attribute body ")
        );
    }

    #[test]
    fn test_attribute_without_key_fails() {
        let dom = page(
            r#"<div class="N2_Zone" id="Z"><div class="N2_Part text"><div class="N2_Attribute">x</div></div></div>"#,
        );
        let err = extract_zones(&dom, &DocumentOptions::default()).unwrap_err();
        assert!(
            matches!(err, Error::InvalidAttributeClass { class } if class == "N2_Attribute")
        );
    }

    #[test]
    fn test_custom_selectors_from_meta() {
        let dom = parse_xml(
            r#"<html><head>
                 <meta name="N2:ZoneSelector" content=".Region" />
                 <meta name="N2:PartSelector" content=".Block" />
                 <meta name="N2:AttributeSelector" content=".Field" />
               </head><body>
                 <div class="Region" id="Side"><div class="Block link"><div class="Field href">/home</div></div></div>
                 <div class="N2_Zone" id="Ignored" />
               </body></html>"#,
        )
        .unwrap();

        let content = extract_page(&dom).unwrap();
        assert_eq!(content.title, None);
        assert_eq!(content.zones.len(), 1);
        assert_eq!(content.zones[0].name, "Side");
        assert_eq!(content.zones[0].parts[0].property("href"), Some("/home"));
    }

    #[test]
    fn test_compound_selector_in_meta_fails() {
        let dom = parse_xml(
            r#"<html><head><meta name="N2:ZoneSelector" content="div .Region" /></head><body /></html>"#,
        )
        .unwrap();
        assert!(matches!(
            extract_page(&dom),
            Err(Error::UnsupportedSelector { .. })
        ));
    }

    #[test]
    fn test_ignore_selector_does_not_filter() {
        let dom = page(
            r#"<div class="N2_Zone N2_Ignore" id="Still"><div class="N2_Ignore"><div class="N2_Part text"><div class="N2_Attribute body">kept</div></div></div></div>"#,
        );
        let zones = extract_zones(&dom, &DocumentOptions::default()).unwrap();
        assert_eq!(zones[0].name, "Still");
        assert_eq!(zones[0].parts.len(), 1);
        assert_eq!(zones[0].parts[0].property("body"), Some("kept"));
    }

    #[test]
    fn test_unclassed_div_fails() {
        let dom = page(r#"<div class="N2_Zone" id="Z"><div>loose</div></div>"#);
        assert!(matches!(
            extract_zones(&dom, &DocumentOptions::default()),
            Err(Error::MissingClassAttribute { .. })
        ));
    }

    #[test]
    fn test_lenient_html_page() {
        let dom = parse_html(
            r#"<title>Loose</title><div class="N2_Zone" id="Main"><div class="N2_Part text"><div class="N2_Attribute body">a&nbsp;b<br></div></div></div>"#,
        );
        let content = extract_page(&dom).unwrap();
        assert_eq!(content.title.as_deref(), Some("Loose"));
        assert_eq!(
            content.zones[0].parts[0].property("body"),
            Some("a\u{a0}b<br />")
        );
    }
}
