//! Per-document options read from `<meta name="N2:...">` elements.
//!
//! ```text
//! <meta name="N2:ZoneSelector" content=".Region" />
//! <meta name="N2:ShowNav" content="false" />
//! <meta name="N2:Type" content="NewsPage" />
//! ```

use tracing::debug;

use crate::dom::{ArenaDom, NodeId};
use crate::error::{Error, Result};
use crate::util::{eq_ignore_case, starts_with_ignore_case};

/// Prefix reserved for option names.
pub const OPTION_PREFIX: &str = "N2:";

pub const DEFAULT_ZONE_SELECTOR: &str = ".N2_Zone";
pub const DEFAULT_PART_SELECTOR: &str = ".N2_Part";
pub const DEFAULT_ATTRIBUTE_SELECTOR: &str = ".N2_Attribute";
pub const DEFAULT_IGNORE_SELECTOR: &str = ".N2_Ignore";
pub const DEFAULT_PAGE_TYPE: &str = "TextPage";

/// Effective configuration for one document.
///
/// Built fresh per page from the defaults plus that page's `N2:` meta
/// elements, then passed to extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentOptions {
    pub zone_selector: String,
    pub part_selector: String,
    pub attribute_selector: String,
    /// Read for compatibility; extraction does not consult it.
    pub ignore_selector: String,
    pub show_nav: bool,
    pub show_title: bool,
    pub page_type: String,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            zone_selector: DEFAULT_ZONE_SELECTOR.to_string(),
            part_selector: DEFAULT_PART_SELECTOR.to_string(),
            attribute_selector: DEFAULT_ATTRIBUTE_SELECTOR.to_string(),
            ignore_selector: DEFAULT_IGNORE_SELECTOR.to_string(),
            show_nav: true,
            show_title: true,
            page_type: DEFAULT_PAGE_TYPE.to_string(),
        }
    }
}

impl DocumentOptions {
    /// Read options from every `N2:` meta element in `dom`, in document order.
    ///
    /// Later elements override earlier ones for the same key. Unrecognized
    /// `N2:` keys are ignored.
    pub fn read(dom: &ArenaDom) -> Result<Self> {
        let mut options = Self::default();
        for (name, value) in option_entries(dom)? {
            debug!("name = {name}, value = {value}");
            options.apply(name, value)?;
        }
        Ok(options)
    }

    /// Apply one option. `name` includes the `N2:` prefix.
    pub fn apply(&mut self, name: &str, value: &str) -> Result<()> {
        let key = if starts_with_ignore_case(name, OPTION_PREFIX) {
            &name[OPTION_PREFIX.len()..]
        } else {
            name
        };
        let is = |expected: &str| eq_ignore_case(key, expected);

        if is("ZoneSelector") {
            self.zone_selector = value.to_string();
        } else if is("PartSelector") {
            self.part_selector = value.to_string();
        } else if is("AttributeSelector") {
            self.attribute_selector = value.to_string();
        } else if is("IgnoreSelector") {
            self.ignore_selector = value.to_string();
        } else if is("ShowNav") {
            self.show_nav = parse_bool(name, value)?;
        } else if is("ShowTitle") {
            self.show_title = parse_bool(name, value)?;
        } else if is("Type") {
            self.page_type = value.to_string();
        } else {
            // TODO: support N2:MapProperty once a property-mapping syntax is agreed
            debug!("ignoring unrecognized option {name}");
        }
        Ok(())
    }
}

/// `(name, content)` pairs of meta elements whose name starts with `N2:`.
fn option_entries(dom: &ArenaDom) -> Result<Vec<(&str, &str)>> {
    let metas: Vec<NodeId> = dom.elements_named(dom.document(), "meta").collect();

    let mut entries = Vec::new();
    for id in metas {
        let Some(name) = dom.get_attr(id, "name") else {
            continue;
        };
        if !starts_with_ignore_case(name, OPTION_PREFIX) {
            continue;
        }
        let content = dom
            .get_attr(id, "content")
            .ok_or_else(|| Error::MissingAttribute {
                element: format!("meta name=\"{name}\""),
                attribute: "content",
            })?;
        entries.push((name, content));
    }
    Ok(entries)
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if trimmed.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(Error::InvalidOption {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_xml;

    fn read(head: &str) -> Result<DocumentOptions> {
        let dom = parse_xml(&format!("<html><head>{head}</head><body /></html>")).unwrap();
        DocumentOptions::read(&dom)
    }

    #[test]
    fn test_defaults_without_meta() {
        let options = read("<title>x</title>").unwrap();
        assert_eq!(options, DocumentOptions::default());
        assert_eq!(options.zone_selector, ".N2_Zone");
        assert_eq!(options.part_selector, ".N2_Part");
        assert_eq!(options.attribute_selector, ".N2_Attribute");
        assert_eq!(options.ignore_selector, ".N2_Ignore");
        assert!(options.show_nav);
        assert!(options.show_title);
        assert_eq!(options.page_type, "TextPage");
    }

    #[test]
    fn test_show_nav_false() {
        let options = read(r#"<meta name="N2:ShowNav" content="false" />"#).unwrap();
        assert!(!options.show_nav);
        assert!(options.show_title);
    }

    #[test]
    fn test_malformed_bool_fails() {
        let err = read(r#"<meta name="N2:ShowNav" content="notabool" />"#).unwrap_err();
        assert!(matches!(err, Error::InvalidOption { value, .. } if value == "notabool"));
    }

    #[test]
    fn test_keys_are_case_insensitive() {
        let options = read(
            r#"<meta name="n2:zoneselector" content=".Region" />
               <meta name="N2:SHOWTITLE" content=" FALSE " />
               <meta name="n2:type" content="NewsPage" />"#,
        )
        .unwrap();
        assert_eq!(options.zone_selector, ".Region");
        assert!(!options.show_title);
        assert_eq!(options.page_type, "NewsPage");
    }

    #[test]
    fn test_later_meta_overrides_earlier() {
        let options = read(
            r#"<meta name="N2:PartSelector" content=".First" />
               <meta name="N2:PartSelector" content=".Second" />"#,
        )
        .unwrap();
        assert_eq!(options.part_selector, ".Second");
    }

    #[test]
    fn test_unrelated_and_unknown_meta_ignored() {
        let options = read(
            r#"<meta name="description" content="ignored" />
               <meta http-equiv="Content-Type" content="text/html" />
               <meta name="N2:MapProperty" content="a=b" />"#,
        )
        .unwrap();
        assert_eq!(options, DocumentOptions::default());
    }

    #[test]
    fn test_option_without_content_fails() {
        let err = read(r#"<meta name="N2:Type" />"#).unwrap_err();
        assert!(matches!(err, Error::MissingAttribute { attribute: "content", .. }));
    }

    #[test]
    fn test_ignore_selector_is_read() {
        let options = read(r#"<meta name="N2:IgnoreSelector" content=".Skip" />"#).unwrap();
        assert_eq!(options.ignore_selector, ".Skip");
    }
}
