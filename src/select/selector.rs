use std::fmt;
use std::str::FromStr;

use crate::dom::{ArenaDom, NodeId};
use crate::error::{Error, Result};
use crate::util::eq_ignore_case;

/// The only element type a [`ClassSelector`] can match.
pub const MATCHED_TAG: &str = "div";

/// A compiled `.class` selector.
///
/// Only a single class token is supported. Compound selectors (anything
/// containing whitespace) and non-class selectors are rejected at compile
/// time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSelector {
    source: String,
    class: String,
}

impl ClassSelector {
    /// Compile selector text such as `.N2_Zone`.
    pub fn compile(selector: &str) -> Result<Self> {
        let unsupported = |reason| Error::UnsupportedSelector {
            selector: selector.to_string(),
            reason,
        };

        let trimmed = selector.trim();
        if trimmed.is_empty() {
            return Err(unsupported("empty selector"));
        }
        if trimmed.contains(char::is_whitespace) {
            return Err(unsupported("compound selectors are not supported"));
        }
        if !trimmed.starts_with('.') {
            return Err(unsupported("only css-class based selectors are supported"));
        }

        let class = trimmed.trim_matches(|c| c == '.' || c == ' ');
        if class.is_empty() {
            return Err(unsupported("missing class name"));
        }

        Ok(Self {
            source: selector.to_string(),
            class: class.to_string(),
        })
    }

    /// Class name without the leading `.`.
    pub fn class_name(&self) -> &str {
        &self.class
    }

    /// Selector text as given to [`compile`](Self::compile).
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Test whether `id` is a `div` carrying this selector's class.
    ///
    /// Non-`div` nodes never match. A `div` without a `class` attribute is an
    /// error rather than a non-match.
    pub fn matches(&self, dom: &ArenaDom, id: NodeId) -> Result<bool> {
        let is_div = dom
            .element_name(id)
            .is_some_and(|name| name.as_ref().eq_ignore_ascii_case(MATCHED_TAG));
        if !is_div {
            return Ok(false);
        }

        let class_attr = dom
            .get_attr(id, "class")
            .ok_or_else(|| Error::MissingClassAttribute {
                element: describe_element(dom, id),
            })?;

        Ok(class_attr
            .split(' ')
            .any(|token| eq_ignore_case(token.trim(), &self.class)))
    }

    /// All matching descendants of `scope`, in document order.
    pub fn select(&self, dom: &ArenaDom, scope: NodeId) -> Result<Vec<NodeId>> {
        let mut matched = Vec::new();
        for id in dom.descendants(scope) {
            if self.matches(dom, id)? {
                matched.push(id);
            }
        }
        Ok(matched)
    }
}

impl FromStr for ClassSelector {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::compile(s)
    }
}

impl fmt::Display for ClassSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".{}", self.class)
    }
}

/// Short description like `div id="Main"` for error messages.
fn describe_element(dom: &ArenaDom, id: NodeId) -> String {
    let tag = dom.qualified_name(id).unwrap_or_default();
    match dom.get_attr(id, "id") {
        Some(elem_id) => format!("{tag} id=\"{elem_id}\""),
        None => tag,
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::dom::parse_xml;

    fn first_tag(dom: &ArenaDom, tag: &str) -> NodeId {
        dom.find_by_tag(tag).unwrap()
    }

    #[test]
    fn test_compile_class_selector() {
        let sel = ClassSelector::compile(".N2_Zone").unwrap();
        assert_eq!(sel.class_name(), "N2_Zone");
        assert_eq!(sel.as_str(), ".N2_Zone");
        assert_eq!(sel.to_string(), ".N2_Zone");

        let padded: ClassSelector = "  .N2_Part ".parse().unwrap();
        assert_eq!(padded.class_name(), "N2_Part");
    }

    #[test]
    fn test_compile_rejects_compound_selectors() {
        for selector in [".a .b", "div .a", ".a\t.b"] {
            let err = ClassSelector::compile(selector).unwrap_err();
            assert!(
                matches!(err, Error::UnsupportedSelector { .. }),
                "{selector:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_compile_rejects_non_class_selectors() {
        for selector in ["div", "#main", "[class]", "", "   ", "."] {
            assert!(
                matches!(
                    ClassSelector::compile(selector),
                    Err(Error::UnsupportedSelector { .. })
                ),
                "{selector:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_matches_div_with_class_token() {
        let sel = ClassSelector::compile(".N2_Zone").unwrap();
        let dom = parse_xml(r#"<div class="foo N2_Zone bar" />"#).unwrap();
        assert!(sel.matches(&dom, first_tag(&dom, "div")).unwrap());

        let dom = parse_xml(r#"<DIV class="n2_zone" />"#).unwrap();
        assert!(sel.matches(&dom, first_tag(&dom, "div")).unwrap());
    }

    #[test]
    fn test_does_not_match_prefix_or_other_tags() {
        let sel = ClassSelector::compile(".N2_Zone").unwrap();

        let dom = parse_xml(r#"<div class="N2_ZoneX" />"#).unwrap();
        assert!(!sel.matches(&dom, first_tag(&dom, "div")).unwrap());

        let dom = parse_xml(r#"<span class="N2_Zone" />"#).unwrap();
        assert!(!sel.matches(&dom, first_tag(&dom, "span")).unwrap());
    }

    #[test]
    fn test_div_without_class_is_an_error() {
        let sel = ClassSelector::compile(".N2_Zone").unwrap();
        let dom = parse_xml(r#"<div id="loose" />"#).unwrap();

        let err = sel.matches(&dom, first_tag(&dom, "div")).unwrap_err();
        match err {
            Error::MissingClassAttribute { element } => assert_eq!(element, "div id=\"loose\""),
            other => panic!("unexpected error: {other}"),
        }

        // Other elements without a class are simply skipped
        let dom = parse_xml("<p>text</p>").unwrap();
        assert!(!sel.matches(&dom, first_tag(&dom, "p")).unwrap());
    }

    #[test]
    fn test_select_in_document_order() {
        let sel = ClassSelector::compile(".hit").unwrap();
        let dom = parse_xml(
            r#"<body><div class="hit" id="a"><div class="hit" id="b" /></div><div class="miss" /><div class="hit" id="c" /></body>"#,
        )
        .unwrap();

        let ids: Vec<_> = sel
            .select(&dom, dom.document())
            .unwrap()
            .into_iter()
            .filter_map(|id| dom.get_attr(id, "id"))
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    proptest! {
        #[test]
        fn prop_matches_regardless_of_neighbours(
            before in "[a-z]{1,8}",
            after in "[a-z]{1,8}",
            upper in any::<bool>(),
        ) {
            let sel = ClassSelector::compile(".N2_Part").unwrap();
            let token = if upper { "N2_PART" } else { "n2_part" };
            let xml = format!(r#"<div class="{before} {token} {after}" />"#);
            let dom = parse_xml(&xml).unwrap();
            prop_assert!(sel.matches(&dom, first_tag(&dom, "div")).unwrap());
        }
    }
}
