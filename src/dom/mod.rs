//! Parse tree for documentation pages.
//!
//! Pages are parsed into an [`ArenaDom`] either strictly, as XML (the default,
//! matching how the pages are authored), or leniently through html5ever.

mod arena;
mod serialize;
mod tree_sink;
mod xml;

pub use arena::{ArenaDom, Attribute, Node, NodeData, NodeId};
pub use serialize::inner_markup;
pub use xml::parse_xml;

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use thiserror::Error;

use tree_sink::ArenaSink;

/// A page could not be turned into a parse tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ParseError(String);

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Which parser turns page text into an [`ArenaDom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ParserMode {
    /// Well-formed XML only; malformed pages are reported and skipped.
    #[default]
    Xml,
    /// HTML5 parsing rules; never fails.
    Html,
}

/// Parse page text with the given parser.
pub fn parse(text: &str, mode: ParserMode) -> Result<ArenaDom, ParseError> {
    match mode {
        ParserMode::Xml => parse_xml(text),
        ParserMode::Html => Ok(parse_html(text)),
    }
}

/// Parse HTML with html5ever's error recovery.
pub fn parse_html(html: &str) -> ArenaDom {
    let sink = ArenaSink::new();
    let result = parse_document(sink, ParseOpts::default())
        .from_utf8()
        .one(html.as_bytes());
    result.into_dom()
}
