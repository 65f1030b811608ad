//! # n2import
//!
//! Import a directory of hand-authored HTML pages into an N2 content tree.
//!
//! ## Features
//!
//! - Build a page hierarchy from a documentation directory
//! - Extract zones, parts, and keyed markup fragments marked up with CSS classes
//! - Per-page configuration through `<meta name="N2:...">` elements
//! - Write the result as an XML (or JSON) content file
//!
//! ## Quick Start
//!
//! ```no_run
//! use n2import::{ImportOptions, import_site};
//!
//! let import = import_site(&ImportOptions::default())?;
//! println!("{} pages parsed", import.report.parsed);
//! # Ok::<(), n2import::Error>(())
//! ```
//!
//! ## Extracting a Single Page
//!
//! ```
//! use n2import::dom::parse_xml;
//! use n2import::extract_page;
//!
//! let dom = parse_xml(
//!     r#"<html><head><title>News</title></head><body>
//!          <div class="N2_Zone" id="Content">
//!            <div class="N2_Part text"><div class="N2_Attribute body"><p>Hello</p></div></div>
//!          </div>
//!        </body></html>"#,
//! ).unwrap();
//!
//! let content = extract_page(&dom)?;
//! assert_eq!(content.title.as_deref(), Some("News"));
//! assert_eq!(content.zones[0].parts[0].property("body"), Some("<p>Hello</p>"));
//! # Ok::<(), n2import::Error>(())
//! ```

pub mod dom;
pub mod error;
pub mod export;
pub mod extract;
pub mod model;
pub mod options;
pub mod process;
pub mod select;
pub mod site;
pub mod tree;
pub(crate) mod util;

pub use dom::ParserMode;
pub use error::{Error, Result};
pub use export::{OutputFormat, read_content_xml, save, write_content_xml};
pub use extract::{PageContent, extract_page, extract_zones};
pub use model::{ContentPage, Part, PartAttribute, Zone};
pub use options::DocumentOptions;
pub use process::{PageProcessor, ProcessReport, process_tree};
pub use select::{ClassSelector, leftover_classes, semantic_class};
pub use site::{ImportOptions, ImportReport, find_site_root, import_site};
pub use tree::build_tree;
pub use util::{load_text, repair_entities};
