//! Single-class selector matching.
//!
//! Zones, parts, and attributes are marked with one structural CSS class and
//! (for parts and attributes) one semantic class. [`ClassSelector`] finds the
//! structural class on `div` elements; [`leftover_classes`] recovers the
//! semantic one.

mod classes;
mod selector;

pub use classes::{leftover_classes, semantic_class};
pub use selector::{ClassSelector, MATCHED_TAG};
