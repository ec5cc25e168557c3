//! psdsvg-core - Markup node model and serialization
//!
//! This crate provides the in-memory markup tree and the serializer that
//! turns it into SVG or HTML text. It is used by `psdsvg` as the target of
//! the layered-document transform.
//!
//! # Architecture
//!
//! ```text
//! Layer Tree ──transform──▶ ┌─────────────┐
//!                           │             │
//!                           │ Markup Tree │ ──serialize──▶ SVG / HTML String
//!                           │             │
//!                           └─────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use psdsvg_core::{serialize, MarkupNode, Options};
//!
//! let mut rect = MarkupNode::new("rect");
//! rect.set_attr("x", 0.0);
//! rect.set_attr("width", 40.0);
//! rect.set_style("fill", "red");
//!
//! let mut svg = MarkupNode::new("svg");
//! svg.add_child(rect);
//!
//! let markup = serialize(&svg, &Options::default());
//! assert_eq!(
//!     markup,
//!     r#"<svg><rect x="0" width="40" style="fill: red"></rect></svg>"#
//! );
//! ```

mod ast;
mod escape;
mod options;
mod serialize;

pub use ast::{AttrValue, Child, MarkupNode, BOOLEAN_ATTRIBUTES, RESERVED_ATTRIBUTES};
pub use escape::{encode_attribute, encode_text};
pub use options::Options;
pub use serialize::{serialize, serialize_optional};
