//! # psdsvg
//!
//! Convert layered image documents to SVG or HTML markup.
//!
//! ## Design
//!
//! The converter does not read PSD files itself. It accepts an in-memory
//! layer tree ([`SourceNode`]) which a [`DocumentParser`] builds. This
//! design allows:
//!
//! - **Parser agnostic**: Any PSD reader can produce the tree
//! - **Pure rendering**: [`Converter::render`] builds the markup without
//!   touching the filesystem
//! - **Pluggable output**: Image layers are written through a
//!   [`RasterEncoder`] (PNG by default)
//!
//! ## Example
//!
//! ```rust
//! use std::path::PathBuf;
//! use psdsvg::{BoundingBox, Converter, ResourceLocation, SourceNode, TextRun};
//!
//! let root = SourceNode::root(200.0, 100.0).with_child(
//!     SourceNode::layer("Title", BoundingBox::new(10.0, 10.0, 190.0, 40.0))
//!         .with_text(TextRun::new("Hello").with_font_size(20.0)),
//! );
//!
//! let location = ResourceLocation {
//!     dir: PathBuf::from("out/page.svg.files.d"),
//!     url_base: "page.svg.files.d".to_string(),
//! };
//! let rendered = Converter::new().render(&root, &location).unwrap();
//! assert!(rendered.markup.contains(r#"<tspan x="10" dy="20" data-text-width="50">Hello</tspan>"#));
//! ```

use std::path::PathBuf;

mod convert;
#[cfg(feature = "json")]
pub mod dump;
mod export;
mod ident;
pub mod node;
mod normalize;
mod service;
mod wrap;

pub use convert::{transform, Transformed, DEFAULT_FONT_SIZE, LINE_HEIGHT_FACTOR};
#[cfg(feature = "json")]
pub use dump::{parse_json, JsonDocumentParser};
pub use export::{run_exports, ImageExport, PngEncoder, RasterEncoder};
pub use ident::Identifier;
pub use node::{
    BoundingBox, ExportedContent, LayerData, NodeKind, RasterImage, Rgb, SourceNode, TextRun,
};
pub use normalize::{flatten, normalize};
pub use service::{
    Conversion, ConvertOptions, Converter, DocumentParser, ImageReference, OutputMode, Rendered,
    ResourceLocation,
};
pub use wrap::{wrap_text, LineFragment, LineStep};

/// Error type for psdsvg operations
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("Failed to parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Document has no root node")]
    MissingRoot,

    #[error("Failed to encode image {}: {message}", .path.display())]
    Encode { path: PathBuf, message: String },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "json")]
    #[error("Invalid JSON dump: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConvertError>;
