//! Layered document tree.
//!
//! This module provides the in-memory layer tree handed over by a document
//! parser. Any parser (a PSD reader, a JSON dump, test fixtures) can build
//! this structure to use psdsvg. The tree is read-only during conversion.

/// Node kinds of a layered document
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Deserialize), serde(from = "String"))]
pub enum NodeKind {
    /// Document root; its bounds are the canvas
    Root,
    /// Folder of layers
    Group,
    /// Leaf layer with optional text or raster content
    Layer,
    /// Any kind the converter does not know about
    Other(String),
}

impl NodeKind {
    /// Kind name as used in class names and logs
    pub fn as_str(&self) -> &str {
        match self {
            NodeKind::Root => "root",
            NodeKind::Group => "group",
            NodeKind::Layer => "layer",
            NodeKind::Other(name) => name,
        }
    }
}

impl From<&str> for NodeKind {
    fn from(value: &str) -> Self {
        match value {
            "root" => NodeKind::Root,
            "group" => NodeKind::Group,
            "layer" => NodeKind::Layer,
            other => NodeKind::Other(other.to_string()),
        }
    }
}

impl From<String> for NodeKind {
    fn from(value: String) -> Self {
        NodeKind::from(value.as_str())
    }
}

/// Absolute bounds in pixels, top-left origin
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "json", derive(serde::Deserialize))]
pub struct BoundingBox {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl BoundingBox {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Bounds of a canvas of the given size
    pub fn canvas(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

/// An sRGB color triple
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Deserialize), serde(from = "[u8; 3]"))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// CSS functional notation, e.g. `rgb(255, 0, 0)`
    pub fn to_css(&self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

/// Text exported from a text layer
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "json", derive(serde::Deserialize))]
pub struct TextRun {
    /// Raw text; lines are separated by CR, LF or CRLF
    pub value: String,

    /// Font size in device pixels
    #[cfg_attr(feature = "json", serde(default))]
    pub font_size_px: Option<f64>,

    /// Fill color of the first style run
    #[cfg_attr(feature = "json", serde(default))]
    pub color: Option<Rgb>,

    /// Paragraph alignment (`left`, `center`, `right`, `justify`)
    #[cfg_attr(feature = "json", serde(default))]
    pub alignment: Option<String>,
}

impl TextRun {
    pub fn new(value: &str) -> Self {
        Self {
            value: value.to_string(),
            ..Default::default()
        }
    }

    pub fn with_font_size(mut self, font_size_px: f64) -> Self {
        self.font_size_px = Some(font_size_px);
        self
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_alignment(mut self, alignment: &str) -> Self {
        self.alignment = Some(alignment.to_string());
        self
    }
}

/// Rasterized layer pixels, RGBA8, row-major
#[derive(Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Deserialize))]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    #[cfg_attr(
        feature = "json",
        serde(rename = "rgba", deserialize_with = "crate::dump::base64_pixels")
    )]
    pub pixels: Vec<u8>,
}

impl RasterImage {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            pixels,
        }
    }

    /// An image filled with one RGBA color
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels = rgba
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 4)
            .collect();
        Self::new(width, height, pixels)
    }
}

impl std::fmt::Debug for RasterImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

/// Renderable content exported from a layer
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "json",
    derive(serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum ExportedContent {
    Text(TextRun),
    Image(RasterImage),
}

/// Layer record attached to a layer node
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "json", derive(serde::Deserialize))]
pub struct LayerData {
    #[cfg_attr(feature = "json", serde(default))]
    pub content: Option<ExportedContent>,
}

/// A node of the layered document tree
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Deserialize))]
pub struct SourceNode {
    pub kind: NodeKind,

    #[cfg_attr(feature = "json", serde(default))]
    pub name: String,

    /// Absolute bounds; for the root this is the canvas
    #[cfg_attr(feature = "json", serde(default))]
    pub bounds: BoundingBox,

    /// Visibility flag, ignored on the root
    #[cfg_attr(feature = "json", serde(default = "default_visible"))]
    pub visible: bool,

    /// Layer record; only layer nodes carry one
    #[cfg_attr(feature = "json", serde(default))]
    pub layer: Option<LayerData>,

    /// Children, topmost first
    #[cfg_attr(feature = "json", serde(default))]
    pub children: Vec<SourceNode>,
}

#[cfg(feature = "json")]
fn default_visible() -> bool {
    true
}

impl SourceNode {
    fn with_kind(kind: NodeKind, name: &str, bounds: BoundingBox) -> Self {
        Self {
            kind,
            name: name.to_string(),
            bounds,
            visible: true,
            layer: None,
            children: Vec::new(),
        }
    }

    /// Create a document root for a canvas of the given size
    pub fn root(width: f64, height: f64) -> Self {
        Self::with_kind(NodeKind::Root, "", BoundingBox::canvas(width, height))
    }

    /// Create a group node
    pub fn group(name: &str, bounds: BoundingBox) -> Self {
        Self::with_kind(NodeKind::Group, name, bounds)
    }

    /// Create a layer node with an empty layer record
    pub fn layer(name: &str, bounds: BoundingBox) -> Self {
        let mut node = Self::with_kind(NodeKind::Layer, name, bounds);
        node.layer = Some(LayerData::default());
        node
    }

    /// Create a node of arbitrary kind
    pub fn other(kind: &str, name: &str, bounds: BoundingBox) -> Self {
        Self::with_kind(NodeKind::from(kind), name, bounds)
    }

    /// Attach exported text
    pub fn with_text(mut self, text: TextRun) -> Self {
        self.layer = Some(LayerData {
            content: Some(ExportedContent::Text(text)),
        });
        self
    }

    /// Attach exported raster content
    pub fn with_image(mut self, image: RasterImage) -> Self {
        self.layer = Some(LayerData {
            content: Some(ExportedContent::Image(image)),
        });
        self
    }

    /// Mark the node invisible
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn with_child(mut self, child: SourceNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn add_child(&mut self, child: SourceNode) {
        self.children.push(child);
    }

    pub fn is_root(&self) -> bool {
        self.kind == NodeKind::Root
    }

    /// Children in source order (topmost first)
    pub fn children(&self) -> impl Iterator<Item = &SourceNode> {
        self.children.iter()
    }

    /// Whether the node is backed by a layer record.
    ///
    /// Groups are folder records in the layered format and always carry
    /// one; layers carry one when their record was parsed.
    pub fn has_layer_record(&self) -> bool {
        match self.kind {
            NodeKind::Group => true,
            NodeKind::Layer => self.layer.is_some(),
            NodeKind::Root | NodeKind::Other(_) => false,
        }
    }

    /// Exported text or raster content, if any
    pub fn exported_content(&self) -> Option<&ExportedContent> {
        self.layer.as_ref()?.content.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_kind_from_str() {
        assert_eq!(NodeKind::from("root"), NodeKind::Root);
        assert_eq!(NodeKind::from("group"), NodeKind::Group);
        assert_eq!(NodeKind::from("layer"), NodeKind::Layer);
        assert_eq!(
            NodeKind::from("adjustment"),
            NodeKind::Other("adjustment".to_string())
        );
        assert_eq!(NodeKind::from("adjustment").as_str(), "adjustment");
    }

    #[test]
    fn test_bounding_box_size() {
        let bounds = BoundingBox::new(10.0, 5.0, 50.0, 25.0);
        assert_eq!(bounds.width(), 40.0);
        assert_eq!(bounds.height(), 20.0);
    }

    #[test]
    fn test_rgb_css() {
        assert_eq!(Rgb::new(255, 0, 10).to_css(), "rgb(255, 0, 10)");
    }

    #[test]
    fn test_root() {
        let root = SourceNode::root(200.0, 100.0);
        assert!(root.is_root());
        assert_eq!(root.bounds.right, 200.0);
        assert_eq!(root.bounds.bottom, 100.0);
        assert!(!root.has_layer_record());
    }

    #[test]
    fn test_layer_record() {
        let bounds = BoundingBox::canvas(10.0, 10.0);
        assert!(SourceNode::group("g", bounds).has_layer_record());
        assert!(SourceNode::layer("l", bounds).has_layer_record());

        let mut bare = SourceNode::layer("bare", bounds);
        bare.layer = None;
        assert!(!bare.has_layer_record());
        assert!(!SourceNode::other("fx", "x", bounds).has_layer_record());
    }

    #[test]
    fn test_exported_content() {
        let bounds = BoundingBox::canvas(10.0, 10.0);
        let text = SourceNode::layer("t", bounds).with_text(TextRun::new("Hi"));
        assert!(matches!(
            text.exported_content(),
            Some(ExportedContent::Text(run)) if run.value == "Hi"
        ));

        let empty = SourceNode::layer("e", bounds);
        assert!(empty.exported_content().is_none());
    }

    #[test]
    fn test_solid_image() {
        let image = RasterImage::solid(2, 3, [1, 2, 3, 4]);
        assert_eq!(image.pixels.len(), 24);
        assert_eq!(&image.pixels[4..8], &[1, 2, 3, 4]);
    }

    #[test]
    fn test_children_in_order() {
        let bounds = BoundingBox::canvas(1.0, 1.0);
        let root = SourceNode::root(1.0, 1.0)
            .with_child(SourceNode::layer("a", bounds))
            .with_child(SourceNode::layer("b", bounds));
        let names: Vec<&str> = root.children().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
