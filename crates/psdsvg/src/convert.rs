//! Convert a layer tree to a markup tree
//!
//! This module maps the source document onto markup elements. Children are
//! emitted in source order; stacking fixes are applied afterwards by
//! [`crate::normalize`]. Image layers are not written here: the transform
//! records an [`ImageExport`] job for each of them.

use psdsvg_core::{AttrValue, MarkupNode};

use crate::export::ImageExport;
use crate::ident::Identifier;
use crate::node::{ExportedContent, NodeKind, RasterImage, SourceNode, TextRun};
use crate::service::{ConvertOptions, ImageReference, OutputMode, ResourceLocation};
use crate::wrap::{wrap_text, LineFragment, LineStep};

/// Font size used when a text run does not specify one
pub const DEFAULT_FONT_SIZE: f64 = 16.0;

/// Line height as a multiple of the font size
pub const LINE_HEIGHT_FACTOR: f64 = 1.8;

/// Class marking group containers in HTML mode
pub const GROUP_CLASS: &str = "group";

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";
const XLINK_NAMESPACE: &str = "http://www.w3.org/1999/xlink";

/// Result of transforming a document
#[derive(Debug)]
pub struct Transformed<'a> {
    /// Markup tree, children still in source order
    pub root: MarkupNode,
    /// Image layers waiting to be written, in traversal order
    pub exports: Vec<ImageExport<'a>>,
}

/// Transform `node` and its subtree, starting from `id`.
///
/// A node that produces no markup (unknown kind, layer without data)
/// comes back as an invalid placeholder.
pub fn transform<'a>(
    node: &'a SourceNode,
    id: &Identifier,
    options: &ConvertOptions,
    location: &ResourceLocation,
) -> Transformed<'a> {
    let mut transformer = Transformer {
        options,
        location,
        exports: Vec::new(),
    };

    let root = transformer
        .visit(node, id)
        .unwrap_or_else(MarkupNode::placeholder);

    Transformed {
        root,
        exports: transformer.exports,
    }
}

struct Transformer<'a, 'o> {
    options: &'o ConvertOptions,
    location: &'o ResourceLocation,
    exports: Vec<ImageExport<'a>>,
}

impl<'a, 'o> Transformer<'a, 'o> {
    fn visit(&mut self, node: &'a SourceNode, id: &Identifier) -> Option<MarkupNode> {
        log::debug!(
            "visit {} {} {:?} ({} children)",
            id,
            node.kind.as_str(),
            node.name,
            node.children.len()
        );

        if !node.is_root() && node.has_layer_record() && !node.visible && !self.keeps_hidden(node)
        {
            log::debug!("ignore invisible layer {} {}", id, node.name);
            return Some(MarkupNode::placeholder());
        }

        match node.kind {
            NodeKind::Root => {
                let element = self.root_element(node);
                Some(self.container(node, id, element))
            }
            NodeKind::Group => {
                let element = self.group_element();
                Some(self.container(node, id, element))
            }
            NodeKind::Layer => {
                if node.layer.is_none() {
                    log::warn!("layer {} {} has no data", id, node.name);
                    return None;
                }
                Some(self.layer(node, id))
            }
            NodeKind::Other(ref kind) => {
                log::warn!("Unknown node kind {:?} at {}", kind, id);
                None
            }
        }
    }

    /// HTML mode keeps hidden layers in the output as `display: none`
    fn keeps_hidden(&self, node: &SourceNode) -> bool {
        self.options.mode == OutputMode::Html && node.kind == NodeKind::Layer
    }

    fn container(
        &mut self,
        node: &'a SourceNode,
        id: &Identifier,
        mut element: MarkupNode,
    ) -> MarkupNode {
        for (index, child) in node.children().enumerate() {
            if let Some(child_element) = self.visit(child, &id.child(index)) {
                element.add_child(child_element);
            }
        }
        element
    }

    fn root_element(&self, node: &SourceNode) -> MarkupNode {
        let canvas = node.bounds;

        match self.options.mode {
            OutputMode::Svg => {
                let mut svg = MarkupNode::new("svg");
                svg.set_attr("width", canvas.right);
                svg.set_attr("height", canvas.bottom);
                svg.set_attr("xmlns", SVG_NAMESPACE);
                svg.set_attr("xmlns:xlink", XLINK_NAMESPACE);
                svg
            }
            OutputMode::Html => {
                let mut div = MarkupNode::new("div");
                div.add_class("document");
                div.set_style("position", "relative");
                div.set_style("width", px(canvas.right));
                div.set_style("height", px(canvas.bottom));
                div.set_style("overflow", "hidden");
                div
            }
        }
    }

    fn group_element(&self) -> MarkupNode {
        match self.options.mode {
            OutputMode::Svg => MarkupNode::new("g"),
            OutputMode::Html => {
                let mut div = MarkupNode::new("div");
                div.add_class(GROUP_CLASS);
                div
            }
        }
    }

    fn layer(&mut self, node: &'a SourceNode, id: &Identifier) -> MarkupNode {
        let bounds = node.bounds;
        let mut element;

        match self.options.mode {
            OutputMode::Svg => {
                element = MarkupNode::new("rect");
                element.set_attr("id", id.element_id());
                element.set_attr("x", bounds.left);
                element.set_attr("y", bounds.top);
                element.set_attr("width", bounds.width());
                element.set_attr("height", bounds.height());
            }
            OutputMode::Html => {
                element = MarkupNode::new("div");
                element.set_attr("id", id.element_id());
                element.set_style("position", "absolute");
                element.set_style("left", px(bounds.left));
                element.set_style("top", px(bounds.top));
                element.set_style("width", px(bounds.width()));
                element.set_style("height", px(bounds.height()));
            }
        }

        element.add_class(node.kind.as_str());
        element.set_attr("data-node-name", node.name.as_str());

        self.fill(node, id, &mut element);
        element
    }

    fn fill(&mut self, node: &'a SourceNode, id: &Identifier, element: &mut MarkupNode) {
        if !node.visible {
            log::debug!("ignore invisible layer {} {}", id, node.name);
            match self.options.mode {
                OutputMode::Svg => element.is_valid = false,
                OutputMode::Html => element.is_visible = false,
            }
            return;
        }

        match node.exported_content() {
            Some(ExportedContent::Text(run)) => {
                log::debug!("rendering text node {}: {:?}", id, run.value);
                self.fill_text(run, node, element);
            }
            Some(ExportedContent::Image(image)) => self.fill_image(image, id, element),
            None => {}
        }
    }

    fn fill_text(&self, run: &TextRun, node: &SourceNode, element: &mut MarkupNode) {
        element.add_class("text");

        // A zero size counts as unspecified
        let specified_size = run.font_size_px.filter(|size| *size > 0.0);
        let font_size = specified_size.unwrap_or(DEFAULT_FONT_SIZE);
        let line_height = font_size * LINE_HEIGHT_FACTOR;

        if let Some(size) = specified_size {
            element.set_style("font-size", px(size));
        }

        let color = run.color.map(|c| c.to_css());
        if let Some(ref color) = color {
            element.set_style("color", color.as_str());
        }

        if let Some(alignment) = run.alignment.as_deref().filter(|a| !a.is_empty()) {
            element.set_style("text-align", alignment);
        }

        match self.options.mode {
            OutputMode::Svg => {
                element.set_tag("text");
                if let Some(color) = color {
                    element.set_attr("fill", color);
                }
                element.set_attr("xml:space", "preserve");

                let bounds = node.bounds;
                element.children = wrap_text(
                    &run.value,
                    font_size,
                    line_height,
                    bounds.width(),
                    bounds.left,
                )
                .iter()
                .map(|fragment| line_element(fragment).into())
                .collect();
            }
            OutputMode::Html => {
                element.set_style("line-height", px(line_height));
                element.inner_text = Some(run.value.clone());
            }
        }
    }

    fn fill_image(&mut self, image: &'a RasterImage, id: &Identifier, element: &mut MarkupNode) {
        let file_name = id.resource_file_name();
        let url = self.location.resource_url(&file_name);

        self.exports.push(ImageExport {
            identifier: id.clone(),
            path: self.location.dir.join(&file_name),
            image,
        });

        match (self.options.image_reference, self.options.mode) {
            (ImageReference::BackgroundImage, _) => {
                element.set_style("background-image", format!("url({})", url));
            }
            (ImageReference::Href, OutputMode::Svg) => {
                element.set_tag("image");
                element.set_attr("xlink:href", url);
            }
            (ImageReference::Href, OutputMode::Html) => {
                element.set_tag("img");
                element.set_attr("src", url);
            }
        }
    }
}

fn line_element(fragment: &LineFragment) -> MarkupNode {
    let mut tspan = MarkupNode::text("tspan", &fragment.text);
    tspan.set_attr("x", fragment.x);
    tspan.set_attr(
        "dy",
        match fragment.dy {
            LineStep::FontSize(size) => AttrValue::Number(size),
            LineStep::LineHeight(height) => AttrValue::Text(px(height)),
        },
    );
    tspan.set_attr("data-text-width", fragment.width);
    tspan
}

fn px(value: f64) -> String {
    format!("{}px", value)
}
