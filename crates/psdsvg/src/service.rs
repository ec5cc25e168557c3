//! Converter - the main entry point for layered document to markup conversion.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use psdsvg_core::{serialize, MarkupNode, Options as MarkupOptions};

use crate::convert::transform;
use crate::export::{run_exports, ImageExport, PngEncoder, RasterEncoder};
use crate::ident::Identifier;
use crate::node::SourceNode;
use crate::normalize::{flatten, normalize};
use crate::{ConvertError, Result};

const SVG_PROLOG: &str = r#"<?xml version="1.0" standalone="no"?>
<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd">
  "#;

const HTML_HEAD: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<style>
    .layer{
        position: absolute;
        padding: 0;
        margin: 0;
        border: none;
        background-size: contain;
        background-repeat: no-repeat;
    }
    .text{
        word-spacing: -4px;
        letter-spacing: 1px;
        white-space: pre;
    }
</style>
</head>
<body>
"#;

const HTML_TAIL: &str = "\n</body>\n</html>\n";

/// Target markup flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Nested SVG groups; sibling order reversed for stacking
    #[default]
    Svg,
    /// Flat list of absolutely positioned HTML elements with z-index
    Html,
}

/// How image layers reference their exported file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageReference {
    /// Dedicated image element with a reference attribute
    #[default]
    Href,
    /// `background-image` style on the positioned layer element
    BackgroundImage,
}

/// Options for Converter
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Directory for exported images.
    /// Defaults to `<output file>.files.d` next to the output file.
    pub output_resource_dir: Option<PathBuf>,

    /// URL prefix written into image references.
    /// Defaults to the resource directory relative to the output file.
    pub output_resource_url_base: Option<String>,

    /// Markup flavour
    pub mode: OutputMode,

    /// Image reference style
    pub image_reference: ImageReference,

    /// Serializer options
    pub markup: MarkupOptions,
}

/// Where exported images go and how the markup refers to them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLocation {
    pub dir: PathBuf,
    pub url_base: String,
}

impl ResourceLocation {
    /// Resolve the resource location for an output file
    pub fn for_output(output: &Path, options: &ConvertOptions) -> Self {
        let output_dir = output.parent().unwrap_or_else(|| Path::new(""));

        let dir = match options.output_resource_dir {
            Some(ref dir) => dir.clone(),
            None => {
                let file_name = output
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "output".to_string());
                output_dir.join(format!("{}.files.d", file_name))
            }
        };

        let url_base = match options.output_resource_url_base {
            Some(ref base) => base.clone(),
            None => relative_url(output_dir, &dir),
        };

        Self { dir, url_base }
    }

    /// URL of a file inside the resource directory
    pub fn resource_url(&self, file_name: &str) -> String {
        if self.url_base.is_empty() {
            file_name.to_string()
        } else {
            format!("{}/{}", self.url_base.trim_end_matches('/'), file_name)
        }
    }
}

/// Markup produced in memory, with the image writes it depends on
#[derive(Debug)]
pub struct Rendered<'a> {
    pub markup: String,
    pub exports: Vec<ImageExport<'a>>,
}

/// Outcome of a conversion written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub markup: String,
    pub output: PathBuf,
    /// Image files written under the resource directory
    pub images: Vec<PathBuf>,
}

/// Supplies parsed layer trees to the converter
pub trait DocumentParser {
    fn parse_document(&self, path: &Path) -> Result<SourceNode>;
}

/// The main service for converting layered documents to markup
pub struct Converter<E = PngEncoder> {
    options: ConvertOptions,
    encoder: E,
}

impl Converter<PngEncoder> {
    /// Create a Converter with default options
    pub fn new() -> Self {
        Self::with_options(ConvertOptions::default())
    }

    /// Create a Converter with custom options
    pub fn with_options(options: ConvertOptions) -> Self {
        Self {
            options,
            encoder: PngEncoder,
        }
    }
}

impl<E: RasterEncoder> Converter<E> {
    /// Create a Converter that writes images through `encoder`
    pub fn with_encoder(options: ConvertOptions, encoder: E) -> Self {
        Self { options, encoder }
    }

    /// Get the current options
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Get mutable access to options
    pub fn options_mut(&mut self) -> &mut ConvertOptions {
        &mut self.options
    }

    /// Build the complete markup document without touching the filesystem
    pub fn render<'a>(
        &self,
        root: &'a SourceNode,
        location: &ResourceLocation,
    ) -> Result<Rendered<'a>> {
        if !root.is_root() {
            return Err(ConvertError::MissingRoot);
        }

        let transformed = transform(root, &Identifier::root(), &self.options, location);
        let mut tree = transformed.root;

        let markup = match self.options.mode {
            OutputMode::Svg => {
                // Collects leaf visuals; stays empty and ends up first after reversal
                tree.add_child(MarkupNode::new("g"));
                normalize(&mut tree);
                log::debug!("Got markup tree: {:#?}", tree);
                format!("{}{}", SVG_PROLOG, serialize(&tree, &self.options.markup))
            }
            OutputMode::Html => {
                flatten(&mut tree);
                log::debug!("Got markup tree: {:#?}", tree);
                format!(
                    "{}{}{}",
                    HTML_HEAD,
                    serialize(&tree, &self.options.markup),
                    HTML_TAIL
                )
            }
        };

        Ok(Rendered {
            markup,
            exports: transformed.exports,
        })
    }

    /// Convert a layer tree and write the markup to `output`.
    ///
    /// Images are written first; the output file is written once the whole
    /// document is assembled. Images written before a failure are left in
    /// place.
    pub fn convert(&self, root: &SourceNode, output: &Path) -> Result<Conversion> {
        let location = ResourceLocation::for_output(output, &self.options);
        log::debug!(
            "Converting to {} with resources in {}",
            output.display(),
            location.dir.display()
        );

        let rendered = self.render(root, &location)?;

        ensure_resource_dir(&location.dir);
        let images = run_exports(&rendered.exports, &self.encoder)?;

        fs::write(output, &rendered.markup).map_err(|source| ConvertError::Io {
            path: output.to_path_buf(),
            source,
        })?;

        Ok(Conversion {
            markup: rendered.markup,
            output: output.to_path_buf(),
            images,
        })
    }

    /// Parse `input` with `parser`, then [`convert`](Self::convert) it
    pub fn convert_file<P>(&self, parser: &P, input: &Path, output: &Path) -> Result<Conversion>
    where
        P: DocumentParser + ?Sized,
    {
        log::debug!("Parsing {} to {}", input.display(), output.display());
        let root = parser.parse_document(input)?;
        self.convert(&root, output)
    }
}

impl Default for Converter<PngEncoder> {
    fn default() -> Self {
        Self::new()
    }
}

/// Create the resource directory; failures are logged, not fatal
fn ensure_resource_dir(dir: &Path) {
    match fs::create_dir(dir) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            log::debug!("Resource directory {} already exists", dir.display());
        }
        Err(e) => {
            log::warn!("Failed to make directory {}: {}", dir.display(), e);
        }
    }
}

/// `/`-separated path of `to` relative to the directory `from`
fn relative_url(from: &Path, to: &Path) -> String {
    let (from, to) = if from.is_absolute() == to.is_absolute() {
        (from.to_path_buf(), to.to_path_buf())
    } else {
        (absolute_or_same(from), absolute_or_same(to))
    };

    let from: Vec<Component<'_>> = from
        .components()
        .filter(|c| *c != Component::CurDir)
        .collect();
    let to: Vec<Component<'_>> = to
        .components()
        .filter(|c| *c != Component::CurDir)
        .collect();

    let common = from.iter().zip(&to).take_while(|(a, b)| a == b).count();

    let mut parts: Vec<String> = Vec::new();
    for _ in common..from.len() {
        parts.push("..".to_string());
    }
    for component in &to[common..] {
        parts.push(component.as_os_str().to_string_lossy().into_owned());
    }

    parts.join("/")
}

fn absolute_or_same(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
