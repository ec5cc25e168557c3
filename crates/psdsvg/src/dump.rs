//! JSON layer-tree dumps.
//!
//! A dump mirrors [`SourceNode`] field for field. Raster pixels are stored
//! as base64 RGBA8 under `rgba`:
//!
//! ```json
//! {
//!   "kind": "root",
//!   "bounds": { "left": 0, "top": 0, "right": 64, "bottom": 64 },
//!   "children": [
//!     {
//!       "kind": "layer",
//!       "name": "Title",
//!       "bounds": { "left": 4, "top": 4, "right": 60, "bottom": 24 },
//!       "layer": { "content": { "text": { "value": "Hi", "font_size_px": 12 } } }
//!     }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Deserializer};

use crate::node::SourceNode;
use crate::service::DocumentParser;
use crate::{ConvertError, Result};

/// Reads layer trees from JSON dump files
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDocumentParser;

impl DocumentParser for JsonDocumentParser {
    fn parse_document(&self, path: &Path) -> Result<SourceNode> {
        let source = fs::read_to_string(path).map_err(|e| ConvertError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        parse_json(&source).map_err(|e| match e {
            ConvertError::Json(e) => ConvertError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            },
            other => other,
        })
    }
}

/// Parse a dump held in memory. The top-level node must be a root.
pub fn parse_json(source: &str) -> Result<SourceNode> {
    let root: SourceNode = serde_json::from_str(source)?;
    if !root.is_root() {
        return Err(ConvertError::MissingRoot);
    }
    Ok(root)
}

pub(crate) fn base64_pixels<'de, D>(deserializer: D) -> std::result::Result<Vec<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let encoded = String::deserialize(deserializer)?;
    STANDARD
        .decode(encoded.trim())
        .map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{ExportedContent, NodeKind, Rgb};
    use std::path::PathBuf;

    #[test]
    fn test_parse_minimal_root() {
        let root = parse_json(r#"{"kind": "root", "bounds": {"left": 0, "top": 0, "right": 8, "bottom": 4}}"#)
            .unwrap();
        assert!(root.is_root());
        assert_eq!(root.bounds.width(), 8.0);
        assert!(root.visible);
        assert!(root.children.is_empty());
    }

    #[test]
    fn test_parse_text_and_image_layers() {
        // "AQIDBA==" is [1, 2, 3, 4]
        let source = r#"{
            "kind": "root",
            "bounds": {"left": 0, "top": 0, "right": 10, "bottom": 10},
            "children": [
                {
                    "kind": "layer",
                    "name": "Title",
                    "bounds": {"left": 1, "top": 1, "right": 9, "bottom": 3},
                    "layer": {"content": {"text": {
                        "value": "Hi",
                        "font_size_px": 12,
                        "color": [10, 20, 30],
                        "alignment": "center"
                    }}}
                },
                {
                    "kind": "group",
                    "name": "Pictures",
                    "visible": false,
                    "children": [
                        {
                            "kind": "layer",
                            "name": "Dot",
                            "layer": {"content": {"image": {"width": 1, "height": 1, "rgba": "AQIDBA=="}}}
                        }
                    ]
                },
                {"kind": "adjustment", "name": "Curves"}
            ]
        }"#;

        let root = parse_json(source).unwrap();
        assert_eq!(root.children.len(), 3);

        let title = &root.children[0];
        match title.exported_content() {
            Some(ExportedContent::Text(run)) => {
                assert_eq!(run.value, "Hi");
                assert_eq!(run.font_size_px, Some(12.0));
                assert_eq!(run.color, Some(Rgb::new(10, 20, 30)));
                assert_eq!(run.alignment.as_deref(), Some("center"));
            }
            other => panic!("expected text, got {:?}", other),
        }

        let group = &root.children[1];
        assert_eq!(group.kind, NodeKind::Group);
        assert!(!group.visible);
        match group.children[0].exported_content() {
            Some(ExportedContent::Image(image)) => {
                assert_eq!((image.width, image.height), (1, 1));
                assert_eq!(image.pixels, vec![1, 2, 3, 4]);
            }
            other => panic!("expected image, got {:?}", other),
        }

        assert_eq!(
            root.children[2].kind,
            NodeKind::Other("adjustment".to_string())
        );
        assert!(root.children[2].layer.is_none());
    }

    #[test]
    fn test_top_node_must_be_root() {
        let err = parse_json(r#"{"kind": "layer", "name": "x"}"#).unwrap_err();
        assert!(matches!(err, ConvertError::MissingRoot));
    }

    #[test]
    fn test_invalid_base64() {
        let source = r#"{"kind": "root", "children": [
            {"kind": "layer", "layer": {"content": {"image": {"width": 1, "height": 1, "rgba": "not base64!"}}}}
        ]}"#;
        assert!(matches!(parse_json(source), Err(ConvertError::Json(_))));
    }

    #[test]
    fn test_parser_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let err = JsonDocumentParser.parse_document(&path).unwrap_err();
        match err {
            ConvertError::Parse { path: reported, .. } => assert_eq!(reported, path),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_parser_missing_file() {
        let path = PathBuf::from("definitely/not/here.json");
        let err = JsonDocumentParser.parse_document(&path).unwrap_err();
        assert!(matches!(err, ConvertError::Parse { .. }));
        assert!(err.to_string().contains("definitely/not/here.json"));
    }
}
