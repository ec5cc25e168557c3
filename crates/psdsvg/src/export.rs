//! Raster export of image layers.
//!
//! The transform only records where each image layer should be written;
//! the jobs are executed afterwards through a [`RasterEncoder`].

use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbaImage};

use crate::ident::Identifier;
use crate::node::RasterImage;
use crate::{ConvertError, Result};

/// Encodes a layer's pixels and writes them to disk
pub trait RasterEncoder {
    fn encode_and_save(&self, image: &RasterImage, path: &Path) -> Result<()>;
}

/// Writes RGBA8 buffers as PNG files
#[derive(Debug, Clone, Copy, Default)]
pub struct PngEncoder;

impl RasterEncoder for PngEncoder {
    fn encode_and_save(&self, image: &RasterImage, path: &Path) -> Result<()> {
        let expected = u64::from(image.width)
            .checked_mul(u64::from(image.height))
            .and_then(|pixels| pixels.checked_mul(4));

        if expected != Some(image.pixels.len() as u64) {
            return Err(ConvertError::Encode {
                path: path.to_path_buf(),
                message: format!(
                    "expected {}x{}x4 bytes for an RGBA image, got {}",
                    image.width,
                    image.height,
                    image.pixels.len()
                ),
            });
        }

        let buffer = RgbaImage::from_raw(image.width, image.height, image.pixels.clone())
            .ok_or_else(|| ConvertError::Encode {
                path: path.to_path_buf(),
                message: "pixel buffer does not fit the image size".to_string(),
            })?;

        buffer
            .save_with_format(path, ImageFormat::Png)
            .map_err(|e| ConvertError::Encode {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
    }
}

/// A pending write of one image layer
#[derive(Debug, Clone)]
pub struct ImageExport<'a> {
    /// Identifier of the layer the image belongs to
    pub identifier: Identifier,
    /// Destination file
    pub path: PathBuf,
    pub image: &'a RasterImage,
}

/// Execute export jobs in order, stopping at the first failure.
///
/// Returns the written paths.
pub fn run_exports<E>(exports: &[ImageExport<'_>], encoder: &E) -> Result<Vec<PathBuf>>
where
    E: RasterEncoder + ?Sized,
{
    let mut written = Vec::with_capacity(exports.len());

    for export in exports {
        log::debug!("saving {}", export.path.display());
        encoder.encode_and_save(export.image, &export.path)?;
        written.push(export.path.clone());
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        saved: RefCell<Vec<PathBuf>>,
    }

    impl RasterEncoder for Recorder {
        fn encode_and_save(&self, _image: &RasterImage, path: &Path) -> Result<()> {
            self.saved.borrow_mut().push(path.to_path_buf());
            Ok(())
        }
    }

    #[test]
    fn test_png_encoder_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("0_0.png");
        let image = RasterImage::solid(3, 2, [255, 0, 0, 255]);

        PngEncoder.encode_and_save(&image, &path).unwrap();

        let decoded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (3, 2));
        assert_eq!(decoded.get_pixel(2, 1).0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_png_encoder_rejects_short_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.png");
        let image = RasterImage::new(4, 4, vec![0; 10]);

        let err = PngEncoder.encode_and_save(&image, &path).unwrap_err();
        assert!(matches!(err, ConvertError::Encode { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn test_png_encoder_rejects_long_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("long.png");
        let image = RasterImage::new(1, 1, vec![0; 40]);

        let err = PngEncoder.encode_and_save(&image, &path).unwrap_err();
        assert!(matches!(err, ConvertError::Encode { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn test_run_exports_in_order() {
        let image = RasterImage::solid(1, 1, [0, 0, 0, 255]);
        let exports = vec![
            ImageExport {
                identifier: Identifier::root().child(0),
                path: PathBuf::from("res/0_0.png"),
                image: &image,
            },
            ImageExport {
                identifier: Identifier::root().child(1),
                path: PathBuf::from("res/0_1.png"),
                image: &image,
            },
        ];

        let recorder = Recorder::default();
        let written = run_exports(&exports, &recorder).unwrap();

        assert_eq!(written, *recorder.saved.borrow());
        assert_eq!(
            written,
            vec![PathBuf::from("res/0_0.png"), PathBuf::from("res/0_1.png")]
        );
    }
}
