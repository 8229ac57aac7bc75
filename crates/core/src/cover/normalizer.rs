//! JPEG normalization of cover art.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageReader, Rgb, RgbImage};
use tracing::debug;

use super::config::CoverConfig;
use super::error::CoverError;
use super::types::{CoverImage, ImageKind, NormalizedCover};

/// Turns arbitrary cover art into a JPEG of a fixed size.
///
/// Resize policy is aspect-fill: the image is scaled until it covers the
/// whole target box, then center-cropped. Output is deterministic for a
/// given input and config.
#[derive(Debug, Clone)]
pub struct CoverNormalizer {
    config: CoverConfig,
}

impl CoverNormalizer {
    pub fn new(config: CoverConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(CoverConfig::default())
    }

    pub fn config(&self) -> &CoverConfig {
        &self.config
    }

    pub fn target_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Whether `cover` is already a JPEG of the target size.
    pub fn is_normalized(&self, cover: &CoverImage) -> bool {
        cover.kind == ImageKind::Jpeg && cover.dimensions == Some(self.target_size())
    }

    /// Reports kind and dimensions from the header alone.
    pub fn inspect(&self, raw: &[u8]) -> (ImageKind, Option<(u32, u32)>) {
        (ImageKind::sniff(raw), read_dimensions(raw))
    }

    /// Normalizes raw image bytes.
    ///
    /// A JPEG already at the target size is returned byte-for-byte with
    /// `changed == false`; it is never re-encoded.
    pub fn normalize(&self, raw: &[u8]) -> Result<NormalizedCover, CoverError> {
        let (width, height) = self.target_size();

        if ImageKind::sniff(raw) == ImageKind::Jpeg && read_dimensions(raw) == Some((width, height))
        {
            debug!(width, height, "Cover already normalized");
            return Ok(NormalizedCover {
                data: raw.to_vec(),
                changed: false,
                width,
                height,
            });
        }

        let image = flatten_alpha(decode(raw)?);
        debug!(
            from_width = image.width(),
            from_height = image.height(),
            width,
            height,
            "Resizing cover"
        );
        let resized = image.resize_to_fill(width, height, FilterType::Lanczos3);

        let mut data = Vec::new();
        let mut encoder = JpegEncoder::new_with_quality(&mut data, self.config.quality);
        encoder
            .encode_image(&resized.to_rgb8())
            .map_err(|e| CoverError::encode_failed(e.to_string()))?;

        Ok(NormalizedCover {
            data,
            changed: true,
            width,
            height,
        })
    }
}

/// Reads dimensions from the image header without decoding pixels.
pub(crate) fn read_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
}

fn decode(raw: &[u8]) -> Result<DynamicImage, CoverError> {
    let reader = ImageReader::new(Cursor::new(raw))
        .with_guessed_format()
        .map_err(|e| CoverError::unsupported(e.to_string()))?;

    if reader.format().is_none() {
        return Err(CoverError::unsupported("unrecognized image format"));
    }

    let mut decoder = reader
        .into_decoder()
        .map_err(|e| CoverError::unsupported(e.to_string()))?;
    let orientation = decoder.orientation().unwrap_or(Orientation::NoTransforms);

    let mut image =
        DynamicImage::from_decoder(decoder).map_err(|e| CoverError::unsupported(e.to_string()))?;
    image.apply_orientation(orientation);
    Ok(image)
}

/// Composites transparent pixels onto white.
fn flatten_alpha(image: DynamicImage) -> DynamicImage {
    if !image.color().has_alpha() {
        return image;
    }

    let rgba = image.to_rgba8();
    let mut out = RgbImage::new(rgba.width(), rgba.height());
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = u32::from(a);
        let blend = |c: u8| ((u32::from(c) * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        out.put_pixel(x, y, Rgb([blend(r), blend(g), blend(b)]));
    }
    DynamicImage::ImageRgb8(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[test]
    fn test_resizes_png_to_target_jpeg() {
        let normalizer = CoverNormalizer::with_defaults();
        let png = fixtures::png_bytes(1000, 500);

        let out = normalizer.normalize(&png).unwrap();
        assert!(out.changed);
        assert_eq!(ImageKind::sniff(&out.data), ImageKind::Jpeg);
        assert_eq!(read_dimensions(&out.data), Some((600, 600)));
    }

    #[test]
    fn test_second_pass_is_noop() {
        let normalizer = CoverNormalizer::with_defaults();
        let first = normalizer.normalize(&fixtures::png_bytes(800, 800)).unwrap();
        let second = normalizer.normalize(&first.data).unwrap();

        assert!(!second.changed);
        assert_eq!(second.data, first.data);
    }

    #[test]
    fn test_target_jpeg_is_returned_untouched() {
        let normalizer = CoverNormalizer::with_defaults();
        let jpeg = fixtures::jpeg_bytes(600, 600);

        let out = normalizer.normalize(&jpeg).unwrap();
        assert!(!out.changed);
        assert_eq!(out.data, jpeg);
    }

    #[test]
    fn test_png_at_target_size_is_reencoded() {
        let normalizer = CoverNormalizer::with_defaults();
        let out = normalizer.normalize(&fixtures::png_bytes(600, 600)).unwrap();
        assert!(out.changed);
        assert_eq!(ImageKind::sniff(&out.data), ImageKind::Jpeg);
    }

    #[test]
    fn test_small_jpeg_is_upscaled() {
        let normalizer = CoverNormalizer::with_defaults();
        let out = normalizer.normalize(&fixtures::jpeg_bytes(200, 100)).unwrap();
        assert!(out.changed);
        assert_eq!(read_dimensions(&out.data), Some((600, 600)));
    }

    #[test]
    fn test_custom_target_size() {
        let normalizer = CoverNormalizer::new(CoverConfig::default().with_size(300, 200));
        let out = normalizer.normalize(&fixtures::png_bytes(640, 480)).unwrap();
        assert_eq!((out.width, out.height), (300, 200));
        assert_eq!(read_dimensions(&out.data), Some((300, 200)));
    }

    #[test]
    fn test_garbage_is_unsupported_image() {
        let normalizer = CoverNormalizer::with_defaults();
        let result = normalizer.normalize(b"definitely not an image");
        assert!(matches!(result, Err(CoverError::UnsupportedImage { .. })));
    }

    #[test]
    fn test_transparency_flattened_to_white() {
        let normalizer = CoverNormalizer::with_defaults();
        let out = normalizer
            .normalize(&fixtures::transparent_png_bytes(64, 64))
            .unwrap();

        let decoded = image::load_from_memory(&out.data).unwrap().to_rgb8();
        let center = decoded.get_pixel(300, 300).0;
        assert!(center.iter().all(|c| *c > 240), "got {:?}", center);
    }

    #[test]
    fn test_inspect_reads_header() {
        let normalizer = CoverNormalizer::with_defaults();
        assert_eq!(
            normalizer.inspect(&fixtures::png_bytes(32, 16)),
            (ImageKind::Png, Some((32, 16)))
        );
        assert_eq!(normalizer.inspect(b"nope"), (ImageKind::Unknown, None));
    }

    #[test]
    fn test_is_normalized() {
        let normalizer = CoverNormalizer::with_defaults();
        assert!(normalizer.is_normalized(&CoverImage::from_bytes(fixtures::jpeg_bytes(600, 600))));
        assert!(!normalizer.is_normalized(&CoverImage::from_bytes(fixtures::png_bytes(600, 600))));
        assert!(!normalizer.is_normalized(&CoverImage::from_bytes(fixtures::jpeg_bytes(500, 500))));
    }
}
