//! The image codec behind a conversion.
//!
//! [`Codec`] is the seam between the converter and the raster library: probing
//! whether the needed decoders/encoders were compiled in, decoding a source file
//! and encoding an icon container. [`ImageCodec`] implements it on top of the
//! `image` crate.

use std::path::Path;

use image::codecs::ico::{IcoEncoder, IcoFrame};
use image::error::{ImageFormatHint, UnsupportedErrorKind};
use image::imageops::{self, FilterType};
use image::io::Reader as ImageReader;
use image::{ColorType, DynamicImage, ImageError, ImageFormat, RgbaImage};

use crate::error::{Capability, ConvertError, Failure};
use crate::sizes::IconSizes;

pub trait Codec {
    /// Verify the codec can write icons for `source`. Must not touch the filesystem.
    fn check(&self, source: &Path) -> Result<(), Capability>;

    fn decode(&self, source: &Path) -> Result<DynamicImage, ConvertError>;

    /// Encode one square frame per size, in the order given, into an ICO byte stream.
    fn encode_icon(&self, image: &RgbaImage, sizes: &IconSizes) -> Result<Vec<u8>, ConvertError>;
}

#[derive(Debug, Clone, Copy)]
pub struct ImageCodec {
    pub filter: FilterType,
}

impl Default for ImageCodec {
    fn default() -> Self {
        Self { filter: FilterType::Lanczos3 }
    }
}

impl ImageCodec {
    pub fn new(filter: FilterType) -> Self {
        Self { filter }
    }
}

impl Codec for ImageCodec {
    fn check(&self, source: &Path) -> Result<(), Capability> {
        if !ImageFormat::Ico.writing_enabled() {
            tracing::debug!(path = %source.display(), "ico encoder not compiled in");
            return Err(Capability::IcoEncoder);
        }
        // Decoders are checked in decode(), once content sniffing has settled the format.
        Ok(())
    }

    fn decode(&self, source: &Path) -> Result<DynamicImage, ConvertError> {
        let reader = ImageReader::open(source)
            .and_then(|r| r.with_guessed_format())
            .map_err(|e| Failure::Read { path: source.to_path_buf(), source: e })?;
        tracing::debug!(path = %source.display(), format = ?reader.format(), "decoding source image");

        reader.decode().map_err(|e| match missing_decoder(&e) {
            Some(format) => ConvertError::MissingCapability(Capability::Decoder(format)),
            None => Failure::Decode { path: source.to_path_buf(), source: e }.into(),
        })
    }

    fn encode_icon(&self, image: &RgbaImage, sizes: &IconSizes) -> Result<Vec<u8>, ConvertError> {
        let mut frames = Vec::with_capacity(sizes.len());
        for size in sizes.iter() {
            // Sources smaller than `size` are upscaled with the same filter.
            let resized = if image.dimensions() == (size, size) {
                image.clone()
            } else {
                imageops::resize(image, size, size, self.filter)
            };
            let frame = IcoFrame::as_png(resized.as_raw(), size, size, ColorType::Rgba8)
                .map_err(|source| Failure::Encode { size, source })?;
            tracing::debug!(size, filter = ?self.filter, "encoded icon frame");
            frames.push(frame);
        }

        let mut buf = Vec::new();
        IcoEncoder::new(&mut buf)
            .encode_images(&frames)
            .map_err(|source| Failure::Container { source })?;
        Ok(buf)
    }
}

/// Format recognised from content or extension whose decoder is not compiled in.
fn missing_decoder(err: &ImageError) -> Option<ImageFormat> {
    let ImageError::Unsupported(unsupported) = err else {
        return None;
    };
    match unsupported.kind() {
        UnsupportedErrorKind::Format(ImageFormatHint::Exact(format)) if !format.reading_enabled() => {
            Some(format)
        }
        _ => None,
    }
}
