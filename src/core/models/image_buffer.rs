use anyhow::{Context, Result};
use image::DynamicImage;

use super::ImageFormat;

/// An uploaded image: the untouched encoded bytes plus the decoded pixels.
#[derive(Clone)]
pub struct ImageBuffer {
    file_name: String,
    format: ImageFormat,
    encoded_bytes: Vec<u8>,
    pixels: DynamicImage,
}

impl std::fmt::Debug for ImageBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageBuffer")
            .field("file_name", &self.file_name)
            .field("format", &self.format)
            .field("width", &self.width())
            .field("height", &self.height())
            .field("encoded_len", &self.encoded_bytes.len())
            .finish()
    }
}

impl ImageBuffer {
    pub fn decode(file_name: impl Into<String>, encoded_bytes: Vec<u8>) -> Result<Self> {
        let file_name = file_name.into();
        let format = ImageFormat::detect(&encoded_bytes)
            .with_context(|| format!("Cannot load {}", file_name))?;

        let pixels = image::load_from_memory_with_format(&encoded_bytes, format.as_codec())
            .with_context(|| format!("Failed to decode {} as {:?}", file_name, format))?;

        log::debug!(
            "[IMAGE_BUFFER] decoded {}: {:?} {}x{}, {} bytes",
            file_name,
            format,
            pixels.width(),
            pixels.height(),
            encoded_bytes.len()
        );

        Ok(Self {
            file_name,
            format,
            encoded_bytes,
            pixels,
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn encoded_bytes(&self) -> &[u8] {
        &self.encoded_bytes
    }

    pub fn pixels(&self) -> &DynamicImage {
        &self.pixels
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

#[cfg(test)]
pub(crate) fn encode_test_png(width: u32, height: u32) -> Vec<u8> {
    let image = image::RgbImage::from_pixel(width, height, image::Rgb([10, 20, 30]));
    let mut bytes = Vec::new();
    image
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}
