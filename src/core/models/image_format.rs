use anyhow::{Context, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageFormat {
    PNG,
    JPEG,
}

impl ImageFormat {
    /// Sniffs the magic bytes; anything other than PNG or JPEG is rejected.
    pub fn detect(encoded_bytes: &[u8]) -> Result<Self> {
        let guessed = image::guess_format(encoded_bytes).context("Unrecognized image data")?;

        match guessed {
            image::ImageFormat::Png => Ok(ImageFormat::PNG),
            image::ImageFormat::Jpeg => Ok(ImageFormat::JPEG),
            other => anyhow::bail!("Unsupported image format {:?}, expected JPEG or PNG", other),
        }
    }

    pub fn as_codec(self) -> image::ImageFormat {
        match self {
            ImageFormat::PNG => image::ImageFormat::Png,
            ImageFormat::JPEG => image::ImageFormat::Jpeg,
        }
    }
}
