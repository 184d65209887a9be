use anyhow::{Context, Result};
use image::RgbImage;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::core::interfaces::adapters::ArtifactExporter;
use crate::global_constants;

/// Writes exports into a single output directory.
pub struct LocalFileExporter {
    output_dir: PathBuf,
}

impl LocalFileExporter {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    pub fn annotations_file_name(source_file_name: &str) -> String {
        format!("{}{}.json", global_constants::EXPORT_FILE_PREFIX, source_file_name)
    }

    pub fn boxed_image_file_name(source_file_name: &str) -> String {
        let stem = Path::new(source_file_name)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or(source_file_name);

        format!("{}{}.png", global_constants::BOXED_IMAGE_FILE_PREFIX, stem)
    }

    /// Pretty JSON with four-space indentation.
    pub fn serialize_annotations(raw_response: &Value) -> Result<String> {
        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        raw_response
            .serialize(&mut serializer)
            .context("Failed to serialize annotations")?;

        String::from_utf8(buffer).context("Serialized annotations are not UTF-8")
    }

    fn ensure_output_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.output_dir)
            .with_context(|| format!("Failed to create output directory {:?}", self.output_dir))
    }
}

impl ArtifactExporter for LocalFileExporter {
    fn export_annotations(&self, source_file_name: &str, raw_response: &Value) -> Result<PathBuf> {
        self.ensure_output_dir()?;

        let export_path = self
            .output_dir
            .join(Self::annotations_file_name(source_file_name));
        let contents = Self::serialize_annotations(raw_response)?;

        std::fs::write(&export_path, contents)
            .with_context(|| format!("Failed to write {:?}", export_path))?;

        log::info!("[EXPORT] Wrote annotations to {:?}", export_path);
        Ok(export_path)
    }

    fn export_boxed_image(&self, source_file_name: &str, image: &RgbImage) -> Result<PathBuf> {
        self.ensure_output_dir()?;

        let export_path = self
            .output_dir
            .join(Self::boxed_image_file_name(source_file_name));

        image
            .save_with_format(&export_path, image::ImageFormat::Png)
            .with_context(|| format!("Failed to write {:?}", export_path))?;

        log::info!("[EXPORT] Wrote boxed image to {:?}", export_path);
        Ok(export_path)
    }
}
