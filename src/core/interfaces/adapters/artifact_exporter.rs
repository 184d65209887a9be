use anyhow::Result;
use image::RgbImage;
use std::path::PathBuf;

pub trait ArtifactExporter: Send + Sync {
    fn export_annotations(&self, source_file_name: &str, raw_response: &serde_json::Value) -> Result<PathBuf>;

    fn export_boxed_image(&self, source_file_name: &str, image: &RgbImage) -> Result<PathBuf>;
}
