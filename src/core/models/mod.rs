mod annotation;
mod annotation_view;
mod annotator_settings;
mod geometry;
mod image_buffer;
mod image_format;
mod image_report;
mod rendered_boxes;

pub use annotation::{AnnotationRequest, AnnotationResult, DetectedObject, ImageAnnotations};
pub use annotation_view::{AnnotationView, LabelsSection, ObjectsSection, ScoredEntry, TextSection};
pub use annotator_settings::{AnnotatorSettings, BoxStyle};
pub use geometry::{GeometryError, NormalizedVertex, PixelRect};
pub use image_buffer::ImageBuffer;
pub use image_format::ImageFormat;
pub use image_report::{display_name, ImageOutcome, ImageReport, ImageUpload};
pub use rendered_boxes::RenderedBoxes;

#[cfg(test)]
pub(crate) use image_buffer::encode_test_png;
