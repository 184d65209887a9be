mod artifact_exporter;
mod vision_annotation_service;

pub use artifact_exporter::ArtifactExporter;
pub use vision_annotation_service::VisionAnnotationService;
